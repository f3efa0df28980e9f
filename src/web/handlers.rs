//! # Handlers HTTP
//!
//! Cada função pública é um handler Axum, mapeado a uma rota em
//! [`super::create_router()`].
//!
//! | Handler | Método | Retorno |
//! |---------|--------|---------|
//! | `index` | GET | HTML completo |
//! | `model_status` | GET | JSON `{ready, rules}` |
//! | `explain` | POST | JSON `ExplanationReport` |
//! | `explain_html` | POST | HTMX fragment |
//! | `add_fact` | POST | JSON `{added}` |
//! | `connect` | GET | JSON lista de cadeias |
//! | `predict` | GET | JSON lista de cadeias |
//!
//! ## Guarda de Model Ready
//!
//! Handlers que dependem do embedder verificam `state.orchestrator()`:
//! `None` vira 503 na API JSON e um fragmento "carregando" no HTML.
//!
//! O raciocínio é síncrono (e o cliente PubMed é bloqueante), então roda
//! em `spawn_blocking`.

use std::fmt::Display;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::templates;
use crate::core::Chain;
use crate::error::ReasonerError;
use crate::orchestrator::ExplanationReport;

/// Teto da profundidade aceita em `/rules/predict`.
pub const MAX_PREDICT_DEPTH: usize = 6;

#[derive(Serialize)]
pub struct StatusResponse {
    /// `true` quando embedder e índice terminaram de carregar.
    pub ready: bool,
    pub rules: usize,
}

#[derive(Deserialize)]
pub struct ExplainRequest {
    pub observation: String,
}

/// Campo `observation` do formulário HTML.
#[derive(Deserialize)]
pub struct ObservationForm {
    pub observation: String,
}

#[derive(Deserialize)]
pub struct FactRequest {
    pub fact: String,
}

#[derive(Serialize)]
pub struct FactResponse {
    pub added: bool,
}

/// `?concepts=a,b,c`
#[derive(Deserialize)]
pub struct ConnectParams {
    #[serde(default)]
    pub concepts: String,
}

/// `?concept=x&depth=n`
#[derive(Deserialize)]
pub struct PredictParams {
    pub concept: String,
    pub depth: Option<usize>,
}

/// Erro da API JSON: status + `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(e: impl Display) -> Self {
        tracing::error!(error = %e, "Request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl From<ReasonerError> for ApiError {
    fn from(e: ReasonerError) -> Self {
        let status = match e {
            ReasonerError::EmptyInput(_) => StatusCode::BAD_REQUEST,
            ReasonerError::ModelNotReady => StatusCode::SERVICE_UNAVAILABLE,
            _ => return Self::internal(e),
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

/// Converte Maud Markup em resposta Html<String> do Axum.
fn markup_to_html(m: maud::Markup) -> Html<String> {
    Html(m.into_string())
}

/// GET `/` — Página principal.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    markup_to_html(templates::full_page(state.reasoner.rules().len()))
}

/// GET `/status` — O frontend faz polling deste endpoint durante o loading.
pub async fn model_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        ready: state.model.get().is_some(),
        rules: state.reasoner.rules().len(),
    })
}

/// POST `/explain` — Relatório completo em JSON.
pub async fn explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplanationReport>, ApiError> {
    if request.observation.trim().is_empty() {
        return Err(ReasonerError::EmptyInput("observation").into());
    }
    let orchestrator = state.orchestrator().ok_or(ReasonerError::ModelNotReady)?;
    let report = tokio::task::spawn_blocking(move || {
        orchestrator.explain_observation(&request.observation)
    })
    .await
    .map_err(ApiError::internal)??;
    Ok(Json(report))
}

/// POST `/explain/html` — Mesmo ciclo, renderizado como fragmento HTMX.
pub async fn explain_html(
    State(state): State<AppState>,
    Form(form): Form<ObservationForm>,
) -> Html<String> {
    let observation = form.observation.trim().to_string();
    if observation.is_empty() {
        return markup_to_html(maud::html! {});
    }
    let Some(orchestrator) = state.orchestrator() else {
        return markup_to_html(templates::loading_fragment());
    };

    let result =
        tokio::task::spawn_blocking(move || orchestrator.explain_observation(&observation)).await;
    markup_to_html(match result {
        Ok(Ok(report)) => templates::report_fragment(&report),
        Ok(Err(e)) => templates::error_fragment(&e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Explanation task panicked");
            templates::error_fragment("internal error")
        }
    })
}

/// POST `/facts` — Acrescenta um fato à base.
pub async fn add_fact(
    State(state): State<AppState>,
    Json(request): Json<FactRequest>,
) -> Result<Json<FactResponse>, ApiError> {
    if request.fact.trim().is_empty() {
        return Err(ReasonerError::EmptyInput("fact").into());
    }
    let orchestrator = state.orchestrator().ok_or(ReasonerError::ModelNotReady)?;
    let update = tokio::task::spawn_blocking(move || orchestrator.record_fact(&request.fact))
        .await
        .map_err(ApiError::internal)??;
    Ok(Json(FactResponse {
        added: update.is_added(),
    }))
}

/// GET `/rules/connect` — Menores caminhos entre os conceitos da lista.
pub async fn connect(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
) -> Json<Vec<Chain>> {
    let concepts: Vec<&str> = params
        .concepts
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    Json(state.reasoner.connect_concepts(&concepts))
}

/// GET `/rules/predict` — Consequências de um conceito.
///
/// Sem `depth`, usa a profundidade do raciocinador; o valor é limitado a
/// [`MAX_PREDICT_DEPTH`].
pub async fn predict(
    State(state): State<AppState>,
    Query(params): Query<PredictParams>,
) -> Json<Vec<Chain>> {
    let depth = params
        .depth
        .unwrap_or(state.reasoner.depth())
        .min(MAX_PREDICT_DEPTH);
    Json(state.reasoner.predict(params.concept.trim(), depth))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::core::RuleSet;
    use crate::error::Result;
    use crate::literature::{LeadSummarizer, LiteratureSource, Paper};
    use crate::nlu::testing::VocabEmbedder;
    use crate::nlu::{ConceptIndex, TextEmbedder};
    use crate::orchestrator::Orchestrator;
    use crate::reasoning::SymbolicReasoner;
    use crate::web::state::ModelReady;

    struct NoLiterature;

    impl LiteratureSource for NoLiterature {
        fn fetch(&self, _query: &str, _max_results: usize) -> Result<Vec<Paper>> {
            Ok(Vec::new())
        }
    }

    fn state() -> AppState {
        AppState::new(Arc::new(SymbolicReasoner::from_rules(RuleSet::parse(
            "stress => cortisol\ncortisol => memory_loss\nmemory_loss => anxiety\n",
        ))))
    }

    fn ready_state(dir: &tempfile::TempDir) -> AppState {
        let state = state();
        let embedder: Arc<dyn TextEmbedder> =
            Arc::new(VocabEmbedder::new(&["stress", "cortisol", "memory", "loss"]));
        let index = ConceptIndex::from_parts(
            vec!["memory_loss".into()],
            vec!["memory loss".into()],
            Vec::new(),
            embedder.as_ref(),
        )
        .unwrap();
        let config = AppConfig {
            facts_path: dir.path().join("facts.txt"),
            ..AppConfig::default()
        };
        let orchestrator = Orchestrator::new(
            state.reasoner.clone(),
            embedder,
            index,
            Box::new(NoLiterature),
            Box::new(LeadSummarizer::default()),
            &config,
        );
        assert!(state
            .model
            .set(ModelReady {
                orchestrator: Arc::new(orchestrator)
            })
            .is_ok());
        state
    }

    #[tokio::test]
    async fn status_reports_loading_and_rule_count() {
        let Json(status) = model_status(State(state())).await;
        assert!(!status.ready);
        assert_eq!(status.rules, 3);
    }

    /// Antes do modelo: 503; observação vazia: 400.
    #[tokio::test]
    async fn explain_guards() {
        let loading = explain(
            State(state()),
            Json(ExplainRequest {
                observation: "memory loss".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(loading.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let empty = explain(
            State(state()),
            Json(ExplainRequest {
                observation: "  ".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(empty.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn explain_returns_report_when_ready() {
        let dir = tempfile::tempdir().unwrap();
        let Json(report) = explain(
            State(ready_state(&dir)),
            Json(ExplainRequest {
                observation: "memory loss".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(report.concepts, vec!["memory_loss"]);
        assert_eq!(report.chains.len(), 2);
        assert_eq!(report.best_chain.unwrap().root_cause(), Some("stress"));
    }

    #[tokio::test]
    async fn html_fragment_while_loading() {
        let Html(body) = explain_html(
            State(state()),
            Form(ObservationForm {
                observation: "memory loss".into(),
            }),
        )
        .await;
        assert!(body.contains("loading"));
    }

    #[tokio::test]
    async fn html_fragment_renders_narrative() {
        let dir = tempfile::tempdir().unwrap();
        let Html(body) = explain_html(
            State(ready_state(&dir)),
            Form(ObservationForm {
                observation: "memory loss".into(),
            }),
        )
        .await;
        assert!(body.contains("Because stress, it may lead to cortisol."));
    }

    #[tokio::test]
    async fn facts_are_added_once() {
        let dir = tempfile::tempdir().unwrap();
        let state = ready_state(&dir);
        let request = || {
            Json(FactRequest {
                fact: "Stress raises cortisol".into(),
            })
        };
        let Json(first) = add_fact(State(state.clone()), request()).await.unwrap();
        let Json(second) = add_fact(State(state), request()).await.unwrap();
        assert!(first.added);
        assert!(!second.added);
    }

    #[tokio::test]
    async fn connect_splits_the_concept_list() {
        let Json(chains) = connect(
            State(state()),
            Query(ConnectParams {
                concepts: "stress, anxiety,,".into(),
            }),
        )
        .await;
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].nodes(), vec!["stress", "cortisol", "memory_loss", "anxiety"]);
    }

    #[tokio::test]
    async fn predict_uses_default_and_capped_depth() {
        let Json(default_depth) = predict(
            State(state()),
            Query(PredictParams {
                concept: "stress".into(),
                depth: None,
            }),
        )
        .await;
        assert_eq!(default_depth.len(), 3);

        let Json(shallow) = predict(
            State(state()),
            Query(PredictParams {
                concept: "stress".into(),
                depth: Some(1),
            }),
        )
        .await;
        assert_eq!(shallow.len(), 1);
    }
}
