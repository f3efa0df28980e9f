//! # Módulo Web — API e Página do Raciocinador
//!
//! Camada web construída com **Axum** + **Maud** (+ HTMX no navegador).
//!
//! ## Rotas
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ GET  /                 → página com formulário de observação  │
//! │ GET  /status           → JSON: modelo pronto? nº de regras    │
//! │ POST /explain          → JSON: ExplanationReport              │
//! │ POST /explain/html     → HTMX fragment do relatório           │
//! │ POST /facts            → JSON: fato acrescentado?             │
//! │ GET  /rules/connect    → JSON: menores caminhos entre conceitos│
//! │ GET  /rules/predict    → JSON: cadeias para frente            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! `/rules/*` e `/status` funcionam desde o início; as demais respondem
//! 503 (ou um fragmento de "carregando") até o modelo ficar pronto.
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`, `ModelReady`) |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`templates`] | Templates Maud (HTML server-side) |

pub mod handlers;
pub mod state;
pub mod templates;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // ── Página HTML ───────────────────────────────────────
        .route("/", get(handlers::index))
        // ── API JSON ──────────────────────────────────────────
        .route("/status", get(handlers::model_status))
        .route("/explain", post(handlers::explain))
        .route("/facts", post(handlers::add_fact))
        .route("/rules/connect", get(handlers::connect))
        .route("/rules/predict", get(handlers::predict))
        // ── HTMX fragments ───────────────────────────────────
        .route("/explain/html", post(handlers::explain_html))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
