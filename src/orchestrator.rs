//! # Orquestrador — Da Observação à Melhor Explicação
//!
//! O [`Orchestrator`] amarra a camada neural, a literatura e o núcleo
//! simbólico num único ciclo por observação:
//!
//! ```text
//! Observação (texto livre)
//!   │
//!   ├── 1. NORMALIZAÇÃO   NFC + trim
//!   ├── 2. NEURAL         ConceptIndex → top-k conceitos e fatos
//!   ├── 3. LITERATURA     LiteratureSource → artigos (+ observação-chave)
//!   ├── 4. ABDUÇÃO        SymbolicReasoner::select_best_explanation
//!   └── 5. SAÍDA          narrativa + DOT → ExplanationReport
//! ```
//!
//! Falha da literatura não interrompe o ciclo: o relatório sai sem
//! artigos e o erro vai para o log. Falhas do embedder, ao contrário,
//! impedem a escolha de conceitos e são propagadas.
//!
//! ## Concorrência
//!
//! `explain_observation` recebe `&self` e pode rodar em paralelo; o
//! índice fica atrás de um `RwLock`. `record_fact` toma o lock de escrita,
//! o que também serializa os acréscimos ao arquivo de fatos.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::config::AppConfig;
use crate::core::{Chain, ScoredChain};
use crate::error::{ReasonerError, Result};
use crate::literature::{LiteratureSource, Paper, Summarizer};
use crate::nlu::{ConceptIndex, EmbeddingSimilarity, TextEmbedder};
use crate::persistence::{self, FactUpdate};
use crate::reasoning::visualize::to_dot;
use crate::reasoning::{explain_chain_naturally, ChainVisualizer, SymbolicReasoner};

/// Título dos desenhos de cadeia.
pub const CHAIN_TITLE: &str = "Abductive Reasoning Path";

/// Artigo acompanhado da observação extraída do seu abstract.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaperReport {
    #[serde(flatten)]
    pub paper: Paper,
    pub key_observation: Option<String>,
}

/// Tudo o que um ciclo produziu para uma observação.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExplanationReport {
    pub observation: String,
    pub concepts: Vec<String>,
    pub facts: Vec<String>,
    pub papers: Vec<PaperReport>,
    pub best_chain: Option<Chain>,
    /// `-1` quando nenhuma cadeia foi encontrada.
    pub best_score: f64,
    pub chains: Vec<ScoredChain>,
    pub narrative: String,
    pub dot: Option<String>,
}

/// Quantos itens buscar em cada etapa.
#[derive(Clone, Copy, Debug)]
struct Limits {
    top_concepts: usize,
    top_facts: usize,
    max_papers: usize,
}

pub struct Orchestrator {
    reasoner: Arc<SymbolicReasoner>,
    embedder: Arc<dyn TextEmbedder>,
    index: RwLock<ConceptIndex>,
    literature: Box<dyn LiteratureSource>,
    summarizer: Box<dyn Summarizer>,
    visualizer: Option<Box<dyn ChainVisualizer + Send + Sync>>,
    facts_path: PathBuf,
    limits: Limits,
}

impl Orchestrator {
    pub fn new(
        reasoner: Arc<SymbolicReasoner>,
        embedder: Arc<dyn TextEmbedder>,
        index: ConceptIndex,
        literature: Box<dyn LiteratureSource>,
        summarizer: Box<dyn Summarizer>,
        config: &AppConfig,
    ) -> Self {
        Self {
            reasoner,
            embedder,
            index: RwLock::new(index),
            literature,
            summarizer,
            visualizer: None,
            facts_path: config.facts_path.clone(),
            limits: Limits {
                top_concepts: config.top_concepts,
                top_facts: config.top_facts,
                max_papers: config.max_papers,
            },
        }
    }

    /// Desenha a melhor cadeia de cada ciclo também neste visualizador.
    pub fn with_visualizer(mut self, visualizer: Box<dyn ChainVisualizer + Send + Sync>) -> Self {
        self.visualizer = Some(visualizer);
        self
    }

    pub fn reasoner(&self) -> &SymbolicReasoner {
        &self.reasoner
    }

    /// Roda o ciclo completo para uma observação.
    ///
    /// # Erros
    ///
    /// - [`ReasonerError::EmptyInput`] para observação vazia
    /// - [`ReasonerError::Embedding`] se o embedder falhar
    pub fn explain_observation(&self, observation: &str) -> Result<ExplanationReport> {
        let observation: String = observation.nfc().collect::<String>().trim().to_string();
        if observation.is_empty() {
            return Err(ReasonerError::EmptyInput("observation"));
        }
        let span = tracing::info_span!("explain_observation", observation = %observation);
        let _guard = span.enter();

        let (concepts, facts) = {
            let index = self.index.read();
            let embedder = self.embedder.as_ref();
            (
                index.related_concepts(&observation, self.limits.top_concepts, embedder)?,
                index.related_facts(&observation, self.limits.top_facts, embedder)?,
            )
        };
        tracing::debug!(?concepts, ?facts, "Neural candidates");

        let papers = self.papers(&observation);

        let similarity = EmbeddingSimilarity(self.embedder.as_ref());
        let selection =
            self.reasoner
                .select_best_explanation(&concepts, &facts, &observation, &similarity);

        let best_chain = selection.best_chain().cloned();
        let narrative = explain_chain_naturally(best_chain.as_ref().unwrap_or(&Chain::default()));
        let dot = best_chain.as_ref().and_then(|c| to_dot(c, CHAIN_TITLE));
        if let Some(visualizer) = &self.visualizer {
            visualizer.draw(best_chain.as_ref(), CHAIN_TITLE);
        }

        Ok(ExplanationReport {
            observation,
            concepts,
            facts,
            papers,
            best_score: selection.best_score(),
            best_chain,
            chains: selection.scored,
            narrative,
            dot,
        })
    }

    /// Artigos da literatura; qualquer falha vira lista vazia.
    fn papers(&self, observation: &str) -> Vec<PaperReport> {
        let papers = match self.literature.fetch(observation, self.limits.max_papers) {
            Ok(papers) => papers,
            Err(e) => {
                tracing::warn!(error = %e, "Literature lookup failed, continuing without papers");
                return Vec::new();
            }
        };
        papers
            .into_iter()
            .map(|paper| {
                let key_observation = match self.summarizer.summarize(&paper.abstract_text) {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        tracing::debug!(pmid = %paper.pmid, error = %e, "Abstract not summarized");
                        None
                    }
                };
                PaperReport {
                    paper,
                    key_observation,
                }
            })
            .collect()
    }

    /// Persiste um fato novo e o torna pesquisável no índice.
    pub fn record_fact(&self, fact: &str) -> Result<FactUpdate> {
        let fact: String = fact.nfc().collect::<String>().trim().to_string();
        let mut index = self.index.write();
        let update = persistence::update_facts(&self.facts_path, &fact)?;
        if update.is_added() {
            index.add_fact(fact, self.embedder.as_ref())?;
        }
        Ok(update)
    }
}
