//! # Estado da Aplicação Web
//!
//! ## Inicialização em Duas Fases
//!
//! ```text
//! Fase 1 (imediata):         Fase 2 (background):
//! ┌──────────────────┐       ┌──────────────────┐
//! │ AppState         │       │ ModelReady       │
//! │  ├── reasoner ✓  │       │  └── orchestrator│
//! │  └── model: ∅    │←──────│  (set via OnceLock)
//! └──────────────────┘       └──────────────────┘
//!    regras já servem          embedder + índice
//!    /rules/* e /status        prontos: /explain
//! ```

use std::sync::{Arc, OnceLock};

use crate::orchestrator::Orchestrator;
use crate::reasoning::SymbolicReasoner;

/// Orquestrador completo, publicado quando o modelo termina de carregar.
pub struct ModelReady {
    pub orchestrator: Arc<Orchestrator>,
}

#[derive(Clone)]
pub struct AppState {
    /// Preenchido em background via `OnceLock::set()`.
    pub model: Arc<OnceLock<ModelReady>>,
    /// Núcleo simbólico, disponível desde o início.
    pub reasoner: Arc<SymbolicReasoner>,
}

impl AppState {
    pub fn new(reasoner: Arc<SymbolicReasoner>) -> Self {
        Self {
            model: Arc::new(OnceLock::new()),
            reasoner,
        }
    }

    /// O orquestrador, se o modelo já estiver pronto.
    pub fn orchestrator(&self) -> Option<Arc<Orchestrator>> {
        self.model.get().map(|m| m.orchestrator.clone())
    }
}
