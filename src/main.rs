#![allow(dead_code)]
#![allow(rustdoc::broken_intra_doc_links)]
//! # Abductive Reasoner — Inferência para a Melhor Explicação
//!
//! **Ponto de entrada** do raciocinador abdutivo neuro-simbólico.
//!
//! Dada uma observação em texto livre ("perda de memória sob estresse"),
//! o sistema encontra conceitos relacionados via embeddings, rastreia
//! para trás nas regras causais (`premissa => conclusão`) e escolhe a
//! cadeia que melhor explica a observação.
//!
//! ## Inicialização em Duas Fases
//!
//! 1. **Fase imediata**: regras carregadas, grafo construído, servidor
//!    axum aceitando conexões (`/rules/*` e `/status` já respondem)
//! 2. **Fase background**: modelo de embeddings + índice de conceitos +
//!    cliente PubMed carregados via `spawn_blocking` e publicados num
//!    `OnceLock`
//!
//! ```text
//! main()
//!   ├── Configura tracing (RUST_LOG, padrão info)
//!   ├── AppConfig::from_env()
//!   ├── SymbolicReasoner::from_path(rules)
//!   ├── Monta AppState e Router, faz bind
//!   └── Spawn background:
//!       ├── Embedder::load(model)
//!       ├── ConceptIndex::load(concepts, facts)
//!       ├── PubMedClient + LeadSummarizer (+ DotVisualizer)
//!       └── Publica Orchestrator no OnceLock (ModelReady)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! RUST_LOG=debug cargo run
//!
//! curl -s localhost:3000/explain -H 'content-type: application/json' \
//!      -d '{"observation": "memory loss after months of stress"}'
//! ```

/// Tipos fundamentais: Rule, RuleSet, Chain.
mod core;

/// Configuração via variáveis de ambiente.
mod config;

/// Erros dos colaboradores.
mod error;

/// Literatura científica (PubMed) e resumo de abstracts.
mod literature;

/// Embeddings, similaridade e índice de conceitos.
mod nlu;

/// Ciclo observação → relatório.
mod orchestrator;

/// Base de fatos somente-acréscimo.
mod persistence;

/// Núcleo simbólico: grafo, rastreador, pontuação, seleção.
mod reasoning;

/// Servidor web axum, handlers e templates.
mod web;

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::literature::{LeadSummarizer, PubMedClient};
use crate::nlu::{ConceptIndex, Embedder, TextEmbedder};
use crate::orchestrator::Orchestrator;
use crate::reasoning::{DotVisualizer, SymbolicReasoner};
use crate::web::state::{AppState, ModelReady};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Abductive Reasoner — Starting...");

    let config = AppConfig::from_env();
    let reasoner =
        Arc::new(SymbolicReasoner::from_path(&config.rules_path).with_depth(config.depth));
    tracing::info!(
        rules = reasoner.rules().len(),
        concepts = reasoner.graph().node_count(),
        "Causal rules loaded"
    );

    let state = AppState::new(reasoner.clone());
    let app = web::create_router(state.clone());

    // O servidor fica acessível antes do modelo terminar de carregar.
    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!("Server running at http://{}", config.addr);

    let model = state.model.clone();
    tokio::task::spawn_blocking(move || {
        tracing::info!("Loading embedding model (first run downloads it)...");
        match build_orchestrator(reasoner, &config) {
            Ok(orchestrator) => {
                let _ = model.set(ModelReady {
                    orchestrator: Arc::new(orchestrator),
                });
                tracing::info!("System ready!");
            }
            Err(e) => tracing::error!("Failed to initialize reasoning pipeline: {:#}", e),
        }
    });

    axum::serve(listener, app).await?;

    Ok(())
}

/// Fase pesada: modelo, índice e colaboradores externos.
fn build_orchestrator(reasoner: Arc<SymbolicReasoner>, config: &AppConfig) -> Result<Orchestrator> {
    let embedder: Arc<dyn TextEmbedder> = Arc::new(Embedder::load(&config.model)?);
    let index = ConceptIndex::load(&config.concepts_path, &config.facts_path, embedder.as_ref())
        .context("Failed to build concept index")?;
    let pubmed = PubMedClient::new().context("Failed to create PubMed client")?;

    let orchestrator = Orchestrator::new(
        reasoner,
        embedder,
        index,
        Box::new(pubmed),
        Box::new(LeadSummarizer::default()),
        config,
    );
    let Some(path) = &config.dot_out else {
        return Ok(orchestrator);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    tracing::info!(path = %path.display(), "Best chains will be appended as DOT");
    Ok(orchestrator.with_visualizer(Box::new(DotVisualizer::new(file))))
}
