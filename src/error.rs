//! # Erros do Raciocinador
//!
//! O núcleo simbólico (regras, grafo, rastreador, pontuação e seleção)
//! **nunca** propaga erros: falhas são absorvidas e registradas via
//! `tracing`, ou representadas como resultados vazios.
//!
//! Os colaboradores externos (embedder, índice de conceitos, cliente
//! PubMed, base de fatos) retornam [`ReasonerError`].

use thiserror::Error;

/// Erro dos colaboradores do raciocinador.
#[derive(Error, Debug)]
pub enum ReasonerError {
    /// Falha de leitura/escrita em disco.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// O modelo de embeddings falhou (tokenização ou forward pass).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Requisição HTTP falhou (rede, timeout, TLS).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// O serviço de literatura respondeu com status inesperado.
    #[error("literature service returned status {status} during {stage}")]
    Literature { stage: &'static str, status: u16 },

    /// XML malformado na resposta do PubMed.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Entrada vazia onde um texto era obrigatório.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// O modelo ainda está carregando em background.
    #[error("model not ready")]
    ModelNotReady,
}

/// Alias de resultado para os colaboradores.
pub type Result<T> = std::result::Result<T, ReasonerError>;
