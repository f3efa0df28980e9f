//! # Literatura Científica
//!
//! Colaboradores externos que trazem evidência da literatura para perto
//! da observação. Não fazem parte do núcleo simbólico: o orquestrador
//! apenas anexa os artigos ao relatório.
//!
//! | Item | Papel |
//! |------|-------|
//! | [`LiteratureSource`] | Busca artigos por consulta |
//! | [`pubmed::PubMedClient`] | Implementação via NCBI E-utilities |
//! | [`summary::Summarizer`] | Resume um abstract numa observação curta |

pub mod pubmed;
pub mod summary;

use serde::Serialize;

use crate::error::Result;

pub use pubmed::PubMedClient;
pub use summary::{LeadSummarizer, Summarizer};

/// Artigo retornado por uma fonte de literatura.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Paper {
    pub pmid: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub published: String,
    pub link: String,
}

/// Busca artigos relacionados a uma consulta em texto livre.
pub trait LiteratureSource: Send + Sync {
    fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<Paper>>;
}
