//! # Camada Neural — Embeddings e Similaridade Semântica
//!
//! O núcleo simbólico trata a similaridade semântica como uma capacidade
//! **opaca**, injetada por interface estreita:
//!
//! | Trait | Papel |
//! |-------|-------|
//! | [`TextEmbedder`] | Texto → vetor denso |
//! | [`SimilarityProvider`] | Dois textos → escore em `[-1, 1]` |
//!
//! [`EmbeddingSimilarity`] adapta qualquer [`TextEmbedder`] em
//! [`SimilarityProvider`] via similaridade cosseno. Em testes, dublês
//! determinísticos implementam as traits sem carregar modelo algum.
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`embedder`] | Sentence embeddings BERT via candle |
//! | [`index`] | Conceitos e fatos mais próximos de uma observação |

/// Sub-módulo do embedder BERT via candle.
pub mod embedder;

/// Sub-módulo do índice de conceitos e fatos.
pub mod index;

use crate::error::Result;

pub use embedder::Embedder;
pub use index::ConceptIndex;

/// Gera representações vetoriais de texto.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeddings de vários textos; por padrão, um de cada vez.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Compara dois textos e retorna a similaridade semântica.
pub trait SimilarityProvider {
    fn similarity(&self, a: &str, b: &str) -> Result<f32>;
}

/// Adaptador: similaridade cosseno entre os embeddings dos dois textos.
pub struct EmbeddingSimilarity<'a, E: ?Sized>(pub &'a E);

impl<E: TextEmbedder + ?Sized> SimilarityProvider for EmbeddingSimilarity<'_, E> {
    fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let va = self.0.embed(a)?;
        let vb = self.0.embed(b)?;
        Ok(cosine_similarity(&va, &vb))
    }
}

/// Similaridade cosseno entre dois vetores.
///
/// Retorna 0.0 para vetores vazios, de tamanhos diferentes ou de norma zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}
