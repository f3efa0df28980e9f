//! # Seleção da Melhor Explicação
//!
//! Para cada conceito candidato, o [`ExplanationSelector`] roda a busca
//! para trás, pontua todas as cadeias e guarda a de maior pontuação.
//!
//! ```text
//! conceitos ──► explain(c, depth) ──► score(cadeia) ──► melhor + todas
//! ```
//!
//! Empates ficam com a primeira cadeia vista (comparação estrita `>`).
//! Sem conceitos ou sem cadeias, o resultado é vazio e a pontuação
//! observável é [`NO_EXPLANATION_SCORE`].

use serde::Serialize;

use super::scorer::ChainScorer;
use super::tracer::ChainTracer;
use crate::core::{Chain, ScoredChain};
use crate::nlu::SimilarityProvider;

/// Pontuação reportada quando nenhuma explicação foi encontrada.
pub const NO_EXPLANATION_SCORE: f64 = -1.0;

/// Resultado de uma seleção: a melhor cadeia (se houver) e todas as pontuadas.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Selection {
    pub best: Option<ScoredChain>,
    pub scored: Vec<ScoredChain>,
}

impl Selection {
    pub fn best_chain(&self) -> Option<&Chain> {
        self.best.as_ref().map(|b| &b.chain)
    }

    pub fn best_score(&self) -> f64 {
        self.best.as_ref().map_or(NO_EXPLANATION_SCORE, |b| b.score)
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }
}

pub struct ExplanationSelector<'a> {
    tracer: ChainTracer<'a>,
    scorer: &'a ChainScorer,
    depth: usize,
}

impl<'a> ExplanationSelector<'a> {
    pub fn new(tracer: ChainTracer<'a>, scorer: &'a ChainScorer, depth: usize) -> Self {
        Self {
            tracer,
            scorer,
            depth,
        }
    }

    pub fn select_best<C: AsRef<str>, F: AsRef<str>>(
        &self,
        concepts: &[C],
        known_facts: &[F],
        user_input: &str,
        similarity: &dyn SimilarityProvider,
    ) -> Selection {
        let mut selection = Selection::default();

        for concept in concepts {
            for chain in self.tracer.explain(concept.as_ref(), self.depth) {
                let score = self.scorer.score(&chain, known_facts, user_input, similarity);
                let scored = ScoredChain { chain, score };
                let improves = selection.best.as_ref().map_or(true, |b| score > b.score);
                if improves {
                    selection.best = Some(scored.clone());
                }
                selection.scored.push(scored);
            }
        }

        match &selection.best {
            Some(best) => tracing::info!(
                candidates = selection.scored.len(),
                score = best.score,
                root = best.chain.root_cause().unwrap_or_default(),
                "Best explanation selected"
            ),
            None => tracing::info!(concepts = concepts.len(), "No explanation found"),
        }
        selection
    }
}
