//! # Pontuação Abdutiva
//!
//! O [`ChainScorer`] mede a plausibilidade de uma cadeia como explicação
//! de uma observação. A pontuação é a soma de três termos ponderados:
//!
//! | Termo | Fórmula | Peso padrão |
//! |-------|---------|-------------|
//! | Comprimento | nº de passos | 0.5 |
//! | Fatos | nº de pares (passo, fato) em que premissa **ou** conclusão aparece no fato | 1.0 |
//! | Similaridade | cosseno(observação, narrativa da cadeia) | 2.0 |
//!
//! Sem normalização: maior é melhor, sem limite superior. O termo de
//! comprimento favorece explicações mais elaboradas; os outros dois o
//! contrabalançam.
//!
//! Se o provedor de similaridade falhar, o termo vale 0.0 e a falha é
//! registrada em `warn`; nada é propagado.

use serde::Serialize;
use tracing::Span;

use super::narrative::explain_chain_naturally;
use crate::core::Chain;
use crate::nlu::SimilarityProvider;

/// Pesos dos três termos.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreWeights {
    pub length: f64,
    pub fact_match: f64,
    pub similarity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            length: 0.5,
            fact_match: 1.0,
            similarity: 2.0,
        }
    }
}

/// Termos já ponderados de uma pontuação.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub length: f64,
    pub fact_match: f64,
    pub similarity: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.length + self.fact_match + self.similarity
    }
}

pub struct ChainScorer {
    weights: ScoreWeights,
    span: Span,
}

impl ChainScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self::with_span(weights, tracing::debug_span!("chain_scorer"))
    }

    /// Usa `span` como contexto de todos os logs do scorer.
    pub fn with_span(weights: ScoreWeights, span: Span) -> Self {
        Self { weights, span }
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    pub fn score<S: AsRef<str>>(
        &self,
        chain: &Chain,
        known_facts: &[S],
        user_input: &str,
        similarity: &dyn SimilarityProvider,
    ) -> f64 {
        self.breakdown(chain, known_facts, user_input, similarity).total()
    }

    pub fn breakdown<S: AsRef<str>>(
        &self,
        chain: &Chain,
        known_facts: &[S],
        user_input: &str,
        similarity: &dyn SimilarityProvider,
    ) -> ScoreBreakdown {
        let _guard = self.span.enter();

        let narrative = explain_chain_naturally(chain);
        let sim = match similarity.similarity(user_input, &narrative) {
            Ok(s) => f64::from(s),
            Err(e) => {
                tracing::warn!(error = %e, "Similarity failed, scoring term as 0.0");
                0.0
            }
        };

        let breakdown = ScoreBreakdown {
            length: self.weights.length * chain.len() as f64,
            fact_match: self.weights.fact_match * fact_matches(chain, known_facts) as f64,
            similarity: self.weights.similarity * sim,
        };
        tracing::debug!(
            chain = ?chain.to_lines(),
            length = breakdown.length,
            facts = breakdown.fact_match,
            similarity = breakdown.similarity,
            "Chain scored"
        );
        breakdown
    }
}

impl Default for ChainScorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

/// Conta pares (passo, fato) em que a premissa ou a conclusão do passo
/// aparece como substring do fato. Cada par conta no máximo uma vez.
pub fn fact_matches<S: AsRef<str>>(chain: &Chain, known_facts: &[S]) -> usize {
    chain
        .iter()
        .map(|step| {
            known_facts
                .iter()
                .map(AsRef::as_ref)
                .filter(|fact| fact.contains(step.premise.as_str()) || fact.contains(step.conclusion.as_str()))
                .count()
        })
        .sum()
}
