//! # Módulo Reasoning — Raciocínio Simbólico Abdutivo
//!
//! O coração do sistema: dado um conjunto de regras causais, encontra e
//! ranqueia cadeias que **explicam** uma observação.
//!
//! ## Fluxo de Dados
//!
//! ```text
//! RuleSet ──► CausalGraph ──► connect_concepts (menores caminhos)
//!    │
//!    └──────► ChainTracer ──► ChainScorer ──► ExplanationSelector
//!             explain/predict   3 termos        melhor + todas
//! ```
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`graph`] | Grafo dirigido e menor caminho entre conceitos |
//! | [`tracer`] | Busca recursiva para trás (explain) e para frente (predict) |
//! | [`scorer`] | Pontuação: comprimento + fatos + similaridade |
//! | [`selector`] | Melhor explicação entre todos os candidatos |
//! | [`narrative`] | Cadeia → linguagem natural |
//! | [`visualize`] | Cadeia → Graphviz DOT |
//!
//! Tudo aqui é síncrono, em memória e somente-leitura após a construção:
//! um [`SymbolicReasoner`] pode ser compartilhado via `Arc` sem locks.

pub mod graph;
pub mod narrative;
pub mod scorer;
pub mod selector;
pub mod tracer;
pub mod visualize;

use std::path::Path;

use tracing::Span;

use crate::core::{Chain, RuleSet};
use crate::nlu::SimilarityProvider;

pub use graph::CausalGraph;
pub use narrative::{explain_chain_naturally, NO_EXPLANATION};
pub use scorer::{ChainScorer, ScoreWeights};
pub use selector::{ExplanationSelector, Selection, NO_EXPLANATION_SCORE};
pub use tracer::{ChainTracer, DEFAULT_DEPTH};
pub use visualize::{ChainVisualizer, DotVisualizer};

/// Fachada do raciocinador: regras + grafo + pontuação.
///
/// ## Uso
///
/// ```rust
/// let reasoner = SymbolicReasoner::from_path("data/scientific_rules.txt");
/// let selection = reasoner.select_best_explanation(&concepts, &facts, observation, &similarity);
/// println!("{}", explain_chain_naturally(selection.best_chain().unwrap_or(&Chain::default())));
/// ```
pub struct SymbolicReasoner {
    rules: RuleSet,
    graph: CausalGraph,
    scorer: ChainScorer,
    depth: usize,
    span: Span,
}

impl SymbolicReasoner {
    /// Carrega as regras de `path`. Nunca falha: sem arquivo, sem regras.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::with_span(path, tracing::info_span!("reasoner"))
    }

    /// Como [`from_path`](Self::from_path), registrando logs dentro de `span`.
    pub fn with_span(path: impl AsRef<Path>, span: Span) -> Self {
        let rules = span.in_scope(|| RuleSet::load(path));
        Self::build(rules, span)
    }

    pub fn from_rules(rules: RuleSet) -> Self {
        Self::build(rules, tracing::info_span!("reasoner"))
    }

    fn build(rules: RuleSet, span: Span) -> Self {
        let graph = span.in_scope(|| CausalGraph::build(&rules));
        let scorer = ChainScorer::with_span(
            ScoreWeights::default(),
            tracing::debug_span!(parent: &span, "chain_scorer"),
        );
        Self {
            rules,
            graph,
            scorer,
            depth: DEFAULT_DEPTH,
            span,
        }
    }

    /// Substitui os pesos da pontuação.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.scorer =
            ChainScorer::with_span(weights, tracing::debug_span!(parent: &self.span, "chain_scorer"));
        self
    }

    /// Profundidade usada por [`select_best_explanation`](Self::select_best_explanation).
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn graph(&self) -> &CausalGraph {
        &self.graph
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn tracer(&self) -> ChainTracer<'_> {
        ChainTracer::new(&self.rules)
    }

    pub fn explain(&self, target: &str, depth: usize) -> Vec<Chain> {
        self.tracer().explain(target, depth)
    }

    pub fn predict(&self, start: &str, depth: usize) -> Vec<Chain> {
        self.tracer().predict(start, depth)
    }

    pub fn connect_concepts<S: AsRef<str>>(&self, concepts: &[S]) -> Vec<Chain> {
        self.graph.connect_concepts(concepts)
    }

    pub fn score_chain<S: AsRef<str>>(
        &self,
        chain: &Chain,
        known_facts: &[S],
        user_input: &str,
        similarity: &dyn SimilarityProvider,
    ) -> f64 {
        self.scorer.score(chain, known_facts, user_input, similarity)
    }

    pub fn select_best_explanation<C: AsRef<str>, F: AsRef<str>>(
        &self,
        concepts: &[C],
        known_facts: &[F],
        user_input: &str,
        similarity: &dyn SimilarityProvider,
    ) -> Selection {
        let _guard = self.span.enter();
        ExplanationSelector::new(self.tracer(), &self.scorer, self.depth).select_best(
            concepts,
            known_facts,
            user_input,
            similarity,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::nlu::testing::FixedSimilarity;

    fn reasoner() -> SymbolicReasoner {
        SymbolicReasoner::from_rules(RuleSet::parse(
            "chronic_stress => cortisol_increase\n\
             cortisol_increase => hippocampal_atrophy\n\
             hippocampal_atrophy => memory_loss\n\
             sleep_deprivation => memory_loss\n",
        ))
    }

    #[test]
    fn zero_rules_is_constructible() {
        let r = SymbolicReasoner::from_path("/no/such/rules.txt");
        assert!(r.rules().is_empty());
        assert_eq!(r.graph().node_count(), 0);
        let selection = r.select_best_explanation(&["memory_loss"], &[] as &[&str], "x", &FixedSimilarity(1.0));
        assert_eq!(selection.best_score(), NO_EXPLANATION_SCORE);
    }

    #[test]
    fn loads_from_file_and_builds_graph() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "A => B\nB => C").unwrap();
        let r = SymbolicReasoner::from_path(file.path());
        assert_eq!(r.rules().len(), 2);
        assert_eq!(r.graph().shortest_path("A", "C"), Some(vec!["A", "B", "C"]));
    }

    #[test]
    fn best_explanation_traces_back_to_root_cause() {
        let r = reasoner();
        let selection = r.select_best_explanation(
            &["memory_loss"],
            &["chronic_stress elevates cortisol_increase"],
            "memory loss",
            &FixedSimilarity(0.2),
        );
        let best = selection.best_chain().unwrap();
        assert_eq!(best.root_cause(), Some("chronic_stress"));
        assert_eq!(best.len(), 3);
        // explain(memory_loss, 3): 3 cadeias via atrofia + 1 via privação de sono.
        assert_eq!(selection.scored.len(), 4);
    }

    #[test]
    fn depth_limits_selection() {
        let r = reasoner().with_depth(1);
        let selection = r.select_best_explanation(&["memory_loss"], &[] as &[&str], "x", &FixedSimilarity(0.0));
        assert!(selection.scored.iter().all(|s| s.chain.len() == 1));
    }

    #[test]
    fn predict_follows_effects() {
        let chains = reasoner().predict("chronic_stress", 2);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[1].nodes(), vec!["chronic_stress", "cortisol_increase", "hippocampal_atrophy"]);
    }

    #[test]
    fn score_chain_applies_weights() {
        let chain = reasoner().explain("cortisol_increase", 1).remove(0);
        let facts = ["chronic_stress is common"];
        // 0.5 * 1 + 1.0 * 1 + 2.0 * 0.5
        let default = reasoner().score_chain(&chain, &facts, "stress", &FixedSimilarity(0.5));
        assert!((default - 2.5).abs() < 1e-9);

        let weighted = reasoner().with_weights(ScoreWeights {
            length: 1.0,
            fact_match: 0.0,
            similarity: 0.0,
        });
        let score = weighted.score_chain(&chain, &facts, "stress", &FixedSimilarity(0.5));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn connect_concepts_uses_graph() {
        let chains = reasoner().connect_concepts(&["chronic_stress", "memory_loss"]);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 3);
    }
}
