//! # Rastreador de Cadeias — Explicar e Prever
//!
//! O [`ChainTracer`] percorre o [`RuleSet`] diretamente (e não o grafo),
//! para que **todas** as regras sejam exploradas — inclusive premissas
//! paralelas para uma mesma conclusão, que um único menor caminho perderia.
//!
//! ## Modos
//!
//! ```text
//! explain(C):  ... → X → B → C   cresce pela cabeça (busca para trás)
//! predict(A):  A → B → X → ...   cresce pela cauda  (busca para frente)
//! ```
//!
//! Toda expansão é registrada como cadeia candidata — parciais e completas,
//! não apenas as de profundidade máxima.
//!
//! ## Ciclos
//!
//! Não há conjunto de visitados: um conceito pode reaparecer na própria
//! ancestralidade dentro do orçamento de profundidade. Só a profundidade
//! garante término, e o número de cadeias cresce exponencialmente com ela
//! em regras muito cíclicas.

use crate::core::{Chain, Rule, RuleSet};

/// Profundidade padrão usada pela seleção de explicações.
pub const DEFAULT_DEPTH: usize = 3;

/// Busca recursiva limitada por profundidade sobre o conjunto de regras.
pub struct ChainTracer<'a> {
    rules: &'a RuleSet,
}

impl<'a> ChainTracer<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Todas as cadeias que terminam em `target`, com até `depth` passos.
    pub fn explain(&self, target: &str, depth: usize) -> Vec<Chain> {
        let mut chains = Vec::new();
        self.trace_backward(target, &[], &mut chains, depth);
        chains
    }

    /// Todas as cadeias que partem de `start`, com até `depth` passos.
    pub fn predict(&self, start: &str, depth: usize) -> Vec<Chain> {
        let mut chains = Vec::new();
        self.trace_forward(start, &[], &mut chains, depth);
        chains
    }

    fn trace_backward(&self, target: &str, current: &[Rule], out: &mut Vec<Chain>, depth: usize) {
        if depth == 0 {
            return;
        }
        for rule in self.rules.concluding(target) {
            let mut path = Vec::with_capacity(current.len() + 1);
            path.push(rule.clone());
            path.extend_from_slice(current);
            out.push(Chain::new(path.clone()));
            self.trace_backward(&rule.premise, &path, out, depth - 1);
        }
    }

    fn trace_forward(&self, start: &str, current: &[Rule], out: &mut Vec<Chain>, depth: usize) {
        if depth == 0 {
            return;
        }
        for rule in self.rules.premised_on(start) {
            let mut path = current.to_vec();
            path.push(rule.clone());
            out.push(Chain::new(path.clone()));
            self.trace_forward(&rule.conclusion, &path, out, depth - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn lines(chains: &[Chain]) -> Vec<Vec<String>> {
        chains.iter().map(Chain::to_lines).collect()
    }

    #[test]
    fn explain_emits_partial_and_full_chains() {
        let rules = RuleSet::parse("A => B\nB => C\nX => B\n");
        let chains = ChainTracer::new(&rules).explain("C", 3);
        assert_eq!(
            lines(&chains),
            vec![
                vec!["B => C"],
                vec!["A => B", "B => C"],
                vec!["X => B", "B => C"],
            ]
        );
    }

    #[test]
    fn predict_grows_at_the_tail() {
        let rules = RuleSet::parse("A => B\nB => C\nB => D\n");
        let chains = ChainTracer::new(&rules).predict("A", 3);
        assert_eq!(
            lines(&chains),
            vec![
                vec!["A => B"],
                vec!["A => B", "B => C"],
                vec!["A => B", "B => D"],
            ]
        );
    }

    #[test]
    fn depth_zero_never_expands() {
        let rules = RuleSet::parse("A => B\n");
        let tracer = ChainTracer::new(&rules);
        assert!(tracer.explain("B", 0).is_empty());
        assert!(tracer.predict("A", 0).is_empty());
    }

    #[test]
    fn leaf_target_has_no_explanation() {
        let rules = RuleSet::parse("A => B\n");
        assert!(ChainTracer::new(&rules).explain("A", 5).is_empty());
    }

    /// Ciclos são revisitados até esgotar a profundidade (comportamento atual).
    #[test]
    fn cycles_are_revisited_within_depth() {
        let rules = RuleSet::parse("A => B\nB => A\n");
        let chains = ChainTracer::new(&rules).explain("A", 3);
        assert_eq!(
            lines(&chains),
            vec![
                vec!["B => A"],
                vec!["A => B", "B => A"],
                vec!["B => A", "A => B", "B => A"],
            ]
        );
    }

    #[test]
    fn self_loop_is_bounded_by_depth() {
        let rules = RuleSet::parse("A => A\n");
        assert_eq!(ChainTracer::new(&rules).explain("A", 4).len(), 4);
    }

    fn rule_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0..8usize, 0..8usize), 0..16)
    }

    proptest! {
        /// Nenhuma cadeia excede a profundidade pedida.
        #[test]
        fn chains_respect_depth(edges in rule_strategy(), depth in 1..5usize, target in 0..8usize) {
            let rules: RuleSet = edges.iter().map(|(a, b)| Rule::new(format!("n{a}"), format!("n{b}"))).collect();
            let tracer = ChainTracer::new(&rules);
            for chain in tracer.explain(&format!("n{target}"), depth) {
                prop_assert!(!chain.is_empty() && chain.len() <= depth);
            }
            for chain in tracer.predict(&format!("n{target}"), depth) {
                prop_assert!(!chain.is_empty() && chain.len() <= depth);
            }
        }

        /// Conceito que nenhuma regra conclui não tem explicação, em qualquer profundidade.
        #[test]
        fn leaf_target_unexplained_at_any_depth(edges in rule_strategy(), depth in 1..8usize, target in 0..8usize) {
            let rules: RuleSet = edges
                .iter()
                .filter(|(_, b)| *b != target)
                .map(|(a, b)| Rule::new(format!("n{a}"), format!("n{b}")))
                .collect();
            let target_id = format!("n{target}");
            prop_assert!(ChainTracer::new(&rules).explain(&target_id, depth).is_empty());
        }

        /// `predict` sobre as regras invertidas espelha `explain` sobre as originais.
        #[test]
        fn explain_and_predict_are_symmetric(edges in rule_strategy(), depth in 1..4usize, concept in 0..8usize) {
            // Apenas arestas i < j: conjunto acíclico.
            let acyclic: Vec<(usize, usize)> = edges.into_iter().filter(|(a, b)| a < b).collect();
            let rules: RuleSet = acyclic.iter().map(|(a, b)| Rule::new(format!("n{a}"), format!("n{b}"))).collect();
            let reversed: RuleSet = rules.iter().map(|r| Rule::new(r.conclusion.clone(), r.premise.clone())).collect();
            let concept = format!("n{concept}");

            let explained = ChainTracer::new(&rules).explain(&concept, depth);
            let mirrored: Vec<Chain> = ChainTracer::new(&reversed)
                .predict(&concept, depth)
                .into_iter()
                .map(|chain| {
                    Chain::new(
                        chain
                            .iter()
                            .rev()
                            .map(|r| Rule::new(r.conclusion.clone(), r.premise.clone()))
                            .collect(),
                    )
                })
                .collect();
            prop_assert_eq!(explained, mirrored);
        }
    }
}
