//! # Grafo Causal — Conexão Entre Conceitos
//!
//! [`CausalGraph`] é o grafo dirigido cujos nós são todas as premissas e
//! conclusões do [`RuleSet`] e cujas arestas são exatamente as regras.
//! É construído uma vez, após o carregamento das regras.
//!
//! Todas as arestas têm o mesmo peso, então o menor caminho é o de menos
//! passos. Ciclos e auto-laços são permitidos: a busca de menor caminho
//! nunca revisita um nó já fechado.

use std::collections::HashMap;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::{Chain, Rule, RuleSet};

/// Grafo dirigido de conceitos, indexado por nome.
pub struct CausalGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl CausalGraph {
    pub fn build(rules: &RuleSet) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();
        for rule in rules {
            let from = *index
                .entry(rule.premise.clone())
                .or_insert_with(|| graph.add_node(rule.premise.clone()));
            let to = *index
                .entry(rule.conclusion.clone())
                .or_insert_with(|| graph.add_node(rule.conclusion.clone()));
            // Regras repetidas colapsam numa única aresta.
            graph.update_edge(from, to, ());
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Causal graph built"
        );
        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, concept: &str) -> bool {
        self.index.contains_key(concept)
    }

    /// Menor caminho (em número de arestas) de `source` a `target`.
    ///
    /// `None` se algum dos nós é desconhecido ou não há caminho.
    pub fn shortest_path(&self, source: &str, target: &str) -> Option<Vec<&str>> {
        let from = *self.index.get(source)?;
        let to = *self.index.get(target)?;
        let (_, path) = astar(&self.graph, from, |n| n == to, |_| 1usize, |_| 0)?;
        Some(path.into_iter().map(|idx| self.graph[idx].as_str()).collect())
    }

    /// Liga cada par ordenado `(i, j)`, `i ≠ j`, pelo menor caminho.
    ///
    /// Pares sem caminho, com nó desconhecido ou com o mesmo conceito nas
    /// duas pontas não produzem entrada. A ordem de saída segue a iteração
    /// aninhada sobre `(i, j)`.
    pub fn connect_concepts<S: AsRef<str>>(&self, concepts: &[S]) -> Vec<Chain> {
        let mut chains = Vec::new();
        for (i, source) in concepts.iter().enumerate() {
            for (j, target) in concepts.iter().enumerate() {
                let (source, target) = (source.as_ref(), target.as_ref());
                if i == j || source == target {
                    continue;
                }
                let Some(path) = self.shortest_path(source, target) else {
                    continue;
                };
                let steps: Vec<Rule> = path
                    .windows(2)
                    .map(|pair| Rule::new(pair[0], pair[1]))
                    .collect();
                if !steps.is_empty() {
                    chains.push(Chain::new(steps));
                }
            }
        }
        chains
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn graph(source: &str) -> CausalGraph {
        CausalGraph::build(&RuleSet::parse(source))
    }

    #[test]
    fn nodes_and_edges_come_from_rules() {
        let g = graph("A => B\nB => C\nA => B\n");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.contains("C"));
        assert!(!g.contains("Z"));
    }

    #[test]
    fn shortest_path_prefers_fewer_hops() {
        let g = graph("A => B\nB => C\nC => D\nA => D\n");
        assert_eq!(g.shortest_path("A", "D"), Some(vec!["A", "D"]));
        assert_eq!(g.shortest_path("B", "D"), Some(vec!["B", "C", "D"]));
        assert_eq!(g.shortest_path("D", "A"), None);
        assert_eq!(g.shortest_path("A", "unknown"), None);
    }

    #[test]
    fn cycles_terminate() {
        let g = graph("A => B\nB => A\nB => B\nB => C\n");
        assert_eq!(g.shortest_path("A", "C"), Some(vec!["A", "B", "C"]));
    }

    #[test]
    fn connect_concepts_follows_pair_order() {
        let g = graph("A => B\nB => C\n");
        let chains = g.connect_concepts(&["A", "C", "B"]);
        let lines: Vec<Vec<String>> = chains.iter().map(Chain::to_lines).collect();
        assert_eq!(
            lines,
            vec![
                vec!["A => B".to_string(), "B => C".to_string()],
                vec!["A => B".to_string()],
                vec!["B => C".to_string()],
            ]
        );
    }

    #[test]
    fn connect_concepts_skips_duplicates_and_unknowns() {
        let g = graph("A => B\n");
        assert!(g.connect_concepts(&["A", "A"]).is_empty());
        assert!(g.connect_concepts(&["A", "ghost"]).is_empty());
        assert!(g.connect_concepts::<&str>(&[]).is_empty());
    }

    proptest! {
        /// Nunca há caminho vazio, auto-par ou nó fora do grafo.
        #[test]
        fn connect_concepts_invariants(
            edges in prop::collection::vec((0..8usize, 0..8usize), 0..20),
            picks in prop::collection::vec(0..10usize, 0..6),
        ) {
            let source: String = edges.iter().map(|(a, b)| format!("n{a} => n{b}\n")).collect();
            let g = graph(&source);
            let concepts: Vec<String> = picks.iter().map(|p| format!("n{p}")).collect();
            for chain in g.connect_concepts(&concepts) {
                prop_assert!(!chain.is_empty());
                let nodes = chain.nodes();
                prop_assert_ne!(nodes.first(), nodes.last());
                for node in nodes {
                    prop_assert!(g.contains(node));
                }
            }
        }
    }
}
