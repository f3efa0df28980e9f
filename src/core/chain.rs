//! # Cadeias de Raciocínio
//!
//! Uma [`Chain`] é uma sequência ordenada de arestas `(premissa, conclusão)`
//! lida da esquerda para a direita. Quando produzida pela busca para trás,
//! a premissa do primeiro passo é a **causa terminal** da explicação.
//!
//! Cadeias são efêmeras: produzidas por consulta e nunca persistidas.

use std::ops::Deref;

use serde::{Serialize, Serializer};

use super::rule::Rule;

/// Caminho de implicações.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Chain {
    steps: Vec<Rule>,
}

impl Chain {
    pub fn new(steps: Vec<Rule>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Rule] {
        &self.steps
    }

    /// Premissa do primeiro passo — a causa atribuída em última instância.
    pub fn root_cause(&self) -> Option<&str> {
        self.steps.first().map(|r| r.premise.as_str())
    }

    /// Sequência de nós visitados: `p0, c0, c1, ...`.
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            nodes.push(first.premise.as_str());
        }
        nodes.extend(self.steps.iter().map(|r| r.conclusion.as_str()));
        nodes
    }

    /// Passos no formato do arquivo de regras (`a => b`).
    pub fn to_lines(&self) -> Vec<String> {
        self.steps.iter().map(Rule::to_string).collect()
    }
}

impl Deref for Chain {
    type Target = [Rule];

    fn deref(&self) -> &Self::Target {
        &self.steps
    }
}

impl From<Vec<Rule>> for Chain {
    fn from(steps: Vec<Rule>) -> Self {
        Self::new(steps)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Chain {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Rule::from).collect())
    }
}

// Serializada como lista de passos `a => b`, formato legível nos relatórios JSON.
impl Serialize for Chain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.steps.iter().map(Rule::to_string))
    }
}

/// Uma cadeia com sua pontuação de plausibilidade.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredChain {
    pub chain: Chain,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_follow_the_path() {
        let chain: Chain = [("A", "B"), ("B", "C")].into_iter().collect();
        assert_eq!(chain.nodes(), vec!["A", "B", "C"]);
        assert_eq!(chain.root_cause(), Some("A"));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn empty_chain_has_no_root() {
        let chain = Chain::default();
        assert!(chain.nodes().is_empty());
        assert_eq!(chain.root_cause(), None);
    }

    #[test]
    fn serializes_as_rule_lines() {
        let chain: Chain = [("stress", "cortisol_increase")].into_iter().collect();
        let json = serde_json::to_string(&chain).unwrap();
        assert_eq!(json, r#"["stress => cortisol_increase"]"#);
    }
}
