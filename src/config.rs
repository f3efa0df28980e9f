//! # Configuração
//!
//! Valores padrão em constantes; cada campo pode ser sobrescrito por uma
//! variável de ambiente `REASONER_*`.
//!
//! | Variável | Campo | Padrão |
//! |----------|-------|--------|
//! | `REASONER_RULES` | `rules_path` | `data/scientific_rules.txt` |
//! | `REASONER_CONCEPTS` | `concepts_path` | `data/concepts.txt` |
//! | `REASONER_FACTS` | `facts_path` | `data/facts.txt` |
//! | `REASONER_ADDR` | `addr` | `0.0.0.0:3000` |
//! | `REASONER_DEPTH` | `depth` | `3` |
//! | `REASONER_TOP_CONCEPTS` | `top_concepts` | `5` |
//! | `REASONER_TOP_FACTS` | `top_facts` | `3` |
//! | `REASONER_MAX_PAPERS` | `max_papers` | `3` |
//! | `REASONER_MODEL` | `model` | `sentence-transformers/all-MiniLM-L6-v2` |
//! | `REASONER_DOT_OUT` | `dot_out` | nenhum |
//!
//! Valor numérico inválido mantém o padrão e gera um `warn`.

use std::path::PathBuf;
use std::str::FromStr;

use crate::nlu::embedder::DEFAULT_MODEL;
use crate::reasoning::DEFAULT_DEPTH;

pub const DEFAULT_RULES_PATH: &str = "data/scientific_rules.txt";
pub const DEFAULT_CONCEPTS_PATH: &str = "data/concepts.txt";
pub const DEFAULT_FACTS_PATH: &str = "data/facts.txt";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TOP_CONCEPTS: usize = 5;
pub const DEFAULT_TOP_FACTS: usize = 3;
pub const DEFAULT_MAX_PAPERS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub rules_path: PathBuf,
    pub concepts_path: PathBuf,
    pub facts_path: PathBuf,
    pub addr: String,
    /// Profundidade máxima da busca abdutiva.
    pub depth: usize,
    pub top_concepts: usize,
    pub top_facts: usize,
    pub max_papers: usize,
    /// Repositório do modelo de embeddings no HuggingFace Hub.
    pub model: String,
    /// Arquivo onde cada melhor cadeia é acrescentada em DOT.
    pub dot_out: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_path: DEFAULT_RULES_PATH.into(),
            concepts_path: DEFAULT_CONCEPTS_PATH.into(),
            facts_path: DEFAULT_FACTS_PATH.into(),
            addr: DEFAULT_ADDR.to_string(),
            depth: DEFAULT_DEPTH,
            top_concepts: DEFAULT_TOP_CONCEPTS,
            top_facts: DEFAULT_TOP_FACTS,
            max_papers: DEFAULT_MAX_PAPERS,
            model: DEFAULT_MODEL.to_string(),
            dot_out: None,
        }
    }
}

impl AppConfig {
    /// Padrões + sobrescritas das variáveis de ambiente do processo.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Como [`from_env`](Self::from_env), lendo de uma função qualquer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("REASONER_RULES") {
            config.rules_path = v.into();
        }
        if let Some(v) = lookup("REASONER_CONCEPTS") {
            config.concepts_path = v.into();
        }
        if let Some(v) = lookup("REASONER_FACTS") {
            config.facts_path = v.into();
        }
        if let Some(v) = lookup("REASONER_ADDR") {
            config.addr = v;
        }
        if let Some(v) = lookup("REASONER_MODEL") {
            config.model = v;
        }
        config.dot_out = lookup("REASONER_DOT_OUT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        override_number(&lookup, "REASONER_DEPTH", &mut config.depth);
        override_number(&lookup, "REASONER_TOP_CONCEPTS", &mut config.top_concepts);
        override_number(&lookup, "REASONER_TOP_FACTS", &mut config.top_facts);
        override_number(&lookup, "REASONER_MAX_PAPERS", &mut config.max_papers);

        config
    }
}

fn override_number<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(v) => *field = v,
        Err(_) => tracing::warn!(key, value = %raw, "Invalid numeric override, keeping default"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.depth, 3);
        assert_eq!(config.rules_path, PathBuf::from("data/scientific_rules.txt"));
        assert_eq!(config.addr, "0.0.0.0:3000");
        assert_eq!(config.dot_out, None);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            ("REASONER_RULES", "/tmp/rules.txt"),
            ("REASONER_DEPTH", "5"),
            ("REASONER_TOP_FACTS", " 1 "),
            ("REASONER_MODEL", "org/model"),
            ("REASONER_DOT_OUT", "/tmp/chains.dot"),
        ]));
        assert_eq!(config.rules_path, PathBuf::from("/tmp/rules.txt"));
        assert_eq!(config.depth, 5);
        assert_eq!(config.top_facts, 1);
        assert_eq!(config.model, "org/model");
        assert_eq!(config.dot_out, Some(PathBuf::from("/tmp/chains.dot")));
        assert_eq!(config.top_concepts, DEFAULT_TOP_CONCEPTS);
    }

    /// Número inválido mantém o padrão.
    #[test]
    fn bad_numbers_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("REASONER_DEPTH", "deep"),
            ("REASONER_MAX_PAPERS", "-1"),
        ]));
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert_eq!(config.max_papers, DEFAULT_MAX_PAPERS);
    }
}
