//! # Regras Causais — `premissa => conclusão`
//!
//! Uma [`Rule`] é uma implicação dirigida entre dois conceitos. O
//! [`RuleSet`] é carregado **uma única vez** na construção do raciocinador
//! e nunca mais é mutado.
//!
//! ## Formato do Arquivo
//!
//! ```text
//! # comentários e linhas em branco são ignorados
//! chronic_stress => cortisol_increase
//! cortisol_increase => hippocampal_atrophy
//! ```
//!
//! | Linha | Tratamento |
//! |-------|-----------|
//! | Sem `=>` | Ignorada silenciosamente |
//! | `a => b` | Regra `(a, b)` |
//! | `a => ` / `a => b => c` | Ignorada com `warn` |
//!
//! Arquivo ausente ou ilegível produz um conjunto **vazio** — o
//! raciocinador continua construível sem regras.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Separador entre premissa e conclusão.
pub const RULE_SEPARATOR: &str = "=>";

/// Implicação dirigida `premise → conclusion`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    pub premise: String,
    pub conclusion: String,
}

impl Rule {
    pub fn new(premise: impl Into<String>, conclusion: impl Into<String>) -> Self {
        Self {
            premise: premise.into(),
            conclusion: conclusion.into(),
        }
    }

    /// Interpreta uma linha do arquivo de regras.
    ///
    /// Retorna `None` quando a linha não contém o separador (não é regra),
    /// e `Some(Err(()))` quando contém mas não forma exatamente dois campos
    /// não vazios.
    fn parse_line(line: &str) -> Option<Result<Self, ()>> {
        if !line.contains(RULE_SEPARATOR) {
            return None;
        }
        let fields: Vec<&str> = line.split(RULE_SEPARATOR).map(str::trim).collect();
        match fields.as_slice() {
            [premise, conclusion] if !premise.is_empty() && !conclusion.is_empty() => {
                Some(Ok(Self::new(*premise, *conclusion)))
            }
            _ => Some(Err(())),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.premise, RULE_SEPARATOR, self.conclusion)
    }
}

impl From<(&str, &str)> for Rule {
    fn from((premise, conclusion): (&str, &str)) -> Self {
        Self::new(premise, conclusion)
    }
}

/// Sequência ordenada de regras, na ordem de carregamento.
///
/// A ordem só garante iteração determinística; não influencia o ranking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Interpreta o texto completo de um arquivo de regras.
    pub fn parse(source: &str) -> Self {
        let mut rules = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            match Rule::parse_line(line) {
                None => {}
                Some(Ok(rule)) => rules.push(rule),
                Some(Err(())) => {
                    tracing::warn!(line = idx + 1, text = %line.trim(), "Skipping malformed rule");
                }
            }
        }
        tracing::debug!(rules = rules.len(), "Rules parsed");
        Self { rules }
    }

    /// Carrega regras do disco. Nunca falha: arquivo ausente → conjunto vazio.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(source) => {
                let set = Self::parse(&source);
                tracing::info!(path = %path.display(), rules = set.len(), "Rules loaded");
                set
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Rule file unreadable, continuing with no rules"
                );
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Regras cuja conclusão é `target` (passo de busca para trás).
    pub fn concluding<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.conclusion == target)
    }

    /// Regras cuja premissa é `start` (passo de busca para frente).
    pub fn premised_on<'a>(&'a self, start: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.premise == start)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
