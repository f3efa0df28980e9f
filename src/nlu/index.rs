//! # Índice de Conceitos e Fatos
//!
//! Liga a observação em texto livre aos conceitos do grafo de regras.
//! Cada conceito tem uma definição; a observação é comparada com as
//! definições (não com os nomes) e os `k` conceitos mais próximos viram
//! candidatos para a busca abdutiva.
//!
//! ## Arquivos
//!
//! ```text
//! data/concepts.txt                  data/facts.txt
//! memory_loss: inability to recall   Chronic stress raises cortisol levels.
//! cortisol_increase: elevated ...    Cortisol damages hippocampal neurons.
//! ```
//!
//! Linhas de conceito sem `:` são ignoradas; fatos são as linhas não vazias.
//! Arquivo ausente resulta em lista vazia (com `warn`).

use std::path::Path;

use super::{cosine_similarity, TextEmbedder};
use crate::error::Result;

/// Conceitos (nome + definição) e fatos, com seus embeddings pré-computados.
#[derive(Default)]
pub struct ConceptIndex {
    concepts: Vec<String>,
    definitions: Vec<String>,
    concept_embeddings: Vec<Vec<f32>>,
    facts: Vec<String>,
    fact_embeddings: Vec<Vec<f32>>,
}

impl ConceptIndex {
    /// Lê os dois arquivos e embeda definições e fatos uma única vez.
    ///
    /// # Erros
    ///
    /// Apenas falhas do embedder; arquivos ausentes não são erro.
    pub fn load(
        concept_path: impl AsRef<Path>,
        fact_path: impl AsRef<Path>,
        embedder: &dyn TextEmbedder,
    ) -> Result<Self> {
        let (concepts, definitions) = parse_concepts(&read_or_empty(concept_path.as_ref()));
        let facts = parse_facts(&read_or_empty(fact_path.as_ref()));
        Self::from_parts(concepts, definitions, facts, embedder)
    }

    pub fn from_parts(
        concepts: Vec<String>,
        definitions: Vec<String>,
        facts: Vec<String>,
        embedder: &dyn TextEmbedder,
    ) -> Result<Self> {
        let concept_embeddings = embedder.embed_batch(&definitions)?;
        let fact_embeddings = embedder.embed_batch(&facts)?;
        tracing::info!(
            concepts = concepts.len(),
            facts = facts.len(),
            "Concept index ready"
        );
        Ok(Self {
            concepts,
            definitions,
            concept_embeddings,
            facts,
            fact_embeddings,
        })
    }

    pub fn concepts(&self) -> &[String] {
        &self.concepts
    }

    pub fn definition(&self, concept: &str) -> Option<&str> {
        self.concepts
            .iter()
            .position(|c| c == concept)
            .map(|i| self.definitions[i].as_str())
    }

    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    /// Acrescenta um fato já persistido, tornando-o pesquisável.
    pub fn add_fact(&mut self, fact: String, embedder: &dyn TextEmbedder) -> Result<()> {
        let embedding = embedder.embed(&fact)?;
        self.facts.push(fact);
        self.fact_embeddings.push(embedding);
        Ok(())
    }

    /// Os `k` conceitos cujas definições mais se parecem com a observação.
    pub fn related_concepts(
        &self,
        observation: &str,
        k: usize,
        embedder: &dyn TextEmbedder,
    ) -> Result<Vec<String>> {
        rank(observation, &self.concepts, &self.concept_embeddings, k, embedder)
    }

    /// Os `k` fatos mais parecidos com a observação.
    pub fn related_facts(
        &self,
        observation: &str,
        k: usize,
        embedder: &dyn TextEmbedder,
    ) -> Result<Vec<String>> {
        rank(observation, &self.facts, &self.fact_embeddings, k, embedder)
    }
}

/// Ordena `items` por similaridade decrescente; empates mantêm a ordem do arquivo.
fn rank(
    observation: &str,
    items: &[String],
    embeddings: &[Vec<f32>],
    k: usize,
    embedder: &dyn TextEmbedder,
) -> Result<Vec<String>> {
    if items.is_empty() || k == 0 {
        return Ok(Vec::new());
    }
    let query = embedder.embed(observation)?;
    let mut ranked: Vec<(usize, f32)> = embeddings
        .iter()
        .enumerate()
        .map(|(i, e)| (i, cosine_similarity(&query, e)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(ranked
        .into_iter()
        .take(k)
        .map(|(i, _)| items[i].clone())
        .collect())
}

fn read_or_empty(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "File unreadable, using empty list");
        String::new()
    })
}

/// `nome: definição`, dividido no primeiro `:`.
fn parse_concepts(source: &str) -> (Vec<String>, Vec<String>) {
    source
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(name, definition)| (name.trim().to_string(), definition.trim().to_string()))
        .unzip()
}

fn parse_facts(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
