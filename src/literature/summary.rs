//! # Resumo de Abstracts
//!
//! Transforma um abstract numa observação curta, pronta para alimentar
//! a busca abdutiva. [`LeadSummarizer`] é extrativo: mantém as frases
//! iniciais inteiras até atingir `min_words` e corta em `max_words`.

use regex::Regex;

use crate::error::{ReasonerError, Result};

pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str) -> Result<String>;
}

/// Resumo pelas frases iniciais.
pub struct LeadSummarizer {
    min_words: usize,
    max_words: usize,
    /// Fim de frase: pontuação seguida de espaço ou fim do texto.
    sentence_end: Regex,
}

impl LeadSummarizer {
    pub fn new(min_words: usize, max_words: usize) -> Self {
        Self {
            min_words,
            max_words,
            sentence_end: Regex::new(r"[.!?]+(\s+|$)").unwrap(),
        }
    }
}

impl Default for LeadSummarizer {
    fn default() -> Self {
        Self::new(25, 50)
    }
}

impl Summarizer for LeadSummarizer {
    fn summarize(&self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReasonerError::EmptyInput("text to summarize"));
        }

        let mut words: Vec<&str> = Vec::new();
        let mut start = 0;
        for m in self.sentence_end.find_iter(text) {
            words.extend(text[start..m.end()].split_whitespace());
            start = m.end();
            if words.len() >= self.min_words {
                break;
            }
        }
        if words.len() < self.min_words {
            words.extend(text[start..].split_whitespace());
        }

        let truncated = words.len() > self.max_words;
        words.truncate(self.max_words);
        let mut summary = words.join(" ");
        if truncated {
            summary.push_str("...");
        }
        Ok(summary)
    }
}
