//! # Persistência — Base de Fatos em Disco
//!
//! Os fatos conhecidos vivem em `data/facts.txt`, um por linha. O arquivo
//! é **somente-acréscimo**: um fato novo vira uma linha no final, e nada
//! do que já está lá é reescrito.
//!
//! ```text
//! Chronic stress raises cortisol levels.
//! Cortisol damages hippocampal neurons.
//! <novo fato>            ← apenas se nenhuma linha for igual a ele
//! ```
//!
//! ## ⚠️ Concorrência
//!
//! A checagem de duplicata e a escrita não são atômicas entre processos.
//! Dentro do servidor, o orquestrador serializa as chamadas.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{ReasonerError, Result};

/// Resultado de [`update_facts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactUpdate {
    /// O fato foi acrescentado ao final do arquivo.
    Added,
    /// Uma linha idêntica já existia; nada foi escrito.
    AlreadyPresent,
}

impl FactUpdate {
    pub fn is_added(self) -> bool {
        matches!(self, FactUpdate::Added)
    }
}

/// Acrescenta `fact` ao arquivo em `path`, se ainda não estiver lá.
///
/// O fato é comparado (já sem espaços nas pontas) com cada linha do
/// arquivo, também aparada. Arquivo ausente é criado.
///
/// # Erros
///
/// - [`ReasonerError::EmptyInput`] se o fato for vazio
/// - [`ReasonerError::Io`] se o arquivo não puder ser lido ou escrito
pub fn update_facts(path: impl AsRef<Path>, fact: &str) -> Result<FactUpdate> {
    let path = path.as_ref();
    let fact = fact.trim();
    if fact.is_empty() {
        return Err(ReasonerError::EmptyInput("fact"));
    }

    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if existing.lines().any(|line| line.trim() == fact) {
        tracing::info!(fact, "Fact already exists in dataset");
        return Ok(FactUpdate::AlreadyPresent);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    // Última linha sem terminador: fecha antes de acrescentar
    if !existing.is_empty() && !existing.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    writeln!(file, "{fact}")?;

    tracing::info!(fact, path = %path.display(), "New fact added to dataset");
    Ok(FactUpdate::Added)
}
