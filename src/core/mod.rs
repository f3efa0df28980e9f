//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Tipos compartilhados por todas as camadas do raciocinador:
//!
//! - [`Rule`] — implicação causal `premissa => conclusão`
//! - [`RuleSet`] — conjunto ordenado de regras carregado do disco
//! - [`Chain`] — caminho de implicações (uma explicação candidata)
//! - [`ScoredChain`] — cadeia com sua pontuação abdutiva
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use crate::core::{Chain, RuleSet};
//!
//! let rules = RuleSet::parse("stress => cortisol_increase\n");
//! let chain: Chain = rules.iter().cloned().collect::<Vec<_>>().into();
//! assert_eq!(chain.root_cause(), Some("stress"));
//! ```

/// Sub-módulo com [`Rule`] e [`RuleSet`].
pub mod rule;

/// Sub-módulo com [`Chain`] e [`ScoredChain`].
pub mod chain;

pub use chain::{Chain, ScoredChain};
pub use rule::{Rule, RuleSet};
