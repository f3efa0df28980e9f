//! # Narrativa — Cadeia em Linguagem Natural
//!
//! Converte uma [`Chain`] em frases legíveis. O texto gerado aqui é
//! também o que o termo de similaridade da pontuação compara com a
//! observação do usuário.
//!
//! ```text
//! stress => cortisol_increase
//!   ↓
//! Because stress, it may lead to cortisol increase.
//! Therefore, the observed issue may ultimately be due to stress.
//! ```

use crate::core::Chain;

/// Texto fixo para cadeia vazia ou ausente.
pub const NO_EXPLANATION: &str = "No explanation found.";

/// Restaura espaços nos identificadores de conceito (`a_b` → `a b`).
pub fn humanize(concept: &str) -> String {
    concept.replace('_', " ")
}

/// Uma frase por passo, seguida do resumo citando a causa raiz.
pub fn explain_chain_naturally(chain: &Chain) -> String {
    let Some(root) = chain.root_cause() else {
        return NO_EXPLANATION.to_string();
    };
    let mut lines: Vec<String> = chain
        .iter()
        .map(|step| {
            format!(
                "Because {}, it may lead to {}.",
                humanize(&step.premise),
                humanize(&step.conclusion)
            )
        })
        .collect();
    lines.push(format!(
        "Therefore, the observed issue may ultimately be due to {}.",
        humanize(root)
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_renders_fixed_text() {
        assert_eq!(explain_chain_naturally(&Chain::default()), NO_EXPLANATION);
    }

    #[test]
    fn single_step_renders_two_lines() {
        let chain: Chain = [("stress", "cortisol_increase")].into_iter().collect();
        let text = explain_chain_naturally(&chain);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Because stress, it may lead to cortisol increase.",
                "Therefore, the observed issue may ultimately be due to stress.",
            ]
        );
    }

    #[test]
    fn summary_cites_first_premise() {
        let chain: Chain = [("chronic_stress", "cortisol_increase"), ("cortisol_increase", "memory_loss")]
            .into_iter()
            .collect();
        let text = explain_chain_naturally(&chain);
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with("ultimately be due to chronic stress."));
    }
}
