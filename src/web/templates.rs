//! # Templates Maud — HTML Server-Side Rendering
//!
//! Padrão **Hypermedia-Driven**: o servidor devolve fragmentos HTML e o
//! HTMX os injeta no DOM.
//!
//! | Função | Tipo | Descrição |
//! |--------|------|-----------|
//! | [`full_page()`] | Página completa | Formulário de observação + resultados |
//! | [`report_fragment()`] | Fragment HTMX | Relatório de uma observação |
//! | [`loading_fragment()`] | Fragment HTMX | Modelo ainda carregando |
//! | [`error_fragment()`] | Fragment HTMX | Falha do ciclo |
//!
//! ```text
//! ┌──────────────── header ────────────────────┐
//! │ Abductive Reasoner          ● N regras     │
//! ├────────────────────────────────────────────┤
//! │ [ observação ...................... ][▶]  │
//! ├────────────────────────────────────────────┤
//! │ #results (fragments, mais recente no topo) │
//! └────────────────────────────────────────────┘
//! ```

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::orchestrator::ExplanationReport;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; color: #222; }
header { display: flex; justify-content: space-between; align-items: baseline; }
form { display: flex; gap: .5rem; margin: 1rem 0; }
form input { flex: 1; padding: .5rem; }
.report { border: 1px solid #ddd; border-radius: 6px; padding: 1rem; margin-bottom: 1rem; }
.narrative p { margin: .2rem 0; }
.score { font-family: monospace; }
.loading, .error { padding: .75rem; border-radius: 6px; }
.loading { background: #fff8e1; }
.error { background: #fdecea; }
pre { background: #f6f6f6; padding: .5rem; overflow-x: auto; }
"#;

/// Página principal com o formulário de observação.
pub fn full_page(rule_count: usize) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Abductive Reasoner" }
                style { (PreEscaped(STYLE)) }
                script src="https://unpkg.com/htmx.org@2.0.4" {}
            }
            body {
                header {
                    h1 { "Abductive Reasoner" }
                    span #status { (format!("{} rules loaded", rule_count)) }
                }
                form hx-post="/explain/html"
                    hx-target="#results"
                    hx-swap="afterbegin"
                    hx-on-after-request="this.reset()" {
                    input type="text" name="observation"
                        placeholder="Describe an observation or symptom..."
                        autocomplete="off"
                        autofocus;
                    button type="submit" { "Explain" }
                }
                div #results {}
                (PreEscaped(r#"<script>
(function poll() {
  fetch('/status').then(r => r.json()).then(s => {
    const el = document.getElementById('status');
    el.textContent = s.rules + ' rules loaded' + (s.ready ? '' : ' (model loading...)');
    if (!s.ready) setTimeout(poll, 3000);
  }).catch(() => setTimeout(poll, 3000));
})();
</script>"#))
            }
        }
    }
}

/// Relatório de um ciclo: narrativa, cadeias, conceitos, fatos e artigos.
pub fn report_fragment(report: &ExplanationReport) -> Markup {
    html! {
        div class="report" {
            h3 { (report.observation) }
            div class="narrative" {
                @for line in report.narrative.lines() {
                    p { (line) }
                }
            }
            @if let Some(chain) = &report.best_chain {
                p class="score" { (format!("best score = {:.3}", report.best_score)) }
                ol {
                    @for step in chain.iter() {
                        li { (step.to_string()) }
                    }
                }
            }
            details {
                summary { (format!("{} candidate chains", report.chains.len())) }
                ul {
                    @for scored in &report.chains {
                        li class="score" {
                            (format!("{:.3}  ", scored.score))
                            (scored.chain.to_lines().join(" ; "))
                        }
                    }
                }
            }
            p {
                strong { "Concepts: " }
                (report.concepts.join(", "))
            }
            @if !report.facts.is_empty() {
                p { strong { "Related facts:" } }
                ul {
                    @for fact in &report.facts {
                        li { (fact) }
                    }
                }
            }
            @if !report.papers.is_empty() {
                p { strong { "Papers:" } }
                ul {
                    @for entry in &report.papers {
                        li {
                            @if entry.paper.link.is_empty() {
                                (entry.paper.title)
                            } @else {
                                a href=(entry.paper.link) target="_blank" { (entry.paper.title) }
                            }
                            " (" (entry.paper.published) ")"
                            @if let Some(key) = &entry.key_observation {
                                br;
                                em { (key) }
                            }
                        }
                    }
                }
            }
            @if let Some(dot) = &report.dot {
                details {
                    summary { "Graphviz" }
                    pre { (dot) }
                }
            }
        }
    }
}

pub fn loading_fragment() -> Markup {
    html! {
        div class="loading" {
            "⏳ Model loading, please retry in a few seconds..."
        }
    }
}

pub fn error_fragment(message: &str) -> Markup {
    html! {
        div class="error" { "Error: " (message) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Chain, ScoredChain};

    fn report() -> ExplanationReport {
        let chain: Chain = [("stress", "cortisol_rise")].into_iter().collect();
        ExplanationReport {
            observation: "tired & <stressed>".into(),
            concepts: vec!["cortisol_rise".into()],
            facts: Vec::new(),
            papers: Vec::new(),
            best_chain: Some(chain.clone()),
            best_score: 1.25,
            chains: vec![ScoredChain { chain, score: 1.25 }],
            narrative: "Because stress, it may lead to cortisol rise.\nTherefore, done.".into(),
            dot: None,
        }
    }

    #[test]
    fn report_escapes_user_text() {
        let html = report_fragment(&report()).into_string();
        assert!(html.contains("tired &amp; &lt;stressed&gt;"));
        assert!(!html.contains("<stressed>"));
    }

    #[test]
    fn report_lists_narrative_lines_and_steps() {
        let html = report_fragment(&report()).into_string();
        assert!(html.contains("<p>Because stress, it may lead to cortisol rise.</p>"));
        assert!(html.contains("<li>stress =&gt; cortisol_rise</li>"));
        assert!(html.contains("best score = 1.250"));
    }

    #[test]
    fn page_shows_rule_count() {
        assert!(full_page(7).into_string().contains("7 rules loaded"));
    }
}
