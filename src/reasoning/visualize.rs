//! # Visualização de Cadeias (Graphviz DOT)
//!
//! Colaborador puro de visualização: recebe uma cadeia e um título e
//! desenha — sem valor de retorno. [`DotVisualizer`] escreve um `digraph`
//! DOT em qualquer `Write` (arquivo, stdout, buffer).
//!
//! ```text
//! digraph {
//!     label = "Abductive Reasoning Path"
//!     0 [ label = "chronic stress" ]
//!     1 [ label = "cortisol increase" ]
//!     0 -> 1 [ label = "leads to" ]
//! }
//! ```

use std::collections::HashMap;
use std::io::Write;

use parking_lot::Mutex;
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;

use super::narrative::humanize;
use crate::core::Chain;

/// Título padrão dos desenhos.
pub const DEFAULT_TITLE: &str = "Reasoning Path";

/// Desenha uma cadeia de raciocínio.
pub trait ChainVisualizer {
    fn draw(&self, chain: Option<&Chain>, title: &str);
}

/// Renderiza cadeias em DOT no `sink` configurado.
pub struct DotVisualizer<W: Write + Send> {
    sink: Mutex<W>,
}

impl<W: Write + Send> DotVisualizer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }
}

impl<W: Write + Send> ChainVisualizer for DotVisualizer<W> {
    fn draw(&self, chain: Option<&Chain>, title: &str) {
        let Some(dot) = chain.and_then(|c| to_dot(c, title)) else {
            tracing::info!("No reasoning chain to visualize.");
            return;
        };
        let mut sink = self.sink.lock();
        if let Err(e) = sink.write_all(dot.as_bytes()).and_then(|_| sink.flush()) {
            tracing::warn!(error = %e, "Failed to write chain drawing");
        }
    }
}

/// DOT da cadeia; `None` para cadeia vazia. Conceitos repetidos viram um só nó.
pub fn to_dot(chain: &Chain, title: &str) -> Option<String> {
    if chain.is_empty() {
        return None;
    }
    let mut graph: DiGraph<String, &str> = DiGraph::new();
    let mut nodes = HashMap::new();
    for step in chain.iter() {
        let from = *nodes
            .entry(step.premise.as_str())
            .or_insert_with(|| graph.add_node(humanize(&step.premise)));
        let to = *nodes
            .entry(step.conclusion.as_str())
            .or_insert_with(|| graph.add_node(humanize(&step.conclusion)));
        graph.update_edge(from, to, "leads to");
    }
    let body = Dot::new(&graph).to_string();
    let title = title.replace('\\', "\\\\").replace('"', "\\\"");
    Some(body.replacen("digraph {\n", &format!("digraph {{\n    label = \"{title}\"\n"), 1))
}
