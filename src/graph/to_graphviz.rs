use std::fs;
use std::io;
use std::path::PathBuf;

use graphviz_rust::{
    attributes::*,
    cmd::{CommandArg, Format},
    dot_generator::*,
    dot_structures::{
        Attribute, Edge, EdgeTy, Graph, GraphAttributes as GA, Id, Node, NodeId, Stmt, Vertex,
    },
    printer::PrinterContext,
};

use super::{DependencyGraph, RenderError, Renderer};

/// Lays the proof out left to right, valid steps in green and invalid ones
/// in red.
pub(crate) fn to_graphviz(graph: &DependencyGraph) -> Graph {
    let mut statements = vec![
        stmt!(GA::Graph(vec![attr!("rankdir", "LR")])),
        stmt!(GA::Node(vec![
            NodeAttributes::shape(shape::box_),
            NodeAttributes::style(quote("rounded,filled")),
        ])),
    ];

    for node in &graph.nodes {
        let node_id = quote(node.id.to_string());
        let fill = if node.valid { "lightgreen" } else { "lightcoral" };
        statements.push(stmt!(node!(node_id;
            NodeAttributes::label(quote(&node.label)),
            attr!("fillcolor", fill)
        )));
    }

    for edge in &graph.edges {
        let source = node_id!(quote(edge.from.to_string()));
        let target = node_id!(quote(edge.to.to_string()));
        let color = if edge.valid { "green" } else { "red" };
        statements.push(stmt!(edge!(source => target;
            EdgeAttributes::label(quote(edge.label())),
            attr!("color", color)
        )));
    }

    graph!(di id!("deduction"), statements)
}

/// Adds double quotes and escapes
fn quote(s: impl AsRef<str>) -> String {
    format!("{:?}", s.as_ref())
}

/// Writes `<output_dir>/<file_stem>.svg` with the `dot` executable.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    pub output_dir: PathBuf,
    pub file_stem: String,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("grafos"),
            file_stem: "grafo_deducao".to_string(),
        }
    }
}

impl GraphvizRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, file_stem: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_stem: file_stem.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.svg", self.file_stem))
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, graph: &DependencyGraph) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.path();
        graphviz_rust::exec(
            to_graphviz(graph),
            &mut PrinterContext::default(),
            vec![
                CommandArg::Format(Format::Svg),
                CommandArg::Output(path.to_string_lossy().into_owned()),
            ],
        )
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => RenderError::NotInstalled,
            _ => RenderError::Io {
                path: path.clone(),
                source,
            },
        })?;
        log::info!("dependency graph written to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge as StepEdge, Node as StepNode};
    use crate::rules::Rule;

    #[test]
    fn dot_output() {
        let graph = DependencyGraph {
            nodes: vec![
                StepNode {
                    id: 1,
                    label: "1: ¬¬P (Hipótese)".to_string(),
                    valid: true,
                },
                StepNode {
                    id: 2,
                    label: "2: P DN(1)".to_string(),
                    valid: false,
                },
            ],
            edges: vec![StepEdge {
                from: 1,
                to: 2,
                rule: Rule::DoubleNegation,
                valid: false,
            }],
        };
        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph deduction"));
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("\"1: ¬¬P (Hipótese)\""));
        assert!(dot.contains("fillcolor=lightcoral"));
        assert!(dot.contains("\"DN (Error)\""));
        assert!(dot.contains("color=red"));
    }

    #[test]
    fn output_path() {
        let renderer = GraphvizRenderer::default();
        assert_eq!(renderer.path(), PathBuf::from("grafos/grafo_deducao.svg"));
        let custom = GraphvizRenderer::new("out", "proof");
        assert_eq!(custom.path(), PathBuf::from("out/proof.svg"));
    }
}
