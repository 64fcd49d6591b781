//! The dependency graph of a checked proof: one node per step, one edge per
//! cited reference.
//!
//! Building the graph is purely structural. Turning it into an image is left
//! to a [`Renderer`].

use std::path::PathBuf;

use thiserror::Error;

use crate::proof::{Justification, Proof, StepId};
use crate::rules::Rule;
use crate::util::HashMap;

#[cfg(feature = "graphviz")]
pub(crate) mod to_graphviz;

#[cfg(feature = "graphviz")]
pub use to_graphviz::GraphvizRenderer;

/// The outcome of validating one rule citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Cited steps, a range contributing both endpoints.
    pub references: Vec<StepId>,
    pub target: StepId,
    pub rule: Rule,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    pub id: StepId,
    /// `n: <step body>`
    pub label: String,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Edge {
    pub from: StepId,
    pub to: StepId,
    pub rule: Rule,
    pub valid: bool,
}

impl Edge {
    /// `RULE (OK)` or `RULE (Error)`.
    pub fn label(&self) -> String {
        let status = if self.valid { "OK" } else { "Error" };
        format!("{} ({status})", self.rule)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DependencyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Builds the graph from the hypothesis verdicts and the rule relations
    /// collected while checking `proof`.
    ///
    /// A plain hypothesis is valid when it matched a premise. Any other step
    /// is valid when it is the target of a valid relation; a scoped
    /// hypothesis counts as such when a valid PC or RAA discharges it.
    pub(crate) fn build(
        proof: &Proof,
        hypotheses: &HashMap<StepId, bool>,
        relations: &[Relation],
    ) -> Self {
        let nodes = proof
            .steps
            .values()
            .map(|step| {
                let valid = match &step.justification {
                    Justification::Hypothesis => {
                        hypotheses.get(&step.number).copied().unwrap_or(false)
                    }
                    Justification::ScopedHypothesis(kind) => relations.iter().any(|r| {
                        r.valid && r.rule == kind.rule() && r.references.first() == Some(&step.number)
                    }),
                    Justification::Citation(_) => relations
                        .iter()
                        .any(|r| r.valid && r.target == step.number),
                };
                Node {
                    id: step.number,
                    label: format!("{}: {}", step.number, step.body),
                    valid,
                }
            })
            .collect();

        let edges = relations
            .iter()
            .flat_map(|r| {
                r.references.iter().map(|&from| Edge {
                    from,
                    to: r.target,
                    rule: r.rule,
                    valid: r.valid,
                })
            })
            .collect();

        DependencyGraph { nodes, edges }
    }

    pub fn node(&self, id: StepId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_into(&self, id: StepId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.to == id)
    }

    /// The graph in the DOT language.
    #[cfg(feature = "graphviz")]
    pub fn to_dot(&self) -> String {
        use graphviz_rust::printer::{DotPrinter, PrinterContext};
        to_graphviz::to_graphviz(self).print(&mut PrinterContext::default())
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Graphviz is not installed, the graph was not generated")]
    NotInstalled,
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns a dependency graph into an artifact, typically an image file.
pub trait Renderer {
    fn render(&self, graph: &DependencyGraph) -> Result<PathBuf, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(references: &[StepId], target: StepId, rule: Rule, valid: bool) -> Relation {
        Relation {
            references: references.to_vec(),
            target,
            rule,
            valid,
        }
    }

    #[test]
    fn build() {
        let proof = Proof::parse(
            "P → Q, P ⊢ Q",
            "1. P → Q (Hipótese)
             2. R (Hipótese)
             3. Q MP(1,2)
             4. P (Hip-PC)
             5. P → P PC(4-4)",
        )
        .unwrap();
        let hypotheses: HashMap<StepId, bool> = [(1, true), (2, false)].into_iter().collect();
        let relations = [
            relation(&[1, 2], 3, Rule::ModusPonens, false),
            relation(&[4, 4], 5, Rule::ConditionalProof, true),
        ];
        let graph = DependencyGraph::build(&proof, &hypotheses, &relations);

        let validity: Vec<_> = graph.nodes.iter().map(|n| (n.id, n.valid)).collect();
        assert_eq!(
            validity,
            vec![(1, true), (2, false), (3, false), (4, true), (5, true)]
        );
        assert_eq!(graph.node(1).unwrap().label, "1: P → Q (Hipótese)");
        assert_eq!(graph.edges.len(), 4);
        let into_three: Vec<_> = graph.edges_into(3).map(Edge::label).collect();
        assert_eq!(into_three, vec!["MP (Error)", "MP (Error)"]);
        assert_eq!(graph.edges_into(5).next().unwrap().label(), "PC (OK)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json() {
        let graph = DependencyGraph {
            nodes: vec![Node {
                id: 1,
                label: "1: P (Hipótese)".to_string(),
                valid: true,
            }],
            edges: vec![Edge {
                from: 1,
                to: 2,
                rule: Rule::DoubleNegation,
                valid: true,
            }],
        };
        let value: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
        assert_eq!(value["edges"][0]["rule"], "DN");
        assert_eq!(value["nodes"][0]["valid"], true);
    }
}
