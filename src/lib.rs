//! # natded
//! natded checks natural-deduction proofs in propositional logic.
//!
//! A proof is a sequent such as `P → Q, P ⊢ Q` together with numbered steps,
//! each justified as a hypothesis or by one of sixteen rules:
//!
//! ```text
//! 1. P → Q (Hipótese)
//! 2. P (Hipótese)
//! 3. Q MP(1,2)
//! ```
//!
//! [`Checker`] parses both parts, validates every step, checks that each
//! declared conclusion was derived and returns an [`Outcome`] with the
//! verdict, a [`Transcript`] of everything that was checked, and the
//! [`DependencyGraph`] between the steps.
//!
//! Formulas may be written with `¬ ∧ ∨ → ↔`, with a bare `v` for `∨`, with
//! LaTeX commands such as `\rightarrow`, or with the ASCII digraphs `->`,
//! `<->` and `|-`.
//!
//! ```
//! let outcome = natded::check("P → Q, P ⊢ Q", "1. P → Q (Hipótese)\n2. P (Hipótese)\n3. Q MP(1,2)")?;
//! assert!(outcome.valid);
//! # Ok::<(), natded::ParseError>(())
//! ```
mod check;
mod cli;
pub mod formula;
pub mod graph;
pub mod normalize;
pub mod proof;
pub mod rules;
pub mod scope;
pub mod util;

use std::path::PathBuf;

use thiserror::Error;

pub use check::{
    check, CheckConfig, CheckError, Checker, Diagnostic, Message, Outcome, Severity, Stage,
    Transcript,
};
#[cfg(feature = "bin")]
pub use cli::bin;
pub use formula::{Connective, Formula, FormulaError, Matching};
pub use graph::{DependencyGraph, Edge, Node, Relation, RenderError, Renderer};
#[cfg(feature = "graphviz")]
pub use graph::GraphvizRenderer;
pub use proof::{
    Citation, Justification, ParseError, Proof, ProofStep, Reference, ScopeKind, Sequent, StepId,
};
pub use rules::{Rule, RuleError};
pub use scope::{ScopeDiscipline, ScopeError};

pub type Symbol = symbol_table::GlobalSymbol;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("IO error: {0}: {1}")]
    Io(PathBuf, std::io::Error),
}
