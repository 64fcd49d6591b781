//! The sixteen inference and equivalence rules.
//!
//! [`validate`] checks a single cited step against the formulas it refers to.
//! It reports the first problem it finds and never looks at scoping; that is
//! the job of [`crate::scope`].

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use lazy_static::lazy_static;
use thiserror::Error;

use crate::formula::{Formula, Matching};
use crate::proof::{Citation, Proof, ProofStep, Reference, ScopeKind, StepId};

mod equivalence;
mod inference;
mod scoped;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    ModusPonens,
    Simplification,
    Conjunction,
    ModusTollens,
    DisjunctiveSyllogism,
    HypotheticalSyllogism,
    DoubleNegation,
    Addition,
    DisjunctionElimination,
    BiconditionalIntroduction,
    BiconditionalElimination,
    ConditionalProof,
    ReductioAdAbsurdum,
    Commutativity,
    DeMorgan,
    MaterialImplication,
}

/// What a rule expects between its parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Steps(usize),
    Range,
}

impl Rule {
    pub const ALL: [Rule; 16] = [
        Rule::ModusPonens,
        Rule::Simplification,
        Rule::Conjunction,
        Rule::ModusTollens,
        Rule::DisjunctiveSyllogism,
        Rule::HypotheticalSyllogism,
        Rule::DoubleNegation,
        Rule::Addition,
        Rule::DisjunctionElimination,
        Rule::BiconditionalIntroduction,
        Rule::BiconditionalElimination,
        Rule::ConditionalProof,
        Rule::ReductioAdAbsurdum,
        Rule::Commutativity,
        Rule::DeMorgan,
        Rule::MaterialImplication,
    ];

    /// The name used to cite the rule in a proof.
    pub fn marker(self) -> &'static str {
        match self {
            Rule::ModusPonens => "MP",
            Rule::Simplification => "SP",
            Rule::Conjunction => "CJ",
            Rule::ModusTollens => "MT",
            Rule::DisjunctiveSyllogism => "SD",
            Rule::HypotheticalSyllogism => "SH",
            Rule::DoubleNegation => "DN",
            Rule::Addition => "AD",
            Rule::DisjunctionElimination => "vE",
            Rule::BiconditionalIntroduction => "↔I",
            Rule::BiconditionalElimination => "↔E",
            Rule::ConditionalProof => "PC",
            Rule::ReductioAdAbsurdum => "RAA",
            Rule::Commutativity => "COM",
            Rule::DeMorgan => "DMOR",
            Rule::MaterialImplication => "COND",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rule::ModusPonens => "Modus Ponens",
            Rule::Simplification => "Simplification",
            Rule::Conjunction => "Conjunction",
            Rule::ModusTollens => "Modus Tollens",
            Rule::DisjunctiveSyllogism => "Disjunctive Syllogism",
            Rule::HypotheticalSyllogism => "Hypothetical Syllogism",
            Rule::DoubleNegation => "Double Negation",
            Rule::Addition => "Addition",
            Rule::DisjunctionElimination => "Disjunction Elimination",
            Rule::BiconditionalIntroduction => "Biconditional Introduction",
            Rule::BiconditionalElimination => "Biconditional Elimination",
            Rule::ConditionalProof => "Conditional Proof",
            Rule::ReductioAdAbsurdum => "Reductio ad Absurdum",
            Rule::Commutativity => "Commutativity",
            Rule::DeMorgan => "De Morgan",
            Rule::MaterialImplication => "Material Implication",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|r| r.marker() == marker)
    }

    /// Whether the rule discharges a sub-proof.
    pub fn is_scoped(self) -> bool {
        matches!(self, Rule::ConditionalProof | Rule::ReductioAdAbsurdum)
    }

    /// The kind of sub-proof the rule discharges.
    pub fn scope_kind(self) -> Option<ScopeKind> {
        match self {
            Rule::ConditionalProof => Some(ScopeKind::Conditional),
            Rule::ReductioAdAbsurdum => Some(ScopeKind::Indirect),
            _ => None,
        }
    }

    fn arity(self) -> Arity {
        match self {
            Rule::Simplification
            | Rule::DoubleNegation
            | Rule::Addition
            | Rule::BiconditionalElimination
            | Rule::Commutativity
            | Rule::DeMorgan
            | Rule::MaterialImplication => Arity::Steps(1),
            Rule::ModusPonens
            | Rule::Conjunction
            | Rule::ModusTollens
            | Rule::DisjunctiveSyllogism
            | Rule::HypotheticalSyllogism
            | Rule::BiconditionalIntroduction => Arity::Steps(2),
            Rule::DisjunctionElimination => Arity::Steps(3),
            Rule::ConditionalProof | Rule::ReductioAdAbsurdum => Arity::Range,
        }
    }

    fn expected_arguments(self) -> &'static str {
        match self.arity() {
            Arity::Steps(1) => "one reference",
            Arity::Steps(2) => "two references",
            Arity::Steps(_) => "three references",
            Arity::Range => "a range of steps",
        }
    }

    fn example(self) -> String {
        let args = match self.arity() {
            Arity::Steps(1) => "1",
            Arity::Steps(2) => "1,2",
            Arity::Steps(_) => "1,2,3",
            Arity::Range => "3-5",
        };
        format!("{}({args})", self.marker())
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::from_marker(s).ok_or_else(|| format!("unknown rule '{s}'"))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.marker())
    }
}

lazy_static! {
    /// Rule markers, longest first, so that a step body ending in `...↔E` is
    /// never taken for a shorter marker.
    pub(crate) static ref MARKERS_LONGEST_FIRST: Vec<(&'static str, Rule)> = {
        let mut markers: Vec<_> = Rule::ALL.iter().map(|r| (r.marker(), *r)).collect();
        markers.sort_by_key(|(m, _)| std::cmp::Reverse(m.chars().count()));
        markers
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Error at step {step} ({rule}): reference {reference} not found")]
    MissingReference {
        step: StepId,
        rule: Rule,
        reference: StepId,
    },
    #[error("Error at step {step} ({rule}): {rule} requires {expected}, e.g. {}", .rule.example())]
    Arguments {
        step: StepId,
        rule: Rule,
        expected: &'static str,
    },
    #[error("Error at step {step} ({rule}): {message}")]
    Mismatch {
        step: StepId,
        rule: Rule,
        message: String,
    },
    #[error("Error at step {step} ({rule}): step {opening} is not an additional hypothesis marked as {}", .expected.marker())]
    ScopeKind {
        step: StepId,
        rule: Rule,
        opening: StepId,
        expected: ScopeKind,
    },
}

impl RuleError {
    pub fn step(&self) -> StepId {
        match self {
            RuleError::MissingReference { step, .. }
            | RuleError::Arguments { step, .. }
            | RuleError::Mismatch { step, .. }
            | RuleError::ScopeKind { step, .. } => *step,
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            RuleError::MissingReference { rule, .. }
            | RuleError::Arguments { rule, .. }
            | RuleError::Mismatch { rule, .. }
            | RuleError::ScopeKind { rule, .. } => *rule,
        }
    }
}

/// A single rule application under validation.
pub(crate) struct Application<'a> {
    proof: &'a Proof,
    matching: Matching,
    step: &'a ProofStep,
    rule: Rule,
    references: &'a [Reference],
}

impl<'a> Application<'a> {
    fn matching(&self) -> Matching {
        self.matching
    }

    fn eq(&self, a: &Formula, b: &Formula) -> bool {
        self.matching.equal(a, b)
    }

    /// The formula written on the step being validated.
    fn produced(&self) -> &'a Formula {
        &self.step.formula
    }

    fn number(&self) -> StepId {
        self.step.number
    }

    fn proof(&self) -> &'a Proof {
        self.proof
    }

    fn mismatch(&self, message: impl Into<String>) -> RuleError {
        RuleError::Mismatch {
            step: self.step.number,
            rule: self.rule,
            message: message.into(),
        }
    }

    fn arguments(&self) -> RuleError {
        RuleError::Arguments {
            step: self.step.number,
            rule: self.rule,
            expected: self.rule.expected_arguments(),
        }
    }

    fn step_ref(&self, reference: StepId) -> Result<&'a ProofStep, RuleError> {
        self.proof
            .step(reference)
            .ok_or(RuleError::MissingReference {
                step: self.step.number,
                rule: self.rule,
                reference,
            })
    }

    fn formula(&self, reference: StepId) -> Result<&'a Formula, RuleError> {
        Ok(&self.step_ref(reference)?.formula)
    }

    /// Exactly `N` single-step references, all of which exist.
    fn steps<const N: usize>(&self) -> Result<[StepId; N], RuleError> {
        if self.references.len() != N {
            return Err(self.arguments());
        }
        let mut out = [0; N];
        for (slot, reference) in out.iter_mut().zip(self.references) {
            match reference {
                Reference::Step(n) => *slot = *n,
                Reference::Range(..) => return Err(self.arguments()),
            }
        }
        for n in out {
            self.step_ref(n)?;
        }
        Ok(out)
    }

    /// A single `start-end` range whose endpoints exist.
    fn range(&self) -> Result<(StepId, StepId), RuleError> {
        match self.references {
            [Reference::Range(start, end)] => {
                self.step_ref(*start)?;
                self.step_ref(*end)?;
                Ok((*start, *end))
            }
            _ => Err(self.arguments()),
        }
    }

    /// Succeeds when the produced formula equals `expected`.
    fn expect(&self, expected: &Formula) -> Result<(), RuleError> {
        self.expect_any(std::slice::from_ref(expected))
    }

    /// Succeeds when the produced formula equals any of `candidates`. The
    /// error names the first one.
    fn expect_any(&self, candidates: &[Formula]) -> Result<(), RuleError> {
        let produced = self.produced();
        if candidates.iter().any(|c| self.eq(produced, c)) {
            return Ok(());
        }
        let expected = candidates
            .first()
            .map(ToString::to_string)
            .unwrap_or_default();
        Err(self.mismatch(format!(
            "expected conclusion '{expected}', but found '{produced}'"
        )))
    }
}

/// Checks that `step` follows from the steps its citation refers to.
pub fn validate(
    proof: &Proof,
    matching: Matching,
    step: &ProofStep,
    citation: &Citation,
) -> Result<(), RuleError> {
    let app = Application {
        proof,
        matching,
        step,
        rule: citation.rule,
        references: &citation.references,
    };
    match citation.rule {
        Rule::ModusPonens => inference::modus_ponens(&app),
        Rule::Simplification => inference::simplification(&app),
        Rule::Conjunction => inference::conjunction(&app),
        Rule::ModusTollens => inference::modus_tollens(&app),
        Rule::DisjunctiveSyllogism => inference::disjunctive_syllogism(&app),
        Rule::HypotheticalSyllogism => inference::hypothetical_syllogism(&app),
        Rule::DoubleNegation => inference::double_negation(&app),
        Rule::Addition => inference::addition(&app),
        Rule::DisjunctionElimination => inference::disjunction_elimination(&app),
        Rule::BiconditionalIntroduction => inference::biconditional_introduction(&app),
        Rule::BiconditionalElimination => inference::biconditional_elimination(&app),
        Rule::ConditionalProof => scoped::conditional_proof(&app),
        Rule::ReductioAdAbsurdum => scoped::reductio_ad_absurdum(&app),
        Rule::Commutativity => equivalence::commutativity(&app),
        Rule::DeMorgan => equivalence::de_morgan(&app),
        Rule::MaterialImplication => equivalence::material_implication(&app),
    }
}
