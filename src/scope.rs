//! Sub-proofs opened by `Hip-PC` / `Hip-RAA` and discharged by PC / RAA.
//!
//! The predicates [`opens`] and [`is_contradiction`] are what the scoped
//! rules check when they are cited. [`ScopeTracker`] additionally enforces
//! lexical scoping in a single pass over the steps: once a sub-proof is
//! discharged its steps are no longer visible.

use thiserror::Error;

use crate::formula::{Connective, Formula, Matching};
use crate::proof::{Justification, Proof, ProofStep, Reference, ScopeKind, StepId};
use crate::rules::Rule;
use crate::util::{HashMap, HashSet};

/// Whether `step` was assumed with the marker for `kind`.
pub fn opens(step: &ProofStep, kind: ScopeKind) -> bool {
    step.justification == Justification::ScopedHypothesis(kind)
}

/// `A ∧ ¬A` or `¬A ∧ A`, split at the main conjunction.
pub fn is_contradiction(matching: Matching, formula: &Formula) -> bool {
    let Some((lhs, rhs)) = formula.split(Connective::And) else {
        return false;
    };
    matching.equal(lhs, &Formula::not(rhs.clone()))
        || matching.equal(rhs, &Formula::not(lhs.clone()))
}

/// How sub-proofs are policed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeDiscipline {
    /// Only the cited opening and closing steps of PC / RAA are checked.
    #[default]
    AtDischarge,
    /// Scopes nest; steps of a discharged sub-proof cannot be cited
    /// afterwards and every scoped hypothesis must be discharged.
    Lexical,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("Error at step {step}: step {reference} belongs to the sub-proof {opening}-{closing}, which is already discharged")]
    OutOfScope {
        step: StepId,
        reference: StepId,
        opening: StepId,
        closing: StepId,
    },
    #[error("Error at step {step}: step {reference} is cited before it is derived")]
    ForwardReference { step: StepId, reference: StepId },
    #[error("Error at step {step} ({rule}): {opening} does not open the innermost sub-proof{}", .innermost.map(|n| format!(" (which starts at {n})")).unwrap_or_default())]
    NotInnermost {
        step: StepId,
        rule: Rule,
        opening: StepId,
        innermost: Option<StepId>,
    },
    #[error("Error at step {step} ({rule}): step {closing} is not part of the sub-proof opened at {opening}")]
    ClosingOutside {
        step: StepId,
        rule: Rule,
        opening: StepId,
        closing: StepId,
    },
    #[error("Error at step {opening}: the hypothesis {kind} is never discharged")]
    Undischarged { opening: StepId, kind: ScopeKind },
}

impl ScopeError {
    /// The step the error is reported against.
    pub fn step(&self) -> StepId {
        match self {
            ScopeError::OutOfScope { step, .. }
            | ScopeError::ForwardReference { step, .. }
            | ScopeError::NotInnermost { step, .. }
            | ScopeError::ClosingOutside { step, .. } => *step,
            ScopeError::Undischarged { opening, .. } => *opening,
        }
    }
}

#[derive(Debug)]
struct OpenScope {
    kind: ScopeKind,
    opening: StepId,
    members: Vec<StepId>,
}

/// Left-to-right pass over the steps of a proof keeping a stack of open
/// sub-proofs.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    open: Vec<OpenScope>,
    seen: HashSet<StepId>,
    /// Step of a discharged sub-proof to the `(opening, closing)` of that
    /// sub-proof.
    discharged: HashMap<StepId, (StepId, StepId)>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits the next step in file order and returns the scoping errors of
    /// that step.
    pub fn visit(&mut self, proof: &Proof, step: &ProofStep) -> Vec<ScopeError> {
        let mut errors = vec![];
        if let Some(citation) = step.citation() {
            for reference in citation.cited_steps() {
                if proof.step(reference).is_none() {
                    // reported by the rule itself
                    continue;
                }
                if !self.seen.contains(&reference) {
                    errors.push(ScopeError::ForwardReference {
                        step: step.number,
                        reference,
                    });
                } else if let Some(&(opening, closing)) = self.discharged.get(&reference) {
                    errors.push(ScopeError::OutOfScope {
                        step: step.number,
                        reference,
                        opening,
                        closing,
                    });
                }
            }
            if let Some(kind) = citation.rule.scope_kind() {
                if let [Reference::Range(opening, closing)] = citation.references[..] {
                    self.discharge(proof, step, kind, opening, closing, &mut errors);
                }
            }
        }

        if let Some(kind) = step.scope_kind() {
            log::debug!("step {} opens a {kind} sub-proof", step.number);
            self.open.push(OpenScope {
                kind,
                opening: step.number,
                members: vec![],
            });
        }
        self.seen.insert(step.number);
        if let Some(scope) = self.open.last_mut() {
            scope.members.push(step.number);
        }
        errors
    }

    fn discharge(
        &mut self,
        proof: &Proof,
        step: &ProofStep,
        kind: ScopeKind,
        opening: StepId,
        closing: StepId,
        errors: &mut Vec<ScopeError>,
    ) {
        let innermost = self.open.last().map(|s| s.opening);
        if innermost != Some(opening) {
            errors.push(ScopeError::NotInnermost {
                step: step.number,
                rule: kind.rule(),
                opening,
                innermost,
            });
            return;
        }
        let Some(scope) = self.open.pop() else {
            return;
        };
        if !scope.members.contains(&closing) {
            errors.push(ScopeError::ClosingOutside {
                step: step.number,
                rule: kind.rule(),
                opening,
                closing,
            });
        }
        if scope.kind != kind {
            // the rule reports the marker mismatch
            log::debug!(
                "step {} discharges a {} sub-proof with {}",
                step.number,
                scope.kind,
                kind.rule()
            );
        }
        // premises stay visible wherever they were written
        let premise = |member: &StepId| {
            proof
                .step(*member)
                .is_some_and(|s| s.justification == Justification::Hypothesis)
        };
        for member in scope.members.into_iter().filter(|m| !premise(m)) {
            self.discharged.insert(member, (opening, closing));
        }
    }

    /// Reports every sub-proof that was opened but never discharged.
    pub fn finish(self) -> Vec<ScopeError> {
        self.open
            .into_iter()
            .map(|scope| ScopeError::Undischarged {
                opening: scope.opening,
                kind: scope.kind,
            })
            .collect()
    }
}
