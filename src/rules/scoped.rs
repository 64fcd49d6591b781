//! PC and RAA, the two rules that discharge a sub-proof `start-end`.

use crate::formula::{Formula, Matching};
use crate::proof::{ProofStep, ScopeKind};
use crate::scope;

use super::{Application, RuleError};

/// The opening and closing steps of the cited sub-proof, after checking that
/// the opening step was assumed with the right marker.
fn sub_proof<'a>(
    app: &Application<'a>,
    kind: ScopeKind,
) -> Result<(&'a ProofStep, &'a ProofStep), RuleError> {
    let (start, end) = app.range()?;
    let opening = app.step_ref(start)?;
    let closing = app.step_ref(end)?;
    if !scope::opens(opening, kind) {
        return Err(RuleError::ScopeKind {
            step: app.number(),
            rule: kind.rule(),
            opening: start,
            expected: kind,
        });
    }
    Ok((opening, closing))
}

pub(super) fn conditional_proof(app: &Application) -> Result<(), RuleError> {
    let (opening, closing) = sub_proof(app, ScopeKind::Conditional)?;
    app.expect(&Formula::implies(
        opening.formula.clone(),
        closing.formula.clone(),
    ))
}

/// The assumption must contradict what is being proved. Leniently that is
/// the first declared conclusion; strictly it is the formula on the step
/// itself, so an indirect proof may also establish an intermediate result.
pub(super) fn reductio_ad_absurdum(app: &Application) -> Result<(), RuleError> {
    let (opening, closing) = sub_proof(app, ScopeKind::Indirect)?;
    if !scope::is_contradiction(app.matching(), &closing.formula) {
        return Err(app.mismatch(format!(
            "'{}' is not a contradiction",
            closing.formula
        )));
    }
    let target = match app.matching() {
        Matching::Lenient => match app.proof().sequent.main_conclusion() {
            Some(conclusion) => &conclusion.formula,
            None => return Err(app.mismatch("the sequent declares no conclusion to prove")),
        },
        Matching::Strict => app.produced(),
    };
    let assumed = &opening.formula;
    if !app.eq(assumed, &Formula::not(target.clone()))
        && !app.eq(&Formula::not(assumed.clone()), target)
    {
        return Err(app.mismatch(format!(
            "the assumption '{assumed}' is not the negation of '{target}'"
        )));
    }
    app.expect(target)
}
