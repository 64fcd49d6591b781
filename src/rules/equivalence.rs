//! Rewrites that hold in both directions: COM, DMOR and COND.

use crate::formula::{Connective, Formula};

use super::{Application, RuleError};

pub(super) fn commutativity(app: &Application) -> Result<(), RuleError> {
    let [source] = app.steps()?;
    let formula = app.formula(source)?;
    let produced = app.produced();
    if commutes(app, formula, produced) {
        Ok(())
    } else {
        Err(app.mismatch(format!(
            "'{formula}' and '{produced}' are not equivalent by commutativity"
        )))
    }
}

/// Whether `b` can be obtained from `a` by reordering the operands of
/// commutative connectives.
///
/// A chain of `∧` or `∨` is compared position by position, where two
/// neighbouring operands may trade places.
fn commutes(app: &Application, a: &Formula, b: &Formula) -> bool {
    if app.eq(a, b) {
        return true;
    }
    match (a, b) {
        (Formula::Not(x), Formula::Not(y)) => commutes(app, x, y),
        (Formula::Binary(c1, l1, r1), Formula::Binary(c2, l2, r2)) if c1 == c2 => match c1 {
            Connective::And | Connective::Or => {
                chains_commute(app, &a.operands(*c1), &b.operands(*c1))
            }
            Connective::Iff => {
                (app.eq(l1, r2) && app.eq(r1, l2))
                    || (commutes(app, l1, l2) && commutes(app, r1, r2))
            }
            Connective::Implies => {
                (app.eq(l1, l2) && commutes(app, r1, r2))
                    || (commutes(app, l1, l2) && app.eq(r1, r2))
            }
        },
        _ => false,
    }
}

fn chains_commute(app: &Application, a: &[&Formula], b: &[&Formula]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if commutes(app, a[i], b[i]) {
            i += 1;
        } else if i + 1 < a.len() && commutes(app, a[i], b[i + 1]) && commutes(app, a[i + 1], b[i])
        {
            i += 2;
        } else {
            return false;
        }
    }
    true
}

/// `¬(P ∨ Q)` becomes `¬P ∧ ¬Q` and `¬(P ∧ Q)` becomes `¬P ∨ ¬Q`.
fn de_morgan_dual(formula: &Formula) -> Option<Formula> {
    let (connective, lhs, rhs) = match formula.negated()? {
        Formula::Binary(c @ (Connective::And | Connective::Or), lhs, rhs) => (*c, lhs, rhs),
        _ => return None,
    };
    let dual = match connective {
        Connective::And => Connective::Or,
        _ => Connective::And,
    };
    Some(Formula::binary(
        dual,
        Formula::not(lhs.as_ref().clone()),
        Formula::not(rhs.as_ref().clone()),
    ))
}

pub(super) fn de_morgan(app: &Application) -> Result<(), RuleError> {
    let [source] = app.steps()?;
    let formula = app.formula(source)?;
    let produced = app.produced();

    // Either side may be the negated conjunction or disjunction.
    let candidates = [(formula, produced), (produced, formula)];
    let mut expected = None;
    for (negated, other) in candidates {
        if let Some(dual) = de_morgan_dual(negated) {
            let dual = dual.collapse_double_negation();
            if app.eq(&dual, &other.collapse_double_negation()) {
                return Ok(());
            }
            expected.get_or_insert(dual);
        }
    }
    match expected {
        Some(expected) => Err(app.mismatch(format!(
            "'{produced}' does not match the expected transformation '{expected}'"
        ))),
        None => Err(app.mismatch(
            "De Morgan requires a negated conjunction or disjunction on one side",
        )),
    }
}

/// `P → Q` becomes `¬P ∨ Q` and `P ∨ Q` becomes `¬P → Q`, also under
/// negation.
fn material_rewrite(formula: &Formula) -> Option<Formula> {
    match formula {
        Formula::Binary(Connective::Implies, lhs, rhs) => Some(Formula::or(
            Formula::not(lhs.as_ref().clone()),
            rhs.as_ref().clone(),
        )),
        Formula::Binary(Connective::Or, lhs, rhs) => Some(Formula::implies(
            Formula::not(lhs.as_ref().clone()),
            rhs.as_ref().clone(),
        )),
        Formula::Not(inner) => material_rewrite(inner).map(Formula::not),
        _ => None,
    }
}

pub(super) fn material_implication(app: &Application) -> Result<(), RuleError> {
    let [source] = app.steps()?;
    let formula = app.formula(source)?;
    let produced = app.produced();
    let Some(expected) = material_rewrite(formula) else {
        return Err(app.mismatch(format!(
            "the formula at step {source} is neither a conditional nor a disjunction"
        )));
    };
    let expected = expected.collapse_double_negation();
    if app.eq(&expected, &produced.collapse_double_negation()) {
        Ok(())
    } else {
        Err(app.mismatch(format!(
            "'{produced}' does not match the expected transformation '{expected}'"
        )))
    }
}
