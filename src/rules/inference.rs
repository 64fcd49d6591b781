use crate::formula::{Connective, Formula, Matching};

use super::{Application, RuleError};

pub(super) fn modus_ponens(app: &Application) -> Result<(), RuleError> {
    let [conditional_step, antecedent_step] = app.steps()?;
    let conditional = app.formula(conditional_step)?;
    let antecedent = app.formula(antecedent_step)?;
    let Some((lhs, rhs)) = conditional.split(Connective::Implies) else {
        return Err(app.mismatch(format!(
            "the formula at step {conditional_step} is not a conditional"
        )));
    };
    if !app.eq(antecedent, lhs) {
        return Err(app.mismatch(format!(
            "the antecedent '{antecedent}' does not match '{lhs}'"
        )));
    }
    app.expect(rhs)
}

pub(super) fn simplification(app: &Application) -> Result<(), RuleError> {
    let [source] = app.steps()?;
    let conjunction = app.formula(source)?;
    let Some((lhs, rhs)) = conjunction.split(Connective::And) else {
        return Err(app.mismatch(format!(
            "the formula at step {source} is not a conjunction"
        )));
    };
    let mut accepted = vec![lhs, rhs];
    if app.matching() == Matching::Lenient {
        accepted.extend(conjunction.operands(Connective::And));
    }
    let produced = app.produced();
    if accepted.iter().any(|c| app.eq(produced, c)) {
        Ok(())
    } else {
        Err(app.mismatch(format!(
            "'{produced}' is not a conjunct of '{conjunction}'"
        )))
    }
}

pub(super) fn conjunction(app: &Application) -> Result<(), RuleError> {
    let [first, second] = app.steps()?;
    let a = app.formula(first)?;
    let b = app.formula(second)?;
    app.expect_any(&[
        Formula::and(a.clone(), b.clone()),
        Formula::and(b.clone(), a.clone()),
    ])
}

pub(super) fn modus_tollens(app: &Application) -> Result<(), RuleError> {
    let [conditional_step, negation_step] = app.steps()?;
    let conditional = app.formula(conditional_step)?;
    let negation = app.formula(negation_step)?;
    let Some((lhs, rhs)) = conditional.split(Connective::Implies) else {
        return Err(app.mismatch(format!(
            "the formula at step {conditional_step} is not a conditional"
        )));
    };
    let negated_consequent = Formula::not(rhs.clone());
    if !app.eq(negation, &negated_consequent)
        && !app.eq(&Formula::not(negation.clone()), rhs)
    {
        return Err(app.mismatch(format!(
            "the negation '{negation}' does not match the expected '{negated_consequent}'"
        )));
    }
    app.expect(&Formula::not(lhs.clone()))
}

/// From `P ∨ Q` and the negation of one disjunct, the other one.
///
/// Leniently, a longer chain `P ∨ Q ∨ R` may lose any one of its disjuncts.
pub(super) fn disjunctive_syllogism(app: &Application) -> Result<(), RuleError> {
    let [disjunction_step, negation_step] = app.steps()?;
    let disjunction = app.formula(disjunction_step)?;
    let negation = app.formula(negation_step)?;
    let Some((lhs, rhs)) = disjunction.split(Connective::Or) else {
        return Err(app.mismatch(format!(
            "the formula at step {disjunction_step} is not a disjunction"
        )));
    };
    let disjuncts = match app.matching() {
        Matching::Strict => vec![lhs, rhs],
        Matching::Lenient => disjunction.operands(Connective::Or),
    };
    let Some(eliminated) = disjuncts
        .iter()
        .position(|d| app.eq(negation, &Formula::not((*d).clone())))
    else {
        return Err(app.mismatch(format!(
            "the negation '{negation}' does not match any disjunct of '{disjunction}'"
        )));
    };
    let remaining = disjuncts
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != eliminated)
        .map(|(_, d)| (*d).clone())
        .rev()
        .reduce(|acc, d| Formula::or(d, acc));
    match remaining {
        Some(expected) => app.expect(&expected),
        None => Err(app.mismatch(format!(
            "'{disjunction}' has no disjunct left after eliminating '{negation}'"
        ))),
    }
}

pub(super) fn hypothetical_syllogism(app: &Application) -> Result<(), RuleError> {
    let [first_step, second_step] = app.steps()?;
    let first = app.formula(first_step)?;
    let second = app.formula(second_step)?;
    let (Some((a, b)), Some((b2, c))) = (
        first.split(Connective::Implies),
        second.split(Connective::Implies),
    ) else {
        return Err(app.mismatch("both references must be conditionals"));
    };
    if !app.eq(b, b2) {
        return Err(app.mismatch(format!(
            "the consequent of '{first}' does not match the antecedent of '{second}'"
        )));
    }
    app.expect(&Formula::implies(a.clone(), c.clone()))
}

pub(super) fn double_negation(app: &Application) -> Result<(), RuleError> {
    let [source] = app.steps()?;
    let formula = app.formula(source)?;
    let produced = app.produced();
    let twice = |f: &Formula| Formula::not(Formula::not(f.clone()));
    if app.eq(formula, &twice(produced)) || app.eq(&twice(formula), produced) {
        Ok(())
    } else {
        Err(app.mismatch(format!(
            "'{produced}' is not the double negation of '{formula}'"
        )))
    }
}

/// The lenient check only asks for the source to appear inside a formula
/// that contains a disjunction.
pub(super) fn addition(app: &Application) -> Result<(), RuleError> {
    let [source] = app.steps()?;
    let formula = app.formula(source)?;
    let produced = app.produced();
    let valid = match app.matching() {
        Matching::Lenient => {
            let tokens = produced.token_stream();
            tokens.contains(&formula.token_stream()) && tokens.contains(Connective::Or.symbol())
        }
        Matching::Strict => produced
            .split(Connective::Or)
            .is_some_and(|(lhs, rhs)| lhs == formula || rhs == formula),
    };
    if valid {
        Ok(())
    } else {
        Err(app.mismatch(format!(
            "'{produced}' is not a valid addition of '{formula}'"
        )))
    }
}

pub(super) fn disjunction_elimination(app: &Application) -> Result<(), RuleError> {
    let [disjunction_step, first_step, second_step] = app.steps()?;
    let disjunction = app.formula(disjunction_step)?;
    let first = app.formula(first_step)?;
    let second = app.formula(second_step)?;

    let two_disjuncts = disjunction.split(Connective::Or).filter(|_| {
        app.matching() == Matching::Strict || disjunction.operands(Connective::Or).len() == 2
    });
    let Some((p, q)) = two_disjuncts else {
        return Err(app.mismatch(format!(
            "the formula at step {disjunction_step} must be a disjunction of exactly two propositions"
        )));
    };
    let Some((a1, c1)) = first.split(Connective::Implies) else {
        return Err(app.mismatch(format!("the formula at step {first_step} is not a conditional")));
    };
    let Some((a2, c2)) = second.split(Connective::Implies) else {
        return Err(app.mismatch(format!("the formula at step {second_step} is not a conditional")));
    };
    if !app.eq(c1, c2) {
        return Err(app.mismatch(format!(
            "the conditionals '{first}' and '{second}' do not share a consequent"
        )));
    }
    let covered = match app.matching() {
        Matching::Lenient => [(p, a1), (q, a2), (p, a2), (q, a1)]
            .iter()
            .any(|(d, a)| app.eq(d, a)),
        Matching::Strict => {
            (app.eq(p, a1) && app.eq(q, a2)) || (app.eq(p, a2) && app.eq(q, a1))
        }
    };
    if !covered {
        return Err(app.mismatch(format!(
            "the disjuncts of '{disjunction}' do not match the antecedents of '{first}' and '{second}'"
        )));
    }
    app.expect(c1)
}

pub(super) fn biconditional_introduction(app: &Application) -> Result<(), RuleError> {
    let [first_step, second_step] = app.steps()?;
    let first = app.formula(first_step)?;
    let second = app.formula(second_step)?;
    let (Some((a, b)), Some((b2, a2))) = (
        first.split(Connective::Implies),
        second.split(Connective::Implies),
    ) else {
        return Err(app.mismatch("both references must be conditionals"));
    };
    if !app.eq(a, a2) || !app.eq(b, b2) {
        return Err(app.mismatch(format!(
            "'{first}' and '{second}' are not converse conditionals"
        )));
    }
    app.expect_any(&[
        Formula::iff(a.clone(), b.clone()),
        Formula::iff(b.clone(), a.clone()),
    ])
}

pub(super) fn biconditional_elimination(app: &Application) -> Result<(), RuleError> {
    let [source] = app.steps()?;
    let biconditional = app.formula(source)?;
    let Some((a, b)) = biconditional.split(Connective::Iff) else {
        return Err(app.mismatch(format!(
            "the formula at step {source} is not a biconditional"
        )));
    };
    app.expect_any(&[
        Formula::implies(a.clone(), b.clone()),
        Formula::implies(b.clone(), a.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use crate::rules::test_util::*;
    use crate::rules::{Rule, RuleError};

    fn message(result: Result<(), RuleError>) -> String {
        match result {
            Err(RuleError::Mismatch { message, .. }) => message,
            other => panic!("expected a mismatch, got {other:?}"),
        }
    }

    #[test]
    fn modus_ponens() {
        let premises = "P → Q, P ⊢ Q";
        assert_eq!(
            both(premises, "1. P → Q (Hipótese)\n2. P (Hipótese)\n3. Q MP(1,2)"),
            Ok(())
        );
        assert_eq!(
            message(both(premises, "1. P → Q (Hipótese)\n2. P (Hipótese)\n3. Q MP(2,1)")),
            "the formula at step 2 is not a conditional"
        );
        assert_eq!(
            message(both(premises, "1. P → Q (Hipótese)\n2. R (Hipótese)\n3. Q MP(1,2)")),
            "the antecedent 'R' does not match 'P'"
        );
        assert_eq!(
            message(both(premises, "1. P → Q (Hipótese)\n2. P (Hipótese)\n3. R MP(1,2)")),
            "expected conclusion 'Q', but found 'R'"
        );
        // grouped antecedents
        assert_eq!(
            both(
                "(P ∧ Q) → R, P ∧ Q ⊢ R",
                "1. (P ∧ Q) → R (Hipótese)\n2. P ∧ Q (Hipótese)\n3. R MP(1,2)"
            ),
            Ok(())
        );
    }

    #[test]
    fn simplification() {
        let steps = "1. P ∧ (Q ∧ R) (Hipótese)\n2. Q ∧ R SP(1)";
        assert_eq!(both("P ⊢ P", steps), Ok(()));
        assert_eq!(
            both("P ⊢ P", "1. P ∧ (Q ∧ R) (Hipótese)\n2. P SP(1)"),
            Ok(())
        );
        // a conjunct buried in the chain
        let deep = "1. P ∧ (Q ∧ R) (Hipótese)\n2. R SP(1)";
        assert_eq!(lenient("P ⊢ P", deep), Ok(()));
        assert!(strict("P ⊢ P", deep).is_err());
        assert_eq!(
            message(both("P ⊢ P", "1. P ∨ Q (Hipótese)\n2. P SP(1)")),
            "the formula at step 1 is not a conjunction"
        );
    }

    #[test]
    fn conjunction() {
        let steps = "1. P (Hipótese)\n2. Q → R (Hipótese)\n3. (Q → R) ∧ P CJ(1,2)";
        assert_eq!(both("P ⊢ P", steps), Ok(()));
        assert_eq!(
            both("P ⊢ P", "1. P (Hipótese)\n2. Q (Hipótese)\n3. P ∧ Q CJ(1,2)"),
            Ok(())
        );
        assert!(both("P ⊢ P", "1. P (Hipótese)\n2. Q (Hipótese)\n3. P ∨ Q CJ(1,2)").is_err());
    }

    #[test]
    fn modus_tollens() {
        let sequent = "P → Q, ¬Q ⊢ ¬P";
        assert_eq!(
            both(sequent, "1. P → Q (Hipótese)\n2. ¬Q (Hipótese)\n3. ¬P MT(1,2)"),
            Ok(())
        );
        // consequent that is itself a negation
        assert_eq!(
            both(
                "P → ¬Q, Q ⊢ ¬P",
                "1. P → ¬Q (Hipótese)\n2. Q (Hipótese)\n3. ¬P MT(1,2)"
            ),
            Ok(())
        );
        assert_eq!(
            message(both(sequent, "1. P → Q (Hipótese)\n2. Q (Hipótese)\n3. ¬P MT(1,2)")),
            "the negation 'Q' does not match the expected '¬Q'"
        );
    }

    #[test]
    fn disjunctive_syllogism() {
        assert_eq!(
            both(
                "P ∨ Q, ¬P ⊢ Q",
                "1. P v Q (Hipótese)\n2. ¬P (Hipótese)\n3. Q SD(1,2)"
            ),
            Ok(())
        );
        assert_eq!(
            both(
                "P ∨ Q, ¬Q ⊢ P",
                "1. P ∨ Q (Hipótese)\n2. ¬Q (Hipótese)\n3. P SD(1,2)"
            ),
            Ok(())
        );
        let chain = "1. P ∨ Q ∨ R (Hipótese)\n2. ¬Q (Hipótese)\n3. P ∨ R SD(1,2)";
        assert_eq!(lenient("P ⊢ P", chain), Ok(()));
        assert!(strict("P ⊢ P", chain).is_err());
        assert_eq!(
            message(both(
                "P ⊢ P",
                "1. P ∨ Q (Hipótese)\n2. ¬R (Hipótese)\n3. P SD(1,2)"
            )),
            "the negation '¬R' does not match any disjunct of 'P ∨ Q'"
        );
    }

    #[test]
    fn hypothetical_syllogism() {
        let steps = "1. P → (Q ∨ R) (Hipótese)\n2. (Q ∨ R) → S (Hipótese)\n3. P → S SH(1,2)";
        assert_eq!(both("P ⊢ P", steps), Ok(()));
        assert_eq!(
            message(both(
                "P ⊢ P",
                "1. P → Q (Hipótese)\n2. R → S (Hipótese)\n3. P → S SH(1,2)"
            )),
            "the consequent of 'P → Q' does not match the antecedent of 'R → S'"
        );
        assert_eq!(
            message(both(
                "P ⊢ P",
                "1. P ∧ Q (Hipótese)\n2. Q → S (Hipótese)\n3. P → S SH(1,2)"
            )),
            "both references must be conditionals"
        );
    }

    #[test]
    fn double_negation() {
        assert_eq!(both("P ⊢ P", "1. ¬¬P (Hipótese)\n2. P DN(1)"), Ok(()));
        assert_eq!(both("P ⊢ P", "1. P (Hipótese)\n2. ¬¬P DN(1)"), Ok(()));
        assert_eq!(
            both("P ⊢ P", "1. ¬¬(P → Q) (Hipótese)\n2. P → Q DN(1)"),
            Ok(())
        );
        assert!(both("P ⊢ P", "1. ¬P (Hipótese)\n2. P DN(1)").is_err());
    }

    #[test]
    fn addition() {
        assert_eq!(both("P ⊢ P", "1. P (Hipótese)\n2. P ∨ Q AD(1)"), Ok(()));
        assert_eq!(both("P ⊢ P", "1. P (Hipótese)\n2. Q ∨ P AD(1)"), Ok(()));
        let buried = "1. P (Hipótese)\n2. (P ∧ R) ∨ Q AD(1)";
        assert_eq!(lenient("P ⊢ P", buried), Ok(()));
        assert!(strict("P ⊢ P", buried).is_err());
        assert_eq!(
            message(both("P ⊢ P", "1. P (Hipótese)\n2. P ∧ Q AD(1)")),
            "'P ∧ Q' is not a valid addition of 'P'"
        );
    }

    #[test]
    fn disjunction_elimination() {
        let steps = "1. (P → ¬Q) v R (Hipótese)
                     2. (P → ¬Q) → ¬¬Q (Hipótese)
                     3. R → ¬¬Q (Hipótese)
                     4. ¬¬Q vE(1,2,3)";
        assert_eq!(both("P ⊢ P", steps), Ok(()));

        let one_side = "1. P ∨ Q (Hipótese)
                        2. P → R (Hipótese)
                        3. S → R (Hipótese)
                        4. R vE(1,2,3)";
        assert_eq!(lenient("P ⊢ P", one_side), Ok(()));
        assert!(strict("P ⊢ P", one_side).is_err());

        let different = "1. P ∨ Q (Hipótese)
                         2. P → R (Hipótese)
                         3. Q → S (Hipótese)
                         4. R vE(1,2,3)";
        assert_eq!(
            message(both("P ⊢ P", different)),
            "the conditionals 'P → R' and 'Q → S' do not share a consequent"
        );

        let three = "1. P ∨ Q ∨ S (Hipótese)
                     2. P → R (Hipótese)
                     3. Q → R (Hipótese)
                     4. R vE(1,2,3)";
        assert!(lenient("P ⊢ P", three).is_err());
    }

    #[test]
    fn biconditionals() {
        let intro = "1. P → Q (Hipótese)\n2. Q → P (Hipótese)\n3. P ↔ Q ↔I(1,2)";
        assert_eq!(both("P ⊢ P", intro), Ok(()));
        assert_eq!(
            message(both(
                "P ⊢ P",
                "1. P → Q (Hipótese)\n2. Q → R (Hipótese)\n3. P ↔ Q ↔I(1,2)"
            )),
            "'P → Q' and 'Q → R' are not converse conditionals"
        );

        let sequent = "(P ∧ ¬Q) ↔ R ⊢ R → (P ∧ ¬Q)";
        assert_eq!(
            both(sequent, "1. (P ∧ ¬Q) ↔ R (Hipótese)\n2. (P ∧ ¬Q) → R ↔E(1)"),
            Ok(())
        );
        assert_eq!(
            both(sequent, "1. (P ∧ ¬Q) ↔ R (Hipótese)\n2. R → (P ∧ ¬Q) ↔E(1)"),
            Ok(())
        );
        let err = both(sequent, "1. P → R (Hipótese)\n2. P → R ↔E(1)").unwrap_err();
        assert_eq!(err.rule(), Rule::BiconditionalElimination);
    }
}
