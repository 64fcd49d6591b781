use natded::*;

const MP_STEPS: &str = "
1. P → Q (Hipótese)
2. P (Hipótese)
3. Q MP(1,2)
";

const RAA_SEQUENT: &str = "¬Q, P → Q ⊢ ¬P";
const RAA_STEPS: &str = "
1.¬Q(Hipótese)
2.P→Q(Hipótese)
3.P(Hip-RAA)
4.Q MP(2,3)
5.Q∧¬Q CJ(1,4)
6.¬P RAA(3-5)
";

fn checkers() -> [Checker; 4] {
    [
        Checker::default(),
        Checker::default().with_strict_matching(),
        Checker::default().with_lexical_scopes(),
        Checker::default()
            .with_strict_matching()
            .with_lexical_scopes(),
    ]
}

#[test]
fn test_reflexive_equality_and_idempotent_normalization() {
    for text in [
        "P",
        "¬¬P",
        "(A → B) → C",
        r"\neg(P \land Q) \leftrightarrow (\negP \lor \negQ)",
        "p v q -> r",
    ] {
        assert!(formula::structurally_equal(text, text), "{text}");
        let once = normalize::normalize_notation(text);
        assert_eq!(normalize::normalize_notation(&once), once);
    }
}

#[test]
fn test_split_top_level_ignores_nested_connectives() {
    assert_eq!(
        formula::split_top_level("(A→B)→C", Connective::Implies),
        Some(("(A→B)", "C"))
    );
    assert_eq!(
        formula::split_top_level("A→(B→C)", Connective::Implies),
        Some(("A", "(B→C)"))
    );
    assert_eq!(formula::split_top_level("(A→B)", Connective::Implies), None);
}

#[test]
fn test_modus_ponens() {
    let _ = env_logger::builder().is_test(true).try_init();

    for checker in checkers() {
        let outcome = checker.check("P→Q, P ⊢ Q", MP_STEPS).unwrap();
        assert!(outcome.valid, "{}", outcome.transcript);
    }

    let outcome = check("P∧Q, P ⊢ Q", "1. P∧Q (Hipótese)\n2. P (Hipótese)\n3. Q MP(1,2)").unwrap();
    assert!(!outcome.valid);
    assert!(outcome
        .transcript
        .errors()
        .any(|e| e.to_string().contains("not a conditional")));
}

#[test]
fn test_disjunctive_syllogism() {
    let valid = "1. P∨Q (Hipótese)\n2. ¬P (Hipótese)\n3. Q SD(1,2)";
    let invalid = "1. P∨Q (Hipótese)\n2. ¬P (Hipótese)\n3. P SD(1,2)";
    for checker in checkers() {
        assert!(checker.check("P∨Q, ¬P ⊢ Q", valid).unwrap().valid);
        assert!(!checker.check("P∨Q, ¬P ⊢ Q", invalid).unwrap().valid);
    }
}

#[test]
fn test_reductio_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();

    for checker in checkers() {
        let outcome = checker.check(RAA_SEQUENT, RAA_STEPS).unwrap();
        assert!(outcome.valid, "{}", outcome.transcript);
    }

    let unmarked = RAA_STEPS.replace("(Hip-RAA)", "(Hipótese)");
    let outcome = check(RAA_SEQUENT, &unmarked).unwrap();
    assert!(!outcome.valid);
    assert!(outcome.transcript.errors().any(|e| matches!(
        e,
        CheckError::Rule(RuleError::ScopeKind {
            step: 6,
            opening: 3,
            expected: ScopeKind::Indirect,
            ..
        })
    )));
}

#[test]
fn test_conditional_proof_end_to_end() {
    let steps = "
1. A → (B v C) (Hipótese)
2. ¬B (Hipótese)
3. A (Hip-PC)
4. B v C MP(1,3)
5. C SD(4,2)
6. A → C PC(3-5)
";
    for checker in checkers() {
        let outcome = checker.check("A → (B v C), ¬B ⊢ A → C", steps).unwrap();
        assert!(outcome.valid, "{}", outcome.transcript);
    }
}

#[test]
fn test_missing_conclusion_is_its_own_error() {
    // every step is valid, but the last formula is not the declared conclusion
    let outcome = check("P → Q, P ⊢ Q ∨ Q", MP_STEPS).unwrap();
    assert!(!outcome.valid);
    let errors: Vec<_> = outcome.transcript.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], CheckError::ConclusionMissing { .. }));
    assert!(outcome
        .transcript
        .stage(Stage::RuleCheck)
        .all(|d| d.severity() == Severity::Info));
}

#[test]
fn test_parse_errors_are_fatal() {
    assert!(matches!(
        check("P → Q, P, Q", MP_STEPS),
        Err(ParseError::MissingTurnstile)
    ));
    assert!(matches!(
        check("P ⊢ P", "one. P (Hipótese)"),
        Err(ParseError::InvalidStepNumber { .. })
    ));
    assert!(matches!(
        check("P ⊢ P", "1 P (Hipótese)"),
        Err(ParseError::MalformedStepLine { .. })
    ));
}

#[test]
fn test_edges_follow_citations() {
    let steps = "
1. P → (Q ∧ R) (Hipótese)
2. P (Hipótese)
3. Q ∧ R MP(1,2)
4. Q SP(3)
5. P ∧ Q CJ(2,4)
6. R SP(4)
";
    let outcome = check("P → (Q ∧ R), P ⊢ P ∧ Q", steps).unwrap();
    assert!(!outcome.valid);
    // MP 2 + SP 1 + CJ 2 + SP 1
    assert_eq!(outcome.graph.edges.len(), 6);
    for edge in &outcome.graph.edges {
        assert_eq!(edge.valid, edge.to != 6, "{edge:?}");
    }
    assert!(!outcome.graph.node(6).unwrap().valid);
    assert!(outcome.graph.node(5).unwrap().valid);
}

#[test]
fn test_range_contributes_both_endpoints() {
    let outcome = check(RAA_SEQUENT, RAA_STEPS).unwrap();
    let into_six: Vec<_> = outcome.graph.edges_into(6).map(|e| e.from).collect();
    assert_eq!(into_six, vec![3, 5]);
    assert!(outcome.graph.node(3).unwrap().valid);
}

#[test]
fn test_lenient_and_strict_matching_differ() {
    // `(A ∧ B) ∧ C` and `A ∧ (B ∧ C)` only agree without parentheses
    let steps = "1. (A ∧ B) ∧ C (Hipótese)";
    assert!(check("A ∧ (B ∧ C) ⊢ (A ∧ B) ∧ C", steps).unwrap().valid);
    assert!(
        !Checker::default()
            .with_strict_matching()
            .check("A ∧ (B ∧ C) ⊢ (A ∧ B) ∧ C", steps)
            .unwrap()
            .valid
    );
}

#[test]
fn test_transcript_order() {
    let outcome = check("P → Q, P ⊢ Q", MP_STEPS).unwrap();
    let stages: Vec<_> = outcome.transcript.iter().map(|d| d.stage).collect();
    let mut sorted = stages.clone();
    sorted.sort_by_key(|s| *s as u8);
    assert_eq!(stages, sorted);
    assert_eq!(stages.first(), Some(&Stage::Parsing));
    assert_eq!(stages.last(), Some(&Stage::GraphBuild));
}

#[test]
fn test_proof_file() {
    let outcome = Checker::default()
        .check_file_contents(&format!("; modus ponens\nP → Q, P ⊢ Q\n{MP_STEPS}"))
        .unwrap();
    assert!(outcome.valid);
    assert_eq!(outcome.graph.nodes.len(), 3);
}
