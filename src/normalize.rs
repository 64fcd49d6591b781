//! Maps alternate input notations onto the canonical symbol set
//! `→ ∧ ∨ ¬ ⊢ ↔`.

pub const IMPLIES: char = '→';
pub const AND: char = '∧';
pub const OR: char = '∨';
pub const NOT: char = '¬';
pub const TURNSTILE: char = '⊢';
pub const IFF: char = '↔';

/// Escape sequences and digraphs, in replacement order.
///
/// `<->` must be replaced before `->`, otherwise the biconditional would be
/// left as `<→`.
const NOTATION_TABLE: &[(&str, &str)] = &[
    (r"\leftrightarrow", "↔"),
    (r"\rightarrow", "→"),
    (r"\land", "∧"),
    (r"\lor", "∨"),
    (r"\lnot", "¬"),
    (r"\neg", "¬"),
    (r"\vdash", "⊢"),
    (r"\wedge", "∧"),
    (r"\vee", "∨"),
    (r"\to", "→"),
    ("<->", "↔"),
    ("->", "→"),
    ("|-", "⊢"),
];

/// Rewrites LaTeX escapes and ASCII digraphs into canonical symbols and drops
/// the `\(` / `\)` math delimiters.
///
/// Already canonical text comes back unchanged apart from trimming, so
/// normalizing twice is the same as normalizing once.
pub fn normalize_notation(input: &str) -> String {
    let mut text = input.to_string();
    while text.contains(r"\(") || text.contains(r"\)") {
        text = text.replace(r"\(", "").replace(r"\)", "");
    }
    for (from, to) in NOTATION_TABLE {
        if text.contains(from) {
            text = text.replace(from, to);
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latex_table() {
        assert_eq!(
            normalize_notation(r"P \rightarrow Q, \neg Q \vdash \neg P"),
            "P → Q, ¬ Q ⊢ ¬ P"
        );
        assert_eq!(normalize_notation(r"\(A \land B\)"), "A ∧ B");
        assert_eq!(normalize_notation(r"A \lor B \leftrightarrow C"), "A ∨ B ↔ C");
    }

    #[test]
    fn ascii_digraphs() {
        assert_eq!(normalize_notation("P -> Q |- Q <-> P"), "P → Q ⊢ Q ↔ P");
    }

    #[test]
    fn canonical_input_is_untouched() {
        let text = "(P ∧ ¬Q) ↔ R ⊢ R";
        assert_eq!(normalize_notation(text), text);
    }

    #[test]
    fn idempotent() {
        for text in [
            r"\negP \lor Q \vdash P \rightarrow Q",
            "  P v Q ->R ",
            r"\(\neg(A \land B)\) |- \neg A \lor \neg B",
            "1. P → Q vE(1,2,3)",
        ] {
            let once = normalize_notation(text);
            assert_eq!(normalize_notation(&once), once);
        }
    }

    #[test]
    fn keeps_rule_names() {
        // `v` is only a disjunction inside formulas, never here
        assert_eq!(normalize_notation("4. R vE(1,2,3)"), "4. R vE(1,2,3)");
    }
}
