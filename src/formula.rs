//! Propositional formulas and the equality relation used by every rule.
//!
//! Formulas are parsed by repeatedly splitting the text at the first
//! top-level occurrence of the loosest connective, so each binary connective
//! associates to the right and `¬` binds tighter than all of them.
//!
//! Two equality relations are available through [`Matching`]. The lenient one
//! compares token streams with every parenthesis removed, which means that
//! `(A∧B)∨C` and `A∧(B∨C)` are considered equal. Proofs written against the
//! lenient checker rely on this, so it stays the default; the strict relation
//! compares the trees themselves.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use crate::normalize::{self, AND, IFF, IMPLIES, NOT, OR};
use crate::Symbol;

/// ASCII stand-in for [`OR`] accepted inside formulas.
pub const ASCII_OR: char = 'v';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
    Implies,
    Iff,
}

impl Connective {
    /// Loosest binding first. This is the order in which the parser looks for
    /// a top-level split.
    pub const LOOSEST_FIRST: [Connective; 4] = [
        Connective::Iff,
        Connective::Implies,
        Connective::Or,
        Connective::And,
    ];

    pub fn symbol(self) -> char {
        match self {
            Connective::And => AND,
            Connective::Or => OR,
            Connective::Implies => IMPLIES,
            Connective::Iff => IFF,
        }
    }

    fn matches(self, c: char) -> bool {
        c == self.symbol() || (self == Connective::Or && c == ASCII_OR)
    }
}

impl Display for Connective {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    Atom(Symbol),
    Not(Box<Formula>),
    Binary(Connective, Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn atom(name: &str) -> Self {
        Formula::Atom(Symbol::from(name))
    }

    pub fn not(inner: Formula) -> Self {
        Formula::Not(Box::new(inner))
    }

    pub fn binary(connective: Connective, lhs: Formula, rhs: Formula) -> Self {
        Formula::Binary(connective, Box::new(lhs), Box::new(rhs))
    }

    pub fn and(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(Connective::And, lhs, rhs)
    }

    pub fn or(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(Connective::Or, lhs, rhs)
    }

    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(Connective::Implies, lhs, rhs)
    }

    pub fn iff(lhs: Formula, rhs: Formula) -> Self {
        Self::binary(Connective::Iff, lhs, rhs)
    }

    pub fn parse(text: &str) -> Result<Formula, FormulaError> {
        let prepared = prepare(text);
        check_balanced(&prepared)?;
        parse_prepared(&prepared)
    }

    /// The main connective, if the formula is binary.
    pub fn connective(&self) -> Option<Connective> {
        match self {
            Formula::Binary(c, _, _) => Some(*c),
            _ => None,
        }
    }

    /// The two operands of the formula if its main connective is `connective`.
    pub fn split(&self, connective: Connective) -> Option<(&Formula, &Formula)> {
        match self {
            Formula::Binary(c, lhs, rhs) if *c == connective => Some((lhs, rhs)),
            _ => None,
        }
    }

    /// The formula under a leading `¬`.
    pub fn negated(&self) -> Option<&Formula> {
        match self {
            Formula::Not(inner) => Some(inner),
            _ => None,
        }
    }

    /// Flattens a chain of `connective` into its operands, left to right.
    /// A formula whose main connective differs is a chain of one.
    pub fn operands(&self, connective: Connective) -> Vec<&Formula> {
        let mut out = vec![];
        self.collect_operands(connective, &mut out);
        out
    }

    fn collect_operands<'a>(&'a self, connective: Connective, out: &mut Vec<&'a Formula>) {
        match self.split(connective) {
            Some((lhs, rhs)) => {
                lhs.collect_operands(connective, out);
                rhs.collect_operands(connective, out);
            }
            None => out.push(self),
        }
    }

    /// Removes every `¬¬` pair.
    pub fn collapse_double_negation(&self) -> Formula {
        match self {
            Formula::Atom(_) => self.clone(),
            Formula::Not(inner) => match inner.as_ref() {
                Formula::Not(x) => x.collapse_double_negation(),
                _ => Formula::not(inner.collapse_double_negation()),
            },
            Formula::Binary(c, lhs, rhs) => Formula::binary(
                *c,
                lhs.collapse_double_negation(),
                rhs.collapse_double_negation(),
            ),
        }
    }

    /// The symbols of the formula in order, without parentheses or spaces.
    pub fn token_stream(&self) -> String {
        let mut out = String::new();
        self.write_tokens(&mut out);
        out
    }

    fn write_tokens(&self, out: &mut String) {
        match self {
            Formula::Atom(name) => out.push_str(name.as_str()),
            Formula::Not(inner) => {
                out.push(NOT);
                inner.write_tokens(out);
            }
            Formula::Binary(c, lhs, rhs) => {
                lhs.write_tokens(out);
                out.push(c.symbol());
                rhs.write_tokens(out);
            }
        }
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(name) => write!(f, "{name}"),
            Formula::Not(inner) => {
                write!(f, "{NOT}")?;
                fmt_operand(inner, f)
            }
            Formula::Binary(c, lhs, rhs) => {
                fmt_operand(lhs, f)?;
                write!(f, " {c} ")?;
                fmt_operand(rhs, f)
            }
        }
    }
}

fn fmt_operand(formula: &Formula, f: &mut Formatter<'_>) -> fmt::Result {
    match formula {
        Formula::Binary(..) => write!(f, "({formula})"),
        _ => write!(f, "{formula}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("empty formula")]
    Empty,
    #[error("unbalanced parentheses in '{0}'")]
    UnbalancedParens(String),
    #[error("connective {connective} is missing an operand in '{formula}'")]
    MissingOperand {
        connective: Connective,
        formula: String,
    },
    #[error("'{0}' is not a valid proposition")]
    InvalidAtom(String),
}

/// Which equality relation the rules use to compare formulas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Matching {
    /// Token streams with all parentheses removed.
    #[default]
    Lenient,
    /// Syntax trees.
    Strict,
}

impl Matching {
    pub fn equal(self, a: &Formula, b: &Formula) -> bool {
        match self {
            Matching::Lenient => a.token_stream() == b.token_stream(),
            Matching::Strict => a == b,
        }
    }
}

/// The token stream of raw formula text: notation normalized, `v` read as
/// `∨`, whitespace and parentheses dropped.
pub fn canonical_tokens(text: &str) -> String {
    normalize::normalize_notation(text)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
        .map(|c| if c == ASCII_OR { OR } else { c })
        .collect()
}

/// Lenient equality on raw text.
pub fn structurally_equal(a: &str, b: &str) -> bool {
    canonical_tokens(a) == canonical_tokens(b)
}

/// Splits `text` at the first occurrence of `connective` outside of any
/// parentheses. Both halves are trimmed.
pub fn split_top_level(text: &str, connective: Connective) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && connective.matches(c) => {
                let rhs = &text[i + c.len_utf8()..];
                return Some((text[..i].trim(), rhs.trim()));
            }
            _ => {}
        }
    }
    None
}

fn prepare(text: &str) -> String {
    normalize::normalize_notation(text)
        .chars()
        .filter(|c| *c != '"')
        .map(|c| if c == ASCII_OR { OR } else { c })
        .collect()
}

fn check_balanced(text: &str) -> Result<(), FormulaError> {
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err(FormulaError::UnbalancedParens(text.to_string()));
        }
    }
    if depth != 0 {
        return Err(FormulaError::UnbalancedParens(text.to_string()));
    }
    Ok(())
}

/// Byte offset of the parenthesis closing the one at the start of `text`.
fn matching_close(text: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_enclosing_parens(mut text: &str) -> &str {
    while text.starts_with('(') && matching_close(text) == Some(text.len() - 1) {
        text = text[1..text.len() - 1].trim();
    }
    text
}

fn parse_prepared(text: &str) -> Result<Formula, FormulaError> {
    let text = strip_enclosing_parens(text.trim());
    if text.is_empty() {
        return Err(FormulaError::Empty);
    }
    for connective in Connective::LOOSEST_FIRST {
        if let Some((lhs, rhs)) = split_top_level(text, connective) {
            if lhs.is_empty() || rhs.is_empty() {
                return Err(FormulaError::MissingOperand {
                    connective,
                    formula: text.to_string(),
                });
            }
            return Ok(Formula::binary(
                connective,
                parse_prepared(lhs)?,
                parse_prepared(rhs)?,
            ));
        }
    }
    if let Some(rest) = text.strip_prefix(NOT) {
        return Ok(Formula::not(parse_prepared(rest)?));
    }
    if text.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '\'') {
        Ok(Formula::atom(text))
    } else {
        Err(FormulaError::InvalidAtom(text.to_string()))
    }
}
