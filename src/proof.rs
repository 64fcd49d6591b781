//! Parse a sequent and a list of numbered steps into a [`Proof`].
//!
//! The sequent is `premise, premise, ... ⊢ conclusion, ...`. Every non-blank
//! step line is `<number>.<formula> <justification>`, where the justification
//! is one of `(Hipótese)`, `(Hip-PC)`, `(Hip-RAA)` or `RULE(args)`.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::formula::{Formula, FormulaError};
use crate::normalize::{normalize_notation, TURNSTILE};
use crate::rules::{Rule, MARKERS_LONGEST_FIRST};
use crate::util::{IndexMap, ListDisplay};

pub type StepId = u32;

/// Markers accepted for a plain hypothesis, compared case-insensitively.
const HYPOTHESIS_MARKERS: &[&str] = &["hipótese", "hipotese", "premissa"];

/// The two kinds of sub-proof a scoped hypothesis can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Conditional proof, discharged by PC.
    Conditional,
    /// Indirect proof, discharged by RAA.
    Indirect,
}

impl ScopeKind {
    pub fn marker(self) -> &'static str {
        match self {
            ScopeKind::Conditional => "Hip-PC",
            ScopeKind::Indirect => "Hip-RAA",
        }
    }

    /// The rule that closes a scope of this kind.
    pub fn rule(self) -> Rule {
        match self {
            ScopeKind::Conditional => Rule::ConditionalProof,
            ScopeKind::Indirect => Rule::ReductioAdAbsurdum,
        }
    }

    fn from_marker(marker: &str) -> Option<ScopeKind> {
        [ScopeKind::Conditional, ScopeKind::Indirect]
            .into_iter()
            .find(|kind| kind.marker().eq_ignore_ascii_case(marker))
    }
}

impl Display for ScopeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// One argument of a rule citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Step(StepId),
    /// `start-end`, used by the scoped rules.
    Range(StepId, StepId),
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Step(n) => write!(f, "{n}"),
            Reference::Range(start, end) => write!(f, "{start}-{end}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub rule: Rule,
    pub references: Vec<Reference>,
}

impl Citation {
    /// Every step number the citation mentions. A range contributes its two
    /// endpoints.
    pub fn cited_steps(&self) -> Vec<StepId> {
        self.references
            .iter()
            .flat_map(|r| match *r {
                Reference::Step(n) => vec![n],
                Reference::Range(start, end) => vec![start, end],
            })
            .collect()
    }
}

impl Display for Citation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.rule, ListDisplay(&self.references, ","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Justification {
    Hypothesis,
    ScopedHypothesis(ScopeKind),
    Citation(Citation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStep {
    pub number: StepId,
    /// Everything after the step number, trimmed.
    pub body: String,
    /// The formula part of the body. Outer quotes are kept.
    pub formula_text: String,
    pub formula: Formula,
    pub justification: Justification,
}

impl ProofStep {
    pub fn citation(&self) -> Option<&Citation> {
        match &self.justification {
            Justification::Citation(c) => Some(c),
            _ => None,
        }
    }

    pub fn scope_kind(&self) -> Option<ScopeKind> {
        match self.justification {
            Justification::ScopedHypothesis(kind) => Some(kind),
            _ => None,
        }
    }
}

/// A premise or conclusion as written, together with its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declared {
    pub text: String,
    pub formula: Formula,
}

impl Display for Declared {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequent {
    pub premises: Vec<Declared>,
    /// Never empty when parsed.
    pub conclusions: Vec<Declared>,
}

impl Sequent {
    pub fn parse(input: &str) -> Result<Sequent, ParseError> {
        let input = normalize_notation(input);
        let (premises, conclusions) = match input.matches(TURNSTILE).count() {
            0 => return Err(ParseError::MissingTurnstile),
            1 => input
                .split_once(TURNSTILE)
                .ok_or(ParseError::MissingTurnstile)?,
            n => return Err(ParseError::MultipleTurnstiles(n)),
        };

        let premises = premises
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| declared(p, "premise"))
            .collect::<Result<Vec<_>, _>>()?;
        let conclusions = conclusions
            .split(',')
            .map(str::trim)
            .map(|c| {
                if c.is_empty() {
                    Err(ParseError::EmptyConclusion)
                } else {
                    declared(c, "conclusion")
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Sequent {
            premises,
            conclusions,
        })
    }

    /// The conclusion an indirect proof discharges into, `None` only for a
    /// sequent built by hand without conclusions.
    pub fn main_conclusion(&self) -> Option<&Declared> {
        self.conclusions.first()
    }
}

fn declared(text: &str, what: &str) -> Result<Declared, ParseError> {
    let formula = Formula::parse(text).map_err(|source| ParseError::Formula {
        context: format!("{what} '{text}'"),
        source,
    })?;
    Ok(Declared {
        text: text.to_string(),
        formula,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub sequent: Sequent,
    /// Steps in the order they were written. A redefined step keeps the
    /// position of its first definition.
    pub steps: IndexMap<StepId, ProofStep>,
    /// Step numbers that were defined more than once.
    pub redefined: Vec<StepId>,
}

impl Proof {
    pub fn parse(sequent: &str, steps: &str) -> Result<Proof, ParseError> {
        let sequent = Sequent::parse(sequent)?;
        Proof::parse_lines(sequent, steps.lines().enumerate().map(|(i, line)| (i + 1, line)))
    }

    /// Parses a proof file: the sequent is the first line that is neither
    /// blank nor a `;` comment, the steps follow it. Errors carry line
    /// numbers of the file itself.
    pub fn parse_file(contents: &str) -> Result<Proof, ParseError> {
        let mut lines = contents
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim_start().starts_with(';'));
        let (_, sequent) = lines
            .by_ref()
            .find(|(_, line)| !line.trim().is_empty())
            .ok_or(ParseError::MissingTurnstile)?;
        let sequent = Sequent::parse(sequent)?;
        Proof::parse_lines(sequent, lines)
    }

    /// Each line is normalized on its own so `line_no` stays the number the
    /// caller gave it.
    fn parse_lines<'a>(
        sequent: Sequent,
        lines: impl Iterator<Item = (usize, &'a str)>,
    ) -> Result<Proof, ParseError> {
        let mut steps = IndexMap::default();
        let mut redefined = vec![];
        for (line_no, line) in lines {
            let line = normalize_notation(line);
            if line.is_empty() {
                continue;
            }
            let step = parse_step_line(line_no, &line)?;
            let number = step.number;
            if steps.insert(number, step).is_some() {
                log::warn!("step {number} is defined more than once, keeping the last definition");
                redefined.push(number);
            }
        }
        Ok(Proof {
            sequent,
            steps,
            redefined,
        })
    }

    pub fn step(&self, number: StepId) -> Option<&ProofStep> {
        self.steps.get(&number)
    }

    pub fn premises(&self) -> &[Declared] {
        &self.sequent.premises
    }

    pub fn conclusions(&self) -> &[Declared] {
        &self.sequent.conclusions
    }
}

fn parse_step_line(line_no: usize, line: &str) -> Result<ProofStep, ParseError> {
    let Some((number, body)) = line.split_once('.') else {
        return Err(ParseError::MalformedStepLine {
            line: line_no,
            text: line.trim().to_string(),
        });
    };
    let number = number.trim();
    let invalid_number = || ParseError::InvalidStepNumber {
        line: line_no,
        found: number.to_string(),
    };
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_number());
    }
    let number: StepId = number.parse().map_err(|_| invalid_number())?;
    if number == 0 {
        return Err(invalid_number());
    }

    let body = body.trim();
    let (formula_part, justification) = split_justification(number, body)?;
    let formula_text = clean_quotes(formula_part);
    let formula = Formula::parse(&formula_text).map_err(|source| ParseError::Formula {
        context: format!("step {number}"),
        source,
    })?;
    Ok(ProofStep {
        number,
        body: body.to_string(),
        formula_text,
        formula,
        justification,
    })
}

/// Byte offset of the `(` matching the `)` that ends `text`.
fn matching_open(text: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in text.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
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

/// Splits a step body into its formula text and its justification.
fn split_justification(step: StepId, body: &str) -> Result<(&str, Justification), ParseError> {
    let missing = || ParseError::MissingJustification { step };
    if !body.ends_with(')') {
        return Err(missing());
    }
    let open = matching_open(body).ok_or_else(missing)?;
    let head = body[..open].trim_end();
    let inner = body[open + 1..body.len() - 1].trim();

    if HYPOTHESIS_MARKERS
        .iter()
        .any(|m| inner.to_lowercase() == *m)
    {
        return Ok((head, Justification::Hypothesis));
    }
    if let Some(kind) = ScopeKind::from_marker(inner) {
        return Ok((head, Justification::ScopedHypothesis(kind)));
    }

    // `(MP(1,2))`
    if inner.ends_with(')') {
        if let Some(inner_open) = matching_open(inner) {
            if let Some(rule) = Rule::from_marker(inner[..inner_open].trim()) {
                let args = &inner[inner_open + 1..inner.len() - 1];
                let references = parse_references(step, args)?;
                return Ok((head, Justification::Citation(Citation { rule, references })));
            }
        }
    }

    // `MP(1,2)`
    for (marker, rule) in MARKERS_LONGEST_FIRST.iter() {
        if let Some(formula) = head.strip_suffix(marker) {
            let references = parse_references(step, inner)?;
            return Ok((
                formula,
                Justification::Citation(Citation {
                    rule: *rule,
                    references,
                }),
            ));
        }
    }
    Err(missing())
}

fn parse_references(step: StepId, args: &str) -> Result<Vec<Reference>, ParseError> {
    let malformed = || ParseError::MalformedJustification {
        step,
        text: args.trim().to_string(),
    };
    let number = |s: &str| -> Result<StepId, ParseError> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        s.parse().map_err(|_| malformed())
    };
    args.split(',')
        .map(|arg| match arg.split_once('-') {
            Some((start, end)) => Ok(Reference::Range(number(start)?, number(end)?)),
            None => Ok(Reference::Step(number(arg)?)),
        })
        .collect()
}

/// Keeps surrounding quotes and drops any quote inside them.
fn clean_quotes(text: &str) -> String {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        format!("\"{}\"", text[1..text.len() - 1].replace('"', ""))
    } else {
        text.replace('"', "")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("the input must contain the symbol '⊢' to separate premises and conclusion")]
    MissingTurnstile,
    #[error("the input must contain exactly one '⊢', found {0}")]
    MultipleTurnstiles(usize),
    #[error("the conclusion list contains an empty entry")]
    EmptyConclusion,
    #[error("line {line}: each step must contain a '.' separating the step number from its content: {text}")]
    MalformedStepLine { line: usize, text: String },
    #[error("line {line}: the step number '{found}' is not valid")]
    InvalidStepNumber { line: usize, found: String },
    #[error("step {step}: no justification found, expected e.g. `(Hipótese)`, `(Hip-PC)` or `MP(1,2)`")]
    MissingJustification { step: StepId },
    #[error("step {step}: malformed justification arguments '{text}'")]
    MalformedJustification { step: StepId, text: String },
    #[error("{context}: {source}")]
    Formula {
        context: String,
        #[source]
        source: FormulaError,
    },
}
