//! Runs every stage of a proof check and records what happened.
//!
//! Only parsing can abort a run. Every later stage always runs and records
//! its successes and failures in the [`Transcript`]; the verdict is valid when
//! no stage recorded an error.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};


use crate::formula::Matching;
use crate::graph::{DependencyGraph, Relation, Renderer};
use crate::proof::{Justification, ParseError, Proof, StepId};
use crate::rules::{self, RuleError};
use crate::scope::{ScopeDiscipline, ScopeError, ScopeTracker};
use crate::util::{HashMap, QuotedList};
use crate::Error;

/// Knobs that change how strictly a proof is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckConfig {
    pub matching: Matching,
    pub scopes: ScopeDiscipline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Parsing,
    HypothesisCheck,
    RuleCheck,
    ConclusionCheck,
    GraphBuild,
    Render,
}

/// A failed check. Recorded in the transcript, never returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error("Error at step {step}: the hypothesis '{formula}' does not match any premise")]
    HypothesisMismatch { step: StepId, formula: String },
    #[error("Error: the conclusion '{conclusion}' was not derived by any step")]
    ConclusionMissing { conclusion: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Info(String),
    Warning(String),
    Error(CheckError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub step: Option<StepId>,
    pub message: Message,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self.message {
            Message::Info(_) => Severity::Info,
            Message::Warning(_) => Severity::Warning,
            Message::Error(_) => Severity::Error,
        }
    }

    pub fn error(&self) -> Option<&CheckError> {
        match &self.message {
            Message::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.message {
            Message::Info(text) => f.write_str(text),
            Message::Warning(text) => write!(f, "Warning: {text}"),
            Message::Error(err) => write!(f, "{err}"),
        }
    }
}

/// Everything the stages reported, in the order they reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<Diagnostic>,
}

impl Transcript {
    fn push(&mut self, stage: Stage, step: Option<StepId>, message: Message) {
        self.entries.push(Diagnostic {
            stage,
            step,
            message,
        });
    }

    fn info(&mut self, stage: Stage, step: Option<StepId>, text: impl Into<String>) {
        self.push(stage, step, Message::Info(text.into()));
    }

    fn warning(&mut self, stage: Stage, step: Option<StepId>, text: impl Into<String>) {
        self.push(stage, step, Message::Warning(text.into()));
    }

    fn error(&mut self, stage: Stage, step: Option<StepId>, err: impl Into<CheckError>) {
        self.push(stage, step, Message::Error(err.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CheckError> {
        self.entries.iter().filter_map(Diagnostic::error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }

    pub fn stage(&self, stage: Stage) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.stage == stage)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Display for Transcript {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// The result of checking a proof that parsed.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub valid: bool,
    pub transcript: Transcript,
    pub graph: DependencyGraph,
}

impl Outcome {
    /// Hands the graph to `renderer`. A failure is recorded as a warning and
    /// leaves the verdict alone.
    pub fn render(&mut self, renderer: &dyn Renderer) -> Option<PathBuf> {
        match renderer.render(&self.graph) {
            Ok(path) => {
                self.transcript.info(
                    Stage::Render,
                    None,
                    format!("Graph generated at {}.", path.display()),
                );
                Some(path)
            }
            Err(err) => {
                log::warn!("{err}");
                self.transcript.warning(Stage::Render, None, err.to_string());
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckConfig,
}

impl Checker {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn with_strict_matching(mut self) -> Self {
        self.config.matching = Matching::Strict;
        self
    }

    pub fn with_lexical_scopes(mut self) -> Self {
        self.config.scopes = ScopeDiscipline::Lexical;
        self
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Checks the steps against the sequent.
    pub fn check(&self, sequent: &str, steps: &str) -> Result<Outcome, ParseError> {
        let proof = Proof::parse(sequent, steps)?;
        Ok(self.check_proof(&proof))
    }

    /// Checks the contents of a proof file, see [`Proof::parse_file`].
    pub fn check_file_contents(&self, contents: &str) -> Result<Outcome, ParseError> {
        let proof = Proof::parse_file(contents)?;
        Ok(self.check_proof(&proof))
    }

    pub fn check_path(&self, path: &Path) -> Result<Outcome, Error> {
        let contents =
            std::fs::read_to_string(path).map_err(|err| Error::Io(path.to_path_buf(), err))?;
        Ok(self.check_file_contents(&contents)?)
    }

    pub fn check_proof(&self, proof: &Proof) -> Outcome {
        let mut run = Run::new(proof, self.config);
        run.parsed();
        run.check_hypotheses();
        run.check_rules();
        run.check_conclusions();
        run.finish()
    }
}

/// Checks a proof with the default configuration.
pub fn check(sequent: &str, steps: &str) -> Result<Outcome, ParseError> {
    Checker::default().check(sequent, steps)
}

struct Run<'a> {
    proof: &'a Proof,
    config: CheckConfig,
    transcript: Transcript,
    hypotheses: HashMap<StepId, bool>,
    relations: Vec<Relation>,
}

impl<'a> Run<'a> {
    fn new(proof: &'a Proof, config: CheckConfig) -> Self {
        Self {
            proof,
            config,
            transcript: Transcript::default(),
            hypotheses: HashMap::default(),
            relations: vec![],
        }
    }

    fn parsed(&mut self) {
        let premises: Vec<_> = self.proof.premises().iter().map(|p| &p.text).collect();
        let conclusions: Vec<_> = self.proof.conclusions().iter().map(|c| &c.text).collect();
        self.transcript.info(
            Stage::Parsing,
            None,
            format!("Premises: {}", QuotedList(&premises)),
        );
        self.transcript.info(
            Stage::Parsing,
            None,
            format!("Conclusion: {}", QuotedList(&conclusions)),
        );
        self.transcript.info(Stage::Parsing, None, "Steps detected:");
        for step in self.proof.steps.values() {
            self.transcript.info(
                Stage::Parsing,
                Some(step.number),
                format!("{}: {}", step.number, step.body),
            );
        }
        for &number in &self.proof.redefined {
            self.transcript.warning(
                Stage::Parsing,
                Some(number),
                format!("step {number} is defined more than once, the last definition is kept"),
            );
        }
    }

    fn check_hypotheses(&mut self) {
        let matching = self.config.matching;
        for step in self.proof.steps.values() {
            if step.justification != Justification::Hypothesis {
                continue;
            }
            let matched = self
                .proof
                .premises()
                .iter()
                .any(|p| matching.equal(&p.formula, &step.formula));
            self.hypotheses.insert(step.number, matched);
            if matched {
                self.transcript.info(
                    Stage::HypothesisCheck,
                    Some(step.number),
                    format!(
                        "Step {}: hypothesis '{}' matches a premise.",
                        step.number, step.formula_text
                    ),
                );
            } else {
                self.transcript.error(
                    Stage::HypothesisCheck,
                    Some(step.number),
                    CheckError::HypothesisMismatch {
                        step: step.number,
                        formula: step.formula_text.clone(),
                    },
                );
            }
        }
        log::info!(
            "{} of {} hypotheses match a premise",
            self.hypotheses.values().filter(|m| **m).count(),
            self.hypotheses.len()
        );
    }

    fn check_rules(&mut self) {
        let mut tracker = match self.config.scopes {
            ScopeDiscipline::Lexical => Some(ScopeTracker::new()),
            ScopeDiscipline::AtDischarge => None,
        };
        for step in self.proof.steps.values() {
            let scope_errors = match tracker.as_mut() {
                Some(tracker) => tracker.visit(self.proof, step),
                None => vec![],
            };
            let scoped_ok = scope_errors.is_empty();
            for err in scope_errors {
                self.transcript
                    .error(Stage::RuleCheck, Some(step.number), err);
            }

            let Some(citation) = step.citation() else {
                continue;
            };
            let result = rules::validate(self.proof, self.config.matching, step, citation);
            log::debug!("step {} {}: {:?}", step.number, citation, result);
            let valid = result.is_ok() && scoped_ok;
            match result {
                Ok(()) if scoped_ok => self.transcript.info(
                    Stage::RuleCheck,
                    Some(step.number),
                    format!(
                        "Step {} validated successfully using {}.",
                        step.number,
                        citation.rule.name()
                    ),
                ),
                Ok(()) => {}
                Err(err) => self
                    .transcript
                    .error(Stage::RuleCheck, Some(step.number), err),
            }
            self.relations.push(Relation {
                references: citation.cited_steps(),
                target: step.number,
                rule: citation.rule,
                valid,
            });
        }
        if let Some(tracker) = tracker {
            for err in tracker.finish() {
                let step = err.step();
                self.transcript.error(Stage::RuleCheck, Some(step), err);
            }
        }
        log::info!(
            "{} of {} rule citations are valid",
            self.relations.iter().filter(|r| r.valid).count(),
            self.relations.len()
        );
    }

    fn check_conclusions(&mut self) {
        let matching = self.config.matching;
        for conclusion in self.proof.conclusions() {
            let derived = self
                .proof
                .steps
                .values()
                .any(|step| matching.equal(&step.formula, &conclusion.formula));
            if derived {
                self.transcript.info(
                    Stage::ConclusionCheck,
                    None,
                    format!("Conclusion '{}' was derived correctly.", conclusion.text),
                );
            } else {
                self.transcript.error(
                    Stage::ConclusionCheck,
                    None,
                    CheckError::ConclusionMissing {
                        conclusion: conclusion.text.clone(),
                    },
                );
            }
        }
    }

    fn finish(mut self) -> Outcome {
        let graph = DependencyGraph::build(self.proof, &self.hypotheses, &self.relations);
        self.transcript.info(
            Stage::GraphBuild,
            None,
            format!(
                "Dependency graph built with {} nodes and {} edges.",
                graph.nodes.len(),
                graph.edges.len()
            ),
        );
        let valid = !self.transcript.has_errors();
        log::info!(
            "deduction is {}",
            if valid { "valid" } else { "invalid" }
        );
        Outcome {
            valid,
            transcript: self.transcript,
            graph,
        }
    }
}
