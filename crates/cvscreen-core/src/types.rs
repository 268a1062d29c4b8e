//! Domain types shared by the extraction, embedding and selection crates.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentKind {
    /// Plain-text reference document every candidate is compared against.
    JobDescription,
    /// Paginated (PDF) candidate document.
    Resume,
}

/// A document location plus its kind. Fields are private so a reference
/// cannot change once handed to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRef {
    path: PathBuf,
    kind: DocumentKind,
}

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>, kind: DocumentKind) -> Self {
        Self { path: path.into(), kind }
    }

    pub fn job(path: impl Into<PathBuf>) -> Self { Self::new(path, DocumentKind::JobDescription) }

    pub fn resume(path: impl Into<PathBuf>) -> Self { Self::new(path, DocumentKind::Resume) }

    pub fn path(&self) -> &Path { &self.path }

    pub fn kind(&self) -> DocumentKind { self.kind }

    /// File name used in log lines and as the copy target name.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Decision {
    Selected,
    Rejected,
    Errored,
}

/// Why a candidate ended up `Errored`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Self { kind: err.kind(), message: err.to_string() }
    }
}

/// Result of evaluating one candidate.
///
/// `score` is `None` when extraction, embedding or scoring failed. It is
/// `Some` with an `Errored` decision when only the copy step failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub candidate: DocumentRef,
    pub score: Option<i32>,
    pub decision: Decision,
    pub failure: Option<Failure>,
}

impl SelectionOutcome {
    pub fn scored(candidate: DocumentRef, score: i32, decision: Decision) -> Self {
        Self { candidate, score: Some(score), decision, failure: None }
    }

    pub fn errored(candidate: DocumentRef, score: Option<i32>, err: &Error) -> Self {
        Self { candidate, score, decision: Decision::Errored, failure: Some(Failure::from(err)) }
    }
}

/// Everything one batch run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<SelectionOutcome>,
    /// Candidates selected during this run.
    pub selected: usize,
    pub rejected: usize,
    pub errored: usize,
    /// Files present in the destination after the run, including any that
    /// were there before it started.
    pub destination_total: usize,
}

impl BatchReport {
    pub fn record(&mut self, outcome: SelectionOutcome) {
        match outcome.decision {
            Decision::Selected => self.selected += 1,
            Decision::Rejected => self.rejected += 1,
            Decision::Errored => self.errored += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn outcome_for(&self, name: &str) -> Option<&SelectionOutcome> {
        self.outcomes.iter().find(|o| o.candidate.name() == name)
    }
}
