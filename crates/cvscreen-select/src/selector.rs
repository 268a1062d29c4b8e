use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use cvscreen_core::traits::Embedder;
use cvscreen_core::types::{BatchReport, Decision, DocumentRef, SelectionOutcome};
use cvscreen_core::{Error, Result};
use cvscreen_extract::{extract_text, list_candidates};

use crate::similarity::{is_selected, score};

#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    /// Inclusive minimum score.
    pub threshold: i32,
    /// Selected files are copied here under their original names.
    pub destination: PathBuf,
    pub show_progress: bool,
}

/// Scores candidates against one job description with an injected embedder.
pub struct Selector<'a> {
    embedder: &'a dyn Embedder,
    policy: SelectionPolicy,
}

impl<'a> Selector<'a> {
    pub fn new(embedder: &'a dyn Embedder, policy: SelectionPolicy) -> Self { Self { embedder, policy } }

    /// Extract and embed one document.
    pub fn embed_document(&self, doc: &DocumentRef) -> Result<Vec<f32>> {
        // PDF parsing runs on untrusted input; a parser panic is a bad document, not a crash.
        let text = catch_unwind(AssertUnwindSafe(|| extract_text(doc)))
            .unwrap_or_else(|_| Err(Error::format(doc.path(), "parser panicked")))?;
        self.embedder.embed_text(&text)
    }

    /// Score one candidate against an already-embedded job description. No side effects.
    pub fn evaluate(&self, job_vector: &[f32], candidate: &DocumentRef) -> Result<i32> {
        let resume_vector = self.embed_document(candidate)?;
        score(&resume_vector, job_vector)
    }

    /// Evaluate every candidate and copy the ones that pass.
    ///
    /// Embedding the job description and creating the destination are setup
    /// steps: their errors are returned before any candidate is touched. Errors
    /// for an individual candidate become an `Errored` outcome instead.
    pub fn run(&self, job: &DocumentRef, candidates: &[DocumentRef]) -> Result<BatchReport> {
        let job_vector = self.embed_document(job)?;
        tracing::info!(
            "📋 Job description {} embedded with {} (dim={}, max_len={})",
            job.name(),
            self.embedder.model_id(),
            job_vector.len(),
            self.embedder.max_len()
        );

        let destination = &self.policy.destination;
        fs::create_dir_all(destination).map_err(|e| Error::io(destination, e))?;

        let pb = self.progress_bar(candidates.len());
        let mut report = BatchReport::default();
        for candidate in candidates {
            pb.set_message(candidate.name());
            report.record(self.process(&job_vector, candidate));
            pb.inc(1);
        }
        pb.finish_and_clear();

        report.destination_total = count_files(destination).unwrap_or_else(|e| {
            tracing::warn!("⚠️  Could not count files in destination: {}", e);
            0
        });
        tracing::info!(
            "📊 {} selected this run ({} rejected, {} errored) out of {} candidates",
            report.selected,
            report.rejected,
            report.errored,
            candidates.len()
        );
        tracing::info!("📁 {} CVs are stored in {}", report.destination_total, destination.display());
        Ok(report)
    }

    fn process(&self, job_vector: &[f32], candidate: &DocumentRef) -> SelectionOutcome {
        let name = candidate.name();
        tracing::info!("📄 {} is under processing...", name);

        let score = match self.evaluate(job_vector, candidate) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!("⚠️  Something went wrong with {}, skipping: {}", name, e);
                return SelectionOutcome::errored(candidate.clone(), None, &e);
            }
        };

        if !is_selected(score, self.policy.threshold) {
            tracing::info!("❌ {} rejected (score {} < {})", name, score, self.policy.threshold);
            return SelectionOutcome::scored(candidate.clone(), score, Decision::Rejected);
        }

        match self.copy_to_destination(candidate) {
            Ok(target) => {
                tracing::info!("✅ {} selected (score {}) -> {}", name, score, target.display());
                SelectionOutcome::scored(candidate.clone(), score, Decision::Selected)
            }
            Err(e) => {
                tracing::warn!("⚠️  {} passed with score {} but could not be copied: {}", name, score, e);
                SelectionOutcome::errored(candidate.clone(), Some(score), &e)
            }
        }
    }

    fn copy_to_destination(&self, candidate: &DocumentRef) -> Result<PathBuf> {
        let file_name = candidate.path().file_name().ok_or_else(|| {
            Error::io(candidate.path(), std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"))
        })?;
        let target = self.policy.destination.join(file_name);
        if is_same_file(candidate.path(), &target) {
            return Ok(target);
        }
        fs::copy(candidate.path(), &target).map_err(|e| Error::io(&target, e))?;
        Ok(target)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.policy.show_progress { return ProgressBar::hidden(); }
        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} CVs {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }
}

// copying a file onto itself would truncate it
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn count_files(dir: &Path) -> Result<usize> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut count = 0;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) { count += 1; }
    }
    Ok(count)
}

/// List `candidates_dir` and run the batch for `job_path`.
pub fn select_applicants(
    embedder: &dyn Embedder,
    job_path: &Path,
    candidates_dir: &Path,
    policy: SelectionPolicy,
) -> Result<BatchReport> {
    let candidates = list_candidates(candidates_dir)?;
    tracing::info!("🔎 Screening {} candidates from {}", candidates.len(), candidates_dir.display());
    Selector::new(embedder, policy).run(&DocumentRef::job(job_path), &candidates)
}
