//! Run report

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::cases::{Case, CaseOutcome};

/// Verdict and timing of one executed case
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub case: Case,
    pub outcome: CaseOutcome,
    pub elapsed: Duration,
}

/// Results of a full run, in execution order
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub results: Vec<CaseResult>,
}

impl RunReport {
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            results: Vec::with_capacity(Case::ALL.len()),
        }
    }

    pub fn push(&mut self, result: CaseResult) {
        self.results.push(result);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    #[must_use]
    pub fn outcome_of(&self, case: Case) -> Option<&CaseOutcome> {
        self.results
            .iter()
            .find(|r| r.case == case)
            .map(|r| &r.outcome)
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(CaseOutcome::is_passed)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(CaseOutcome::is_failed)
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(CaseOutcome::is_skipped)
    }

    /// True when no case failed. Skipped cases only follow a failure.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: fn(&CaseOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }

    /// Log one line per failed or skipped case and a closing summary
    pub fn log_summary(&self) {
        for result in &self.results {
            match &result.outcome {
                CaseOutcome::Failed(reason) => {
                    error!(case = %result.case, reason = %reason, "Test failed");
                }
                CaseOutcome::Skipped(reason) => {
                    warn!(case = %result.case, reason = %reason, "Test skipped");
                }
                CaseOutcome::Passed(_) => {}
            }
        }

        let duration_ms = self
            .finished_at
            .map(|end| (end - self.started_at).num_milliseconds());

        info!(
            passed = self.passed(),
            failed = self.failed(),
            skipped = self.skipped(),
            duration_ms,
            "Test suite execution completed"
        );
    }
}
