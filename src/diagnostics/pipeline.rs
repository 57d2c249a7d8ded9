//! Timed diagnostics run: fixed phases, then a revealed verdict.

use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::info;

use super::verdict::{DiagnosticRequest, Verdict};

/// One step of the progress animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    /// Stable key.
    pub key: &'static str,
    /// Label shown while the phase runs.
    pub label: &'static str,
    /// How long the phase lasts.
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

const PHASE_LABELS: [(&str, &str); 5] = [
    ("upload", "Uploading sensor log"),
    ("extract", "Extracting gas and thermal signatures"),
    ("correlate", "Correlating load, temperature and gas trends"),
    ("infer", "Running fault classifier"),
    ("report", "Compiling diagnostic report"),
];

/// The standard phase list, each lasting `phase`.
pub fn standard_phases(phase: Duration) -> Vec<Phase> {
    PHASE_LABELS
        .iter()
        .map(|&(key, label)| Phase {
            key,
            label,
            duration: phase,
        })
        .collect()
}

/// Where a run stands at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// Index of the active phase (last index once complete).
    pub phase_index: usize,
    /// Label of the active phase.
    pub phase_label: &'static str,
    /// Overall completion, 0.0–1.0.
    pub fraction: f32,
    /// Whether every phase has elapsed.
    pub complete: bool,
}

/// A diagnostics run started at a fixed instant.
///
/// The verdict is drawn at start but only returned once all phases have
/// elapsed.
#[derive(Debug, Clone)]
pub struct DiagnosticsRun {
    request: DiagnosticRequest,
    phases: Vec<Phase>,
    started: Instant,
    verdict: Verdict,
}

impl DiagnosticsRun {
    /// Starts a run with a seeded verdict.
    pub fn start(request: DiagnosticRequest, phases: Vec<Phase>, seed: u64, now: Instant) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let verdict = Verdict::generate(&request, &mut rng);
        info!(
            asset = %request.asset_id,
            file = %request.file_name,
            phases = phases.len(),
            "diagnostics run started"
        );
        Self {
            request,
            phases,
            started: now,
            verdict,
        }
    }

    /// The request being diagnosed.
    pub fn request(&self) -> &DiagnosticRequest {
        &self.request
    }

    /// Phase list.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Sum of all phase durations.
    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }

    /// Progress at `now`.
    pub fn progress(&self, now: Instant) -> Progress {
        let elapsed = now.saturating_duration_since(self.started);
        let total = self.total_duration();
        if elapsed >= total || self.phases.is_empty() {
            return Progress {
                phase_index: self.phases.len().saturating_sub(1),
                phase_label: self.phases.last().map_or("", |p| p.label),
                fraction: 1.0,
                complete: true,
            };
        }

        let mut acc = Duration::ZERO;
        let mut index = 0;
        for (i, p) in self.phases.iter().enumerate() {
            acc += p.duration;
            if elapsed < acc {
                index = i;
                break;
            }
        }
        Progress {
            phase_index: index,
            phase_label: self.phases[index].label,
            fraction: elapsed.as_secs_f32() / total.as_secs_f32(),
            complete: false,
        }
    }

    /// The verdict, once every phase has elapsed.
    pub fn verdict(&self, now: Instant) -> Option<&Verdict> {
        self.progress(now).complete.then_some(&self.verdict)
    }

    /// The verdict regardless of timing, for non-interactive callers.
    pub fn into_verdict(self) -> Verdict {
        self.verdict
    }
}
