use std::fmt;

use log::warn;

/// Non-fatal condition observed while building a timeline or synthesizing
/// a waveform. None of these abort construction; each has a documented
/// fallback (step behavior, clamped range).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// Legacy-format headers carry no epoch table, so the timeline is a
    /// lossy approximation: one step epoch spanning the whole sweep.
    LegacyEpochApproximation,
    /// Epoch type code outside the known set; synthesized as a step.
    UnsupportedEpochKind { code: i16, index: usize },
    /// An epoch's end bound ran past the sweep and the fill range was
    /// clamped. Seen when a recording was truncated relative to the
    /// declared protocol.
    SweepShorterThanExpected {
        epoch: usize,
        end_sample: usize,
        sweep_sample_count: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LegacyEpochApproximation => {
                write!(f, "legacy-format epoch synthesis not fully supported; approximating with a single step epoch")
            }
            Diagnostic::UnsupportedEpochKind { code, index } => {
                write!(f, "unsupported epoch type {code} at epoch {index} (treating as a step)")
            }
            Diagnostic::SweepShorterThanExpected {
                epoch,
                end_sample,
                sweep_sample_count,
            } => {
                write!(
                    f,
                    "sweep length is shorter than expected: epoch {epoch} ends at sample {end_sample}, sweep has {sweep_sample_count}"
                )
            }
        }
    }
}

/// Ordered collector for non-fatal diagnostics. Everything recorded here
/// is also forwarded to the `log` facade at warn level, so callers can
/// either assert on the collected list or just watch the logs.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    items: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
