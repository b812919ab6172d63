/// Shape of one epoch as declared in the header.
///
/// Only `Step` is fully implemented by the synthesizer; `Ramp` and
/// `Unsupported` are filled identically to a step but stay
/// distinguishable for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpochKind {
    Off,
    Step,
    Ramp,
    /// Any type code we do not recognize.
    Unsupported(i16),
}

impl EpochKind {
    pub fn from_code(code: i16) -> Self {
        match code {
            0 => EpochKind::Off,
            1 => EpochKind::Step,
            2 => EpochKind::Ramp,
            other => EpochKind::Unsupported(other),
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            EpochKind::Off => 0,
            EpochKind::Step => 1,
            EpochKind::Ramp => 2,
            EpochKind::Unsupported(code) => *code,
        }
    }

    /// Name used by the text report. Unknown codes render as "N?".
    pub fn name(&self) -> String {
        match self {
            EpochKind::Off => "Off".into(),
            EpochKind::Step => "Step".into(),
            EpochKind::Ramp => "Ramp".into(),
            EpochKind::Unsupported(code) => format!("{code}?"),
        }
    }
}

/// One piecewise segment of the command signal within a sweep. Bounds are
/// half-open sample indices `[start_sample, end_sample)` and are fixed
/// once the timeline is built; `duration`/`duration_delta` are carried
/// from the header for reference only.
#[derive(Clone, Debug)]
pub struct Epoch {
    pub start_sample: usize,
    pub end_sample: usize,
    pub kind: EpochKind,
    /// Output level at sweep 0, in channel-native units.
    pub level: f64,
    /// Per-sweep increment added to `level`.
    pub level_delta: f64,
    /// Nominal length in samples at sweep 0.
    pub duration: usize,
    pub duration_delta: i64,
    pub pulse_period: usize,
    pub pulse_width: usize,
    /// Display token: "pre", "post", or a sequential letter.
    pub label: String,
}

impl Epoch {
    /// Level after applying the linear per-sweep drift.
    pub fn level_for_sweep(&self, sweep_index: usize) -> f64 {
        self.level + self.level_delta * sweep_index as f64
    }

    pub fn sample_count(&self) -> usize {
        self.end_sample.saturating_sub(self.start_sample)
    }
}
