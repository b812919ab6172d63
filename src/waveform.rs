use ndarray::{s, Array1};

use crate::diag::{Diagnostic, DiagnosticSink};
use crate::epoch::EpochKind;
use crate::error::EpochError;
use crate::header::RecordingHeader;
use crate::timeline::Timeline;

impl Timeline {
    /// Synthesize the command waveform this channel's DAC emits during
    /// sweep `sweep_index`. The result always has `sweep_sample_count`
    /// elements; samples outside any epoch stay at `holding_level`.
    ///
    /// Returns a fresh array on every call and never mutates the
    /// timeline, so concurrent calls for different sweeps are fine.
    pub fn synthesize(
        &self,
        sweep_index: usize,
        sweep_sample_count: usize,
        holding_level: f64,
        diag: &mut DiagnosticSink,
    ) -> Array1<f64> {
        let mut waveform = Array1::from_elem(sweep_sample_count, holding_level);

        for (index, epoch) in self.epochs().iter().enumerate() {
            if epoch.kind == EpochKind::Off {
                continue;
            }
            let level = epoch.level_for_sweep(sweep_index);

            let i1 = epoch.start_sample;
            let mut i2 = epoch.end_sample;
            if i2 > sweep_sample_count {
                // Truncated recording: the declared protocol runs past the
                // sweep we actually have.
                diag.record(Diagnostic::SweepShorterThanExpected {
                    epoch: index,
                    end_sample: i2,
                    sweep_sample_count,
                });
                i2 = sweep_sample_count;
            }
            if i1 >= i2 {
                continue;
            }

            // Ramp and unrecognized kinds fill flat, same as a step.
            waveform.slice_mut(s![i1..i2]).fill(level);
        }

        waveform
    }

    /// Convenience wrapper that pulls the sweep length and holding level
    /// for this timeline's channel out of the header it was built from.
    pub fn synthesize_for(
        &self,
        header: &RecordingHeader,
        sweep_index: usize,
        diag: &mut DiagnosticSink,
    ) -> Result<Array1<f64>, EpochError> {
        let holding = header.holding_command_for(self.channel())?;
        Ok(self.synthesize(sweep_index, header.sweep_sample_count, holding, diag))
    }
}
