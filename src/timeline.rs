use std::fmt;

use crate::diag::{Diagnostic, DiagnosticSink};
use crate::epoch::{Epoch, EpochKind};
use crate::error::EpochError;
use crate::header::{EpochDef, EpochTable, RecordingHeader};

/// The acquisition device reserves the first 1/64th of every sweep before
/// the declared epochs begin. Undocumented, but consistent across files.
const PRE_EPOCH_DIVISOR: usize = 64;

/// Ordered epoch timeline for one DAC channel of one recording.
///
/// Built once from immutable header data and never mutated afterwards.
/// Synthetic pre/post epochs are fabricated at both ends of the declared
/// list so the synthesizer never needs to know which header format the
/// timeline came from.
#[derive(Clone, Debug)]
pub struct Timeline {
    channel: usize,
    unit: String,
    pre_offset: usize,
    epochs: Vec<Epoch>,
}

impl Timeline {
    /// Reconstruct the epoch timeline for `channel`. Pure function of the
    /// header; non-fatal findings go to `diag`.
    pub fn build(
        header: &RecordingHeader,
        channel: usize,
        diag: &mut DiagnosticSink,
    ) -> Result<Timeline, EpochError> {
        if header.sweep_sample_count == 0 {
            return Err(EpochError::EmptySweep);
        }
        let holding = header.holding_command_for(channel)?;
        let unit = header.unit_for(channel)?.to_string();

        let (epochs, pre_offset) = match &header.epochs {
            EpochTable::Legacy => (legacy_epochs(header.sweep_sample_count, holding, diag), 0),
            EpochTable::Segmented {
                entries,
                sustain_after_episode,
            } => {
                let sustain = sustain_after_episode.get(channel).copied().unwrap_or(false);
                segmented_epochs(
                    header.sweep_sample_count,
                    channel,
                    entries,
                    sustain,
                    holding,
                    diag,
                )
            }
        };

        let mut timeline = Timeline {
            channel,
            unit,
            pre_offset,
            epochs,
        };
        timeline.assign_labels();
        Ok(timeline)
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Display unit of the channel's command signal, e.g. "mV".
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Width of the synthetic pre-epoch in samples. Zero for legacy
    /// headers.
    pub fn pre_offset(&self) -> usize {
        self.pre_offset
    }

    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    pub fn get(&self, index: usize) -> Option<&Epoch> {
        self.epochs.get(index)
    }

    pub fn epoch_count(&self) -> usize {
        self.epochs.len()
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// Always false: even an empty header yields the synthetic epochs.
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.epochs.iter().map(|e| e.label.as_str()).collect()
    }

    /// First is always "pre"; a trailing epoch with zero nominal duration
    /// becomes "post"; everything between gets sequential letters.
    fn assign_labels(&mut self) {
        for (i, epoch) in self.epochs.iter_mut().enumerate() {
            epoch.label = char::from(64u8.wrapping_add(i as u8)).to_string();
        }
        self.epochs[0].label = "pre".into();
        if let Some(last) = self.epochs.last_mut() {
            if last.duration == 0 {
                last.label = "post".into();
            }
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Channel {} epochs ({}): {}",
            self.channel,
            self.epoch_count(),
            self.labels().join(", ")
        )
    }
}

fn step_epoch(start: usize, end: usize, level: f64, duration: usize) -> Epoch {
    Epoch {
        start_sample: start,
        end_sample: end,
        kind: EpochKind::Step,
        level,
        level_delta: 0.0,
        duration,
        duration_delta: 0,
        pulse_period: 0,
        pulse_width: 0,
        label: String::new(),
    }
}

/// Legacy headers carry no epoch table, so the best we can do is one step
/// epoch holding the resting command across the whole sweep.
fn legacy_epochs(sweep_sample_count: usize, holding: f64, diag: &mut DiagnosticSink) -> Vec<Epoch> {
    diag.record(Diagnostic::LegacyEpochApproximation);
    vec![step_epoch(
        0,
        sweep_sample_count,
        holding,
        sweep_sample_count,
    )]
}

fn segmented_epochs(
    sweep_sample_count: usize,
    channel: usize,
    entries: &[EpochDef],
    sustain: bool,
    holding: f64,
    diag: &mut DiagnosticSink,
) -> (Vec<Epoch>, usize) {
    let pre_offset = sweep_sample_count / PRE_EPOCH_DIVISOR;

    // Synthetic lead-in at the holding level; declared epochs start after
    // it, so every real bound below is shifted by pre_offset.
    let mut epochs = vec![step_epoch(0, pre_offset, holding, pre_offset)];

    for entry in entries.iter().filter(|e| e.dac_channel == channel) {
        let kind = EpochKind::from_code(entry.kind_code);
        if let EpochKind::Unsupported(code) = kind {
            diag.record(Diagnostic::UnsupportedEpochKind {
                code,
                index: epochs.len(),
            });
        }
        let start = epochs.last().map(|e| e.end_sample).unwrap_or(0);
        epochs.push(Epoch {
            start_sample: start,
            end_sample: start + entry.init_duration,
            kind,
            level: entry.init_level,
            level_delta: entry.level_increment,
            duration: entry.init_duration,
            duration_delta: entry.duration_increment,
            pulse_period: entry.pulse_period,
            pulse_width: entry.pulse_width,
            label: String::new(),
        });
    }

    if sustain {
        // The device holds the final epoch's level through the remainder
        // of the sweep; extend instead of appending.
        if let Some(last) = epochs.last_mut() {
            last.end_sample = sweep_sample_count - 1 + pre_offset;
        }
    } else {
        // Revert when the device returns to hold state. The reverted level
        // is the previous epoch's base level, not the holding command;
        // observed device behavior, kept as-is.
        let last_end = epochs.last().map(|e| e.end_sample).unwrap_or(0);
        let last_level = epochs.last().map(|e| e.level).unwrap_or(holding);
        epochs.push(step_epoch(
            last_end,
            sweep_sample_count + pre_offset,
            last_level,
            0,
        ));
    }

    (epochs, pre_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_def(dac_channel: usize, level: f64, level_inc: f64, duration: usize) -> EpochDef {
        EpochDef {
            dac_channel,
            kind_code: 1,
            init_level: level,
            level_increment: level_inc,
            init_duration: duration,
            duration_increment: 0,
            pulse_period: 0,
            pulse_width: 0,
        }
    }

    fn segmented_header(
        sweep_sample_count: usize,
        entries: Vec<EpochDef>,
        sustain_after_episode: Vec<bool>,
    ) -> RecordingHeader {
        RecordingHeader {
            sweep_sample_count,
            holding_command: vec![-70.0, 0.0],
            dac_units: vec!["mV".into(), "pA".into()],
            epochs: EpochTable::Segmented {
                entries,
                sustain_after_episode,
            },
        }
    }

    fn legacy_header(sweep_sample_count: usize) -> RecordingHeader {
        RecordingHeader {
            sweep_sample_count,
            holding_command: vec![-70.0],
            dac_units: vec!["mV".into()],
            epochs: EpochTable::Legacy,
        }
    }

    #[test]
    fn pre_epoch_covers_one_sixty_fourth_of_the_sweep() {
        let header = segmented_header(1000, vec![step_def(0, 10.0, 0.0, 100)], vec![false, false]);
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&header, 0, &mut diag).unwrap();
        assert_eq!(timeline.pre_offset(), 15);
        let pre = timeline.get(0).unwrap();
        assert_eq!(pre.start_sample, 0);
        assert_eq!(pre.end_sample, 15);
        assert_eq!(pre.level, -70.0);
        assert_eq!(pre.label, "pre");
    }

    #[test]
    fn segmented_bounds_chain_without_gaps() {
        let header = segmented_header(
            1000,
            vec![
                step_def(0, 10.0, 0.0, 100),
                step_def(0, -20.0, 5.0, 200),
                step_def(0, 0.0, 0.0, 50),
            ],
            vec![false, false],
        );
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&header, 0, &mut diag).unwrap();
        for pair in timeline.epochs().windows(2) {
            assert_eq!(pair[0].end_sample, pair[1].start_sample);
        }
        // pre + 3 declared + post
        assert_eq!(timeline.epoch_count(), 5);
        assert_eq!(timeline.get(1).unwrap().start_sample, 15);
        assert_eq!(timeline.get(1).unwrap().end_sample, 115);
    }

    #[test]
    fn entries_for_other_channels_are_skipped() {
        let header = segmented_header(
            1000,
            vec![
                step_def(1, 99.0, 0.0, 300),
                step_def(0, 10.0, 0.0, 100),
                step_def(1, 42.0, 0.0, 10),
            ],
            vec![false, false],
        );
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&header, 0, &mut diag).unwrap();
        // pre + the one channel-0 entry + post
        assert_eq!(timeline.epoch_count(), 3);
        assert_eq!(timeline.get(1).unwrap().level, 10.0);
    }

    #[test]
    fn legacy_header_yields_single_full_sweep_step() {
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&legacy_header(5000), 0, &mut diag).unwrap();
        assert_eq!(timeline.epoch_count(), 1);
        assert_eq!(timeline.pre_offset(), 0);
        let only = timeline.get(0).unwrap();
        assert_eq!(only.start_sample, 0);
        assert_eq!(only.end_sample, 5000);
        assert_eq!(only.kind, EpochKind::Step);
        assert_eq!(only.level, -70.0);
        assert_eq!(only.label, "pre");
        assert_eq!(diag.items(), &[Diagnostic::LegacyEpochApproximation]);
    }

    #[test]
    fn sustain_extends_last_epoch_instead_of_appending() {
        let header = segmented_header(1000, vec![step_def(0, 10.0, 0.0, 100)], vec![true, false]);
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&header, 0, &mut diag).unwrap();
        // pre + the declared epoch, nothing appended
        assert_eq!(timeline.epoch_count(), 2);
        let last = timeline.get(1).unwrap();
        assert_eq!(last.end_sample, 1000 - 1 + 15);
        assert_eq!(last.level, 10.0);
    }

    #[test]
    fn revert_appends_zero_duration_epoch_at_last_level() {
        let header = segmented_header(1000, vec![step_def(0, 10.0, 5.0, 100)], vec![false, false]);
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&header, 0, &mut diag).unwrap();
        assert_eq!(timeline.epoch_count(), 3);
        let post = timeline.get(2).unwrap();
        assert_eq!(post.start_sample, 115);
        assert_eq!(post.end_sample, 1000 + 15);
        assert_eq!(post.duration, 0);
        // Reverts to the previous epoch's base level, not holding.
        assert_eq!(post.level, 10.0);
        assert_eq!(post.level_delta, 0.0);
        assert_eq!(post.label, "post");
    }

    #[test]
    fn declared_epochs_get_sequential_letters() {
        let header = segmented_header(
            1000,
            vec![
                step_def(0, 10.0, 0.0, 100),
                step_def(0, 20.0, 0.0, 100),
                step_def(0, 30.0, 0.0, 100),
            ],
            vec![false, false],
        );
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&header, 0, &mut diag).unwrap();
        assert_eq!(timeline.labels(), vec!["pre", "A", "B", "C", "post"]);
        assert_eq!(
            timeline.to_string(),
            "Channel 0 epochs (5): pre, A, B, C, post"
        );
    }

    #[test]
    fn empty_epoch_table_still_yields_pre_and_post() {
        let header = segmented_header(1000, vec![], vec![false, false]);
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&header, 0, &mut diag).unwrap();
        assert!(!timeline.is_empty());
        assert_eq!(timeline.labels(), vec!["pre", "post"]);
        // The post epoch reverts to the pre epoch's level, i.e. holding.
        assert_eq!(timeline.get(1).unwrap().level, -70.0);
    }

    #[test]
    fn unknown_kind_code_is_kept_and_reported() {
        let mut def = step_def(0, 10.0, 0.0, 100);
        def.kind_code = 7;
        let header = segmented_header(1000, vec![def], vec![false, false]);
        let mut diag = DiagnosticSink::new();
        let timeline = Timeline::build(&header, 0, &mut diag).unwrap();
        assert_eq!(timeline.get(1).unwrap().kind, EpochKind::Unsupported(7));
        assert_eq!(
            diag.items(),
            &[Diagnostic::UnsupportedEpochKind { code: 7, index: 1 }]
        );
    }

    #[test]
    fn out_of_range_channel_is_rejected() {
        let header = segmented_header(1000, vec![], vec![false, false]);
        let mut diag = DiagnosticSink::new();
        assert!(matches!(
            Timeline::build(&header, 5, &mut diag),
            Err(EpochError::ChannelOutOfRange {
                channel: 5,
                available: 2
            })
        ));
    }

    #[test]
    fn zero_length_sweep_is_rejected() {
        let header = segmented_header(0, vec![], vec![false, false]);
        let mut diag = DiagnosticSink::new();
        assert!(matches!(
            Timeline::build(&header, 0, &mut diag),
            Err(EpochError::EmptySweep)
        ));
    }
}
