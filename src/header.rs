use crate::error::EpochError;

/// One row of the segmented header's global epoch-definition table.
/// Rows for every DAC channel are interleaved in a single flat table;
/// `dac_channel` says which channel a row belongs to.
#[derive(Clone, Debug)]
pub struct EpochDef {
    pub dac_channel: usize,
    /// Raw epoch type code as stored on disk (0 = off, 1 = step, 2 = ramp).
    pub kind_code: i16,
    /// Output level at sweep 0, in channel-native units.
    pub init_level: f64,
    /// Per-sweep increment added to the level.
    pub level_increment: f64,
    /// Length in samples at sweep 0.
    pub init_duration: usize,
    /// Per-sweep increment added to the duration.
    pub duration_increment: i64,
    pub pulse_period: usize,
    pub pulse_width: usize,
}

/// Epoch storage layout of the source header, selected once by the header
/// reader from the file format version.
#[derive(Clone, Debug)]
pub enum EpochTable {
    /// Older fixed-layout headers: no per-epoch structure is stored.
    Legacy,
    /// Newer segmented headers: a flat epoch table for all DAC channels
    /// plus a per-channel "sustain after episode" flag.
    Segmented {
        entries: Vec<EpochDef>,
        sustain_after_episode: Vec<bool>,
    },
}

/// Decoded header values for one recording, as produced by an external
/// header reader. This crate never touches the file itself; it consumes
/// these already-decoded per-channel arrays.
#[derive(Clone, Debug)]
pub struct RecordingHeader {
    /// Samples per sweep (every sweep in a recording has the same length).
    pub sweep_sample_count: usize,
    /// Resting command level per DAC channel.
    pub holding_command: Vec<f64>,
    /// Display unit string per DAC channel.
    pub dac_units: Vec<String>,
    pub epochs: EpochTable,
}

impl RecordingHeader {
    pub fn holding_command_for(&self, channel: usize) -> Result<f64, EpochError> {
        self.holding_command
            .get(channel)
            .copied()
            .ok_or(EpochError::ChannelOutOfRange {
                channel,
                available: self.holding_command.len(),
            })
    }

    pub fn unit_for(&self, channel: usize) -> Result<&str, EpochError> {
        self.dac_units
            .get(channel)
            .map(String::as_str)
            .ok_or(EpochError::ChannelOutOfRange {
                channel,
                available: self.dac_units.len(),
            })
    }
}
