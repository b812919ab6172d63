//! Reconstructs the ordered timeline of stimulus epochs encoded in an
//! electrophysiology recording header and synthesizes the full-length
//! command waveform applied to a DAC channel during a given sweep.
//!
//! The crate consumes already-decoded header values ([`RecordingHeader`])
//! and is purely in-memory: no file I/O, no sample-data decoding. Build a
//! [`Timeline`] once per channel, then synthesize as many sweeps as you
//! need from it. Non-fatal findings (legacy-format approximation, unknown
//! epoch types, truncated sweeps) are collected in a [`DiagnosticSink`]
//! and mirrored to the `log` facade.

pub mod diag;
pub mod epoch;
pub mod error;
pub mod header;
pub mod report;
pub mod timeline;
pub mod waveform;

pub use diag::{Diagnostic, DiagnosticSink};
pub use epoch::{Epoch, EpochKind};
pub use error::EpochError;
pub use header::{EpochDef, EpochTable, RecordingHeader};
pub use timeline::Timeline;
