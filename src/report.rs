use crate::diag::{Diagnostic, DiagnosticSink};
use crate::epoch::{Epoch, EpochKind};
use crate::timeline::Timeline;

const LABEL_WIDTH: usize = 25;
const CELL_WIDTH: usize = 7;

fn row(label: &str, cells: &[String]) -> String {
    let mut line = format!("{:>width$}", label, width = LABEL_WIDTH);
    for cell in cells {
        line.push_str(&format!("{:>width$}", cell, width = CELL_WIDTH));
    }
    line.push('\n');
    line
}

fn int_cells<F>(epochs: &[Epoch], field: F) -> Vec<String>
where
    F: Fn(&Epoch) -> i64,
{
    epochs.iter().map(|e| field(e).to_string()).collect()
}

impl Timeline {
    /// Fixed-width table of every epoch field, one column per epoch,
    /// similar to how acquisition software renders epochs in its file
    /// properties dialog. Display-only; nothing consumes this.
    ///
    /// Levels are rendered truncated to whole numbers, matching the
    /// original table layout this mirrors.
    pub fn report(&self, diag: &mut DiagnosticSink) -> String {
        let epochs = self.epochs();

        let labels: Vec<String> = epochs.iter().map(|e| e.label.clone()).collect();
        let kinds: Vec<String> = epochs
            .iter()
            .enumerate()
            .map(|(index, e)| {
                if let EpochKind::Unsupported(code) = e.kind {
                    diag.record(Diagnostic::UnsupportedEpochKind { code, index });
                }
                e.kind.name()
            })
            .collect();

        let mut out = String::from("\n");
        out.push_str(&row(&format!("Ch{} EPOCH", self.channel()), &labels));
        out.push_str(&row("Type", &kinds));
        out.push_str(&row(
            &format!("First Level ({})", self.unit()),
            &int_cells(epochs, |e| e.level.trunc() as i64),
        ));
        out.push_str(&row(
            &format!("Delta Level ({})", self.unit()),
            &int_cells(epochs, |e| e.level_delta.trunc() as i64),
        ));
        out.push_str(&row(
            "First Duration (samples)",
            &int_cells(epochs, |e| e.duration as i64),
        ));
        out.push_str(&row(
            "Delta Duration (samples)",
            &int_cells(epochs, |e| e.duration_delta),
        ));
        out.push_str(&row(
            "Train Period (samples)",
            &int_cells(epochs, |e| e.pulse_period as i64),
        ));
        out.push_str(&row(
            "Pulse Width (samples)",
            &int_cells(epochs, |e| e.pulse_width as i64),
        ));
        out.push_str(&row(
            "Epoch Start (samples)",
            &int_cells(epochs, |e| e.start_sample as i64),
        ));
        out.push_str(&row(
            "Epoch End (samples)",
            &int_cells(epochs, |e| e.end_sample as i64),
        ));
        out.push('\n');
        out
    }
}
