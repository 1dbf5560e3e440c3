//! Line-by-line decomposition of an address file into JSON Lines.

use std::io::{BufRead, Write};

use flets_area_address::decompose::decompose_with_rule;
use flets_area_cli_utils::ProgressCallback;

use crate::report::DecomposeReport;

/// Decomposes every non-empty line of `reader`, writing one JSON object per
/// line to `writer`. Returns the number of addresses written.
///
/// # Errors
///
/// Returns an error if reading the input, serializing a report, or writing
/// the output fails.
pub fn run<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    progress: &dyn ProgressCallback,
) -> Result<usize, Box<dyn std::error::Error>> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    let addresses: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    log::info!("Decomposing {} addresses", addresses.len());
    progress.set_total(addresses.len() as u64);

    for address in &addresses {
        progress.set_message((*address).to_string());
        let (components, rule) = decompose_with_rule(address);
        if components.prefecture.is_none() {
            log::warn!("No prefecture in {address:?}");
        }
        serde_json::to_writer(&mut writer, &DecomposeReport::new(address, components, rule))?;
        writeln!(writer)?;
        progress.inc(1);
    }

    writer.flush()?;
    progress.finish(format!("Decomposed {} addresses", addresses.len()));

    Ok(addresses.len())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use flets_area_cli_utils::NullProgress;

    use super::*;

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl RecordingProgress {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, total: u64) {
            self.push(format!("total {total}"));
        }

        fn inc(&self, delta: u64) {
            self.push(format!("inc {delta}"));
        }

        fn set_message(&self, msg: String) {
            self.push(format!("message {msg}"));
        }

        fn finish(&self, msg: String) {
            self.push(format!("finish {msg}"));
        }
    }

    #[test]
    fn reports_progress_per_address() {
        let progress = RecordingProgress::default();
        let mut out = Vec::new();
        run(Cursor::new("三重県伊勢市\n\n東京都新宿区\n"), &mut out, &progress).unwrap();

        assert_eq!(
            *progress.events.lock().unwrap(),
            vec![
                "total 2",
                "message 三重県伊勢市",
                "inc 1",
                "message 東京都新宿区",
                "inc 1",
                "finish Decomposed 2 addresses",
            ]
        );
    }

    #[test]
    fn writes_one_object_per_non_empty_line() {
        let input = "三重県伊勢市船江4丁目19-10\n\n   \n東京都新宿区西新宿２－８－１\n";
        let mut out = Vec::new();

        let count = run(Cursor::new(input), &mut out, &NullProgress).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let rows: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["city"], "伊勢市");
        assert_eq!(rows[1]["prefecture"], "東京都");
        assert_eq!(rows[1]["region"], "east");
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut out = Vec::new();
        assert_eq!(run(Cursor::new(""), &mut out, &NullProgress).unwrap(), 0);
        assert!(out.is_empty());
    }
}
