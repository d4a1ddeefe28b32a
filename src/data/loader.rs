//! Loader for `;`-delimited sample files.
//!
//! Format:
//! - the first line is a header and is always dropped, whatever it contains
//! - every other non-blank line holds `input_nodes` feature columns followed
//!   by one label column, e.g. `7.4;0.7;...;9.4;5`
//! - labels are divided by `label_scale` before they are stored
//! - columns after the label are ignored
//!
//! A row with any unparseable token, too few features, or no label is
//! dropped and loading carries on with the next line. Lines are read as raw
//! bytes: the header is never decoded, and a data line that is not valid
//! UTF-8 is decoded lossily so its damaged token is rejected like any other
//! bad value.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::data::dataset::{Dataset, Sample};
use crate::errors::DatasetError;
use crate::network::topology::INPUT_NODES;

/// Raw labels are divided by this before training.
pub const LABEL_SCALE: f64 = 10.0;
/// File read by the binary, relative to the working directory.
pub const DATASET_PATH: &str = "wine.csv";
const DELIMITER: char = ';';

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Why a row was left out of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    /// A feature or label token did not parse as a finite number.
    BadToken(String),
    /// The line ended before `input_nodes` features were read.
    TooFewFeatures { found: usize },
    /// All features parsed but there was no label column.
    MissingLabel,
}

/// Result of parsing one data line.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(Sample),
    Rejected(RowRejection),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::BadToken(token) => write!(f, "Skipping bad value: {token:?}"),
            RowRejection::TooFewFeatures { found } => write!(f, "only {found} features, row dropped"),
            RowRejection::MissingLabel => write!(f, "no label column, row dropped"),
        }
    }
}

/// Counters gathered while reading one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    /// Non-blank lines after the header.
    pub data_lines: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// 1-based line number (header counts as line 1) and reason, per dropped row.
    pub rejections: Vec<(usize, RowRejection)>,
}

fn parse_token(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetLoader {
    pub input_nodes: usize,
    pub label_scale: f64,
}

impl DatasetLoader {
    pub fn new(input_nodes: usize, label_scale: f64) -> Self {
        DatasetLoader { input_nodes, label_scale }
    }

    /// Parses a single data line (not the header).
    pub fn parse_row(&self, line: &str) -> RowOutcome {
        let mut tokens = line.split(DELIMITER);
        let mut features = Vec::with_capacity(self.input_nodes);

        for token in tokens.by_ref().take(self.input_nodes) {
            match parse_token(token) {
                Some(v) => features.push(v),
                None => return RowOutcome::Rejected(RowRejection::BadToken(token.to_string())),
            }
        }
        if features.len() < self.input_nodes {
            return RowOutcome::Rejected(RowRejection::TooFewFeatures { found: features.len() });
        }

        let label = match tokens.next() {
            None => return RowOutcome::Rejected(RowRejection::MissingLabel),
            Some(token) => match parse_token(token) {
                Some(v) => v,
                None => return RowOutcome::Rejected(RowRejection::BadToken(token.to_string())),
            },
        };

        RowOutcome::Accepted(Sample::new(features, label / self.label_scale))
    }

    /// Reads a whole stream: drops the first line undecoded, skips blank
    /// lines, keeps accepted rows in order.
    pub fn read<R: BufRead>(&self, reader: R) -> io::Result<(Dataset, LoadStats)> {
        let mut dataset = Dataset::default();
        let mut stats = LoadStats::default();
        let mut lines = reader.split(b'\n');

        // Header.
        if let Some(header) = lines.next() {
            header?;
        }

        for (idx, bytes) in lines.enumerate() {
            let bytes = bytes?;
            let line = String::from_utf8_lossy(&bytes);
            if line.trim().is_empty() {
                continue;
            }
            stats.data_lines += 1;

            match self.parse_row(&line) {
                RowOutcome::Accepted(sample) => {
                    stats.accepted += 1;
                    dataset.push(sample);
                }
                RowOutcome::Rejected(reason) => {
                    stats.rejected += 1;
                    let line_no = idx + 2;
                    match reason {
                        RowRejection::BadToken(_) => log::warn!("{reason} (line {line_no})"),
                        _ => log::debug!("Line {line_no}: {reason}"),
                    }
                    stats.rejections.push((line_no, reason));
                }
            }
        }

        Ok((dataset, stats))
    }

    /// Loads `path`. A missing file loads as an empty dataset.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Dataset, DatasetError> {
        let path = path.as_ref();
        let io_err = |source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("Dataset {} not found; continuing with no samples", path.display());
                return Ok(Dataset::default());
            }
            Err(e) => return Err(io_err(e)),
        };

        let (dataset, stats) = self.read(BufReader::new(file)).map_err(io_err)?;
        log::info!(
            "Loaded {} samples from {} ({} rows rejected)",
            stats.accepted,
            path.display(),
            stats.rejected
        );
        Ok(dataset)
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        DatasetLoader::new(INPUT_NODES, LABEL_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::{Cursor, Write};

    const ROW: &str = "7.4;0.7;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;5";

    fn read(text: &str) -> (Dataset, LoadStats) {
        DatasetLoader::default().read(Cursor::new(text)).unwrap()
    }

    #[test]
    fn parses_row_and_normalizes_label() {
        let sample = match DatasetLoader::default().parse_row(ROW) {
            RowOutcome::Accepted(s) => s,
            other => panic!("row rejected: {other:?}"),
        };
        assert_eq!(sample.features.len(), 11);
        assert_eq!(sample.features[0], 7.4);
        assert_eq!(sample.features[10], 9.4);
        assert_eq!(sample.label, 5.0 / 10.0);
    }

    #[test]
    fn bad_feature_token_rejects_row() {
        let line = "7.4;abc;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;5";
        assert_eq!(
            DatasetLoader::default().parse_row(line),
            RowOutcome::Rejected(RowRejection::BadToken("abc".into()))
        );
    }

    #[test]
    fn empty_token_is_bad() {
        let line = "7.4;;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;5";
        assert_eq!(
            DatasetLoader::default().parse_row(line),
            RowOutcome::Rejected(RowRejection::BadToken(String::new()))
        );
    }

    #[test]
    fn bad_label_rejects_row() {
        let line = "7.4;0.7;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;five";
        assert_eq!(
            DatasetLoader::default().parse_row(line),
            RowOutcome::Rejected(RowRejection::BadToken("five".into()))
        );
    }

    #[test]
    fn non_finite_tokens_are_bad() {
        let line = "7.4;NaN;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;5";
        assert_eq!(
            DatasetLoader::default().parse_row(line),
            RowOutcome::Rejected(RowRejection::BadToken("NaN".into()))
        );
        let line = "7.4;0.7;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;inf";
        assert_eq!(
            DatasetLoader::default().parse_row(line),
            RowOutcome::Rejected(RowRejection::BadToken("inf".into()))
        );
    }

    #[test]
    fn short_rows_rejected() {
        let loader = DatasetLoader::default();
        assert_eq!(
            loader.parse_row("1;2;3"),
            RowOutcome::Rejected(RowRejection::TooFewFeatures { found: 3 })
        );
        assert_eq!(
            loader.parse_row("1;2;3;4;5;6;7;8;9;10;11"),
            RowOutcome::Rejected(RowRejection::MissingLabel)
        );
    }

    #[test]
    fn trailing_columns_ignored() {
        let line = format!("{ROW};junk;7");
        let RowOutcome::Accepted(sample) = DatasetLoader::default().parse_row(&line) else {
            panic!("row with trailing columns rejected");
        };
        assert_eq!(sample.label, 0.5);
    }

    #[test]
    fn whitespace_and_crlf_tolerated() {
        let line = " 7.4; 0.7;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;6\r";
        let RowOutcome::Accepted(sample) = DatasetLoader::default().parse_row(line) else {
            panic!("padded row rejected");
        };
        assert_eq!(sample.features[1], 0.7);
        assert_eq!(sample.label, 0.6);
    }

    #[test]
    fn header_always_dropped_even_if_numeric() {
        let text = format!("{ROW}\n{ROW}\n");
        let (ds, stats) = read(&text);
        assert_eq!(ds.len(), 1);
        assert_eq!((stats.data_lines, stats.accepted, stats.rejected), (1, 1, 0));
    }

    #[test]
    fn blank_lines_skipped_and_order_kept() {
        let text = format!(
            "h\n\n{ROW}\n   \n1;2;3\n{}\n",
            ROW.replace(";5", ";8")
        );
        let (ds, stats) = read(&text);
        assert_eq!((stats.data_lines, stats.accepted, stats.rejected), (3, 2, 1));
        assert_eq!(stats.rejections, vec![(5, RowRejection::TooFewFeatures { found: 3 })]);
        let labels: Vec<f64> = ds.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![0.5, 0.8]);
    }

    #[test]
    fn empty_input_gives_empty_dataset() {
        let (ds, stats) = read("");
        assert!(ds.is_empty());
        assert_eq!(stats, LoadStats::default());

        let (ds, _) = read("only a header\n");
        assert!(ds.is_empty());
    }

    #[test]
    fn missing_file_gives_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let ds = DatasetLoader::default().load(dir.path().join("absent.csv")).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn directory_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetLoader::default().load(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn rejected_token_is_named_in_diagnostic() {
        let bad = "7.4;0.7x;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;5";
        let (ds, stats) = read(&format!("h\n{ROW}\n{bad}\n"));
        assert_eq!(ds.len(), 1);
        assert_eq!(stats.rejected, 1);

        let (line_no, reason) = &stats.rejections[0];
        assert_eq!(*line_no, 3);
        assert_eq!(reason, &RowRejection::BadToken("0.7x".into()));
        assert_eq!(reason.to_string(), "Skipping bad value: \"0.7x\"");
    }

    #[test]
    fn non_utf8_header_is_dropped_undecoded() {
        let mut bytes = b"temp \xb0C;x\n".to_vec();
        bytes.extend_from_slice(ROW.as_bytes());
        bytes.push(b'\n');
        let (ds, stats) = DatasetLoader::default().read(Cursor::new(bytes)).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(stats.rejected, 0);
    }

    #[test]
    fn non_utf8_row_is_rejected_alone() {
        let mut bytes = b"header\n".to_vec();
        bytes.extend_from_slice(ROW.as_bytes());
        bytes.extend_from_slice(b"\n7.4;0.\xff7;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;5\n");
        bytes.extend_from_slice(ROW.as_bytes());
        bytes.push(b'\n');

        let (ds, stats) = DatasetLoader::default().read(Cursor::new(bytes)).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(
            stats.rejections,
            vec![(3, RowRejection::BadToken("0.\u{fffd}7".into()))]
        );
    }

    #[test]
    fn non_utf8_file_loads_remaining_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"qualit\xe9;x\n").unwrap();
        writeln!(file, "{ROW}").unwrap();
        file.write_all(b"\xff;1;2;3;4;5;6;7;8;9;10;5\n").unwrap();
        writeln!(file, "{ROW}").unwrap();
        file.flush().unwrap();

        let ds = DatasetLoader::default().load(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn custom_width_and_scale() {
        let loader = DatasetLoader::new(2, 4.0);
        let (ds, _) = loader.read(Cursor::new("a;b;y\n1;2;8\n1;2\n")).unwrap();
        assert_eq!(ds.samples(), &[Sample::new(vec![1.0, 2.0], 2.0)]);
    }

    proptest! {
        #[test]
        fn label_is_raw_over_scale(raw in -1000.0f64..1000.0) {
            let features = vec!["0.5"; 11].join(";");
            let line = format!("{features};{raw}");
            let RowOutcome::Accepted(sample) = DatasetLoader::default().parse_row(&line) else {
                return Err(TestCaseError::fail("row rejected"));
            };
            prop_assert_eq!(sample.label, raw / 10.0);
        }

        #[test]
        fn rows_with_fewer_than_eleven_features_excluded(n in 0usize..11) {
            let line = vec!["1.0"; n].join(";");
            let outcome = DatasetLoader::default().parse_row(&line);
            prop_assert!(matches!(outcome, RowOutcome::Rejected(_)), "accepted: {:?}", outcome);
        }

        #[test]
        fn accepted_never_exceeds_data_lines(
            rows in proptest::collection::vec(
                proptest::collection::vec(prop_oneof![Just("1.5"), Just("x"), Just("")], 0..14),
                0..20,
            )
        ) {
            let mut text = String::from("header\n");
            for row in &rows {
                text.push_str(&row.join(";"));
                text.push('\n');
            }
            let (ds, stats) = read(&text);
            let non_empty = text.lines().filter(|l| !l.trim().is_empty()).count();
            prop_assert!(ds.len() <= non_empty - 1);
            prop_assert_eq!(ds.len(), stats.accepted);
            prop_assert_eq!(stats.accepted + stats.rejected, stats.data_lines);
            prop_assert!(ds.iter().all(|s| s.features.len() == 11));
        }
    }
}
