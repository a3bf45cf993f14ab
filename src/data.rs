use std::collections::BTreeSet;
use std::io::{BufRead, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use ndarray::Array2;
use tracing::debug;

use crate::error::{BaselineError, LoadFailure, Result};
use crate::io::open_reader;

/// Numeric table loaded from a ground-truth label file
#[derive(Debug, Clone)]
pub struct LabelTable {
    pub data: Array2<f64>,
}

impl LabelTable {
    /// Read a (possibly gzipped) delimited numeric file into a LabelTable
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = read_text(path).map_err(|e| BaselineError::data_load(path, e))?;
        Self::parse(&text).map_err(|e| BaselineError::data_load(path, e))
    }

    /// Parse numeric text split on runs of whitespace, or on commas when the
    /// first data line has one. Everything after a `#` is a comment, blank
    /// lines are skipped, and every remaining row must have the same number
    /// of columns.
    pub fn parse(text: &str) -> std::result::Result<Self, LoadFailure> {
        let lines: Vec<&str> = text.lines().map(strip_comment).collect();
        let first_line = lines
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .ok_or(LoadFailure::Empty)?;

        let mut rows = RowBuilder::default();

        if first_line.contains(',') {
            debug!("comma-delimited labels");
            // csv drops empty lines, which would shift record numbers off line numbers
            let padded: Vec<&str> = lines
                .iter()
                .map(|&l| if l.is_empty() { " " } else { l })
                .collect();
            let joined = padded.join("\n");
            let mut rdr = ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .trim(Trim::All)
                .from_reader(joined.as_bytes());

            for (i, result) in rdr.records().enumerate() {
                let record = result?;
                rows.push(i as u64 + 1, record.iter().filter(|f| !f.is_empty()))?;
            }
        } else {
            debug!("whitespace-delimited labels");
            for (i, line) in lines.iter().enumerate() {
                rows.push(i as u64 + 1, line.split_whitespace())?;
            }
        }

        rows.finish()
    }

    /// First column as integer labels, truncated toward zero
    pub fn first_column(&self) -> Vec<i64> {
        self.data.column(0).iter().map(|&v| v.trunc() as i64).collect()
    }
}

/// Accumulates parsed rows into one flat buffer, checking the column count.
#[derive(Default)]
struct RowBuilder {
    values: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl RowBuilder {
    fn push<'a>(
        &mut self,
        line: u64,
        fields: impl Iterator<Item = &'a str>,
    ) -> std::result::Result<(), LoadFailure> {
        let before = self.values.len();

        for field in fields {
            let bad = || LoadFailure::BadNumber {
                line,
                value: field.to_string(),
            };
            let value = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(bad)?;
            // the first column becomes an i64 label
            if self.values.len() == before && !fits_i64(value) {
                return Err(bad());
            }
            self.values.push(value);
        }

        let found = self.values.len() - before;
        if found == 0 {
            return Ok(());
        }
        if self.nrows == 0 {
            self.ncols = found;
        } else if found != self.ncols {
            return Err(LoadFailure::Ragged {
                line,
                expected: self.ncols,
                found,
            });
        }
        self.nrows += 1;
        Ok(())
    }

    fn finish(self) -> std::result::Result<LabelTable, LoadFailure> {
        if self.nrows == 0 {
            return Err(LoadFailure::Empty);
        }
        // push keeps values.len() == nrows * ncols
        let data = Array2::from_shape_vec((self.nrows, self.ncols), self.values)?;
        Ok(LabelTable { data })
    }
}

fn fits_i64(value: f64) -> bool {
    let t = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    t >= i64::MIN as f64 && t < i64::MAX as f64
}

fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or_default()
}

fn read_text(path: &Path) -> std::io::Result<String> {
    let mut text = String::new();
    open_reader(path)?.read_to_string(&mut text)?;
    Ok(text)
}

/// Load ground-truth labels, keeping only the first column of multi-column files.
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Vec<i64>> {
    Ok(LabelTable::from_path(path)?.first_column())
}

/// Number of lines in `path`. Blank lines count, and so does a final line
/// without a trailing newline.
pub fn count_rows<P: AsRef<Path>>(path: P) -> Result<usize> {
    let path = path.as_ref();
    let reader = open_reader(path).map_err(|e| BaselineError::data_load(path, e))?;

    let mut rows = 0;
    for line in reader.split(b'\n') {
        line.map_err(|e| BaselineError::data_load(path, e))?;
        rows += 1;
    }
    Ok(rows)
}

/// Number of distinct values in `labels`.
pub fn count_distinct(labels: &[i64]) -> usize {
    labels.iter().collect::<BTreeSet<_>>().len()
}
