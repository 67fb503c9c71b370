//! Plain numeric CSV files.
//!
//! The first column is the independent variable (time or sample index) and
//! every further column is one channel. There is no header row.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{FilterError, Result};
use crate::paths::ensure_extension;

/// Write `x` and one column per channel, appending `.csv` if missing.
///
/// Returns the path actually written.
pub fn write_csv<P: AsRef<Path>>(path: P, x: &[f64], channels: &[Vec<f64>]) -> Result<PathBuf> {
    let path = ensure_extension(path.as_ref(), "csv");
    if let Some(bad) = channels.iter().find(|c| c.len() != x.len()) {
        return Err(FilterError::ChannelLengthMismatch {
            expected: x.len(),
            actual: bad.len(),
        });
    }

    let unwritable = |source| FilterError::FileUnwritable {
        path: path.clone(),
        source,
    };
    let file = File::create(&path).map_err(unwritable)?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, x, channels).map_err(unwritable)?;
    writer.flush().map_err(unwritable)?;

    log::info!(
        "Wrote {} rows x {} columns to {}",
        x.len(),
        channels.len() + 1,
        path.display()
    );
    Ok(path)
}

fn write_rows<W: Write>(writer: &mut W, x: &[f64], channels: &[Vec<f64>]) -> std::io::Result<()> {
    for (i, xi) in x.iter().enumerate() {
        write!(writer, "{}", xi)?;
        for channel in channels {
            write!(writer, ",{}", channel[i])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Read a CSV file into columns, appending `.csv` to the path if missing
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let path = ensure_extension(path.as_ref(), "csv");
    let content = fs::read_to_string(&path).map_err(|source| FilterError::FileUnreadable {
        path: path.clone(),
        source,
    })?;
    log::info!("Reading CSV file {}", path.display());
    parse_csv(&content)
}

/// Parse CSV text into columns
///
/// Blank lines are skipped. Every row must have as many fields as the first.
pub fn parse_csv(content: &str) -> Result<Vec<Vec<f64>>> {
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (index, row) in content.lines().enumerate() {
        let line = index + 1;
        if row.trim().is_empty() {
            continue;
        }

        let values = row
            .split(',')
            .map(|field| {
                let field = field.trim();
                field.parse::<f64>().map_err(|_| FilterError::MalformedCsv {
                    line,
                    reason: format!("not a number: {:?}", field),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if columns.is_empty() {
            columns = values.into_iter().map(|v| vec![v]).collect();
            continue;
        }

        if values.len() != columns.len() {
            return Err(FilterError::MalformedCsv {
                line,
                reason: format!("expected {} fields, got {}", columns.len(), values.len()),
            });
        }
        for (column, value) in columns.iter_mut().zip(values) {
            column.push(value);
        }
    }

    if columns.is_empty() {
        return Err(FilterError::MalformedCsv {
            line: 1,
            reason: "no data rows".to_string(),
        });
    }
    Ok(columns)
}
