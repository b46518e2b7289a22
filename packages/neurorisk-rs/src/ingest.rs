//! Recording ingest: ASCII matrix files to channel-major sample arrays.
//!
//! The on-disk layout is rows = samples, columns = channels, separated by
//! whitespace or commas. `#` lines are comments. An optional non-numeric
//! first row is taken as channel labels.

use std::path::Path;

use crate::error::{EngineError, Result};
use crate::mmap_utils::mmap_file;
use crate::types::TimeRange;

/// Supported recording file extensions
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ascii", "txt", "csv", "tsv", "dat"];

/// Check whether a file extension is one we can ingest.
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// A multichannel recording held channel-major: `data[channel][sample]`.
#[derive(Debug, Clone)]
pub struct Recording {
    pub labels: Vec<String>,
    pub data: Vec<Vec<f64>>,
    pub sampling_rate: f64,
}

impl Recording {
    /// Load a recording from an ASCII matrix file through a read-only mmap.
    pub fn from_ascii<P: AsRef<Path>>(path: P, sampling_rate: f64) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EngineError::FileNotFound(path.display().to_string()));
        }
        if sampling_rate <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "Sampling rate must be positive (got {})",
                sampling_rate
            )));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !is_supported_extension(ext) {
            return Err(EngineError::UnsupportedFileType(format!(
                "'{}'. Supported: {}",
                ext,
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }

        let mmap = mmap_file(path)?;
        let (header, rows) = parse_ascii_matrix(&mmap)?;

        let n_channels = rows[0].len();
        let n_samples = rows.len();
        log::info!(
            "Loaded {}: {} channels, {} samples",
            path.display(),
            n_channels,
            n_samples
        );

        // Transpose to channel-major
        let mut data = vec![Vec::with_capacity(n_samples); n_channels];
        for row in &rows {
            for (ch, &value) in row.iter().enumerate() {
                data[ch].push(value);
            }
        }

        let labels = match header {
            Some(labels) => labels,
            None => (0..n_channels).map(|i| format!("Ch{}", i + 1)).collect(),
        };

        Ok(Self {
            labels,
            data,
            sampling_rate,
        })
    }

    pub fn n_channels(&self) -> usize {
        self.data.len()
    }

    pub fn n_samples(&self) -> usize {
        self.data.first().map(Vec::len).unwrap_or(0)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.n_samples() as f64 / self.sampling_rate
    }

    /// Restrict to the given 0-based channel indices, in the given order.
    pub fn select_channels(&mut self, channels: &[usize]) -> Result<()> {
        if channels.is_empty() {
            return Err(EngineError::InvalidParameter(
                "At least one channel must be selected".to_string(),
            ));
        }
        for &ch in channels {
            if ch >= self.n_channels() {
                return Err(EngineError::InvalidParameter(format!(
                    "Channel index {} out of range (recording has {} channels)",
                    ch,
                    self.n_channels()
                )));
            }
        }

        self.data = channels.iter().map(|&ch| self.data[ch].clone()).collect();
        self.labels = channels.iter().map(|&ch| self.labels[ch].clone()).collect();
        Ok(())
    }

    /// Restrict to a time range in seconds. The end is clamped to the
    /// recording length.
    pub fn crop(&mut self, range: TimeRange) -> Result<()> {
        if range.start < 0.0 || range.end <= range.start {
            return Err(EngineError::InvalidParameter(format!(
                "Invalid time range [{}, {}]",
                range.start, range.end
            )));
        }

        let start = (range.start * self.sampling_rate) as usize;
        let end = ((range.end * self.sampling_rate) as usize).min(self.n_samples());
        if start >= end {
            return Err(EngineError::InvalidParameter(format!(
                "Time range [{}, {}] is outside the recording ({:.2}s)",
                range.start,
                range.end,
                self.duration_seconds()
            )));
        }

        for channel in &mut self.data {
            *channel = channel[start..end].to_vec();
        }
        Ok(())
    }

    /// Mean across channels per sample (global field signal).
    pub fn global_field(&self) -> Vec<f64> {
        let n_channels = self.n_channels() as f64;
        let n_samples = self.n_samples();
        let mut field = vec![0.0; n_samples];
        for channel in &self.data {
            for (i, &v) in channel.iter().enumerate() {
                field[i] += v;
            }
        }
        for v in &mut field {
            *v /= n_channels;
        }
        field
    }
}

/// Load region labels from a text file, one label per line.
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let labels: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        return Err(EngineError::ParseError(format!(
            "No labels found in {}",
            path.display()
        )));
    }
    Ok(labels)
}

/// Load a confound matrix (rows = samples, columns = regressors),
/// returned column-major: `confounds[regressor][sample]`.
pub fn load_confounds<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::FileNotFound(path.display().to_string()));
    }
    let mmap = mmap_file(path)?;
    let (_, rows) = parse_ascii_matrix(&mmap)?;

    let n_cols = rows[0].len();
    let mut columns = vec![Vec::with_capacity(rows.len()); n_cols];
    for row in &rows {
        for (c, &value) in row.iter().enumerate() {
            columns[c].push(value);
        }
    }
    Ok(columns)
}

/// Parse an ASCII numeric matrix from raw bytes.
///
/// Returns the optional header labels and the data rows (samples-major).
/// Rows whose column count deviates from the first data row are skipped
/// with a warning.
pub fn parse_ascii_matrix(content: &[u8]) -> Result<(Option<Vec<String>>, Vec<Vec<f64>>)> {
    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut col_count = 0usize;
    let mut skipped = 0usize;

    for line in content.split(|&b| b == b'\n') {
        let line = trim_ascii(line);
        if line.is_empty() || line[0] == b'#' {
            continue;
        }

        let tokens = split_tokens(line);
        if tokens.is_empty() {
            continue;
        }

        let mut values = Vec::with_capacity(tokens.len());
        let mut numeric = true;
        for token in &tokens {
            match std::str::from_utf8(token).ok().and_then(|s| s.parse::<f64>().ok()) {
                Some(v) if v.is_finite() => values.push(v),
                _ => {
                    numeric = false;
                    break;
                }
            }
        }

        if !numeric {
            // A non-numeric first row is the channel label header
            if rows.is_empty() && header.is_none() {
                header = Some(
                    tokens
                        .iter()
                        .map(|t| String::from_utf8_lossy(t).into_owned())
                        .collect(),
                );
                continue;
            }
            skipped += 1;
            continue;
        }

        if rows.is_empty() {
            col_count = values.len();
        } else if values.len() != col_count {
            log::warn!(
                "Row {} has inconsistent column count ({} vs {}), skipping",
                rows.len(),
                values.len(),
                col_count
            );
            skipped += 1;
            continue;
        }

        rows.push(values);
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed row(s)", skipped);
    }

    if rows.is_empty() {
        return Err(EngineError::ParseError(
            "No numeric data found in input".to_string(),
        ));
    }

    if let Some(ref labels) = header {
        if labels.len() != col_count {
            return Err(EngineError::ParseError(format!(
                "Header has {} labels but data rows have {} columns",
                labels.len(),
                col_count
            )));
        }
    }

    Ok((header, rows))
}

fn trim_ascii(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map(|i| i + 1)
        .unwrap_or(start);
    &line[start..end]
}

fn split_tokens(line: &[u8]) -> Vec<&[u8]> {
    line.split(|&b| b.is_ascii_whitespace() || b == b',')
        .filter(|t| !t.is_empty())
        .collect()
}
