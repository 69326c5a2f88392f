use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::image_pipeline::common::error::{PaiError, Result};
use crate::image_pipeline::estimation::{ImageAnalysis, ImageState};
use crate::image_pipeline::selection::parse_timestamp;

/// Name prefix of the screened image list written by the blur screen.
pub const INPUT_TABLE_PREFIX: &str = "1_blurscreen";

pub const OUTPUT_HEADER: &str =
    "timestamp,name,lmxb,lmxc,rmxb,rmxc,rb_l,rb_r,sky,minpixarea,GF,CC,CP,PAI,status";

/// One photograph listed in the input table.
///
/// Ordering is by timestamp first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InputRow {
    pub timestamp: NaiveDateTime,
    /// Timestamp exactly as written in the table, echoed into the output
    pub timestamp_text: String,
    /// Image path relative to the camera directory
    pub filename: String,
}

/// One output row. `None` fields are written as `-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResult {
    pub timestamp: String,
    pub name: String,
    pub left_peak_edge: Option<u32>,
    pub left_peak_count: Option<u64>,
    pub right_peak_edge: Option<u32>,
    pub right_peak_count: Option<u64>,
    pub rosin_left_edge: Option<u32>,
    pub rosin_right_edge: Option<u32>,
    pub sky_index: Option<f64>,
    pub min_large_gap_pct: Option<f64>,
    pub gap_fraction: Option<f64>,
    pub crown_cover: Option<f64>,
    pub crown_porosity: Option<f64>,
    pub pai: Option<f64>,
    pub state: ImageState,
}

impl ImageResult {
    pub fn from_analysis(row: &InputRow, analysis: &ImageAnalysis) -> Self {
        let histogram = &analysis.histogram;
        let gaps = analysis.gaps.as_ref().map(|g| &g.stats);
        Self {
            timestamp: row.timestamp_text.clone(),
            name: row.filename.clone(),
            left_peak_edge: Some(histogram.edge(analysis.peaks.left.bin)),
            left_peak_count: Some(analysis.peaks.left.count),
            right_peak_edge: Some(histogram.edge(analysis.peaks.right.bin)),
            right_peak_count: Some(analysis.peaks.right.count),
            rosin_left_edge: analysis.rosin.map(|c| histogram.edge(c.left_cut_bin)),
            rosin_right_edge: analysis.rosin.map(|c| histogram.edge(c.right_cut_bin)),
            sky_index: analysis.sky.map(|s| s.sky_index),
            min_large_gap_pct: gaps.and_then(|g| g.min_large_gap_pct),
            gap_fraction: gaps.map(|g| g.gap_fraction),
            crown_cover: gaps.map(|g| g.crown_cover),
            crown_porosity: analysis.crown_porosity,
            pai: analysis.pai,
            state: analysis.state,
        }
    }

    pub fn load_failed(row: &InputRow) -> Self {
        Self {
            timestamp: row.timestamp_text.clone(),
            name: row.filename.clone(),
            left_peak_edge: None,
            left_peak_count: None,
            right_peak_edge: None,
            right_peak_count: None,
            rosin_left_edge: None,
            rosin_right_edge: None,
            sky_index: None,
            min_large_gap_pct: None,
            gap_fraction: None,
            crown_cover: None,
            crown_porosity: None,
            pai: None,
            state: ImageState::LoadFailed,
        }
    }

    fn to_csv_line(&self) -> String {
        let fields = [
            csv_field(&self.timestamp),
            csv_field(&self.name),
            or_missing(self.left_peak_edge),
            or_missing(self.left_peak_count),
            or_missing(self.right_peak_edge),
            or_missing(self.right_peak_count),
            or_missing(self.rosin_left_edge),
            or_missing(self.rosin_right_edge),
            or_missing(self.sky_index),
            or_missing(self.min_large_gap_pct),
            or_missing(self.gap_fraction),
            or_missing(self.crown_cover),
            or_missing(self.crown_porosity),
            or_missing(self.pai),
            self.state.as_str().to_string(),
        ];
        fields.join(",")
    }
}

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-1".to_string(), |v| v.to_string())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Splits one line on commas, honouring double-quoted fields.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// First file in `camera_dir`, by name, that looks like a screened image list.
pub fn discover_input_table(camera_dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(camera_dir)
        .map_err(|e| PaiError::Table(format!("{}: {}", camera_dir.display(), e)))?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(INPUT_TABLE_PREFIX) && n.ends_with(".csv"))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next().ok_or_else(|| {
        PaiError::Table(format!(
            "no {INPUT_TABLE_PREFIX}*.csv in {}",
            camera_dir.display()
        ))
    })
}

/// Reads the image list: first column is the timestamp, the `file` column
/// (or `name`) holds the image filename.
pub fn read_input_table(path: &Path) -> Result<Vec<InputRow>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PaiError::Table(format!("{}: {}", path.display(), e)))?;
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| PaiError::Table(format!("{}: empty table", path.display())))?;
    let header = split_csv_line(header.trim_start_matches('\u{feff}'));
    let file_column = header
        .iter()
        .position(|h| h == "file")
        .or_else(|| header.iter().position(|h| h == "name"))
        .ok_or_else(|| {
            PaiError::Table(format!("{}: no 'file' or 'name' column", path.display()))
        })?;

    lines
        .map(|(index, line)| {
            let fields = split_csv_line(line);
            let (Some(timestamp_text), Some(filename)) = (fields.first(), fields.get(file_column))
            else {
                return Err(PaiError::Table(format!(
                    "{}:{}: expected at least {} fields",
                    path.display(),
                    index + 1,
                    file_column + 1
                )));
            };
            Ok(InputRow {
                timestamp: parse_timestamp(timestamp_text)?,
                timestamp_text: timestamp_text.clone(),
                filename: filename.clone(),
            })
        })
        .collect()
}

/// `<camera_dir>/2_process_<camera_dir_name>.csv`
pub fn output_table_path(camera_dir: &Path) -> PathBuf {
    let name = camera_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    camera_dir.join(format!("2_process_{name}.csv"))
}

pub fn write_output_table(path: &Path, results: &[ImageResult]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| PaiError::OutputWrite(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{OUTPUT_HEADER}")?;
    for result in results {
        writeln!(writer, "{}", result.to_csv_line())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn parse_output_line(line: &str) -> Vec<String> {
    split_csv_line(line)
}
