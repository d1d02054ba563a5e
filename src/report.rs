//! Report sinks for benchmark results.
//!
//! Every driver emits the same line-oriented text to two places: the console
//! and an overwritten artifact file. [`Report`] fans lines out to any number
//! of labeled [`Write`] sinks so the drivers format each line exactly once.
//!
//! Artifact layout: title line, size-description line, generated-at line,
//! blank line, column header, then one row per measurement in evaluation
//! order.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::error::{report_error, Result};

/// Line-oriented writer fanning out to labeled sinks.
pub struct Report<'a> {
    sinks: Vec<(String, &'a mut dyn Write)>,
}

impl<'a> Report<'a> {
    pub fn new() -> Self {
        Report { sinks: Vec::new() }
    }

    /// Registers a sink. The label identifies the sink in error diagnostics.
    pub fn add_sink(&mut self, label: impl Into<String>, sink: &'a mut dyn Write) {
        self.sinks.push((label.into(), sink));
    }

    /// Writes one line to every sink.
    pub fn line(&mut self, text: &str) -> Result<()> {
        for (label, sink) in self.sinks.iter_mut() {
            writeln!(sink, "{}", text).map_err(|e| report_error(label.clone(), e.to_string()))?;
        }
        Ok(())
    }

    /// Writes the title block: title, size line, generated-at stamp, blank.
    pub fn preamble(&mut self, title: &str, size_line: &str) -> Result<()> {
        self.line(title)?;
        self.line(size_line)?;
        self.line(&format!(
            "Generated: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;
        self.line("")
    }

    /// Writes the column header line.
    pub fn columns(&mut self, header: &str) -> Result<()> {
        self.line(header)
    }

    /// Writes one measurement row.
    pub fn row(&mut self, line: &str) -> Result<()> {
        self.line(line)
    }
}

impl Default for Report<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates (or truncates) the report artifact at `path`.
///
/// Open failure is fatal to the run and maps to
/// [`TilebenchError::ReportError`](crate::TilebenchError).
pub fn create_report_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| report_error(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_fans_out_to_all_sinks() {
        let mut first: Vec<u8> = Vec::new();
        let mut second: Vec<u8> = Vec::new();

        {
            let mut report = Report::new();
            report.add_sink("first", &mut first);
            report.add_sink("second", &mut second);
            report.columns("Block Size, Time (msec)").unwrap();
            report.row("8, 12.34").unwrap();
        }

        let first = String::from_utf8(first).unwrap();
        let second = String::from_utf8(second).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "Block Size, Time (msec)\n8, 12.34\n");
    }

    #[test]
    fn test_preamble_shape() {
        let mut out: Vec<u8> = Vec::new();

        {
            let mut report = Report::new();
            report.add_sink("out", &mut out);
            report
                .preamble("Performance Analysis", "Matrix size: 4 x 4")
                .unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Performance Analysis");
        assert_eq!(lines[1], "Matrix size: 4 x 4");
        assert!(lines[2].starts_with("Generated: "));
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_create_report_file_reports_the_path() {
        let path = Path::new("/nonexistent-dir-tilebench/report.txt");
        let err = create_report_file(path).unwrap_err();
        let display = format!("{}", err);
        assert!(display.contains("Report sink failure"));
        assert!(display.contains("nonexistent-dir-tilebench"));
    }
}
