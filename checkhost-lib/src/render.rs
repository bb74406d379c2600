//! Column-aligned report rendering.
//!
//! A [`ReportRenderer`] is built for a single row. It turns a [`HeaderSpec`]
//! into header lines, pairs its row with the header widths to produce a data
//! line, styles the stdout echo by status, and appends plain lines to the
//! report file behind a provenance preamble written once per file.

use crate::error::CheckhostError;
use crate::header::HeaderSpec;
use crate::types::{RenderMode, Status};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use console::Style;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Character used for the rule line under a tabular header.
pub const DEFAULT_SEPARATOR: char = '-';

/// Renders one row (and optionally its header) to stdout and a report file.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    row: Option<Vec<String>>,
    mode: RenderMode,
    output_file: Option<PathBuf>,
    only_on_file: bool,
    colour: bool,
    currently_used_header: Option<HeaderSpec>,
}

impl ReportRenderer {
    /// Create a renderer.
    ///
    /// # Arguments
    ///
    /// * `row` - Values to render, `None` when only headers are needed
    /// * `mode` - Layout and styling of the lines
    /// * `output_file` - Report file, `None` for stdout only
    /// * `only_on_file` - Suppress the stdout echo
    pub fn new<P: Into<PathBuf>>(
        row: Option<Vec<String>>,
        mode: RenderMode,
        output_file: Option<P>,
        only_on_file: bool,
    ) -> Self {
        Self {
            row,
            mode,
            output_file: output_file.map(Into::into),
            only_on_file,
            colour: true,
            currently_used_header: None,
        }
    }

    /// Set the header used by [`data`](Self::data) and the file preamble.
    pub fn with_header(mut self, header: HeaderSpec) -> Self {
        self.currently_used_header = Some(header);
        self
    }

    /// Enable or disable styling of the stdout echo.
    pub fn with_colour(mut self, colour: bool) -> Self {
        self.colour = colour;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn currently_used_header(&self) -> Option<&HeaderSpec> {
        self.currently_used_header.as_ref()
    }

    /// Build the header lines for `header`.
    ///
    /// Tabular modes pad every name to `max(width, len(name)) + 1` and, when
    /// `separator` is set, add a rule line of the same widths. Hosts mode joins
    /// the names with a single space and never adds a rule.
    pub fn header_constructor(&self, header: &HeaderSpec, separator: Option<char>) -> Vec<String> {
        if !self.mode.is_tabular() {
            return vec![header.names().join(" ")];
        }

        let mut names = String::new();
        let mut rule = String::new();

        for (name, width) in header.iter() {
            let column = column_width(width, name);
            names.push_str(&pad_cell(name, column));

            if let Some(sep) = separator {
                let filled: String = std::iter::repeat(sep).take(column - 1).collect();
                rule.push_str(&pad_cell(&filled, column));
            }
        }

        match separator {
            Some(_) => vec![names, rule],
            None => vec![names],
        }
    }

    /// Pair the stored row positionally with `sizes`.
    ///
    /// Returns one `(value, width)` entry per column, in row order.
    pub fn data_constructor(&self, sizes: &[usize]) -> Result<Vec<(String, usize)>, CheckhostError> {
        let row = self.row.as_deref().unwrap_or(&[]);

        if row.len() != sizes.len() {
            return Err(CheckhostError::size_mismatch(row.len(), sizes.len()));
        }

        Ok(row
            .iter()
            .cloned()
            .zip(sizes.iter().copied())
            .collect())
    }

    /// Widths declared by `header`, in column order.
    pub fn size_from_header(&self, header: &HeaderSpec) -> Vec<usize> {
        header.sizes()
    }

    /// Prefix `line` with the style of the row's status.
    ///
    /// Only [`RenderMode::ColorizedTabular`] is styled, and only when the row
    /// has a second value. Anything other than `UP` or `DOWN` there gets the
    /// unknown-status style.
    pub fn colorify(&self, line: &str) -> String {
        if self.mode != RenderMode::ColorizedTabular {
            return line.to_string();
        }

        let status = self
            .row
            .as_ref()
            .and_then(|row| row.get(1))
            .map(|value| value.parse::<Status>().unwrap_or(Status::Unknown));

        match status {
            Some(status) => status_style(status).apply_to(line).to_string(),
            None => line.to_string(),
        }
    }

    /// Write the provenance preamble if the report file does not exist yet.
    ///
    /// Returns whether the preamble was written. Without an output file this
    /// is a no-op.
    pub fn before_header(&self) -> Result<bool, CheckhostError> {
        self.before_header_at(&Local::now().fixed_offset())
    }

    /// Same as [`before_header`](Self::before_header) with an explicit timestamp.
    pub fn before_header_at(&self, now: &DateTime<FixedOffset>) -> Result<bool, CheckhostError> {
        let Some(path) = &self.output_file else {
            return Ok(false);
        };

        let mut content = format!(
            "# Generated by {} (v{}) / {}\n# Date of generation: {}\n",
            crate::NAME,
            crate::VERSION,
            crate::REPO_LINK,
            now.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        );

        if let Some(header) = &self.currently_used_header {
            for line in self.header_constructor(header, self.rule_separator()) {
                content.push_str(&line);
                content.push('\n');
            }
        }
        content.push('\n');

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(file_error(path, "Failed to create report file", e)),
        };

        file.write_all(content.as_bytes())
            .map_err(|e| file_error(path, "Failed to write report preamble", e))?;

        debug!(path = %path.display(), "wrote report preamble");
        Ok(true)
    }

    /// Render `header`, echo it, and record it as the currently used header.
    ///
    /// A new report file receives the header as part of its preamble; an
    /// existing one gets the lines appended.
    pub fn header(&mut self, header: &HeaderSpec) -> Result<Vec<String>, CheckhostError> {
        self.currently_used_header = Some(header.clone());
        let lines = self.header_constructor(header, self.rule_separator());

        if !self.only_on_file {
            for line in &lines {
                println!("{}", line);
            }
        }

        if let Some(path) = &self.output_file {
            if !self.before_header()? {
                append_lines(path, &lines)?;
            }
        }

        Ok(lines)
    }

    /// Render the stored row against the currently used header.
    ///
    /// The plain line goes to the report file; the stdout echo is styled
    /// through [`colorify`](Self::colorify) when colour is enabled.
    pub fn data(&self) -> Result<String, CheckhostError> {
        let line = self.format_row()?;

        if let Some(path) = &self.output_file {
            self.before_header()?;
            append_lines(path, std::slice::from_ref(&line))?;
        }

        if !self.only_on_file {
            if self.colour {
                println!("{}", self.colorify(&line));
            } else {
                println!("{}", line);
            }
        }

        Ok(line)
    }

    fn format_row(&self) -> Result<String, CheckhostError> {
        if !self.mode.is_tabular() {
            return Ok(self.row.as_deref().unwrap_or(&[]).join(" "));
        }

        let header = self
            .currently_used_header
            .as_ref()
            .ok_or_else(|| CheckhostError::internal("No header selected for tabular row"))?;

        let pairs = self.data_constructor(&self.size_from_header(header))?;

        // Cells line up with the header, whose columns also fit the names.
        Ok(pairs
            .iter()
            .zip(header.names())
            .map(|((value, width), name)| {
                let declared = (*width).max(name.chars().count());
                pad_cell(value, column_width(declared, value))
            })
            .collect())
    }

    fn rule_separator(&self) -> Option<char> {
        if self.mode.is_tabular() {
            Some(DEFAULT_SEPARATOR)
        } else {
            None
        }
    }
}

/// Terminal style for a status: black text on green, red or cyan.
pub fn status_style(status: Status) -> Style {
    let style = Style::new().black().force_styling(true);
    match status {
        Status::Up => style.on_green(),
        Status::Down => style.on_red(),
        Status::Invalid | Status::Unknown => style.on_cyan(),
    }
}

/// Display width of a column: the larger of the declared width and the text,
/// plus one separating space.
fn column_width(declared: usize, text: &str) -> usize {
    declared.max(text.chars().count()) + 1
}

fn pad_cell(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

fn append_lines(path: &Path, lines: &[String]) -> Result<(), CheckhostError> {
    let mut file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| file_error(path, "Failed to open report file", e))?;

    for line in lines {
        writeln!(file, "{}", line).map_err(|e| file_error(path, "Failed to append to report", e))?;
    }

    Ok(())
}

fn file_error(path: &Path, what: &str, err: std::io::Error) -> CheckhostError {
    CheckhostError::file_error(path.to_string_lossy(), format!("{}: {}", what, err))
}
