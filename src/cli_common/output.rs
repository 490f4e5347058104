//! Output formatting for the CLI.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

use crate::config::OutputFormat;

/// Console sink for the binary: JSON objects, headers, tables and raw text.
pub struct OutputWriter {
    writer: Box<dyn Write>,
    format: OutputFormat,
    pretty: bool,
}

impl OutputWriter {
    /// Writer over standard output. Compact JSON until [`with_pretty`](Self::with_pretty).
    pub fn stdout(format: OutputFormat) -> Self {
        Self { writer: Box::new(io::stdout()), format, pretty: false }
    }

    #[cfg(test)]
    fn buffer(format: OutputFormat, sink: Box<dyn Write>) -> Self {
        Self { writer: sink, format, pretty: false }
    }

    /// Indented JSON output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// JSON regardless of format; text callers render their own lines.
    pub fn write_object<T: Serialize>(&mut self, obj: &T) -> Result<()> {
        let json = if self.pretty { serde_json::to_string_pretty(obj)? } else { serde_json::to_string(obj)? };
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    /// One line followed by a newline.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    /// Raw text, no trailing newline added.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Bold underlined title in text mode, the bare title in JSON mode.
    pub fn write_header(&mut self, header: &str) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.writer, "\n{}", header.bold().blue())?;
                writeln!(self.writer, "{}", "=".repeat(header.len()).blue())?;
            }
            OutputFormat::Json => writeln!(self.writer, "{}", header)?,
        }
        Ok(())
    }

    /// Aligned columns in text mode, an array of string-valued objects in JSON mode.
    pub fn write_table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                let mut widths = headers.iter().map(|h| h.len()).collect::<Vec<_>>();
                for row in &rows {
                    for (i, cell) in row.iter().enumerate().take(widths.len()) {
                        widths[i] = widths[i].max(cell.len());
                    }
                }

                let header_line: Vec<String> =
                    headers.iter().zip(&widths).map(|(h, w)| format!("{:w$}", h, w = *w)).collect();
                writeln!(self.writer, "{}", header_line.join(" │ ").bold())?;
                let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
                writeln!(self.writer, "{}", rule.join("─┼─"))?;

                for row in rows {
                    let cells: Vec<String> = row
                        .iter()
                        .enumerate()
                        .map(|(i, cell)| match widths.get(i) {
                            Some(w) => format!("{:w$}", cell, w = *w),
                            None => cell.clone(),
                        })
                        .collect();
                    writeln!(self.writer, "{}", cells.join(" │ ").trim_end())?;
                }
            }
            OutputFormat::Json => {
                let objects: Vec<serde_json::Value> = rows
                    .into_iter()
                    .map(|row| {
                        let obj = headers
                            .iter()
                            .zip(row)
                            .map(|(h, cell)| (h.to_string(), serde_json::Value::String(cell)))
                            .collect();
                        serde_json::Value::Object(obj)
                    })
                    .collect();
                self.write_object(&objects)?;
            }
        }
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Summary block for `stats`.
#[derive(Debug, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub synthetic: usize,
    pub categories: Vec<(String, usize)>,
    pub duration: Option<String>,
}

impl Statistics {
    /// Renders the summary in the writer's format.
    pub fn write(&self, writer: &mut OutputWriter) -> Result<()> {
        match writer.format {
            OutputFormat::Json => writer.write_object(self)?,
            OutputFormat::Text => {
                writer.write_header("Statistics")?;
                writer.write_line(&format!("Total nodes: {}", self.total))?;
                writer.write_line(&format!("Synthetic nodes: {}", self.synthetic))?;

                if !self.categories.is_empty() {
                    writer.write_line("\nBy type:")?;
                    for (category, count) in &self.categories {
                        writer.write_line(&format!("  {}: {}", category, count))?;
                    }
                }

                if let Some(duration) = &self.duration {
                    writer.write_line(&format!("\nDuration: {}", duration))?;
                }
            }
        }
        Ok(())
    }
}
