//! Output formatting and writing utilities
//!
//! Command results go to stdout in the selected format. Status lines,
//! warnings and errors go to stderr so that machine-readable output stays
//! clean.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;
use vmspec_core::{MigrationWarning, ValidationError, ValidationErrors};

/// Formatting of values and reports in each output format
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format validation errors with detailed violation reporting
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            // Specs are written by hand as YAML, so that is the human form
            OutputFormat::Yaml | OutputFormat::Human => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_errors_human(errors)),
            _ => self.format(errors),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
    diagnostics: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout and stderr
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writers(
            format,
            use_color,
            quiet,
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    /// Create an output writer with custom writers
    pub fn with_writers(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
        diagnostics: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
            diagnostics,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    fn note(&mut self, content: &str) -> Result<()> {
        writeln!(self.diagnostics, "{}", content)?;
        self.diagnostics.flush()?;
        Ok(())
    }

    /// Write a status message; human format only
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        let line = if self.use_color {
            format!("{} {}", "ℹ".blue(), message)
        } else {
            format!("INFO: {}", message)
        };
        self.note(&line)
    }

    /// Write a success message; human format only
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        let line = if self.use_color {
            message.green().to_string()
        } else {
            message.to_string()
        };
        self.note(&line)
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.use_color {
            format!("{} {}", "warning:".yellow().bold(), message)
        } else {
            format!("WARNING: {}", message)
        };
        self.note(&line)
    }

    /// Write every migration warning
    pub fn migration_warnings(&mut self, warnings: &[MigrationWarning]) -> Result<()> {
        for warning in warnings {
            self.warning(&warning.to_string())?;
        }
        Ok(())
    }

    /// Write validation errors. Human output goes to stderr, machine
    /// formats to stdout.
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        let formatted = self.format.format_validation_errors(errors)?;
        if self.format == OutputFormat::Human {
            let header = format!("✗ {} violation(s) found", errors.len());
            let header = if self.use_color {
                header.red().bold().to_string()
            } else {
                header
            };
            self.note(&header)?;
            self.note(formatted.trim_end())
        } else {
            self.write(&with_newline(formatted))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Writing data");
        self.write(&with_newline(formatted))
    }
}

fn with_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Format validation errors for human reading
fn format_validation_errors_human(errors: &ValidationErrors) -> String {
    let mut output = String::new();

    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, format_validation_error_human(error)));
    }

    output
}

/// Format a single validation error for human reading
fn format_validation_error_human(error: &ValidationError) -> String {
    let mut output = format!("{}: {}", error.path, error.message);

    for violation in &error.violations {
        output.push_str(&format!(
            "\n   rule: {}, expected: {}, actual: {}",
            violation.rule, violation.expected, violation.actual
        ));
    }

    output
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Shared in-memory sink
    #[derive(Clone, Default)]
    pub(crate) struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::Buffer;

    fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, Buffer, Buffer) {
        let out = Buffer::default();
        let err = Buffer::default();
        let writer = OutputWriter::with_writers(
            format,
            false,
            quiet,
            Box::new(out.clone()),
            Box::new(err.clone()),
        );
        (writer, out, err)
    }

    fn sample_errors() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::with_violations(
            "$.networks[0]",
            "exactly one of lima and vnl must be set, found both set",
            vec![ValidationError::create_violation(
                "mutually_exclusive",
                "exactly one of lima, vnl",
                "both set",
            )],
        ));
        errors.add(ValidationError::new("$.cpus", "cpus must be greater than zero"));
        errors
    }

    #[test]
    fn test_human_validation_errors() {
        let (mut output, out, err) = writer(OutputFormat::Human, false);
        output.validation_errors(&sample_errors()).unwrap();

        assert!(out.contents().is_empty());
        let text = err.contents();
        assert!(text.contains("2 violation(s) found"));
        assert!(text.contains("1. $.networks[0]: exactly one of lima and vnl"));
        assert!(text.contains("rule: mutually_exclusive"));
        assert!(text.contains("2. $.cpus: cpus must be greater than zero"));
    }

    #[test]
    fn test_json_validation_errors() {
        let (mut output, out, _) = writer(OutputFormat::Json, false);
        output.validation_errors(&sample_errors()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out.contents()).unwrap();
        assert_eq!(value["errors"][0]["path"], "$.networks[0]");
        assert_eq!(value["errors"][1]["path"], "$.cpus");
    }

    #[test]
    fn test_status_lines_only_in_human_format() {
        let (mut output, out, err) = writer(OutputFormat::Yaml, false);
        output.info("checking").unwrap();
        output.success("ok").unwrap();
        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_quiet_suppresses_warnings() {
        let (mut output, _, err) = writer(OutputFormat::Human, true);
        output.warning("legacy field").unwrap();
        assert!(err.contents().is_empty());

        let (mut output, _, err) = writer(OutputFormat::Human, false);
        output.warning("legacy field").unwrap();
        assert_eq!(err.contents(), "WARNING: legacy field\n");
    }

    #[test]
    fn test_data_formats() {
        #[derive(Serialize)]
        struct Sample {
            cpus: u32,
        }

        let (mut output, out, _) = writer(OutputFormat::Json, false);
        output.data(&Sample { cpus: 4 }).unwrap();
        assert_eq!(out.contents(), "{\"cpus\":4}\n");

        let (mut output, out, _) = writer(OutputFormat::Yaml, false);
        output.data(&Sample { cpus: 4 }).unwrap();
        assert_eq!(out.contents(), "cpus: 4\n");
    }
}
