//! Output layer shared by every subcommand.
//!
//! Each handler gets an [`OutputMode`] and renders its report through
//! [`render_mode`]: framed sections for people, `key=value` lines for
//! scripts, or pretty-printed JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--json`
//! 2. `--format pretty|text|json`
//! 3. `FORMAT` env var
//! 4. `[output] format` in the config file
//! 5. [`OutputMode::Pretty`] if stdout is a TTY, [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use dagreach_core::GraphError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Width of the rule under pretty section headings.
pub const PRETTY_RULE_WIDTH: usize = 60;

pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Section heading followed by a rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Left-aligned `key: value` line.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<22} {}", format!("{key}:"), value.as_ref())
}

/// `key=value` line for text mode.
pub fn text_kv(w: &mut dyn Write, key: &str, value: impl std::fmt::Display) -> io::Result<()> {
    writeln!(w, "{key}={value}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sections and aligned labels for terminals.
    Pretty,
    /// One `key=value` per line, stable for grep and awk.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some(Self::Pretty),
            "text" | "table" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Pure resolution logic; unknown env or config values fall through.
fn resolve_output_mode_inner(
    json_flag: bool,
    format_flag: Option<OutputMode>,
    format_env: Option<&str>,
    config_format: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }
    if let Some(mode) = format_flag {
        return mode;
    }
    if let Some(mode) = format_env.and_then(OutputMode::parse) {
        return mode;
    }
    if let Some(mode) = config_format.and_then(OutputMode::parse) {
        return mode;
    }
    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from flags, `FORMAT`, config and TTY detection.
pub fn resolve_output_mode(
    json_flag: bool,
    format_flag: Option<OutputMode>,
    config_format: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    resolve_output_mode_inner(
        json_flag,
        format_flag,
        env_val.as_deref(),
        config_format,
        io::stdout().is_terminal(),
    )
}

/// Render a serializable report to stdout with explicit text and pretty
/// renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_mode(&mut out, mode, value, text_fn, pretty_fn)
}

fn write_mode<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Stable `E####` code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Input file the error belongs to, for batch commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
            input: None,
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        suggestion: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            error_code: Some(error_code.into()),
            input: None,
        }
    }

    #[must_use]
    pub fn for_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

impl From<&GraphError> for CliError {
    fn from(err: &GraphError) -> Self {
        let code = err.code();
        Self {
            message: err.to_string(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
            input: None,
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match (&error.input, &error.error_code) {
                (Some(input), Some(code)) => {
                    writeln!(out, "error[{code}]: {input}: {}", error.message)?;
                }
                (Some(input), None) => writeln!(out, "error: {input}: {}", error.message)?,
                (None, Some(code)) => writeln!(out, "error[{code}]: {}", error.message)?,
                (None, None) => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── resolution ──────────────────────────────────────────────────────────

    #[test]
    fn json_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            true,
            Some(OutputMode::Pretty),
            Some("text"),
            Some("pretty"),
            true,
        );
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn format_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(false, Some(OutputMode::Text), Some("json"), None, true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn env_wins_over_config() {
        let mode = resolve_output_mode_inner(false, None, Some("JSON"), Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn config_used_when_env_unknown() {
        let mode = resolve_output_mode_inner(false, None, Some("yaml"), Some("table"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn tty_fallback() {
        assert_eq!(
            resolve_output_mode_inner(false, None, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(false, None, None, None, false),
            OutputMode::Text
        );
    }

    // ── rendering ───────────────────────────────────────────────────────────

    #[derive(Serialize)]
    struct Sample {
        ratio: f64,
    }

    fn rendered(mode: OutputMode) -> String {
        let mut buf = Vec::new();
        write_mode(
            &mut buf,
            mode,
            &Sample { ratio: 0.5 },
            |s, w| text_kv(w, "ratio", s.ratio),
            |s, w| pretty_kv(w, "Ratio", format!("{:.3}", s.ratio)),
        )
        .expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn render_dispatches_by_mode() {
        assert_eq!(rendered(OutputMode::Text), "ratio=0.5\n");
        assert!(rendered(OutputMode::Pretty).starts_with("Ratio:"));
        let json: serde_json::Value =
            serde_json::from_str(&rendered(OutputMode::Json)).expect("valid json");
        assert_eq!(json["ratio"], 0.5);
    }

    // ── errors ──────────────────────────────────────────────────────────────

    #[test]
    fn graph_error_carries_code_and_hint() {
        let err = GraphError::CyclicGraph {
            remaining: 3,
            sample: vec![0, 1, 2],
        };
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn error_text_names_input_and_code() {
        let mut buf = Vec::new();
        let err = CliError::with_details("bad line", "fix it", "E1003").for_input("g.txt");
        write_error(&mut buf, OutputMode::Text, &err).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("error[E1003]: g.txt: bad line"));
        assert!(text.contains("suggestion: fix it"));
    }

    #[test]
    fn error_json_is_wrapped() {
        let mut buf = Vec::new();
        write_error(&mut buf, OutputMode::Json, &CliError::new("boom")).expect("render");
        let json: serde_json::Value = serde_json::from_slice(&buf).expect("valid json");
        assert_eq!(json["error"]["message"], "boom");
        assert!(json["error"].get("suggestion").is_none());
    }
}
