//! Subcommand handlers.

pub mod completions;
pub mod condense;
pub mod ratio;
pub mod run;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::Context;
use dagreach_core::{ErrorCode, GraphError};
use tracing::warn;

use crate::edgelist::EdgeListError;
use crate::output::{CliError, OutputMode, render_error};

/// Run `per_input` on every input in order.
///
/// A failing input is rendered to stderr and the rest still run; the call
/// fails at the end if any input did.
pub fn for_each_input(
    inputs: &[PathBuf],
    output: OutputMode,
    mut per_input: impl FnMut(&Path) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut failed = 0usize;
    for input in inputs {
        if let Err(err) = per_input(input) {
            warn!(input = %input.display(), error = %format!("{err:#}"), "input failed");
            render_error(output, &cli_error(&err).for_input(input.display().to_string()))?;
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} input(s) failed", inputs.len());
    }
    Ok(())
}

/// Attach a stable error code to whatever went wrong.
pub fn cli_error(err: &anyhow::Error) -> CliError {
    if let Some(graph_err) = err.downcast_ref::<GraphError>() {
        return CliError::from(graph_err);
    }
    let code = if err.downcast_ref::<EdgeListError>().is_some() {
        ErrorCode::EdgeListParseError
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        ErrorCode::IoFailure
    } else {
        return CliError::new(format!("{err:#}"));
    };
    CliError::with_details(format!("{err:#}"), code.hint().unwrap_or_default(), code.code())
}

/// Create `dir` if it was given.
pub fn ensure_dir(dir: Option<&Path>) -> anyhow::Result<()> {
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(())
}
