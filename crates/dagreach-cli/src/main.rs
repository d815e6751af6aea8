#![forbid(unsafe_code)]

mod cmd;
mod edgelist;
mod output;

use std::env;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use dagreach_core::ErrorCode;
use dagreach_core::config::{self, Config};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "dagreach",
    author,
    version,
    about = "dagreach: SCC condensation and exact DAG reachability ratios",
    long_about = None
)]
struct Cli {
    /// More logging on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Config file to use instead of ./dagreach.toml and the user config.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Collapse SCCs and write the DAG and mapping files",
        long_about = "Collapse every strongly connected component to one representative node.\n\
                      Writes `<stem>_DAG` (one `u v` edge per line) and `<stem>_mapping`\n\
                      (one `node representative` pair per line), both sorted.",
        after_help = "EXAMPLES:\n    # Condense one graph next to its input\n    dagreach condense web.txt\n\n    # Condense several graphs into one directory\n    dagreach condense a.txt b.txt --out-dir dags/"
    )]
    Condense(cmd::condense::CondenseArgs),

    #[command(
        about = "Compute the exact reachability ratio of a DAG",
        long_about = "Count ordered pairs (u, v), u != v, with v reachable from u, and divide by n(n-1).\n\
                      Cyclic input is rejected unless --condense is given.",
        after_help = "EXAMPLES:\n    # Ratio of an already condensed graph\n    dagreach ratio web_DAG\n\n    # Condense first, then count\n    dagreach ratio web.txt --condense\n\n    # Emit machine-readable output\n    dagreach ratio web_DAG --json"
    )]
    Ratio(cmd::ratio::RatioArgs),

    #[command(
        about = "Print SCC, WCC and degree statistics",
        after_help = "EXAMPLES:\n    dagreach stats web.txt\n    dagreach stats a.txt b.txt --format text"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "Condense, validate and count in one pass",
        long_about = "Run every stage and report both the condensation's ratio and the\n\
                      original graph's ratio computed through the condensation.",
        after_help = "EXAMPLES:\n    dagreach run web.txt\n    dagreach run web.txt --json"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    dagreach completions bash > /etc/bash_completion.d/dagreach"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else if verbose >= 2 || env::var("DEBUG").is_ok() {
        "dagreach=debug,dagreach_core=debug,info"
    } else if verbose == 1 {
        "dagreach=info,dagreach_core=info,warn"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("DAGREACH_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));

    let format = env::var("DAGREACH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let project_root = env::current_dir()?;
    match config::resolve_config(&project_root, cli.config.as_deref()) {
        Ok(config) => Ok(config),
        Err(err) => {
            let code = ErrorCode::ConfigParseError;
            render_error(
                resolve_output_mode(cli.json, cli.format, None),
                &CliError::with_details(
                    format!("{err:#}"),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            Err(err)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = load_config(&cli)?;
    let output = resolve_output_mode(cli.json, cli.format, config.output.format.as_deref());
    debug!(?output, "output mode resolved");

    match cli.command {
        Commands::Condense(ref args) => cmd::condense::run_condense(args, output, &config),
        Commands::Ratio(ref args) => cmd::ratio::run_ratio(args, output, &config),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, output, &config),
        Commands::Run(ref args) => cmd::run::run_pipeline(args, output, &config),
        Commands::Completions(ref args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["dagreach", "ratio", "g.txt", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::parse_from(["dagreach", "-vv", "stats", "g.txt"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["dagreach", "-q", "-v", "stats", "g.txt"]).is_err());
    }

    #[test]
    fn ratio_flags_parse() {
        let cli = Cli::parse_from([
            "dagreach",
            "ratio",
            "a.txt",
            "b.txt",
            "--condense",
            "--retain-sets",
            "out",
            "--representation",
            "bitset",
        ]);
        let Commands::Ratio(args) = cli.command else {
            panic!("expected ratio");
        };
        assert_eq!(args.inputs.len(), 2);
        assert!(args.condense);
        assert_eq!(args.retain_sets, Some(PathBuf::from("out")));
        assert_eq!(
            args.representation,
            Some(cmd::ratio::RepresentationArg::Bitset)
        );
    }

    #[test]
    fn inputs_are_required() {
        for sub in ["condense", "ratio", "stats", "run"] {
            assert!(Cli::try_parse_from(["dagreach", sub]).is_err(), "{sub}");
        }
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["dagreach", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Zsh,
            })
        ));
    }

    #[test]
    fn format_and_config_are_global() {
        let cli = Cli::parse_from([
            "dagreach",
            "stats",
            "g.txt",
            "--format",
            "text",
            "--config",
            "c.toml",
        ]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }
}
