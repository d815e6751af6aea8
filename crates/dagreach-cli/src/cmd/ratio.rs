//! `dagreach ratio`: exact reachability ratio of DAG edge lists.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use dagreach_core::config::Config;
use dagreach_core::graph::{Condensation, DiGraphStore};
use dagreach_core::reach::{ReachOptions, ReachReport, ReachRepresentation, reach_ratio};
use serde::Serialize;

use crate::cmd::{ensure_dir, for_each_input};
use crate::edgelist::{derived_path, read_edge_list, write_reachable_sets};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, text_kv};

/// Arguments for `dagreach ratio`.
#[derive(Args, Debug)]
pub struct RatioArgs {
    /// DAG edge-list files, processed in order.
    #[arg(required = true, value_name = "EDGES")]
    pub inputs: Vec<PathBuf>,

    /// Condense SCCs first instead of rejecting cyclic input.
    #[arg(long)]
    pub condense: bool,

    /// Write each input's reachable sets to `DIR/<stem>_reach`.
    #[arg(long, value_name = "DIR")]
    pub retain_sets: Option<PathBuf>,

    /// Set representation for the DP (overrides the config file).
    #[arg(long, value_enum)]
    pub representation: Option<RepresentationArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepresentationArg {
    Sets,
    Bitset,
    Auto,
}

impl From<RepresentationArg> for ReachRepresentation {
    fn from(arg: RepresentationArg) -> Self {
        match arg {
            RepresentationArg::Sets => Self::Sets,
            RepresentationArg::Bitset => Self::Bitset,
            RepresentationArg::Auto => Self::Auto,
        }
    }
}

#[derive(Debug, Serialize)]
struct RatioOutput {
    input: String,
    condensed: bool,
    #[serde(flatten)]
    report: ReachReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    sets_path: Option<String>,
}

/// Execute `dagreach ratio`.
pub fn run_ratio(args: &RatioArgs, output: OutputMode, config: &Config) -> anyhow::Result<()> {
    ensure_dir(args.retain_sets.as_deref())?;
    let options = reach_options(args, config);
    for_each_input(&args.inputs, output, |input| {
        let result = ratio_one(input, args, config, &options)?;
        render_mode(output, &result, render_text, render_pretty)
    })
}

fn reach_options(args: &RatioArgs, config: &Config) -> ReachOptions {
    let mut options = config.reach;
    if let Some(repr) = args.representation {
        options.representation = repr.into();
    }
    if args.retain_sets.is_some() {
        options.retain_sets = true;
    }
    options
}

fn ratio_one(
    input: &Path,
    args: &RatioArgs,
    config: &Config,
    options: &ReachOptions,
) -> anyhow::Result<RatioOutput> {
    let graph = read_edge_list(input)?;
    let dag: DiGraphStore = if args.condense {
        Condensation::build(&graph, config.condense.representative).dag
    } else {
        graph
    };

    let mut report = reach_ratio(&dag, options)?;

    let sets_path = match (&args.retain_sets, report.sets.take()) {
        (Some(dir), Some(sets)) => {
            let path = derived_path(input, Some(dir), "_reach");
            write_reachable_sets(&path, &sets)?;
            Some(path.display().to_string())
        }
        _ => None,
    };

    Ok(RatioOutput {
        input: input.display().to_string(),
        condensed: args.condense,
        report,
        sets_path,
    })
}

fn render_text(out: &RatioOutput, w: &mut dyn Write) -> std::io::Result<()> {
    text_kv(w, "input", &out.input)?;
    text_kv(w, "nodes", out.report.node_count)?;
    text_kv(w, "reachable_pairs", out.report.reachable_pairs)?;
    text_kv(w, "total_pairs", out.report.total_pairs)?;
    text_kv(w, "ratio", out.report.ratio)?;
    if let Some(path) = &out.sets_path {
        text_kv(w, "sets", path)?;
    }
    Ok(())
}

fn render_pretty(out: &RatioOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = if out.condensed {
        format!("Reachability of {} (condensed)", out.input)
    } else {
        format!("Reachability of {}", out.input)
    };
    pretty_section(w, &heading)?;
    pretty_kv(w, "Nodes", out.report.node_count.to_string())?;
    pretty_kv(w, "Reachable pairs", out.report.reachable_pairs.to_string())?;
    pretty_kv(w, "Total pairs", out.report.total_pairs.to_string())?;
    pretty_kv(w, "Ratio", format!("{:.6}", out.report.ratio))?;
    pretty_kv(w, "Representation", out.report.representation.as_str())?;
    if let Some(path) = &out.sets_path {
        pretty_kv(w, "Reachable sets", path)?;
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(inputs: Vec<PathBuf>) -> RatioArgs {
        RatioArgs {
            inputs,
            condense: false,
            retain_sets: None,
            representation: None,
        }
    }

    #[test]
    fn flag_overrides_config_representation() {
        let mut a = args(vec![]);
        a.representation = Some(RepresentationArg::Sets);
        a.retain_sets = Some(PathBuf::from("out"));
        let options = reach_options(&a, &Config::default());
        assert_eq!(options.representation, ReachRepresentation::Sets);
        assert!(options.retain_sets);
    }

    #[test]
    fn cyclic_input_fails_unless_condensed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("tri.txt");
        std::fs::write(&input, "0 1\n1 2\n2 0\n2 3\n").expect("write input");
        let config = Config::default();

        let mut a = args(vec![input.clone()]);
        let err = ratio_one(&input, &a, &config, &ReachOptions::default()).expect_err("cyclic");
        assert!(err.downcast_ref::<dagreach_core::GraphError>().is_some());

        a.condense = true;
        let out = ratio_one(&input, &a, &config, &ReachOptions::default()).expect("condensed");
        assert_eq!(out.report.node_count, 2);
        assert_eq!(out.report.reachable_pairs, 1);
    }

    #[test]
    fn retained_sets_are_written() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("chain.txt");
        std::fs::write(&input, "0 1\n1 2\n").expect("write input");
        let mut a = args(vec![input.clone()]);
        a.retain_sets = Some(dir.path().to_path_buf());
        let options = reach_options(&a, &Config::default());

        let out = ratio_one(&input, &a, &Config::default(), &options).expect("ratio");
        assert!(out.sets_path.is_some());
        let sets = std::fs::read_to_string(dir.path().join("chain_reach")).expect("sets file");
        assert_eq!(sets, "0: 0 1 2\n1: 1 2\n2: 2\n");
    }
}
