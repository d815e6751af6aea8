//! `dagreach stats`: SCC, WCC and degree statistics of edge lists.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use dagreach_core::config::Config;
use dagreach_core::graph::{Condensation, GraphStats};
use serde::Serialize;

use crate::cmd::for_each_input;
use crate::edgelist::read_edge_list;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, text_kv};

/// Arguments for `dagreach stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Edge-list files, processed in order.
    #[arg(required = true, value_name = "EDGES")]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    input: String,
    content_hash: String,
    #[serde(flatten)]
    stats: GraphStats,
}

/// Execute `dagreach stats`.
pub fn run_stats(args: &StatsArgs, output: OutputMode, config: &Config) -> anyhow::Result<()> {
    for_each_input(&args.inputs, output, |input| {
        let result = stats_one(input, config)?;
        render_mode(output, &result, render_text, render_pretty)
    })
}

fn stats_one(input: &Path, config: &Config) -> anyhow::Result<StatsOutput> {
    let graph = read_edge_list(input)?;
    let condensation = Condensation::build(&graph, config.condense.representative);
    Ok(StatsOutput {
        input: input.display().to_string(),
        content_hash: graph.content_hash(),
        stats: GraphStats::compute(&graph, &condensation),
    })
}

fn render_text(out: &StatsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &out.stats;
    text_kv(w, "input", &out.input)?;
    text_kv(w, "nodes", s.node_count)?;
    text_kv(w, "edges", s.edge_count)?;
    text_kv(w, "density", s.density)?;
    text_kv(w, "scc_count", s.scc_count)?;
    text_kv(w, "nontrivial_scc_count", s.nontrivial_scc_count)?;
    text_kv(w, "nodes_in_nontrivial_scc", s.nodes_in_nontrivial_scc)?;
    text_kv(w, "nontrivial_scc_node_ratio", s.nontrivial_scc_node_ratio)?;
    text_kv(w, "scc_per_node_ratio", s.scc_per_node_ratio)?;
    text_kv(w, "largest_scc_size", s.largest_scc_size)?;
    text_kv(w, "wcc_count", s.wcc_count)?;
    text_kv(w, "nontrivial_wcc_count", s.nontrivial_wcc_count)?;
    text_kv(w, "nodes_in_nontrivial_wcc", s.nodes_in_nontrivial_wcc)?;
    text_kv(w, "nontrivial_wcc_node_ratio", s.nontrivial_wcc_node_ratio)?;
    text_kv(w, "wcc_per_node_ratio", s.wcc_per_node_ratio)?;
    text_kv(w, "isolated_nodes", s.isolated_node_count)?;
    text_kv(w, "max_in_degree", s.max_in_degree)?;
    text_kv(w, "max_out_degree", s.max_out_degree)?;
    text_kv(w, "condensed_edges", s.condensed_edge_count)?;
    text_kv(w, "content_hash", &out.content_hash)
}

fn render_pretty(out: &StatsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &out.stats;
    pretty_section(w, &format!("Statistics for {}", out.input))?;
    pretty_kv(w, "Nodes", s.node_count.to_string())?;
    pretty_kv(w, "Edges", s.edge_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.6}", s.density))?;
    pretty_kv(w, "Isolated nodes", s.isolated_node_count.to_string())?;
    pretty_kv(
        w,
        "Max degree",
        format!("in {}, out {}", s.max_in_degree, s.max_out_degree),
    )?;
    writeln!(w)?;

    pretty_section(w, "Strongly connected components")?;
    pretty_kv(w, "Components", s.scc_count.to_string())?;
    pretty_kv(w, "Non-trivial", s.nontrivial_scc_count.to_string())?;
    pretty_kv(
        w,
        "Nodes in non-trivial",
        format!(
            "{} ({:.2}%)",
            s.nodes_in_nontrivial_scc,
            s.nontrivial_scc_node_ratio * 100.0
        ),
    )?;
    pretty_kv(w, "Per node", format!("{:.6}", s.scc_per_node_ratio))?;
    pretty_kv(w, "Largest", s.largest_scc_size.to_string())?;
    pretty_kv(w, "Condensed edges", s.condensed_edge_count.to_string())?;
    writeln!(w)?;

    pretty_section(w, "Weakly connected components")?;
    pretty_kv(w, "Components", s.wcc_count.to_string())?;
    pretty_kv(w, "Non-trivial", s.nontrivial_wcc_count.to_string())?;
    pretty_kv(
        w,
        "Nodes in non-trivial",
        format!(
            "{} ({:.2}%)",
            s.nodes_in_nontrivial_wcc,
            s.nontrivial_wcc_node_ratio * 100.0
        ),
    )?;
    pretty_kv(w, "Per node", format!("{:.6}", s.wcc_per_node_ratio))?;
    writeln!(w)
}
