//! `dagreach condense`: collapse SCCs and write the DAG and mapping files.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use dagreach_core::config::Config;
use dagreach_core::graph::{condense, find_sccs_with, topological_order};
use serde::Serialize;
use tracing::info;

use crate::cmd::{ensure_dir, for_each_input};
use crate::edgelist::{derived_path, read_edge_list, write_pairs};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, text_kv};

/// Arguments for `dagreach condense`.
#[derive(Args, Debug)]
pub struct CondenseArgs {
    /// Edge-list files, processed in order.
    #[arg(required = true, value_name = "EDGES")]
    pub inputs: Vec<PathBuf>,

    /// Directory for output files (default: next to each input).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CondenseOutput {
    input: String,
    nodes: usize,
    edges: usize,
    components: usize,
    nontrivial_components: usize,
    dag_edges: usize,
    validated: bool,
    dag_path: String,
    mapping_path: String,
}

/// Execute `dagreach condense`.
pub fn run_condense(
    args: &CondenseArgs,
    output: OutputMode,
    config: &Config,
) -> anyhow::Result<()> {
    ensure_dir(args.out_dir.as_deref())?;
    for_each_input(&args.inputs, output, |input| {
        let report = condense_one(input, args.out_dir.as_deref(), config)?;
        render_mode(output, &report, render_text, render_pretty)
    })
}

fn condense_one(
    input: &Path,
    out_dir: Option<&Path>,
    config: &Config,
) -> anyhow::Result<CondenseOutput> {
    let graph = read_edge_list(input)?;
    let partition = find_sccs_with(&graph, config.condense.representative);
    let condensation = condense(&graph, partition);
    if config.condense.validate {
        topological_order(&condensation.dag)?;
    }

    let dag_path = derived_path(input, out_dir, &config.output.dag_suffix);
    let mapping_path = derived_path(input, out_dir, &config.output.mapping_suffix);
    write_pairs(&dag_path, &condensation.dag.sorted_edges())?;
    write_pairs(&mapping_path, &condensation.partition.sorted_mapping())?;
    info!(dag = %dag_path.display(), mapping = %mapping_path.display(), "condensation written");

    Ok(CondenseOutput {
        input: input.display().to_string(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        components: condensation.partition.component_count(),
        nontrivial_components: condensation.partition.nontrivial_count(),
        dag_edges: condensation.dag.edge_count(),
        validated: config.condense.validate,
        dag_path: dag_path.display().to_string(),
        mapping_path: mapping_path.display().to_string(),
    })
}

fn render_text(out: &CondenseOutput, w: &mut dyn Write) -> std::io::Result<()> {
    text_kv(w, "input", &out.input)?;
    text_kv(w, "nodes", out.nodes)?;
    text_kv(w, "edges", out.edges)?;
    text_kv(w, "components", out.components)?;
    text_kv(w, "nontrivial_components", out.nontrivial_components)?;
    text_kv(w, "dag_edges", out.dag_edges)?;
    text_kv(w, "dag", &out.dag_path)?;
    text_kv(w, "mapping", &out.mapping_path)
}

fn render_pretty(out: &CondenseOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Condensed {}", out.input))?;
    pretty_kv(w, "Graph", format!("{} nodes, {} edges", out.nodes, out.edges))?;
    pretty_kv(
        w,
        "Components",
        format!("{} ({} non-trivial)", out.components, out.nontrivial_components),
    )?;
    pretty_kv(w, "DAG edges", out.dag_edges.to_string())?;
    pretty_kv(w, "DAG file", &out.dag_path)?;
    pretty_kv(w, "Mapping file", &out.mapping_path)?;
    writeln!(w)
}
