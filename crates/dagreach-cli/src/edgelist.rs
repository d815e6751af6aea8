//! Whitespace-separated edge-list files.
//!
//! Input: one `from to` pair of non-negative integers per line, separated
//! by spaces or tabs. Blank lines and lines starting with `#` or `%` are
//! skipped. Extra columns (weights, timestamps) after the first two are
//! ignored.
//!
//! Output files are written sorted so they diff cleanly.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use dagreach_core::graph::{DiGraphStore, NodeId};
use dagreach_core::reach::ReachableSets;
use tracing::{debug, instrument};

/// A line that is not a valid edge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {reason}")]
pub struct EdgeListError {
    pub line: usize,
    pub reason: String,
}

/// Parse an edge list from any buffered reader.
///
/// # Errors
///
/// Returns [`EdgeListError`] for the first malformed line, or an I/O error
/// from the reader.
pub fn parse_edge_list<R: BufRead>(reader: R) -> anyhow::Result<DiGraphStore> {
    let mut graph = DiGraphStore::new();
    let mut self_loops = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let from = parse_node(fields.next(), line_no, "source")?;
        let to = parse_node(fields.next(), line_no, "target")?;
        if !graph.add_edge(from, to)? && from == to {
            self_loops += 1;
        }
    }

    if self_loops > 0 {
        debug!(self_loops, "ignored self-loops");
    }
    Ok(graph)
}

fn parse_node(field: Option<&str>, line: usize, role: &str) -> Result<NodeId, EdgeListError> {
    let Some(raw) = field else {
        return Err(EdgeListError {
            line,
            reason: format!("missing {role} node"),
        });
    };
    raw.parse::<NodeId>().map_err(|_| EdgeListError {
        line,
        reason: format!("{role} node `{raw}` is not a non-negative integer"),
    })
}

/// Read and parse an edge-list file.
///
/// # Errors
///
/// Fails if the file cannot be opened or contains a malformed line; the
/// error carries the path.
#[instrument]
pub fn read_edge_list(path: &Path) -> anyhow::Result<DiGraphStore> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let graph = parse_edge_list(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "edge list loaded"
    );
    Ok(graph)
}

/// Write `u v` pairs, one per line.
///
/// # Errors
///
/// Fails if the file cannot be created or written.
pub fn write_pairs(path: &Path, pairs: &[(NodeId, NodeId)]) -> anyhow::Result<()> {
    write_with(path, |w| {
        for (a, b) in pairs {
            writeln!(w, "{a} {b}")?;
        }
        Ok(())
    })
}

/// Write `node: r1 r2 ...` lines, one per retained reachable set.
///
/// # Errors
///
/// Fails if the file cannot be created or written.
pub fn write_reachable_sets(path: &Path, sets: &ReachableSets) -> anyhow::Result<()> {
    write_with(path, |w| {
        for (node, reach) in sets.iter() {
            write!(w, "{node}:")?;
            for r in reach {
                write!(w, " {r}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    })
}

fn write_with(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    body(&mut w)
        .and_then(|()| w.flush())
        .with_context(|| format!("failed to write {}", path.display()))
}

/// `<dir>/<input stem><suffix>`, where `dir` defaults to the input's own
/// directory.
pub fn derived_path(input: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let name = input
        .file_stem()
        .map_or_else(|| "graph".to_string(), |n| n.to_string_lossy().into_owned());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{name}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> anyhow::Result<DiGraphStore> {
        parse_edge_list(text.as_bytes())
    }

    #[test]
    fn parses_spaces_tabs_and_comments() {
        let g = parse("# header\n0 1\n1\t2\n\n% konect style\n2 0 17\n").expect("valid");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert!(g.contains_edge(2, 0));
    }

    #[test]
    fn duplicates_and_self_loops_collapse() {
        let g = parse("0 1\n0 1\n1 1\n").expect("valid");
        assert_eq!(g.edge_count(), 1);
        assert!(g.contains_node(1));
    }

    #[test]
    fn bad_field_reports_line_number() {
        let err = parse("0 1\n1 x\n").expect_err("malformed");
        let edge_err = err.downcast_ref::<EdgeListError>().expect("typed error");
        assert_eq!(edge_err.line, 2);
        assert!(edge_err.reason.contains("`x`"));
    }

    #[test]
    fn missing_target_is_an_error() {
        let err = parse("\n\n7\n").expect_err("single column");
        let edge_err = err.downcast_ref::<EdgeListError>().expect("typed error");
        assert_eq!(edge_err.line, 3);
        assert!(edge_err.reason.contains("missing target"));
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!(parse("-1 2\n").is_err());
    }

    #[test]
    fn derived_path_uses_suffix_and_dir() {
        let p = derived_path(Path::new("data/web.txt"), None, "_DAG");
        assert_eq!(p, Path::new("data/web_DAG"));
        let p = derived_path(Path::new("data/web.txt"), Some(Path::new("out")), "_mapping");
        assert_eq!(p, Path::new("out/web_mapping"));
    }

    #[test]
    fn written_pairs_parse_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("edges");
        write_pairs(&path, &[(0, 3), (3, 4)]).expect("write");
        let g = read_edge_list(&path).expect("read back");
        assert_eq!(g.sorted_edges(), vec![(0, 3), (3, 4)]);
    }
}
