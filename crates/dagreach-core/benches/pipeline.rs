use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dagreach_core::graph::{Condensation, DiGraphStore, RepresentativePolicy, find_sccs};
use dagreach_core::reach::{ReachOptions, ReachRepresentation, lifted_reach_ratio, reach_ratio};

/// `(name, nodes, average out-degree)`
const TIERS: [(&str, u64, u64); 3] = [("small", 1_000, 3), ("medium", 10_000, 3), ("large", 20_000, 2)];

/// Random sparse digraph with plenty of back edges, so it has real SCCs.
fn random_graph(nodes: u64, degree: u64, seed: u64) -> DiGraphStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = DiGraphStore::with_node_space(nodes);
    for _ in 0..nodes * degree {
        let u = rng.gen_range(0..nodes);
        let v = rng.gen_range(0..nodes);
        g.add_edge(u, v).expect("ids drawn from the node space");
    }
    g
}

/// Random DAG: every edge goes from a lower to a higher id.
fn random_dag(nodes: u64, degree: u64, seed: u64) -> DiGraphStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = DiGraphStore::with_node_space(nodes);
    for _ in 0..nodes * degree {
        let u = rng.gen_range(0..nodes);
        let v = rng.gen_range(0..nodes);
        g.add_edge(u.min(v), u.max(v))
            .expect("ids drawn from the node space");
    }
    g
}

fn bench_condense(c: &mut Criterion) {
    let mut group = c.benchmark_group("condense");
    for (name, nodes, degree) in TIERS {
        let graph = random_graph(nodes, degree, 0x5CC0_u64 + nodes);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("find_sccs", name), &graph, |b, g| {
            b.iter(|| black_box(find_sccs(g)));
        });
        group.bench_with_input(BenchmarkId::new("build", name), &graph, |b, g| {
            b.iter(|| black_box(Condensation::build(g, RepresentativePolicy::Smallest)));
        });
    }
    group.finish();
}

fn bench_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("ratio");
    group.sample_size(10);
    for (name, nodes, degree) in TIERS {
        let dag = random_dag(nodes, degree, 0xDA6_u64 + nodes);
        group.throughput(Throughput::Elements(dag.node_count() as u64));

        for representation in [ReachRepresentation::Sets, ReachRepresentation::Bitset] {
            let options = ReachOptions {
                representation,
                ..ReachOptions::default()
            };
            group.bench_with_input(
                BenchmarkId::new(representation.as_str(), name),
                &dag,
                |b, dag| b.iter(|| black_box(reach_ratio(dag, &options))),
            );
        }

        let graph = random_graph(nodes, degree, 0x11F7_u64 + nodes);
        let condensation = Condensation::build(&graph, RepresentativePolicy::Smallest);
        group.bench_with_input(BenchmarkId::new("lifted", name), &condensation, |b, c| {
            b.iter(|| black_box(lifted_reach_ratio(c, &ReachOptions::default())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_condense, bench_ratio);
criterion_main!(benches);
