use std::collections::VecDeque;
use std::process::ExitCode;
use std::time::Instant;

use centrality_accel_core::{
    betweenness_centrality_with, edge_betweenness_centrality_with, BetweennessRequest,
    CentralityError, EdgeBetweennessRequest, EdgeScore, EngineConfig, GraphBuilder,
    GraphKind, SourceArg, VertexScore,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "centrality-accel-bench")]
#[command(about = "Betweenness centrality on synthetic graphs")]
struct Cli {
    /// Graph generator to run
    #[arg(value_enum, default_value = "all")]
    mode: Mode,

    /// Target vertex count per generated graph
    #[arg(long, default_value = "2000", value_parser = clap::value_parser!(u64).range(32..))]
    nodes: u64,

    /// Sample this many source vertices instead of using all of them
    #[arg(long)]
    k: Option<u64>,

    /// Seed for source sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Execution strategy: default or gunrock
    #[arg(long, default_value = "default")]
    implementation: String,

    /// Result precision: float32 or float64
    #[arg(long, default_value = "float64")]
    dtype: String,

    /// Compute edge betweenness instead of vertex betweenness
    #[arg(long)]
    edges: bool,

    /// Treat generated edges as directed
    #[arg(long)]
    directed: bool,

    /// Return raw scores (undirected sums are still halved)
    #[arg(long)]
    unnormalized: bool,

    /// Engine configuration as JSON, e.g. '{"max_memory_mb": 512, "num_threads": 4}'
    #[arg(long)]
    config: Option<String>,

    /// Number of top-scoring rows to print (0 prints all)
    #[arg(long, default_value = "10")]
    top: usize,

    /// Print the top rows as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run all generators and benchmark each
    All,
    /// Fractal branching tree (deep paths)
    Lsystem,
    /// Preferential attachment via edge sampling (hub-and-spoke)
    Scalefree,
    /// Watts-Strogatz ring lattice + shortcuts
    Smallworld,
    /// Erdos-Renyi uniform random edges
    Random,
    /// Two dense cliques connected by a thin bridge
    Barbell,
    /// Diffusion-limited aggregation (organic branching)
    Dla,
}

type Generator = fn(u64, GraphKind) -> GraphBuilder;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("centrality_accel_core=info,centrality_accel_bench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CentralityError> {
    let config = match &cli.config {
        Some(json) => EngineConfig::from_json(json)?,
        None => EngineConfig::default(),
    };
    let kind = if cli.directed {
        GraphKind::Directed
    } else {
        GraphKind::Undirected
    };

    let generators: Vec<(&str, Generator)> = match cli.mode {
        Mode::Lsystem => vec![("L-system tree", gen_lsystem)],
        Mode::Scalefree => vec![("Scale-free (edge sampling)", gen_scale_free)],
        Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Barbell => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        Mode::Dla => vec![("DLA (organic branching)", gen_dla)],
        Mode::All => vec![
            ("L-system tree", gen_lsystem as Generator),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (clique-bridge-clique)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
    };

    if !cli.json {
        println!("centrality-accel-bench");
        println!("======================");
        println!();
    }

    for (name, generator) in generators {
        run_benchmark(cli, &config, name, generator, kind)?;
    }
    Ok(())
}

fn run_benchmark(
    cli: &Cli,
    config: &EngineConfig,
    name: &str,
    generator: Generator,
    kind: GraphKind,
) -> Result<(), CentralityError> {
    let t = Instant::now();
    let graph = generator(cli.nodes, kind).build()?;
    let gen_time = t.elapsed();
    debug!(
        generator = name,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph generated"
    );

    if !cli.json {
        println!("--- {} ---", name);
        println!(
            "Generated in {:.2}s: {} nodes, {} edges, ~{:.1}MB",
            gen_time.as_secs_f64(),
            graph.node_count(),
            graph.edge_count(),
            graph.memory_usage() as f64 / 1_048_576.0
        );
    }

    let k = cli.k.map(SourceArg::Count);
    let t = Instant::now();
    let rows = if cli.edges {
        let options = EdgeBetweennessRequest {
            k,
            normalized: !cli.unnormalized,
            seed: cli.seed,
            result_dtype: cli.dtype.clone(),
            ..Default::default()
        }
        .into_options()?;
        TopRows::Edges(edge_betweenness_centrality_with(&graph, &options, config)?.top(cli.top))
    } else {
        let options = BetweennessRequest {
            k,
            normalized: !cli.unnormalized,
            implementation: Some(cli.implementation.clone()),
            seed: cli.seed,
            result_dtype: cli.dtype.clone(),
            ..Default::default()
        }
        .into_options()?;
        TopRows::Vertices(betweenness_centrality_with(&graph, &options, config)?.top(cli.top))
    };
    let elapsed = t.elapsed();

    if cli.json {
        let report = serde_json::json!({
            "graph": name,
            "nodes": graph.node_count(),
            "edges": graph.edge_count(),
            "elapsed_ms": elapsed.as_secs_f64() * 1000.0,
            "top": rows,
        });
        println!("{}", report);
        return Ok(());
    }

    println!("Computed in {:.1}ms", elapsed.as_secs_f64() * 1000.0);
    println!();
    rows.print();
    println!();
    Ok(())
}

/// Highest-scoring rows of one run.
#[derive(Serialize)]
#[serde(untagged)]
enum TopRows {
    Vertices(Vec<VertexScore>),
    Edges(Vec<EdgeScore>),
}

impl TopRows {
    fn print(&self) {
        match self {
            TopRows::Vertices(rows) => {
                println!("{:>10} {:>14}", "vertex", "score");
                println!("{:->10} {:->14}", "", "");
                for row in rows {
                    println!("{:>10} {:>14.6}", row.vertex, row.betweenness_centrality);
                }
            }
            TopRows::Edges(rows) => {
                println!("{:>10} {:>10} {:>14}", "src", "dst", "score");
                println!("{:->10} {:->10} {:->14}", "", "", "");
                for row in rows {
                    println!(
                        "{:>10} {:>10} {:>14.6}",
                        row.src, row.dst, row.edge_betweenness_centrality
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Generators: O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Builder over dense ids `0..node_count`, every id declared.
fn dense_builder(kind: GraphKind, node_count: u64, edge_hint: u64) -> GraphBuilder {
    let mut builder =
        GraphBuilder::with_capacity(kind, node_count as usize, edge_hint as usize).renumber(false);
    for v in 0..node_count {
        builder.add_vertex(v);
    }
    builder
}

/// L-system fractal tree: each vertex spawns three children.
///
/// Log depth with exponential width; interior vertices near the root carry
/// almost every shortest path.
fn gen_lsystem(node_count: u64, kind: GraphKind) -> GraphBuilder {
    let mut builder = dense_builder(kind, node_count, node_count);
    let branching = 3u64;
    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                builder.add_edge(parent, next_id);
                next_frontier.push(next_id);
                next_id += 1;
            }
        }
        frontier = next_frontier;
    }

    builder
}

/// Scale-free via edge-list sampling.
///
/// Preferential attachment by picking a random existing edge endpoint, so
/// high-degree vertices are picked more often.
fn gen_scale_free(node_count: u64, kind: GraphKind) -> GraphBuilder {
    let edges_per_node = 5u64;
    let mut builder = dense_builder(kind, node_count, node_count * edges_per_node);
    let mut rng = FastRng::new(12345);
    let mut endpoints: Vec<u64> = Vec::with_capacity((node_count * edges_per_node * 2) as usize);

    // Seed: small clique
    let seed = 5u64;
    for i in 0..seed {
        for j in (i + 1)..seed {
            builder.add_edge(i, j);
            endpoints.push(i);
            endpoints.push(j);
        }
    }

    for new_node in seed..node_count {
        for _ in 0..edges_per_node.min(new_node) {
            let target = endpoints[rng.next(endpoints.len() as u64) as usize];
            if target != new_node {
                builder.add_edge(new_node, target);
                endpoints.push(new_node);
                endpoints.push(target);
            }
        }
    }

    builder
}

/// Small-world (Watts-Strogatz): ring lattice with random rewiring.
fn gen_small_world(node_count: u64, kind: GraphKind) -> GraphBuilder {
    let k = 4u64; // neighbors on each side
    let p = 0.05f64; // rewire probability
    let mut builder = dense_builder(kind, node_count, node_count * k);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            let target = if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if rewired != i {
                    rewired
                } else {
                    neighbor
                }
            } else {
                neighbor
            };
            builder.add_edge(i, target);
        }
    }

    builder
}

/// Erdos-Renyi: uniform random edges, about five per vertex.
fn gen_random(node_count: u64, kind: GraphKind) -> GraphBuilder {
    let target_edges = node_count * 5;
    let mut builder = dense_builder(kind, node_count, target_edges);
    let mut rng = FastRng::new(54321);

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            builder.add_edge(from, to);
        }
    }

    builder
}

/// Barbell: two dense clusters joined by a chain of bridge vertices.
///
/// Every path between the clusters crosses the bridge, so bridge vertices
/// and edges score highest.
fn gen_barbell(node_count: u64, kind: GraphKind) -> GraphBuilder {
    let bridge_len = 10u64;
    let clique_size = (node_count - bridge_len) / 2;
    let degree = 10u64.min(clique_size - 1);
    let mut builder = dense_builder(kind, clique_size * 2 + bridge_len, clique_size * degree * 2);
    let mut rng = FastRng::new(99999);

    let bridge_start = clique_size;
    let b_start = bridge_start + bridge_len;
    for offset in [0, b_start] {
        for i in 0..clique_size {
            for _ in 0..degree {
                let target = rng.next(clique_size);
                if target != i {
                    builder.add_edge(offset + i, offset + target);
                }
            }
        }
    }

    // Bridge: chain from the last vertex of A to the first vertex of B
    builder.add_edge(clique_size - 1, bridge_start);
    for id in bridge_start + 1..b_start {
        builder.add_edge(id - 1, id);
    }
    builder.add_edge(b_start - 1, b_start);

    builder
}

/// DLA (diffusion-limited aggregation): organic branching growth.
///
/// Each new vertex attaches to a random recent vertex, with occasional
/// long-range jumps that create loops.
fn gen_dla(node_count: u64, kind: GraphKind) -> GraphBuilder {
    let mut builder = dense_builder(kind, node_count, node_count * 2);
    let mut rng = FastRng::new(77777);

    let surface_max = 1000usize;
    let mut surface: VecDeque<u64> = VecDeque::with_capacity(surface_max + 1);
    surface.push_back(0);

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        builder.add_edge(new_node, attach_to);

        // 10% chance of a second connection
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                builder.add_edge(new_node, other);
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use centrality_accel_core::Graph;

    const ALL: [Generator; 6] = [
        gen_lsystem,
        gen_scale_free,
        gen_small_world,
        gen_random,
        gen_barbell,
        gen_dla,
    ];

    #[test]
    fn test_generators_build() {
        for generator in ALL {
            let graph: Graph = generator(64, GraphKind::Undirected).build().unwrap();
            assert_eq!(graph.node_count(), 64);
            assert!(graph.edge_count() > 0);
        }
    }

    #[test]
    fn test_generators_deterministic() {
        for generator in ALL {
            let a = generator(100, GraphKind::Directed).build().unwrap();
            let b = generator(100, GraphKind::Directed).build().unwrap();
            assert_eq!(a.edge_count(), b.edge_count());
        }
    }

    #[test]
    fn test_barbell_bridge_scores_highest() {
        let graph = gen_barbell(64, GraphKind::Undirected).build().unwrap();
        let options = BetweennessRequest::default().into_options().unwrap();
        let table = betweenness_centrality_with(&graph, &options, &EngineConfig::default()).unwrap();
        let best = table.top(1)[0].vertex;
        assert!((26..=37).contains(&best), "top vertex {}", best);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "centrality-accel-bench",
            "barbell",
            "--nodes",
            "100",
            "--k",
            "10",
            "--edges",
            "--json",
        ])
        .unwrap();
        assert!(cli.mode == Mode::Barbell);
        assert_eq!(cli.k, Some(10));
        assert!(cli.edges && cli.json);
        assert!(Cli::try_parse_from(["centrality-accel-bench", "--nodes", "4"]).is_err());
    }
}
