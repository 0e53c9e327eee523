use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tornasole_config::{
  ClusterConfig, DistributionStrategy, TF_CONFIG_ENV, get_num_workers_from_tf_config,
  get_worker_id_from_tf_config,
};
use tornasole_graph::{GraphDef, GraphSummary, original_fetch_ops};
use tornasole_hook::{Hook, expand_home};

const MODEL_NAMES: [&str; 8] = [
  "alexnet",
  "densenet121",
  "mobilenet_v2",
  "resnet101",
  "resnet18",
  "resnet34",
  "resnet50",
  "vgg16",
];

/// Tornasole - debugging hooks for deep-learning training jobs
#[derive(Parser)]
#[command(name = "tornasole")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a demo training loop with a hook attached
  Demo(DemoArgs),

  /// Show how this process fits into the cluster described by TF_CONFIG
  Cluster {
    /// Cluster configuration JSON (default: $TF_CONFIG)
    #[arg(long)]
    tf_config: Option<String>,
  },

  /// Inspect a graph definition
  Graph {
    #[command(subcommand)]
    target: GraphTarget,
  },
}

#[derive(Args)]
struct DemoArgs {
  /// Path to dataset
  #[arg(long, default_value = "~/.pytorch/datasets/imagenet")]
  data_dir: String,

  /// Model architecture
  #[arg(short, long, default_value = "resnet50", value_parser = PossibleValuesParser::new(MODEL_NAMES))]
  arch: String,

  /// Number of total epochs to run
  #[arg(long, default_value_t = 2)]
  epochs: u32,

  /// Mini-batch size
  #[arg(short, long, default_value_t = 256)]
  batch_size: u32,

  /// Initial learning rate
  #[arg(long, visible_alias = "learning-rate", default_value_t = 0.1)]
  lr: f64,

  #[arg(long, default_value_t = 0.9)]
  momentum: f64,

  #[arg(long = "wd", visible_alias = "weight-decay", default_value_t = 1e-4)]
  weight_decay: f64,

  /// Hook output directory (ignored under SageMaker)
  #[arg(long)]
  out_dir: Option<String>,

  #[arg(long, default_value_t = 10)]
  steps_per_epoch: u32,

  /// Artificial delay between steps
  #[arg(long, default_value_t = 1000)]
  step_delay_ms: u64,
}

#[derive(Subcommand)]
enum GraphTarget {
  /// Print every node with its normalized inputs, in declaration order
  Summary {
    /// Path to the graph definition (JSON)
    graph_file: PathBuf,
  },

  /// Print the operations behind a (possibly nested) fetch description
  FetchOps {
    /// Path to the graph definition (JSON)
    graph_file: PathBuf,

    /// Fetches as JSON, e.g. '{"loss": "loss:0", "train": ["train_op"]}'
    #[arg(long)]
    fetches: String,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Demo(args)) => run_demo(args)?,
    Some(Commands::Cluster { tf_config }) => show_cluster(tf_config)?,
    Some(Commands::Graph { target }) => match target {
      GraphTarget::Summary { graph_file } => show_graph_summary(graph_file)?,
      GraphTarget::FetchOps {
        graph_file,
        fetches,
      } => show_fetch_ops(graph_file, &fetches)?,
    },
    None => {
      println!("tornasole - use --help to see available commands");
    }
  }

  Ok(())
}

fn run_demo(args: DemoArgs) -> Result<()> {
  let hook = Hook::new(args.out_dir.as_deref()).context("failed to create hook")?;
  let start = Instant::now();

  info!(
    arch = %args.arch,
    data_dir = %expand_home(&args.data_dir),
    batch_size = args.batch_size,
    lr = args.lr,
    momentum = args.momentum,
    weight_decay = args.weight_decay,
    "loaded training"
  );

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async {
    train_loop(
      &hook,
      args.epochs,
      args.steps_per_epoch,
      Duration::from_millis(args.step_delay_ms),
    )
    .await
  });

  println!("Time taken: {:.3}s", start.elapsed().as_secs_f64());
  Ok(())
}

async fn train_loop(hook: &Hook, epochs: u32, steps_per_epoch: u32, step_delay: Duration) {
  for epoch in 0..epochs {
    for step in 0..steps_per_epoch {
      info!(worker_id = %hook.worker_id(), epoch, step, "training step");
      between_steps_bottleneck(step_delay).await;
    }
  }
}

async fn between_steps_bottleneck(delay: Duration) {
  tokio::time::sleep(delay).await;
}

fn show_cluster(tf_config: Option<String>) -> Result<()> {
  let raw = match tf_config {
    Some(raw) => raw,
    None => std::env::var(TF_CONFIG_ENV).with_context(|| format!("{} is not set", TF_CONFIG_ENV))?,
  };

  let strategy = DistributionStrategy::detect(Some(&raw));
  let config = ClusterConfig::parse(&raw).context("failed to parse cluster config")?;
  let worker_id = get_worker_id_from_tf_config(&raw).context("failed to resolve worker id")?;
  let num_workers =
    get_num_workers_from_tf_config(&raw).context("failed to count workers")?;

  let output = serde_json::json!({
    "strategy": strategy.to_string(),
    "worker_id": worker_id,
    "num_workers": num_workers,
    "is_chief": config.is_chief(),
    "chief": config.chief().map(|t| t.worker_id()),
    "worker_addresses": config.worker_addresses()?,
  });

  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

fn load_graph(graph_file: &Path) -> Result<GraphDef> {
  GraphDef::from_json_file(graph_file)
    .with_context(|| format!("failed to load graph file: {}", graph_file.display()))
}

fn show_graph_summary(graph_file: PathBuf) -> Result<()> {
  let graph = load_graph(&graph_file)?;
  let summary = GraphSummary::extract(&graph);

  let nodes: Vec<serde_json::Value> = summary
    .nodes_in_order()
    .into_iter()
    .map(|name| {
      serde_json::json!({
        "name": name,
        "seq": summary.name_to_seq_num[name],
        "op": summary.node(name).map(|n| n.op.as_str()),
        "inputs": summary.inputs(name),
      })
    })
    .collect();

  eprintln!("Loaded graph with {} nodes", summary.len());
  println!("{}", serde_json::to_string_pretty(&nodes)?);
  Ok(())
}

fn show_fetch_ops(graph_file: PathBuf, fetches: &str) -> Result<()> {
  let graph = load_graph(&graph_file)?;
  let summary = GraphSummary::extract(&graph);

  let fetches: serde_json::Value =
    serde_json::from_str(fetches).context("failed to parse fetches JSON")?;
  let fetch = summary
    .resolve_fetch(&fetches)
    .context("failed to resolve fetches")?;
  let ops = original_fetch_ops(&fetch).context("failed to flatten fetches")?;

  for op in ops {
    println!("{}", op);
  }
  Ok(())
}
