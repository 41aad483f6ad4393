use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordnet_sap::{
    config::Config,
    graph::{read_digraph, HypernymGraph},
    types::{GraphStatistics, VertexQueryReport},
    Sap, WordNet,
};

#[derive(Parser)]
#[command(name = "wordnet-sap")]
#[command(about = "Shortest ancestral path queries over WordNet hypernym graphs")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (overrides configuration)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Synsets file (overrides configuration)
    #[arg(long)]
    synsets: Option<PathBuf>,

    /// Hypernyms file (overrides configuration)
    #[arg(long)]
    hypernyms: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Shortest ancestral path length between two nouns
    Distance { noun_a: String, noun_b: String },

    /// Synset on a shortest ancestral path between two nouns
    Sap { noun_a: String, noun_b: String },

    /// Check whether a word is a WordNet noun
    IsNoun { word: String },

    /// Answer vertex pairs read from stdin against a digraph file
    Length {
        /// Digraph file: vertex count, edge count, then `v w` pairs
        #[arg(short, long)]
        digraph: PathBuf,

        /// Print the vertex paths up to the ancestor
        #[arg(long)]
        paths: bool,
    },

    /// Print statistics for the hypernym graph
    Stats {
        /// Use a digraph file instead of the WordNet files
        #[arg(short, long)]
        digraph: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Configuration file path
        #[arg(short, long, default_value = "wordnet-sap.yml")]
        config_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli).await?;

    // Initialize tracing
    init_tracing(&config.logging.level)?;
    info!("Starting wordnet-sap");

    if let Some(path) = cli.config.as_ref() {
        if path.exists() {
            info!("Loaded configuration from: {:?}", path);
        } else {
            warn!("Configuration file not found: {:?}. Using defaults.", path);
        }
    }

    match cli.command {
        Commands::Distance { noun_a, noun_b } => {
            let wordnet = open_wordnet(&config)?;
            let distance = wordnet
                .distance(&noun_a, &noun_b)
                .with_context(|| format!("Failed to compute distance between '{}' and '{}'", noun_a, noun_b))?;
            print_output(&config, &distance, distance.to_string())?;
        }

        Commands::Sap { noun_a, noun_b } => {
            let wordnet = open_wordnet(&config)?;
            let report = wordnet
                .query(&noun_a, &noun_b)
                .with_context(|| format!("Failed to find ancestor of '{}' and '{}'", noun_a, noun_b))?;
            let text = report.ancestor.clone();
            print_output(&config, &report, text)?;
        }

        Commands::IsNoun { word } => {
            let wordnet = open_wordnet(&config)?;
            let is_noun = wordnet.is_noun(&word);
            print_output(&config, &is_noun, is_noun.to_string())?;
        }

        Commands::Length { digraph, paths } => {
            answer_vertex_queries(&config, digraph, paths || config.output.show_paths).await?;
        }

        Commands::Stats { digraph } => {
            let statistics = match digraph {
                Some(path) => load_digraph(&path)?.statistics(),
                None => {
                    let wordnet = open_wordnet(&config)?;
                    info!("Index holds {} distinct nouns", wordnet.noun_count());
                    wordnet.graph().statistics()
                }
            };
            let text = format_statistics(&statistics);
            print_output(&config, &statistics, text)?;
        }

        Commands::Init { config_file } => {
            init_config(config_file).await?;
        }
    }

    Ok(())
}

/// Initialize tracing with the specified log level
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Load configuration from file, environment and command line, in that order.
/// Runs before tracing is initialized, since the log level is part of it.
async fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::default();

    if let Some(path) = cli.config.as_ref() {
        if path.exists() {
            let file_config = Config::load_from_file(path)
                .await
                .with_context(|| format!("Failed to load config file: {:?}", path))?;
            config.merge_with(file_config);
        }
    }

    config.apply_env().context("Invalid WORDNET_SAP_* environment variable")?;

    if let Some(path) = cli.synsets.clone() {
        config.data.synsets_path = path;
    }
    if let Some(path) = cli.hypernyms.clone() {
        config.data.hypernyms_path = path;
    }
    if let Some(format) = cli.output.clone() {
        config.output.format = format;
    }
    if let Some(level) = cli.log_level.clone() {
        config.logging.level = level;
    }

    config.validate()?;
    Ok(config)
}

fn open_wordnet(config: &Config) -> Result<WordNet> {
    info!(
        "Loading WordNet from {:?} and {:?}",
        config.data.synsets_path, config.data.hypernyms_path
    );
    WordNet::open(&config.data.synsets_path, &config.data.hypernyms_path)
        .context("Failed to build WordNet index")
}

fn load_digraph(path: &Path) -> Result<HypernymGraph> {
    let edges = read_digraph(path).with_context(|| format!("Failed to read digraph: {:?}", path))?;
    HypernymGraph::new(&edges).with_context(|| format!("Invalid digraph: {:?}", path))
}

/// Read whitespace-separated vertex pairs from stdin and answer each one
async fn answer_vertex_queries(config: &Config, digraph: PathBuf, show_paths: bool) -> Result<()> {
    let sap = Sap::new(Arc::new(load_digraph(&digraph)?));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<usize> = None;
    let mut answered = 0;

    while let Some(line) = lines.next_line().await? {
        for token in line.split_whitespace() {
            let vertex: usize = token
                .parse()
                .with_context(|| format!("Invalid vertex id '{}'", token))?;

            let Some(v) = pending.take() else {
                pending = Some(vertex);
                continue;
            };
            let w = vertex;

            if show_paths {
                let trace = sap.trace([v], [w])?;
                let report = VertexQueryReport::new(v, w, trace.as_ref().map(|t| t.summary()));
                let mut text = format_vertex_report(&report);
                if let Some(trace) = trace.as_ref() {
                    text.push_str(&format!("\n  path a: {:?}\n  path b: {:?}", trace.path_a, trace.path_b));
                }
                match trace {
                    Some(trace) => print_output(config, &trace, text)?,
                    None => print_output(config, &report, text)?,
                }
            } else {
                let report = VertexQueryReport::new(v, w, sap.solve([v], [w])?);
                let text = format_vertex_report(&report);
                print_output(config, &report, text)?;
            }
            answered += 1;
        }
    }

    if pending.is_some() {
        warn!("Ignoring unpaired trailing vertex id");
    }
    info!("Answered {} vertex queries", answered);
    Ok(())
}

fn format_vertex_report(report: &VertexQueryReport) -> String {
    format!("length = {}, ancestor = {}", report.length, report.ancestor)
}

fn format_statistics(statistics: &GraphStatistics) -> String {
    format!(
        "Vertices: {}\nEdges: {}\nRoot: {}\nLeaves: {}\nMax out-degree: {}\nAverage degree: {:.2}",
        statistics.total_vertices,
        statistics.total_edges,
        statistics.root,
        statistics.leaf_vertices,
        statistics.max_out_degree,
        statistics.average_degree
    )
}

/// Print either the JSON form of `value` or the prepared text
fn print_output<T: Serialize>(config: &Config, value: &T, text: String) -> Result<()> {
    let content = match config.output.format.to_lowercase().as_str() {
        "json" => serde_json::to_string(value)?,
        _ => text,
    };
    println!("{}", content);
    Ok(())
}

/// Initialize configuration file
async fn init_config(config_file: PathBuf) -> Result<()> {
    info!("Initializing configuration file: {:?}", config_file);

    if config_file.exists() {
        warn!("Configuration file already exists: {:?}", config_file);
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .await
        .with_context(|| format!("Failed to write configuration file: {:?}", config_file))?;

    info!("Configuration file created successfully: {:?}", config_file);
    println!("Configuration file created: {:?}", config_file);
    println!("Edit this file to point at your synsets and hypernyms files.");

    Ok(())
}
