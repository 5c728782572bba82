use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::{build_inverted_index, load_documents, InvertedIndex};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a persistent inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a line-delimited dataset file
    Build {
        /// Dataset path (one document per line: id token, then free text)
        #[arg(long)]
        dataset: String,
        /// Output index file
        #[arg(long)]
        output: String,
    },
    /// Run conjunctive queries against a built index
    Query {
        /// Index file produced by `build`
        #[arg(long)]
        index: String,
        /// Query of whitespace-separated terms; repeat for multiple queries
        #[arg(long = "query", required = true)]
        queries: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { dataset, output } => build(&dataset, &output),
        Commands::Query { index, queries } => query(&index, &queries),
    }
}

fn build(dataset: &str, output: &str) -> Result<()> {
    let docs = load_documents(dataset)
        .with_context(|| format!("failed to load dataset {dataset}"))?;
    let index = build_inverted_index(&docs).context("failed to build inverted index")?;
    index
        .dump(output)
        .with_context(|| format!("failed to write index {output}"))?;
    tracing::info!(output, "index build complete");
    Ok(())
}

fn query(index_path: &str, queries: &[String]) -> Result<()> {
    let index = InvertedIndex::load(index_path)
        .with_context(|| format!("failed to load index {index_path}"))?;
    for q in queries {
        let terms: Vec<&str> = q.split_whitespace().collect();
        let mut hits = index.query(&terms);
        hits.sort_unstable();
        let line: Vec<String> = hits.iter().map(|id| id.to_string()).collect();
        println!("{}", line.join(" "));
    }
    Ok(())
}
