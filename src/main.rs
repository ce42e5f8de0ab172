//! classic-retrieval: fit, query and evaluate classical retrieval models

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use classic_retrieval::{
    persist, present, Config, DocumentStore, Evaluator, InMemoryStore, Model, ModelKind, Qrels, QrelsLookup,
    RetrievalModel,
};

/// Boolean, TF-IDF and BM25 retrieval with IR evaluation
#[derive(Parser)]
#[command(name = "classic-retrieval")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a model on a corpus and write it to a file
    Fit(FitArgs),
    /// Run a query against a saved model
    Search(SearchArgs),
    /// Evaluate a saved model against relevance judgments
    Eval(EvalArgs),
    /// List the queries of a qrels file
    Qrels(QrelsArgs),
    /// Print one document of a corpus
    Show(ShowArgs),
}

#[derive(Args)]
struct FitArgs {
    /// Corpus sources: JSON or CSV files, or directories of text files, in id order
    #[arg(long, required = true, num_args = 1.., value_name = "PATH")]
    corpus: Vec<PathBuf>,

    #[arg(long, value_enum)]
    model: ModelKind,

    /// Output model file
    #[arg(long, value_name = "FILE")]
    out: PathBuf,
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long, value_name = "FILE")]
    model_file: PathBuf,

    #[arg(short, long)]
    query: String,

    /// Number of results (defaults to search.k from the configuration)
    #[arg(short)]
    k: Option<usize>,

    /// Corpus the model was fitted on, to print previews
    #[arg(long, num_args = 1.., value_name = "PATH")]
    corpus: Vec<PathBuf>,
}

#[derive(Args)]
struct EvalArgs {
    #[arg(long, value_name = "FILE")]
    model_file: PathBuf,

    #[arg(long, value_name = "FILE")]
    qrels: PathBuf,

    #[arg(short)]
    k: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct QrelsArgs {
    #[arg(long, value_name = "FILE")]
    qrels: PathBuf,
}

#[derive(Args)]
struct ShowArgs {
    #[arg(long, required = true, num_args = 1.., value_name = "PATH")]
    corpus: Vec<PathBuf>,

    /// Document id
    #[arg(long)]
    id: usize,
}

const PREVIEW_CHARS: usize = 80;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Fit(args) => fit(&config, args),
        Commands::Search(args) => search(&config, args),
        Commands::Eval(args) => eval(&config, args),
        Commands::Qrels(args) => list_qrels(args),
        Commands::Show(args) => show(&config, args),
    }
}

fn resolve_k(config: &Config, k: Option<usize>) -> Result<usize> {
    let k = k.unwrap_or(config.search.k);
    if k == 0 {
        bail!("-k must be at least 1");
    }
    Ok(k)
}

fn fit(config: &Config, args: FitArgs) -> Result<()> {
    let store = InMemoryStore::from_sources(&args.corpus, &config.corpus.text_field)
        .context("failed to load corpus")?;
    if store.is_empty() {
        tracing::warn!("corpus is empty, every search will return nothing");
    }

    let mut model = Model::new(args.model, config.analyzer(), config.bm25)?;
    model.fit_store(&store);
    persist::save(&model, &args.out)
        .with_context(|| format!("failed to write model to {}", args.out.display()))?;

    println!(
        "Fitted {} model: {} documents, {} terms -> {}",
        model.kind(),
        model.num_documents(),
        model.vocabulary_size(),
        args.out.display()
    );
    Ok(())
}

fn search(config: &Config, args: SearchArgs) -> Result<()> {
    let k = resolve_k(config, args.k)?;
    let model = persist::load(&args.model_file)
        .with_context(|| format!("failed to load model {}", args.model_file.display()))?;
    let result = model.search(&args.query, k);

    if result.is_empty() {
        println!("No results");
        return Ok(());
    }
    let lines = if args.corpus.is_empty() {
        present::format_hits(&result)
    } else {
        let store = InMemoryStore::from_sources(&args.corpus, &config.corpus.text_field)
            .context("failed to load corpus")?;
        if store.len() != model.num_documents() {
            tracing::warn!(
                corpus = store.len(),
                model = model.num_documents(),
                "corpus size differs from the fitted model"
            );
        }
        present::format_hits_with_preview(&result, &store, PREVIEW_CHARS)
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn eval(config: &Config, args: EvalArgs) -> Result<()> {
    let k = resolve_k(config, args.k)?;
    let model = persist::load(&args.model_file)
        .with_context(|| format!("failed to load model {}", args.model_file.display()))?;
    let qrels = Qrels::from_json(&args.qrels)
        .with_context(|| format!("failed to load qrels {}", args.qrels.display()))?;

    let report = Evaluator::new(&model, &qrels).evaluate_all(k);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} model, k = {}", model.kind(), k);
    for entry in &report.queries {
        println!(
            "{}: P@{k}={:.4} R@{k}={:.4} AP={:.4}",
            entry.query, entry.metrics.precision_at_k, entry.metrics.recall_at_k, entry.metrics.average_precision
        );
    }
    println!("Mean P@{k}: {:.4}", report.mean_precision_at_k);
    println!("Mean R@{k}: {:.4}", report.mean_recall_at_k);
    println!("MAP: {:.4}", report.map);
    Ok(())
}

fn list_qrels(args: QrelsArgs) -> Result<()> {
    let qrels = Qrels::from_json(&args.qrels)
        .with_context(|| format!("failed to load qrels {}", args.qrels.display()))?;
    for query in qrels.queries() {
        println!("{query}\t{}", qrels.relevant(query).len());
    }
    Ok(())
}

fn show(config: &Config, args: ShowArgs) -> Result<()> {
    let store = InMemoryStore::from_sources(&args.corpus, &config.corpus.text_field)
        .context("failed to load corpus")?;
    let Some(lines) = present::format_document(&store, args.id) else {
        bail!("document {} not found ({} documents)", args.id, store.len());
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
