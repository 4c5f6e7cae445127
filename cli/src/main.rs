use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use recommender_core::evaluation::{evaluate, load_test_cases};
use recommender_core::{RecommendOptions, Recommender};
use serde::Serialize;
use std::fs;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recommender")]
#[command(about = "Recommend assessments for a job description", long_about = None)]
struct Cli {
    /// Assessment catalog (JSON array)
    #[arg(long, global = true, default_value = "./data/assessments.json")]
    catalog: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the catalog against a query or a plain-text job description file
    Recommend {
        /// Query text
        #[arg(long, conflicts_with = "file")]
        query: Option<String>,
        /// Read the job description from a text file
        #[arg(long)]
        file: Option<String>,
        /// Number of results
        #[arg(short, long, default_value_t = 10)]
        k: usize,
        /// Do not filter by a time budget mentioned in the query
        #[arg(long, default_value_t = false)]
        no_duration_filter: bool,
        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print catalog and vocabulary statistics
    Inspect {
        /// Also list the vocabulary in index order
        #[arg(long, default_value_t = false)]
        terms: bool,
    },
    /// Score the engine against labelled queries (recall@k, MAP@k)
    Eval {
        /// JSON array of { query, relevant_assessments }
        #[arg(long, default_value = "./data/eval_cases.json")]
        cases: String,
        /// Cutoff for the metrics
        #[arg(short, long, default_value_t = 3)]
        k: usize,
    },
}

#[derive(Serialize)]
struct Output<'a, T: Serialize> {
    query: &'a str,
    count: usize,
    recommendations: &'a [T],
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let engine = Recommender::load(&cli.catalog).with_context(|| format!("loading catalog {}", cli.catalog))?;

    match cli.command {
        Commands::Recommend { query, file, k, no_duration_filter, json } => {
            let text = match (query, file) {
                (Some(q), _) => q,
                (None, Some(path)) => fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
                (None, None) => bail!("either --query or --file is required"),
            };
            recommend(&engine, &text, k, !no_duration_filter, json)
        }
        Commands::Inspect { terms } => {
            inspect(&engine, terms);
            Ok(())
        }
        Commands::Eval { cases, k } => {
            let cases = load_test_cases(&cases)?;
            tracing::info!(cases = cases.len(), k, "running evaluation");
            let summary = evaluate(&engine, &cases, k)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

fn recommend(engine: &Recommender, text: &str, k: usize, infer_duration: bool, json: bool) -> Result<()> {
    let opts = if infer_duration { RecommendOptions::infer(text, k) } else { RecommendOptions::new(k) };
    let recs = engine.recommend_with(text, &opts)?;
    if json {
        let out = Output { query: text.trim(), count: recs.len(), recommendations: &recs };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if !engine.has_signal(text) {
        println!("no relevant terms in query; showing catalog order");
    }
    if let Some(limit) = opts.max_duration_minutes {
        println!("time budget: {limit} minutes");
    }
    for (rank, r) in recs.iter().enumerate() {
        let duration = r.assessment.attributes.get("duration").and_then(|v| v.as_str()).unwrap_or("-");
        println!("{:>2}. {:.4}  {:<40} {}", rank + 1, r.score, r.assessment.name, duration);
    }
    Ok(())
}

fn inspect(engine: &Recommender, terms: bool) {
    let vocab = engine.vectorizer().vocabulary();
    println!("assessments: {}", engine.catalog().len());
    println!("vocabulary:  {}", vocab.len());
    if terms {
        for (tid, term) in vocab.terms().iter().enumerate() {
            let idf = engine.vectorizer().idf(tid as u32).unwrap_or(0.0);
            println!("{tid:>6} {term:<24} idf={idf:.4}");
        }
    }
}
