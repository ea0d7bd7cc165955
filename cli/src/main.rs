use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use talesearch_core::persist::{self, RankedDoc, ScoreReport};
use talesearch_core::tokenizer::preprocess_query;
use talesearch_core::{rank, vector, Corpus, TfIdfModel, Vocabulary};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "talesearch")]
#[command(about = "TF-IDF retrieval over a corpus of short tales", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw book (title -> page texts) into a corpus file
    Normalize {
        /// Raw book JSON path
        #[arg(long)]
        input: String,
        /// Output corpus JSON path
        #[arg(long)]
        output: String,
    },
    /// Print corpus statistics
    Stats {
        /// Corpus JSON path
        #[arg(long)]
        corpus: String,
    },
    /// Rank documents against a free-text query
    Query {
        /// Corpus JSON path
        #[arg(long)]
        corpus: String,
        /// Free-text query
        #[arg(long)]
        query: String,
        /// Number of results to keep; -1 returns all
        #[arg(long, default_value_t = 10)]
        top_k: i64,
        /// Scoring method
        #[arg(long, value_enum, default_value = "matching")]
        method: Method,
        /// Write a JSON score report to this path
        #[arg(long)]
        export: Option<String>,
    },
    /// Emit the document-document cosine similarity matrix as JSON
    Matrix {
        /// Corpus JSON path
        #[arg(long)]
        corpus: String,
        /// Output path; stdout when omitted
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Matching,
    Cosine,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Matching => "matching",
            Method::Cosine => "cosine",
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { input, output } => normalize(&input, &output),
        Commands::Stats { corpus } => stats(&corpus),
        Commands::Query {
            corpus,
            query,
            top_k,
            method,
            export,
        } => run_query(&corpus, &query, top_k, method, export.as_deref()),
        Commands::Matrix { corpus, output } => matrix(&corpus, output.as_deref()),
    }
}

fn normalize(input: &str, output: &str) -> Result<()> {
    let book = persist::load_raw_book(input)?;
    let corpus = Corpus::from_raw_book(&book);
    persist::save_corpus(output, &corpus)?;
    tracing::info!(tales = corpus.len(), output, "corpus written");
    Ok(())
}

fn stats(path: &str) -> Result<()> {
    let corpus = persist::load_corpus(path)?;
    let vocab = Vocabulary::build(&corpus)?;
    println!("documents: {}", corpus.len());
    println!("types: {}", vocab.type_count());
    println!("tokens: {}", vocab.token_count());
    let sample: Vec<&str> = vocab.terms().iter().take(10).map(String::as_str).collect();
    println!("sample: {}", sample.join(" "));
    Ok(())
}

fn run_query(
    corpus_path: &str,
    query: &str,
    top_k: i64,
    method: Method,
    export: Option<&str>,
) -> Result<()> {
    let corpus = persist::load_corpus(corpus_path)?;
    let vocab = Vocabulary::build(&corpus)?;
    let type_count = vocab.type_count();
    let token_count = vocab.token_count();
    let model = TfIdfModel::fit(&corpus, vocab)?;

    let tokens = preprocess_query(query);
    let k = if top_k < 0 { None } else { Some(top_k as usize) };
    let ranked = match method {
        Method::Matching => rank::rank_by_matching(&model, &tokens, k)?,
        Method::Cosine => rank::rank_by_cosine(&model, &tokens, k)?,
    };

    for (title, score) in &ranked {
        println!("{score:.6}\t{title}");
    }

    if let Some(path) = export {
        let report = ScoreReport {
            query: query.to_owned(),
            method: method.as_str().to_owned(),
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "".into()),
            num_docs: model.num_docs(),
            type_count,
            token_count,
            results: ranked
                .iter()
                .map(|(title, score)| RankedDoc {
                    title: title.clone(),
                    score: *score,
                })
                .collect(),
        };
        persist::save_report(path, &report)?;
        tracing::info!(path, "score report written");
    }
    Ok(())
}

fn matrix(corpus_path: &str, output: Option<&str>) -> Result<()> {
    let corpus = persist::load_corpus(corpus_path)?;
    let vocab = Vocabulary::build(&corpus)?;
    let model = TfIdfModel::fit(&corpus, vocab)?;
    let (titles, matrix) = vector::similarity_matrix(&model)?;

    let json = serde_json::json!({ "titles": titles, "matrix": matrix });
    match output {
        Some(path) => {
            std::fs::write(path, serde_json::to_string_pretty(&json)?)?;
            tracing::info!(path, "similarity matrix written");
        }
        None => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(())
}
