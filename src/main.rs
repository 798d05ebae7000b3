use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use issuelens::config::Config;
use issuelens::issues::loader::{self, LoadPolicy};
use issuelens::issues::repository::IssueRepository;
use issuelens::output::terminal;
use issuelens::topics::analyzer::{coherence_scores, TopicAnalyzer, NO_TOPIC};
use issuelens::topics::lda::GibbsLda;
use issuelens::topics::lexicon::Lexicon;
use issuelens::topics::naive::{FrequencyBand, NaiveModel};
use issuelens::topics::tokenizer::{Tokenizer, TokenizerConfig};

/// issuelens: spot emerging themes in issue reports, version by version.
#[derive(Parser)]
#[command(name = "issuelens", version, about)]
struct Cli {
    /// JSON-lines issue export (overrides ISSUELENS_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Skip malformed lines instead of aborting the load
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Metric {
    Tf,
    TfIdf,
}

#[derive(clap::Args)]
struct TokenArgs {
    /// Produce word pairs instead of single words
    #[arg(long, default_value = "1")]
    n_gram: usize,

    /// Keep shell-quoted phrases together as one token
    #[arg(long)]
    quotes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how many issues each recognized version has
    Versions,

    /// Rank the most representative terms per version
    Terms {
        /// Only this version (default: every version present)
        #[arg(long)]
        version: Option<String>,

        #[arg(long, value_enum, default_value = "tf-idf")]
        metric: Metric,

        /// Terms per version (overrides ISSUELENS_N_WORDS)
        #[arg(long)]
        n_words: Option<usize>,

        /// Drop terms found in fewer than this fraction of documents
        #[arg(long)]
        min_freq: Option<f64>,

        /// Drop terms found in more than this fraction of documents
        #[arg(long)]
        max_freq: Option<f64>,

        /// Print JSON instead of a chart
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tokens: TokenArgs,
    },

    /// Fit a topic model per version and list its topics
    Topics {
        #[arg(long)]
        version: Option<String>,

        /// Number of topics (default: 5)
        #[arg(long, default_value = "5")]
        topics: usize,

        /// Sampling seed (overrides ISSUELENS_SEED)
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        tokens: TokenArgs,
    },

    /// Score candidate topic counts by u_mass coherence
    Coherence {
        #[arg(long)]
        version: Option<String>,

        /// Smallest topic count to try
        #[arg(long, default_value = "2")]
        from: usize,

        /// Largest topic count to try
        #[arg(long, default_value = "10")]
        to: usize,

        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        tokens: TokenArgs,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("issuelens=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let repo = load_repository(&config, cli.data.as_ref(), cli.lenient)?;
    let lexicon = Arc::new(Lexicon::english());

    match cli.command {
        Commands::Versions => terminal::display_versions(&repo),

        Commands::Terms {
            version,
            metric,
            n_words,
            min_freq,
            max_freq,
            json,
            tokens,
        } => {
            let band = FrequencyBand {
                min_freq: min_freq.unwrap_or(config.band.min_freq),
                max_freq: max_freq.unwrap_or(config.band.max_freq),
            };
            let model = NaiveModel::new(
                n_words.unwrap_or(config.n_words),
                build_tokenizer(&tokens, &lexicon)?,
                band,
            )?;

            let mut results = serde_json::Map::new();
            for version in selected_versions(&repo, version)? {
                let texts = repo.texts_for_version(&version);
                let (ranked, label) = match metric {
                    Metric::Tf => (model.ranked_tf(&texts), "TF"),
                    Metric::TfIdf => (model.ranked_tf_idf(&texts), "TF-IDF"),
                };
                if json {
                    results.insert(version, serde_json::to_value(&ranked)?);
                } else {
                    terminal::display_ranked_terms(&version, label, &ranked);
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }

        Commands::Topics {
            version,
            topics,
            seed,
            tokens,
        } => {
            let tokenizer = build_tokenizer(&tokens, &lexicon)?;
            let seed = seed.or(config.seed);

            for version in selected_versions(&repo, version)? {
                let issues = repo.get_by_version(&version);
                let texts = repo.texts_for_version(&version);

                let mut analyzer =
                    TopicAnalyzer::new(topics, tokenizer.clone(), GibbsLda::default(), seed);
                analyzer
                    .fit(&texts)
                    .with_context(|| format!("Topic model failed for version {version}"))?;
                let assigned = analyzer.topics(&texts)?;

                let mut rows = Vec::with_capacity(topics);
                for topic in 0..topics {
                    let count = assigned.iter().filter(|&&t| t == topic as i64).count();
                    let example = assigned
                        .iter()
                        .position(|&t| t == topic as i64)
                        .map(|i| issues[i].summary().to_string());
                    rows.push((analyzer.describe_topic(topic)?, count, example));
                }
                let unassigned = assigned.iter().filter(|&&t| t == NO_TOPIC).count();
                terminal::display_topics(&version, &rows, unassigned);
            }
        }

        Commands::Coherence {
            version,
            from,
            to,
            seed,
            tokens,
        } => {
            if from == 0 || from > to {
                anyhow::bail!("Invalid topic range {from}..={to}; need 1 <= from <= to");
            }
            let tokenizer = build_tokenizer(&tokens, &lexicon)?;
            let components: Vec<usize> = (from..=to).collect();
            let seed = seed.or(config.seed);

            for version in selected_versions(&repo, version)? {
                let texts = repo.texts_for_version(&version);
                println!("Scoring {} topic counts for {version}...", components.len());
                let scores =
                    coherence_scores(&tokenizer, &texts, &components, &GibbsLda::default(), seed)?;
                terminal::display_coherence(&version, &components, &scores);
            }
        }
    }

    Ok(())
}

fn load_repository(config: &Config, data: Option<&PathBuf>, lenient: bool) -> Result<IssueRepository> {
    let path = data.unwrap_or(&config.data_path);
    let policy = if lenient {
        LoadPolicy::SkipInvalid
    } else {
        LoadPolicy::Strict
    };
    info!(path = %path.display(), "Loading issues");
    loader::read_repository(path, &config.versions, policy)
        .with_context(|| format!("Failed to load issues from {}", path.display()))
}

fn build_tokenizer(args: &TokenArgs, lexicon: &Arc<Lexicon>) -> Result<Tokenizer> {
    let config = TokenizerConfig {
        n_gram: args.n_gram,
        ignore_quotes: !args.quotes,
    };
    Ok(Tokenizer::new(config, Arc::clone(lexicon))?)
}

/// The requested version, or every version present in sorted order.
fn selected_versions(repo: &IssueRepository, version: Option<String>) -> Result<Vec<String>> {
    match version {
        Some(version) => {
            if repo.get_by_version(&version).is_empty() {
                anyhow::bail!(
                    "No issues for version {version}. Run `issuelens versions` to see what was loaded."
                );
            }
            Ok(vec![version])
        }
        None => {
            let versions = repo.sorted_versions();
            if versions.is_empty() {
                println!("{}", "No issues with a recognized version were loaded.".yellow());
            }
            Ok(versions)
        }
    }
}
