use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, UserId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use recommender::{RecommendationOutcome, RecommendationReport, Recommender, RecommenderConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// user-cf - User-based collaborative filtering over MovieLens ratings
#[derive(Parser)]
#[command(name = "user-cf")]
#[command(
    about = "Recommend movies from the ratings of users with correlated taste",
    long_about = None
)]
struct Cli {
    /// Directory holding movie.csv and rating.csv
    #[arg(short, long, default_value = "data/ml-20m")]
    data_dir: PathBuf,

    /// JSON file with recommender thresholds (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    thresholds: ThresholdArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Per-run overrides of the config file values
#[derive(Args)]
struct ThresholdArgs {
    /// Keep items with more ratings than this
    #[arg(long)]
    popularity_threshold: Option<u32>,

    /// Neighbors must share more watched items than this
    #[arg(long)]
    min_overlap: Option<usize>,

    /// Minimum correlation for a neighbor to count
    #[arg(long, allow_negative_numbers = true)]
    similarity_cutoff: Option<f64>,

    /// Only show items scoring above this
    #[arg(long)]
    score_threshold: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for (sampled with --seed if omitted)
        #[arg(long)]
        user_id: Option<UserId>,

        /// Seed used to sample the target user
        #[arg(long, default_value_t = 45)]
        seed: u64,

        /// Number of recommendations to print
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also list the similar neighbors
        #[arg(long)]
        explain: bool,
    },

    /// Show a user's rating history
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Run the pipeline for many sampled users and report latencies
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Seed used to sample the users
        #[arg(long, default_value_t = 45)]
        seed: u64,
    },
}

/// One presented row: a recommendation joined with its title
#[derive(Serialize)]
struct PresentedItem<'a> {
    rank: usize,
    movie_id: u32,
    title: &'a str,
    score: f64,
    neighbor_count: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.thresholds)?;

    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir).context("Failed to load MovieLens dataset")?,
    );
    info!("Loaded dataset in {:?}", start.elapsed());

    match cli.command {
        Commands::Recommend {
            user_id,
            seed,
            limit,
            json,
            explain,
        } => handle_recommend(data_index, config, user_id, seed, limit, json, explain)?,
        Commands::User { user_id } => handle_user(&data_index, user_id)?,
        Commands::Benchmark { requests, seed } => {
            handle_benchmark(data_index, config, requests, seed).await?
        }
    }

    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides
fn load_config(path: Option<&Path>, overrides: &ThresholdArgs) -> Result<RecommenderConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => RecommenderConfig::default(),
    };

    if let Some(threshold) = overrides.popularity_threshold {
        config = config.with_popularity_threshold(threshold);
    }
    if let Some(min_overlap) = overrides.min_overlap {
        config = config.with_min_overlap(min_overlap);
    }
    if let Some(cutoff) = overrides.similarity_cutoff {
        config = config.with_similarity_cutoff(cutoff);
    }
    if let Some(threshold) = overrides.score_threshold {
        config = config.with_score_threshold(threshold);
    }
    Ok(config)
}

/// Users that have at least one popular rating, i.e. valid targets
fn eligible_users(recommender: &Recommender) -> Vec<UserId> {
    let matrix = recommender.matrix();
    matrix
        .user_ids()
        .into_iter()
        .filter(|&user_id| matrix.row(user_id).is_some_and(|row| !row.is_empty()))
        .collect()
}

/// Handle the 'recommend' command
fn handle_recommend(
    data_index: Arc<DataIndex>,
    config: RecommenderConfig,
    user_id: Option<UserId>,
    seed: u64,
    limit: usize,
    json: bool,
    explain: bool,
) -> Result<()> {
    let recommender = Recommender::new(data_index.clone(), config)?;

    let user_id = match user_id {
        Some(user_id) => user_id,
        None => {
            let mut rng = StdRng::seed_from_u64(seed);
            let sampled = eligible_users(&recommender)
                .choose(&mut rng)
                .copied()
                .ok_or_else(|| anyhow!("No user rated any item above the popularity threshold"))?;
            info!("Sampled user {} with seed {}", sampled, seed);
            sampled
        }
    };

    let report = recommender
        .recommend(user_id)
        .with_context(|| format!("Cannot recommend for user {}", user_id))?;

    if json {
        let presented = present(&data_index, &report, limit);
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "report": &report,
                "presented": presented,
            }))?
        );
    } else {
        print_recommendations(&data_index, &report, limit, explain);
    }
    Ok(())
}

/// Join recommendations with titles. Never changes scores or order.
fn present<'a>(
    data_index: &'a DataIndex,
    report: &RecommendationReport,
    limit: usize,
) -> Vec<PresentedItem<'a>> {
    report
        .recommendations
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, item)| PresentedItem {
            rank: i + 1,
            movie_id: item.movie_id,
            title: data_index
                .get_movie(item.movie_id)
                .map(|m| m.title.as_str())
                .unwrap_or("<unknown title>"),
            score: item.score,
            neighbor_count: item.neighbor_count,
        })
        .collect()
}

/// Helper function to format and print recommendations
fn print_recommendations(
    data_index: &DataIndex,
    report: &RecommendationReport,
    limit: usize,
    explain: bool,
) {
    println!(
        "{}",
        format!("Recommendations for user {}:", report.user_id).bold().blue()
    );
    println!(
        "{}Watched popular items: {}, neighbor candidates: {}, similar neighbors: {}",
        "• ".green(),
        report.watched_items,
        report.candidate_neighbors,
        report.neighbors.len()
    );

    match report.outcome {
        RecommendationOutcome::Recommended => {}
        RecommendationOutcome::NoOverlappingNeighbors => {
            println!("{}", "No user shares enough watched items.".yellow())
        }
        RecommendationOutcome::NoSimilarNeighbors => {
            println!("{}", "No neighbor reaches the similarity cutoff.".yellow())
        }
        RecommendationOutcome::NothingAboveThreshold => {
            println!("{}", "No unseen item scores above the threshold.".yellow())
        }
    }

    for item in present(data_index, report, limit) {
        println!(
            "{}. {} - Score: {:.4} ({} ratings)",
            item.rank.to_string().green(),
            item.title,
            item.score,
            item.neighbor_count
        );
    }

    if explain {
        println!("{}", "Similar neighbors:".bold());
        for neighbor in &report.neighbors {
            println!(
                "  - user {}: similarity {:.4} over {} shared items",
                neighbor.user_id, neighbor.similarity, neighbor.overlap
            );
        }
    }
}

/// Handle the 'user' command
fn handle_user(data_index: &DataIndex, user_id: UserId) -> Result<()> {
    let ratings = data_index.get_user_ratings(user_id);
    if ratings.is_empty() {
        return Err(anyhow!("User {} not found", user_id));
    }

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    let avg_rating = ratings.iter().map(|r| r.rating).sum::<f32>() / ratings.len() as f32;
    println!("{}Number of ratings: {}", "• ".cyan(), ratings.len());
    println!("{}Average rating: {:.2}", "• ".cyan(), avg_rating);

    let mut top_rated: Vec<_> = ratings.iter().collect();
    top_rated.sort_by(|a, b| b.rating.total_cmp(&a.rating).then(a.movie_id.cmp(&b.movie_id)));
    println!("Top rated movies:");
    for rating in top_rated.iter().take(10) {
        let title = data_index
            .get_movie(rating.movie_id)
            .map(|m| m.title.as_str())
            .unwrap_or("<unknown title>");
        println!("  - {} (Rating: {})", title, rating.rating);
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    data_index: Arc<DataIndex>,
    config: RecommenderConfig,
    requests: usize,
    seed: u64,
) -> Result<()> {
    let recommender = Recommender::new(data_index, config)?;

    let users = eligible_users(&recommender);
    let mut rng = StdRng::seed_from_u64(seed);
    let user_ids: Vec<UserId> = (0..requests)
        .filter_map(|_| users.choose(&mut rng).copied())
        .collect();
    if user_ids.is_empty() {
        return Err(anyhow!("No user rated any item above the popularity threshold"));
    }

    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        let recommender = recommender.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            recommender.recommend(user_id)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p) as usize];
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;

    println!("Benchmark results:");
    println!("Requests: {}", timings.len());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        timings.len() as f64 / total_time.as_secs_f64()
    );

    Ok(())
}
