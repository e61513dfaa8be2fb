//! AniList CLI application.

use anilist_client::api::types::{FavType, FuzzyDate, MediaListStatus, ReviewRating};
use anilist_client::{AniListClient, AniListMutations, ListEntryEdit};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::Config;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// AniList access token (overrides the config file)
    #[arg(long, env = "ANILIST_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Toggle a favourite of any kind
    Favourite {
        #[arg(long, value_enum)]
        kind: FavType,
        #[arg(long)]
        id: i64,
    },

    /// Toggle an anime favourite, or a manga favourite with --manga
    FavouriteById {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        manga: bool,
    },

    /// Create or update a list entry
    EditList {
        #[arg(long)]
        media_id: i64,
        #[arg(long)]
        progress: Option<i32>,
        /// Raw score (0-100)
        #[arg(long)]
        score: Option<i32>,
        #[arg(long)]
        repeat: Option<i32>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, value_enum)]
        status: Option<MediaListStatus>,
        #[arg(long)]
        private: Option<bool>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        started: Option<NaiveDate>,
        /// Completion date (YYYY-MM-DD)
        #[arg(long)]
        completed: Option<NaiveDate>,
        /// Custom list name (repeatable)
        #[arg(long = "custom-list")]
        custom_lists: Vec<String>,
    },

    /// Delete a list entry
    DeleteList {
        #[arg(long)]
        id: i64,
    },

    /// Vote on a review
    RateReview {
        #[arg(long)]
        review_id: i64,
        #[arg(long, value_enum)]
        rating: ReviewRating,
    },

    /// Publish a review
    PostReview {
        #[arg(long)]
        media_id: i64,
        #[arg(long)]
        score: i32,
        #[arg(long)]
        summary: String,
        #[arg(long)]
        body: String,
    },

    /// Post a text activity
    PostActivity {
        #[arg(long)]
        text: String,
    },

    /// Reply to an activity
    Reply {
        #[arg(long)]
        activity_id: i64,
        #[arg(long)]
        text: String,
    },

    /// List the most popular anime
    Top {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 25)]
        per_page: u32,
    },

    /// Delete all cached responses
    ClearCache,

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Command::InitConfig { force } = args.command {
        return init_config(&args.config, force);
    }

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(token) = args.token.clone() {
        config.anilist.token = Some(token);
    }

    let mut log_config = shared::LogConfig::from_config(&config, "anilist");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Loaded configuration");

    let client = AniListClient::from_config(&config).context("Failed to create AniList client")?;
    let mutations = AniListMutations::new(client);

    let result = run(&mutations, args.command).await;

    let rate_limit = mutations.client().rate_limit_state();
    if let Some(reset) = rate_limit.reset_time() {
        println!(
            "Rate limited by AniList; resets at {} ({}s)",
            reset,
            rate_limit.seconds_until_reset(chrono::Utc::now())
        );
    }

    result
}

async fn run(mutations: &AniListMutations, command: Command) -> Result<()> {
    match command {
        Command::Favourite { kind, id } => {
            report(mutations.toggle_fav(kind, id).await);
        }
        Command::FavouriteById { id, manga } => {
            report(mutations.toggle_favourite(!manga, id).await);
        }
        Command::EditList {
            media_id,
            progress,
            score,
            repeat,
            notes,
            status,
            private,
            started,
            completed,
            custom_lists,
        } => {
            let edit = ListEntryEdit {
                media_id,
                progress,
                score,
                repeat,
                notes,
                status,
                private,
                started_at: started.map(FuzzyDate::from),
                completed_at: completed.map(FuzzyDate::from),
                custom_lists: (!custom_lists.is_empty()).then_some(custom_lists),
            };
            report(mutations.edit_list(&edit).await);
        }
        Command::DeleteList { id } => {
            report(mutations.delete_list(id).await);
        }
        Command::RateReview { review_id, rating } => {
            match mutations.rate_review(review_id, rating).await {
                Some(review) => println!(
                    "Review {}: {}/{} users found this helpful",
                    review.id,
                    review.rating.unwrap_or(0),
                    review.rating_amount.unwrap_or(0)
                ),
                None => println!("Failed"),
            }
        }
        Command::PostReview {
            media_id,
            score,
            summary,
            body,
        } => {
            println!("{}", mutations.post_review(&summary, &body, media_id, score).await);
        }
        Command::PostActivity { text } => {
            println!("{}", mutations.post_activity(&text).await);
        }
        Command::Reply { activity_id, text } => {
            println!("{}", mutations.post_reply(activity_id, &text).await);
        }
        Command::Top { page, per_page } => {
            let page = mutations
                .top_anime(page, per_page)
                .await
                .context("Failed to fetch top anime")?;
            for media in &page.media {
                println!(
                    "{:>8}  {:<50}  {:>4} eps  {}",
                    media.id,
                    media.display_title(),
                    media.episodes.map(|e| e.to_string()).unwrap_or_else(|| "?".to_string()),
                    media.status.as_deref().unwrap_or("")
                );
            }
        }
        Command::ClearCache => {
            mutations
                .client()
                .clear_cache()
                .context("Failed to clear response cache")?;
            println!("Response cache cleared");
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}

fn report(success: bool) {
    println!("{}", if success { "Success" } else { "Failed" });
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    Config::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
