use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use social_seeder::config::Settings;
use social_seeder::dispatcher::PostDispatcher;
use social_seeder::error::Result as AppResult;
use social_seeder::generator::{NameGenerator, PostGenerator};
use social_seeder::lexicon::LexiconCache;
use social_seeder::platform::{create_platform, PlatformKind};
use social_seeder::posts::PostPlanner;
use social_seeder::template::ContentEngine;

/// Synthetic social-media content generator
#[derive(Parser)]
#[command(name = "social-seeder")]
#[command(about = "Generates synthetic social-media posts and publishes them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a post batch and publish it to a platform
    Post {
        /// Target platform
        platform: PlatformKind,

        /// Override the configured total posts per run
        #[arg(long)]
        max_posts: Option<usize>,
    },
    /// Print randomly generated full names
    Names {
        /// How many names to generate
        #[arg(long, default_value_t = 50)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new()?;
    tracing::info!("Configuration loaded");

    match cli.command {
        Command::Post {
            platform,
            max_posts,
        } => run_post(settings, platform, max_posts).await?,
        Command::Names { count } => run_names(settings, count)?,
    }

    Ok(())
}

async fn run_post(
    mut settings: Settings,
    platform_kind: PlatformKind,
    max_posts: Option<usize>,
) -> AppResult<()> {
    if let Some(max_posts) = max_posts {
        settings.generator.max_posts = max_posts;
    }
    tracing::info!(platform = %platform_kind, max_posts = settings.generator.max_posts, "Starting post run");

    let lexicons = Arc::new(LexiconCache::new(&settings.generator.path_template));
    let engine = ContentEngine::new(lexicons);
    let generator = PostGenerator::new(engine, &settings.generator.default_posts_file);
    let planner = PostPlanner::new(
        generator,
        &settings.generator.client_posts_file,
        settings.generator.max_posts,
    );

    let posts = planner.plan()?;
    tracing::info!(total = posts.len(), "Post batch planned");

    let platform = create_platform(platform_kind, &settings)?;
    let dispatcher = PostDispatcher::new(platform);

    let summary = dispatcher.publish_all(&posts).await;
    tracing::info!(
        attempted = summary.attempted,
        published = summary.published,
        failed = summary.failed,
        "Dispatch complete"
    );

    Ok(())
}

fn run_names(settings: Settings, count: usize) -> AppResult<()> {
    let lexicons = Arc::new(LexiconCache::new(&settings.generator.path_template));
    let generator = NameGenerator::new(lexicons);

    for name in generator.generate(count)? {
        println!("{name}");
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
