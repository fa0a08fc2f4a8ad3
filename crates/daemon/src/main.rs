//! Queue Board - discovery daemon entry point

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use queueboard_core::application::{
    stop_channel, AdapterFactory, BoardRegistry, DiscoveryOrchestrator, RediscoveryScheduler,
};
use queueboard_core::domain::QueueAdapter;
use queueboard_core::port::id_provider::UuidProvider;
use queueboard_core::AppConfig;
use queueboard_infra_redis::{RedisKeyStore, RedisQueueConnector};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "queueboard", version, about = "Discover queues and publish them to the board")]
struct Args {
    /// Load environment variables from this file before reading configuration
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Run one discovery pass, print a queue summary and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Environment (explicit file, else ./.env when present)
    let env_loaded = match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            Some(path.clone())
        }
        None => dotenvy::dotenv().ok(),
    };

    // 2. Logging
    logging::init(logging::LogFormat::from_env())?;
    info!("Queue Board v{} starting...", VERSION);
    if let Some(path) = env_loaded {
        info!(path = %path.display(), "Loaded environment file");
    }

    // 3. Configuration
    let config = Arc::new(AppConfig::from_env());
    info!(
        redis = %config.redis,
        prefix = %config.bull_prefix,
        runtime = %config.bull_version,
        auth_enabled = config.auth_enabled,
        "Configuration loaded"
    );

    // 4. Setup dependencies (DI wiring)
    let store = Arc::new(open_store(&config).context("Invalid Redis connection settings")?);
    let board = Arc::new(BoardRegistry::new());
    let factory = AdapterFactory::new(
        Arc::new(RedisQueueConnector::new()),
        config.redis.clone(),
        config.bull_version,
        config.queue_prefix(),
    );
    let orchestrator = Arc::new(
        DiscoveryOrchestrator::new(
            store,
            board.clone(),
            factory,
            Arc::new(UuidProvider),
            config.bull_prefix.clone(),
        )
        .with_timeout(config.discovery_timeout),
    );

    info!(
        "Dashboard available at http://localhost:{}{}",
        config.port, config.home_page
    );
    if config.auth_enabled {
        info!(login_page = %config.login_page, "Login required");
    }

    // 5. Startup discovery (failure keeps the process alive)
    let report = orchestrator.run().await;
    if !report.is_published() {
        warn!(pass_id = %report.pass_id, "Startup discovery failed, board is empty");
    }

    if args.once {
        print_summary(&board.snapshot()).await;
        return Ok(());
    }

    // 6. Periodic re-discovery
    let (stop_handle, stop_signal) = stop_channel();
    let scheduler_handle = config.discovery_interval.map(|period| {
        let scheduler = RediscoveryScheduler::new(orchestrator.clone(), period);
        tokio::spawn(scheduler.run(stop_signal))
    });

    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    stop_handle.stop();
    if let Some(handle) = scheduler_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete.");

    Ok(())
}

async fn print_summary(queues: &[QueueAdapter]) {
    if queues.is_empty() {
        println!("No queues found");
        return;
    }

    println!(
        "{:<32} {:<8} {:>8} {:>8} {:>10} {:>8}",
        "QUEUE", "RUNTIME", "WAITING", "ACTIVE", "COMPLETED", "FAILED"
    );
    for queue in queues {
        match summary_row(queue).await {
            Ok(row) => println!("{}", row),
            Err(e) => error!(queue = %queue.name(), error = %e, "Failed to read job counts"),
        }
    }
}

fn open_store(config: &AppConfig) -> queueboard_core::Result<RedisKeyStore> {
    Ok(RedisKeyStore::new(&config.redis)?)
}

async fn summary_row(queue: &QueueAdapter) -> queueboard_core::Result<String> {
    let counts = queue.job_counts().await?;

    Ok(format!(
        "{:<32} {:<8} {:>8} {:>8} {:>10} {:>8}",
        queue.name().as_str(),
        queue.runtime().to_string(),
        counts.waiting,
        counts.active,
        counts.completed,
        counts.failed
    ))
}
