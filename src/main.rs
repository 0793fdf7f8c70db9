use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cascade_publisher::{api, cascade::CascadePublisher, config::Config};

#[derive(Parser)]
#[command(name = "kcd-publisher")]
#[command(about = "Cascade publishing of linked content items")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP and Event Grid triggers
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "7071")]
        port: u16,
    },
    /// Run one whole-project cascade and exit
    Run,
    /// Run a whole-project cascade periodically
    Timer {
        /// Seconds between runs
        #[arg(short, long, default_value = "300")]
        interval_secs: u64,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "cascade_publisher=debug,kcd_publisher=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(publisher: CascadePublisher, port: u16) -> anyhow::Result<()> {
    let app = api::create_router(publisher);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Cascade publisher listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_timer(publisher: CascadePublisher, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        interval.tick().await;
        match publisher.run_scan().await {
            Ok(report) => tracing::info!(
                published = report.published.len(),
                scheduled = report.scheduled.len(),
                skipped = report.skipped.len(),
                "Timer run finished"
            ),
            // The next tick picks up whatever this run left unpublished.
            Err(e) => tracing::error!("Timer run failed: {:#}", anyhow::Error::from(e)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; variables may come from the host.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let config = Config::from_env()?;
    let publisher = CascadePublisher::from_config(&config);

    match cli.command {
        Some(Commands::Serve { port }) => serve(publisher, port).await?,
        Some(Commands::Run) => {
            let report = publisher.run_scan().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(Commands::Timer { interval_secs }) => run_timer(publisher, interval_secs).await,
        None => serve(publisher, 7071).await?,
    }

    Ok(())
}
