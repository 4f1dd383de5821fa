//! CSV load job: cleans a review export and inserts the valid rows.
//!
//! ```text
//! review-store --file data/reviews.csv
//! ```

use clap::Parser;
use review_store::infra::{config, logging};
use review_store::{load_data, ReviewService};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "review-store")]
#[command(about = "Load a CSV export of reviews into the review store")]
#[command(version)]
struct Args {
    /// CSV file to load
    #[arg(short, long)]
    file: PathBuf,

    /// Database URL (or set DATABASE_URL env var)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init();
    let args = Args::parse();

    let database_url = match args.database_url {
        Some(url) => url,
        None => config::database_url()?,
    };
    let service = ReviewService::connect(&database_url, config::max_connections()?).await?;

    let summary = load_data(&service, &args.file).await?;
    info!(
        target: "data_loader",
        "done: {} of {} rows loaded from {} ({} rejected)",
        summary.loaded(),
        summary.read,
        args.file.display(),
        summary.rejected.len()
    );

    service.gateway().close().await;
    Ok(())
}
