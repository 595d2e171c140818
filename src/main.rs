//! Statement Review CLI
//!
//! Command-line front end for the statement review engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- > review.csv
//! cargo run -- --filter flagged --sort asc
//! cargo run -- --transactions january.csv --search amazon
//! cargo run -- --upload march.pdf --approve 3 --dispute 7 --processing-delay-ms 100
//! ```
//!
//! The program starts from the demo dataset (or a transactions CSV), submits
//! any uploaded statements and waits for their ingestion, applies reviewer
//! decisions, then writes the filtered and sorted review view to stdout.
//! Notifications, statements and dashboard numbers are logged to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable transactions file, duplicate IDs, output failure, etc.)

use statement_review::cli::{self, CliArgs};
use statement_review::core::{NotificationSink, PlaceholderParser, TracingSink};
use statement_review::io::TransactionReader;
use statement_review::{
    write_transactions_csv, FileHandle, ReviewError, ReviewQuery, ReviewSession, ReviewStatus,
    Transaction, TransactionStore,
};
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio::runtime::{Builder, Handle};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args = cli::parse_args();

    // Logs go to stderr so stdout stays pure CSV
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("statement_review={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let runtime = match Builder::new_multi_thread()
        .worker_threads(args.worker_threads())
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    let handle = runtime.handle().clone();
    if let Err(e) = runtime.block_on(run(&args, handle)) {
        error!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: &CliArgs, runtime: Handle) -> Result<(), ReviewError> {
    let config = args.to_pipeline_config();
    let sink: Arc<dyn NotificationSink> = Arc::new(TracingSink);

    let session = match &args.transactions_file {
        Some(path) => {
            let store = TransactionStore::with_transactions(load_transactions(path)?)?;
            let parser = Arc::new(PlaceholderParser::new(
                config.min_synthetic_count,
                config.max_synthetic_count,
            ));
            ReviewSession::new(Arc::new(store), parser, sink, &config, runtime)
        }
        None => ReviewSession::seeded(sink, &config, runtime)?,
    };

    // Failed submissions and transitions are already reported through the sink
    for path in &args.uploads {
        match FileHandle::from_path(path) {
            Ok(file) => {
                if let Ok(statement) = session.submit(file) {
                    info!(id = %statement.id, "Uploaded {}", statement.filename);
                }
            }
            Err(e) => error!("Skipping upload: {}", e),
        }
    }

    session.drain().await;

    let decisions = args
        .approve
        .iter()
        .map(|id| (id, ReviewStatus::Approved))
        .chain(args.dispute.iter().map(|id| (id, ReviewStatus::Disputed)));
    for (id, status) in decisions {
        if let Err(e) = session.transition(id, status) {
            debug!(id = %id, "Skipping {} decision: {}", status, e);
        }
    }

    let query = ReviewQuery::new(args.search.as_str(), args.filter, args.sort);
    let view = session.review(&query);
    let mut output = std::io::stdout();
    write_transactions_csv(&view, &mut output)?;

    for statement in session.statements() {
        info!(
            id = %statement.id,
            status = %statement.status,
            transactions = ?statement.transaction_count,
            "{}",
            statement.filename
        );
    }

    let stats = session.stats();
    info!(
        total = stats.total,
        flagged = stats.flagged_count,
        pending = stats.pending_count,
        approved = stats.approved_count,
        disputed = stats.disputed_count,
        "Review summary"
    );

    let dashboard = session.dashboard();
    info!(
        total_statements = dashboard.total_statements,
        flagged_transactions = dashboard.flagged_transactions,
        disputes_resolved = dashboard.disputes_resolved,
        "Dashboard"
    );

    Ok(())
}

/// Read a transactions CSV, skipping rows that fail to parse
fn load_transactions(path: &Path) -> Result<Vec<Transaction>, ReviewError> {
    let mut transactions = Vec::new();
    for result in TransactionReader::new(path)? {
        match result {
            Ok(tx) => transactions.push(tx),
            Err(e) => warn!("Skipping row: {}", e),
        }
    }
    info!("Loaded {} transactions from {}", transactions.len(), path.display());
    Ok(transactions)
}
