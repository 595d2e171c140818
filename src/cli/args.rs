use crate::core::{FlagFilter, PipelineConfig, SortOrder};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Review credit-card statement transactions
#[derive(Parser, Debug)]
#[command(name = "statement-review")]
#[command(about = "Ingest statements and review their transactions", long_about = None)]
pub struct CliArgs {
    /// Transactions CSV to start from (the demo dataset is used when omitted)
    #[arg(
        long = "transactions",
        value_name = "FILE",
        help = "Path to a transactions CSV file (default: built-in demo data)"
    )]
    pub transactions_file: Option<PathBuf>,

    /// Statement files to submit for ingestion
    #[arg(long = "upload", value_name = "FILE", help = "Statement file to upload (repeatable)")]
    pub uploads: Vec<PathBuf>,

    /// Transactions to approve
    #[arg(long = "approve", value_name = "ID", help = "Approve a transaction (repeatable)")]
    pub approve: Vec<String>,

    /// Transactions to dispute
    #[arg(long = "dispute", value_name = "ID", help = "Dispute a transaction (repeatable)")]
    pub dispute: Vec<String>,

    /// Case-insensitive merchant/description search
    #[arg(long = "search", value_name = "TERM", default_value = "")]
    pub search: String,

    /// Which transactions to show
    #[arg(long = "filter", value_name = "FILTER", default_value = "all")]
    pub filter: FlagFilter,

    /// Date ordering of the output
    #[arg(long = "sort", value_name = "ORDER", default_value = "desc")]
    pub sort: SortOrder,

    /// Time a statement stays processing
    #[arg(
        long = "processing-delay-ms",
        value_name = "MS",
        help = "Milliseconds before an upload completes (default: 2000)"
    )]
    pub processing_delay_ms: Option<u64>,

    /// Smallest transaction count reported for an upload
    #[arg(long = "min-count", value_name = "N", help = "Smallest reported transaction count (default: 5)")]
    pub min_count: Option<u32>,

    /// Largest transaction count reported for an upload
    #[arg(long = "max-count", value_name = "N", help = "Largest reported transaction count (default: 24)")]
    pub max_count: Option<u32>,

    /// Runtime worker threads
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Log level used when RUST_LOG is unset
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl CliArgs {
    /// Create a PipelineConfig from CLI arguments
    ///
    /// Options left unset take their default values. An invalid count range
    /// is reported by `PipelineConfig::new` and replaced with the default.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        if self.processing_delay_ms.is_none() && self.min_count.is_none() && self.max_count.is_none() {
            return PipelineConfig::default();
        }

        let default = PipelineConfig::default();
        PipelineConfig::new(
            self.processing_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(default.processing_delay),
            self.min_count.unwrap_or(default.min_synthetic_count),
            self.max_count.unwrap_or(default.max_synthetic_count),
        )
    }

    /// Worker thread count, falling back to the number of CPU cores
    pub fn worker_threads(&self) -> usize {
        match self.workers {
            Some(0) | None => num_cpus::get(),
            Some(n) => n,
        }
    }
}
