use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use mimir::{MetricSubmitter, MetricType, SqliteAggregator};

#[derive(Parser, Debug)]
#[command(author, version, about = "Submit one metric observation to the local Mimir database", long_about = None)]
struct Args {
    /// Metric name
    name: String,

    /// Metric value
    value: f64,

    /// Identifier of the check emitting the metric
    #[arg(short, long, default_value = "cli")]
    check_id: String,

    /// Metric type: gauge, rate, count, monotonic_count, counter, histogram, historate
    #[arg(short = 't', long, default_value = "gauge")]
    metric_type: String,

    /// Tag in key:value or bare-label form (repeat for multiple tags)
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Originating hostname (empty means "infer at aggregation time")
    #[arg(long, default_value = "")]
    hostname: String,

    /// Database path (defaults to ~/.mimir/mimir.db)
    #[arg(long)]
    db_path: Option<String>,

    /// Print aggregator statistics after submitting
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    // Parse metric type at the boundary
    let metric_type = match args.metric_type.parse::<MetricType>() {
        Ok(metric_type) => metric_type,
        Err(e) => {
            eprintln!("Error: {}. Use one of: gauge, rate, count, monotonic_count, counter, histogram, historate", e);
            std::process::exit(1);
        }
    };

    let aggregator = SqliteAggregator::new(args.db_path.clone());
    aggregator.initialize()?;

    let submitter = MetricSubmitter::new(aggregator);

    if let Err(e) = submitter.submit_metric(
        None,
        &args.check_id,
        metric_type,
        &args.name,
        args.value,
        args.tags.clone(),
        &args.hostname,
    ) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!(
        "💾 Recorded {} {}={} for check '{}'",
        metric_type, args.name, args.value, args.check_id
    );

    if args.stats {
        show_stats(&submitter)?;
    }

    Ok(())
}

fn show_stats(
    submitter: &MetricSubmitter<SqliteAggregator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = submitter.aggregator().get_stats()?;

    println!("\n📊 Aggregator Statistics:");
    println!("  Total samples: {}", stats.total_samples);
    println!("  Distinct checks: {}", stats.distinct_checks);

    if let Some(size) = stats.database_size_bytes {
        println!("  Database size: {:.2} KB", size as f64 / 1024.0);
    }

    if let Some(latest) = &stats.latest_sample {
        println!(
            "  Latest sample: {} = {} ({})",
            latest.name,
            latest.value,
            latest.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}
