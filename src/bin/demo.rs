use std::time::Duration;
use tokio::time;
use tracing_subscriber::{fmt, EnvFilter};

use mimir::{CheckContext, MemoryAggregator, MetricSubmitter, MetricType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    println!("Mimir Metric Submission Demo");
    println!("============================");
    println!("Press Ctrl+C to stop\n");

    let submitter = MetricSubmitter::new(MemoryAggregator::new());

    // One-shot submission with fixed arguments
    submitter.submit_metric(
        None,
        "id",
        MetricType::Gauge,
        "name",
        -99.0,
        vec!["foo".to_string(), "bar".to_string()],
        "myhost",
    )?;

    println!("✅ Recorded one-shot gauge:");
    display_latest(&submitter, "id");
    println!();

    let mut context = CheckContext::default();
    context
        .metadata
        .insert("check_version".to_string(), "0.1.0".to_string());

    let mut interval = time::interval(Duration::from_secs(2));
    let mut iteration: u64 = 0;

    loop {
        interval.tick().await;
        iteration += 1;

        println!(
            "--- Submitting metrics at {} ---",
            chrono::Utc::now().format("%H:%M:%S")
        );

        submitter.submit_metric(
            Some(&context),
            "demo.heartbeat",
            MetricType::Gauge,
            "demo.uptime_intervals",
            iteration as f64,
            vec!["source:demo".to_string()],
            "",
        )?;

        submitter.submit_metric(
            Some(&context),
            "demo.counter",
            MetricType::MonotonicCount,
            "demo.submissions_total",
            (iteration * 2 + 1) as f64,
            vec![],
            "",
        )?;

        display_latest(&submitter, "demo.heartbeat");
        display_latest(&submitter, "demo.counter");
        println!(
            "💾 Total observations recorded: {}\n",
            submitter.aggregator().len()
        );
    }
}

fn display_latest(submitter: &MetricSubmitter<MemoryAggregator>, check_id: &str) {
    match submitter.aggregator().latest_for(check_id) {
        Some(sample) => {
            let hostname = if sample.hostname.is_empty() {
                "<unspecified>"
            } else {
                sample.hostname.as_str()
            };
            println!(
                "  📈 [{}] {} {}={} tags={:?} host={}",
                check_id, sample.metric_type, sample.name, sample.value, sample.tags, hostname
            );
        }
        None => println!("  ⚠️  [{}] no observations recorded", check_id),
    }
}
