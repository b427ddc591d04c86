use clap::{Parser, Subcommand};
use sleepwatch_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sleepwatch")]
#[command(about = "Poor-night sleep alerts from your sleep tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch recent sleep, evaluate the latest night, alert if poor (default)
    Check,

    /// Evaluate built-in mock nights without calling the API or webhook
    DryRun,

    /// Post a sample payload to the configured webhook
    TestWebhook,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    sleepwatch_core::logging::init(cli.verbose);

    let config = Config::load(cli.config.as_deref())?.with_env();
    tracing::debug!("Timezone: {}", config.timezone);

    match cli.command {
        Some(Commands::Check) | None => cmd_check(&config),
        Some(Commands::DryRun) => cmd_dry_run(&config),
        Some(Commands::TestWebhook) => cmd_test_webhook(&config),
    }
}

fn cmd_check(config: &Config) -> Result<()> {
    let client = OuraClient::new(&config.provider)?;
    let mut notifier = sleepwatch_core::notifier::from_config(&config.webhook)?;

    let outcome = run_check(&client, notifier.as_mut(), &config.thresholds)?;

    match outcome {
        CheckOutcome::NoData => {
            println!("No completed sleep records in window.");
        }
        CheckOutcome::NoAlert(result) => {
            println!(
                "No alert: score {}, total {} min.",
                result.latest.sleep_score, result.latest.total_sleep_min
            );
        }
        CheckOutcome::Alerted {
            result,
            payload,
            delivered,
        } => {
            if config.webhook.target().is_none() {
                println!("Would notify: {}", payload.message);
                println!("{}", serde_json::to_string_pretty(&payload.meta)?);
            } else if delivered {
                println!(
                    "Alert sent: score {}, total {} min, streak {}.",
                    result.latest.sleep_score, result.latest.total_sleep_min, result.streak
                );
            } else {
                println!("Alert not delivered: {}", payload.title);
            }
        }
    }

    Ok(())
}

fn cmd_dry_run(config: &Config) -> Result<()> {
    let thresholds = &config.thresholds;
    let records = sleepwatch_core::demo::sample_records();

    println!("=== Dry Run ===");
    println!();
    println!("Mock sleep data ({} nights, most recent first):", records.len());
    for record in &records {
        let metrics = NightMetrics::from_record(record);
        println!(
            "  - {}: score {}, {} min, latency {} min",
            metrics.date.format("%Y-%m-%d"),
            metrics.sleep_score,
            metrics.total_sleep_min,
            metrics
                .sleep_latency_min
                .map(|m| m.to_string())
                .unwrap_or_else(|| "N/A".into())
        );
    }
    println!();
    println!("Thresholds:");
    println!("  score below          {}", thresholds.score_threshold);
    println!("  total sleep below    {} min", thresholds.min_total_sleep_min);
    println!("  latency above        {} min", thresholds.max_sleep_latency_min);
    println!("  streak escalates at  {}", thresholds.poor_nights_streak);
    println!();

    let Some(result) = evaluate(&records, thresholds) else {
        println!("Result: no records to evaluate");
        return Ok(());
    };

    println!("Analysis result:");
    println!("{}", serde_json::to_string_pretty(&result)?);
    println!();

    match AlertLevel::classify(&result, thresholds) {
        Some(level) => {
            if level == AlertLevel::Streak {
                println!("Streak alert: {} consecutive poor nights", result.streak);
            } else {
                println!("Poor night detected");
            }
            println!("Would send payload:");
            let payload = AlertPayload::new(&result, level);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        None => {
            println!("Good night - no alert would be sent.");
            println!(
                "No alert: score {}, total {} min.",
                result.latest.sleep_score, result.latest.total_sleep_min
            );
        }
    }

    println!();
    println!("Dry run completed (no API calls made, no webhooks sent)");
    Ok(())
}

fn cmd_test_webhook(config: &Config) -> Result<()> {
    let payload = sleepwatch_core::demo::sample_payload();

    let Some(url) = config.webhook.target() else {
        println!("Would notify:");
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    };

    let notifier = WebhookNotifier::new(url, config.webhook.timeout_secs)?;
    match notifier.post(&payload) {
        Ok(status) => println!("Test webhook status: {}", status.as_u16()),
        Err(Error::Webhook { status, body }) => {
            println!("Test webhook status: {}", status);
            tracing::warn!("Webhook response: {}", body);
        }
        Err(e) => eprintln!("Test error: {}", e),
    }

    Ok(())
}
