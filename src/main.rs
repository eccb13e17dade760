//! scamguard - CLI entry point.

use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scamguard::input::{
    EXAMPLE_MESSAGES, SCAM_SAMPLES, ScamSample, check_message, example_message, scam_sample,
};
use scamguard::llm::retry_with_backoff;
use scamguard::{AnalysisError, AnalysisResult, Config, GeminiClient, RetryPolicy, analyze};

/// Assess a message for scam and fraud risk using a hosted language model.
#[derive(Parser, Debug)]
#[command(name = "scamguard")]
#[command(about = "Assess a message for scam and fraud risk using a hosted language model")]
#[command(version)]
struct Cli {
    /// Message to analyze (read from stdin when omitted)
    message: Option<String>,

    /// Analyze one of the built-in example messages instead
    #[arg(long, conflicts_with = "message", value_parser = clap::value_parser!(u8).range(1..=3))]
    example: Option<u8>,

    /// Analyze a catalogued real-world scam (see --samples)
    #[arg(long, conflicts_with_all = ["message", "example"])]
    sample: Option<usize>,

    /// List the catalogued real-world scams and exit
    #[arg(long, conflicts_with_all = ["message", "example", "sample"])]
    samples: bool,

    /// Print the validated analysis as JSON
    #[arg(long)]
    json: bool,

    /// Model endpoint base URL, e.g. a proxy holding the API key (overrides SCAMGUARD_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Model name (overrides SCAMGUARD_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Request timeout in seconds (overrides SCAMGUARD_TIMEOUT)
    #[arg(long)]
    timeout: Option<u64>,

    /// Retry this many times when the model endpoint is unavailable
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.samples {
        print_samples();
        return Ok(());
    }

    // Step 1: Resolve the message
    let sample = match cli.sample {
        Some(number) => Some(scam_sample(number).with_context(|| {
            format!("No sample {} (1-{})", number, SCAM_SAMPLES.len())
        })?),
        None => None,
    };
    let message = match sample {
        Some(sample) => sample.message.to_string(),
        None => read_message(&cli)?,
    };
    check_message(&message)?;

    // Step 2: Resolve configuration and build the client
    let mut config = Config::from_env();
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(model) = &cli.model {
        config = config.with_model(model);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = GeminiClient::new(&config).context("Invalid configuration")?;

    // Step 3: Analyze, retrying only when the endpoint itself failed
    if !cli.json {
        eprintln!("Analyzing message...");
    }
    let policy = RetryPolicy::with_retries(cli.retries);
    let outcome = retry_with_backoff(policy, AnalysisError::is_upstream, || {
        analyze(&client, &message)
    })
    .await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            // Detail has already been logged; the user only sees the summary.
            bail!("{}", e.user_message());
        }
    };

    // Step 4: Print
    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize analysis")?;
        println!("{}", json);
    } else {
        print_report(&result);
        if let Some(sample) = sample {
            print_expected(sample);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Pick the message from `--example`, the positional argument or stdin.
fn read_message(cli: &Cli) -> Result<String> {
    if let Some(number) = cli.example {
        return example_message(usize::from(number))
            .map(str::to_string)
            .with_context(|| format!("No example {} (1-{})", number, EXAMPLE_MESSAGES.len()));
    }

    if let Some(message) = &cli.message {
        return Ok(message.clone());
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("No message given. Pass it as an argument, pipe it on stdin, or use --example or --sample.");
    }

    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read message from stdin")?;
    Ok(buffer)
}

/// Print a plain-text summary of the analysis.
fn print_report(result: &AnalysisResult) {
    println!("Risk level: {} ({}/100)", result.risk_level(), result.risk_score());
    println!("Confidence: {}%", result.confidence());
    println!();
    println!("{}", result.reason());

    print_list("Suspicious words", result.suspicious_words());
    print_list("Suspicious patterns", result.suspicious_patterns());
    print_list("Manipulation tactics", result.linguistic_analysis().manipulation_tactics());
    print_list("Recommendations", result.recommendations());

    println!();
    println!("Intent: {}", result.intent_detection().primary_intent());
    if !result.intent_detection().targeted_action().is_empty() {
        println!("Targeted action: {}", result.intent_detection().targeted_action());
    }

    println!();
    println!("Verdict: {}", result.ai_adviser().verdict());
    println!("{}", result.ai_adviser().summary());
    print_list("Action plan", result.ai_adviser().action_plan());
}

/// Print the catalogue with the numbers accepted by `--sample`.
fn print_samples() {
    for (idx, sample) in SCAM_SAMPLES.iter().enumerate() {
        println!(
            "{:>2}. [{}] {} ({}, expected {}, compromise rate {})",
            idx + 1,
            sample.channel,
            sample.category,
            sample.source,
            sample.expected_level,
            sample.compromise_rate
        );
        println!("    {}", sample.message);
    }
}

fn print_expected(sample: &ScamSample) {
    println!();
    println!(
        "Catalogued as {} by {} ({})",
        sample.expected_level, sample.source, sample.url
    );
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for item in items {
        println!("- {}", item);
    }
}
