use clap::Parser;
use presence_ipc::retry::{with_retry, RetryConfig};
use presence_ipc::{ActivityBuilder, DiscordIpcClient, Result};
use std::time::Duration;

/// Discord Rich Presence Connection Retry Example
///
/// Demonstrates retrying the one-shot `initialize()` call itself with
/// [`with_retry`]; the background worker thread has its own separate
/// reconnect-with-backoff loop that runs for as long as the client lives.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Discord Application Client ID
    #[arg(short, long)]
    client_id: Option<String>,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let client_id = args
        .client_id
        .or_else(|| std::env::var("DISCORD_CLIENT_ID").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: DISCORD_CLIENT_ID is required!");
            eprintln!("Provide it via:");
            eprintln!("  - Command line: cargo run --example connection_retry -- --client-id YOUR_ID");
            eprintln!("  - Environment: DISCORD_CLIENT_ID=YOUR_ID cargo run --example connection_retry");
            eprintln!("  - .env file: Create .env from .env.example and set DISCORD_CLIENT_ID");
            std::process::exit(1);
        });

    println!("=== Discord Rich Presence Connection Retry Examples ===\n");

    println!("Example 1: Initialize with automatic retry");
    println!("{}", "-".repeat(50));
    example_basic_retry(&client_id)?;

    println!();

    println!("Example 2: Custom retry configuration");
    println!("{}", "-".repeat(50));
    example_custom_retry(&client_id)?;

    Ok(())
}

/// Example 1: retry the initial `initialize()` call with default backoff.
fn example_basic_retry(client_id: &str) -> Result {
    println!("Attempting to initialize with automatic retry (3 attempts)...");

    let config = RetryConfig::with_max_attempts(3);

    let client = with_retry(&config, || {
        println!("  Initializing...");
        let client = DiscordIpcClient::new(client_id);
        client.initialize()?;
        Ok(client)
    })?;

    println!("✓ Initialized successfully!");

    let activity = ActivityBuilder::new()
        .state("Example 1: Auto Retry")
        .details("Testing connection retry")
        .start_timestamp_now()?
        .try_build()?;

    client.set_presence(Some(activity))?;
    println!("✓ Activity set!");

    std::thread::sleep(Duration::from_secs(2));
    client.set_presence(None)?;
    client.dispose();

    Ok(())
}

/// Example 2: custom retry configuration with exponential backoff, shown
/// for the one-shot `initialize()` call.
fn example_custom_retry(client_id: &str) -> Result {
    println!("Initializing with custom retry configuration:");
    println!("  - Max attempts: 5");
    println!("  - Initial delay: 500ms");
    println!("  - Max delay: 8000ms");
    println!("  - Backoff multiplier: 2.0");

    let config = RetryConfig::new(5, 500, 8000, 2.0);

    println!("\nDelay progression:");
    for attempt in 0..config.max_attempts {
        let delay = config.delay_for_attempt(attempt);
        println!("  Attempt {}: {}ms delay", attempt + 1, delay.as_millis());
    }

    println!("\nInitializing...");

    let client = with_retry(&config, || {
        print!(".");
        std::io::Write::flush(&mut std::io::stdout()).ok();
        let client = DiscordIpcClient::new(client_id);
        client.initialize()?;
        Ok(client)
    })?;

    println!("\n✓ Initialized!");

    let activity = ActivityBuilder::new()
        .state("Example 2: Custom Retry")
        .details("With exponential backoff")
        .start_timestamp_now()?
        .try_build()?;

    client.set_presence(Some(activity))?;
    println!("✓ Activity set!");

    std::thread::sleep(Duration::from_secs(2));
    client.set_presence(None)?;
    client.dispose();

    Ok(())
}
