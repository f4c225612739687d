// Example demonstrating pipe selection: auto-discovery vs a pinned index.

use clap::Parser;
use presence_ipc::{ActivityBuilder, DiscordIpcClient};
use std::time::Duration;

/// Discord IPC Pipe Selection Example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Discord Application Client ID
    #[arg(short, long)]
    client_id: Option<String>,

    /// Pin connection attempts to this pipe index (0-9) instead of
    /// scanning all of them.
    #[arg(short, long)]
    pipe: Option<u8>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let client_id = args
        .client_id
        .or_else(|| std::env::var("DISCORD_CLIENT_ID").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: DISCORD_CLIENT_ID is required!");
            eprintln!("Provide it via:");
            eprintln!("  - Command line: cargo run --example pipe_selection -- --client-id YOUR_ID");
            eprintln!("  - Environment: DISCORD_CLIENT_ID=YOUR_ID cargo run --example pipe_selection");
            eprintln!("  - .env file: Create .env from .env.example and set DISCORD_CLIENT_ID");
            std::process::exit(1);
        });

    println!("=== Discord IPC Pipe Selection Example ===\n");

    let client = match args.pipe {
        Some(pipe) => {
            println!("1. Pinning connection attempts to pipe {pipe}...");
            DiscordIpcClient::new(&client_id).with_pipe_index(pipe)
        }
        None => {
            println!("1. Using auto-discovery (scans pipes 0-9)...");
            DiscordIpcClient::new(&client_id)
        }
    };

    client.initialize()?;

    println!("2. Waiting for the worker thread to connect...");
    for _ in 0..50 {
        if client.is_connected() {
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    if client.is_connected() {
        println!("   ✓ Connected on pipe {}", client.connected_pipe());
    } else {
        println!("   Still retrying in the background; is Discord running?");
    }

    let activity = ActivityBuilder::new()
        .state("Using pipe selection")
        .details(format!("Requested pipe: {:?}", args.pipe))
        .try_build()?;

    client.set_presence(Some(activity))?;
    println!("   ✓ Activity set");

    std::thread::sleep(Duration::from_secs(5));

    client.set_presence(None)?;
    println!("   ✓ Activity cleared");
    client.dispose();

    println!("\n=== Example completed! ===");
    Ok(())
}
