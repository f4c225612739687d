// Basic example for connecting to Flatpak Discord.
//
// Flatpak Discord listens on the same numbered pipe scheme as standard
// Discord, just under a sandboxed XDG_RUNTIME_DIR; since the client
// discovers pipes through that same environment variable, no special
// handling is needed beyond using the standard constructor from inside the
// Flatpak sandbox.

use clap::Parser;
use presence_ipc::{ActivityBuilder, DiscordIpcClient, Result};
use std::time::Duration;

/// Discord Rich Presence Flatpak Example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Discord Application Client ID
    #[arg(short, long)]
    client_id: Option<String>,
}

fn main() -> Result {
    // Load .env file if it exists (optional)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let client_id = args
        .client_id
        .or_else(|| std::env::var("DISCORD_CLIENT_ID").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: DISCORD_CLIENT_ID is required!");
            eprintln!("Provide it via:");
            eprintln!("  - Command line: cargo run --example basic_flatpak -- --client-id YOUR_ID");
            eprintln!(
                "  - Environment: DISCORD_CLIENT_ID=YOUR_ID cargo run --example basic_flatpak"
            );
            eprintln!("  - .env file: Create .env from .env.example and set DISCORD_CLIENT_ID");
            std::process::exit(1);
        });

    let client = DiscordIpcClient::new(&client_id);
    client.initialize()?;

    println!("Waiting for the worker thread to connect...");
    for _ in 0..50 {
        if client.is_connected() {
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    if client.is_connected() {
        println!("✓ Connected on pipe {}", client.connected_pipe());
    } else {
        println!("Still waiting for Discord; the worker keeps retrying in the background.");
    }

    let activity = ActivityBuilder::new()
        .state("Running under Flatpak")
        .details("Using the standard auto-discovery path")
        .start_timestamp_now()?
        .large_image("car")
        .large_text("This is a large image")
        .button("View Car", "https://google.com")
        .button("Documentation", "https://docs.rs/presence-ipc")
        .try_build()?;

    client.set_presence(Some(activity))?;
    println!("✓ Activity set!");

    std::thread::sleep(Duration::from_secs(10));

    client.set_presence(None)?;
    println!("✓ Activity cleared!");
    client.dispose();
    Ok(())
}
