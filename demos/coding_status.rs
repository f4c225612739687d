use clap::Parser;
use presence_ipc::{ActivityBuilder, DiscordIpcClient, Result};
use std::time::Duration;

/// Discord Rich Presence Coding Status Example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Discord Application Client ID
    #[arg(short, long)]
    client_id: Option<String>,
}

/// Example showing developer coding status, updated in place without
/// tearing down the worker thread.
fn main() -> Result {
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let client_id = args
        .client_id
        .or_else(|| std::env::var("DISCORD_CLIENT_ID").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: DISCORD_CLIENT_ID is required!");
            eprintln!("Provide it via:");
            eprintln!("  - Command line: cargo run --example coding_status -- --client-id YOUR_ID");
            eprintln!(
                "  - Environment: DISCORD_CLIENT_ID=YOUR_ID cargo run --example coding_status"
            );
            eprintln!("  - .env file: Create .env from .env.example and set DISCORD_CLIENT_ID");
            std::process::exit(1);
        });

    let client = DiscordIpcClient::new(client_id);

    println!(" Starting Discord Rich Presence for Coding");
    client.initialize()?;

    let activity = ActivityBuilder::new()
        .state("Writing Rust code")
        .details("Building Discord RPC library")
        .start_timestamp_now()?
        .large_image("rust_logo") // Upload Rust logo to Discord
        .large_text("Rust Programming")
        .small_image("vscode") // Upload VS Code icon to Discord
        .small_text("VS Code")
        .button("View on GitHub", "https://github.com/your-username/presence-ipc")
        .button(" Rust Docs", "https://doc.rust-lang.org")
        .try_build()?;

    client.set_presence(Some(activity))?;
    println!(" Coding status set! Others can see you're programming in Rust.");

    println!("  Keeping status for 30 seconds...");
    std::thread::sleep(Duration::from_secs(30));

    // Just update the state/details fields in place; assets and buttons
    // stay as they were because `update_state`/`update_details` only
    // replace the field they target.
    client.update_state("Debugging")?;
    client.update_details("Fixing async issues")?;
    println!(" Updated to debugging status!");

    std::thread::sleep(Duration::from_secs(15));

    client.set_presence(None)?;
    println!(" Cleared coding status!");
    client.dispose();

    Ok(())
}
