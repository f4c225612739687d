// Comprehensive example demonstrating ALL ActivityBuilder options.
//
// This example shows every available builder method with explanations
// of what each field does and how it appears in Discord.

use clap::Parser;
use presence_ipc::{ActivityBuilder, DiscordIpcClient, Result};
use std::time::Duration;

/// Discord Rich Presence Complete Builder Example
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
            eprintln!("  - Command line: cargo run --example builder_all -- --client-id YOUR_ID");
            eprintln!("  - Environment: DISCORD_CLIENT_ID=YOUR_ID cargo run --example builder_all");
            eprintln!("  - .env file: Create .env from .env.example and set DISCORD_CLIENT_ID");
            std::process::exit(1);
        });

    println!("=== Complete ActivityBuilder Reference Example ===\n");

    let client = DiscordIpcClient::new(client_id);
    println!("Initializing worker thread...");
    client.initialize()?;
    println!("✓ Worker spawned!\n");

    println!("Setting activity with all available options...\n");

    let mut builder = ActivityBuilder::new()
        // State: first line of text (smaller text)
        .state("Playing a custom game")
        // Details: second line of text (larger text above state)
        .details("Custom game mode with friends")
        // Large image: main big image shown on the left. Must be an asset
        // key uploaded in the Discord Developer Portal.
        .large_image("car")
        .large_text("This is the large image - shows on hover!")
        // Small image: smaller circular badge over the large image.
        .small_image("rust_logo")
        .small_text("Built with Rust 🦀")
        // Party: shows "X of Y" (e.g. "2 of 4").
        .party("party-12345", 2, 4)
        // NOTE: buttons and secrets are mutually exclusive on Discord's
        // side, so buttons are only added when the `secrets` feature is
        // off, below.
        .instance(true);

    builder = builder.start_timestamp_now()?;

    #[cfg(not(feature = "secrets"))]
    {
        builder = builder
            .button("View Game", "https://example.com/game")
            .button("Documentation", "https://docs.rs/presence-ipc");
    }

    #[cfg(feature = "secrets")]
    {
        builder = builder
            .join_secret("join_secret_12345")
            .spectate_secret("spectate_secret_67890")
            .match_secret("match_secret_abcde");
    }

    let activity = builder.try_build()?;

    client.set_presence(Some(activity))?;
    println!("✓ Activity set successfully!");
    println!("\n📱 Check your Discord profile to see the activity!");
    println!("   You should see:");
    println!("   • Details: 'Custom game mode with friends'");
    println!("   • State: 'Playing a custom game'");
    println!("   • Large image with tooltip");
    println!("   • Small image (Rust logo) in corner");
    println!("   • Party info: '2 of 4'");
    #[cfg(not(feature = "secrets"))]
    println!("   • Two clickable buttons");
    #[cfg(feature = "secrets")]
    println!("   • Join/spectate/match secrets enabled (ask-to-join)");
    println!("   • Elapsed time counter");

    println!("\nKeeping activity visible for 30 seconds...");
    for i in 1..=30 {
        print!("\r   {} seconds remaining... ", 31 - i);
        std::io::Write::flush(&mut std::io::stdout()).unwrap();
        std::thread::sleep(Duration::from_secs(1));
    }
    println!("\r   ✓ Time's up!                    ");

    println!("\nClearing activity...");
    client.set_presence(None)?;
    println!("✓ Activity cleared!");
    client.dispose();

    println!("\n=== Example completed! ===\n");
    Ok(())
}
