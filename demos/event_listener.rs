// Example demonstrating push-mode event delivery: subscribing to
// ask-to-join/spectate notifications and reacting to them from a callback
// instead of polling `invoke()`.

use clap::Parser;
use presence_ipc::{ActivityBuilder, DiscordIpcClient, MessageKind, Result, SubscriptionEvent};
use std::time::Duration;

/// Discord Rich Presence Event Listener Example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Discord Application Client ID
    #[arg(short, long)]
    client_id: Option<String>,
}

fn main() -> Result {
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let client_id = args
        .client_id
        .or_else(|| std::env::var("DISCORD_CLIENT_ID").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: DISCORD_CLIENT_ID is required!");
            eprintln!("Provide it via:");
            eprintln!("  - Command line: cargo run --example event_listener --features secrets -- --client-id YOUR_ID");
            eprintln!("  - Environment: DISCORD_CLIENT_ID=YOUR_ID cargo run --example event_listener --features secrets");
            eprintln!("  - .env file: Create .env from .env.example and set DISCORD_CLIENT_ID");
            std::process::exit(1);
        });

    let client = DiscordIpcClient::new(&client_id).with_auto_events(true);

    client.on_message(|message| match message.kind {
        MessageKind::Ready { user, .. } => {
            println!("ready as {}#{}", user.username, user.discriminator);
        }
        MessageKind::JoinRequest { user } => {
            println!("{} wants to join; auto-accepting", user.username);
        }
        MessageKind::Join { secret } => {
            println!("received a join secret: {secret}");
        }
        MessageKind::Error { code, message } => {
            eprintln!("discord error {code}: {message}");
        }
        MessageKind::ConnectionEstablished { pipe } => {
            println!("connected on pipe {pipe}");
        }
        other => println!("{other:?}"),
    });

    client.initialize()?;
    client.subscribe(SubscriptionEvent::JoinRequest)?;
    client.subscribe(SubscriptionEvent::Join)?;

    let activity = ActivityBuilder::new()
        .state("Listening for join requests")
        .details("Ask to join is enabled")
        .join_secret("example-join-secret")
        .try_build()?;

    client.set_presence(Some(activity))?;

    println!("Listening for 60 seconds. Press Ctrl+C to exit early.");
    std::thread::sleep(Duration::from_secs(60));

    client.set_presence(None)?;
    client.dispose();
    Ok(())
}
