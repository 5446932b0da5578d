/**
 * chatsync - Headless Client Entry Point
 *
 * Bootstraps the synchronization engine against the configured chat server,
 * prints the timeline, then keeps it fresh with the refresh scheduler and
 * prints every message that arrives until Ctrl-C.
 *
 * Usage: chatsync [config.toml]
 */
use std::collections::HashSet;
use std::sync::Arc;

use chatsync::client::{
    ChatApi, ChatSnapshot, ChatSync, Config, LocalDatabase, RefreshScheduler, SystemClock,
};
use chatsync::shared::Message;
use tracing_subscriber::EnvFilter;

fn print_message(snapshot: &ChatSnapshot, message: &Message) {
    let author = snapshot
        .participant(&message.author_id)
        .map(|p| p.name.as_str())
        .unwrap_or(message.author_id.as_str());
    let time = chrono::DateTime::from_timestamp_millis(message.sent_at)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let edited = if message.is_edited { " (edited)" } else { "" };
    let attachments = match message.attachments.len() {
        0 => String::new(),
        n => format!(" [{} image(s)]", n),
    };
    println!("[{}] {}: {}{}{}", time, author, message.body(), attachments, edited);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatsync=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    tracing::info!("Using chat server {}", config.server_url());

    let db = LocalDatabase::open(config.database_path(), config.storage_key()).await?;
    let sync = Arc::new(
        ChatSync::open(
            Arc::new(ChatApi::new(config.clone())?),
            Arc::new(db),
            Arc::new(SystemClock),
        )
        .await,
    );

    if let Err(e) = sync.bootstrap().await {
        tracing::error!("Initial load failed, showing cached state: {}", e);
    }

    let mut updates = sync.subscribe();
    let snapshot = updates.borrow_and_update().clone();
    let mut printed: HashSet<String> = HashSet::new();
    for message in &snapshot.messages {
        print_message(&snapshot, message);
        printed.insert(message.id.clone());
    }

    let mut scheduler = RefreshScheduler::new(config.refresh_interval());
    scheduler.start(Arc::clone(&sync));

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                for message in &snapshot.messages {
                    if printed.insert(message.id.clone()) {
                        print_message(&snapshot, message);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    scheduler.stop().await;
    Ok(())
}
