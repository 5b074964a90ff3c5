//! Echo Bot Demo
//!
//! Three handlers sharing one dispatcher:
//!
//! - `ping`: answers `/ping`, `/botify` or `/botty` with "Please wait ...",
//!   then edits the reply to show the round trip time
//! - `greet`: says hi to the sender of every other message
//! - `mention`: answers when `@<username>` appears (needs `--username`)
//!
//! # Usage
//!
//! ```bash
//! FERROGRAM_BOT__TOKEN=123:abc cargo run --package echo-bot -- --mode long-polling
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use ferrogram::prelude::*;
use tracing::{debug, warn};

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "echo-bot", about = "Ferrogram demo bot")]
struct Cli {
    /// Configuration file (`.toml`, `.yaml` or `.yml`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile.
    #[arg(short, long)]
    profile: Option<String>,

    /// Update mode: webhook, long-polling or socket-server.
    #[arg(short, long)]
    mode: Option<String>,

    /// Bot username to answer mentions for, without `@`.
    #[arg(short, long)]
    username: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Measures how long a reply round trip takes.
async fn ping(ctx: UpdateContext) -> ApiResult<()> {
    let Some(message) = ctx.message() else {
        return Ok(());
    };
    if !message.is_command(&["ping", "botify", "botty"]) {
        return Ok(());
    }

    let started = Instant::now();
    let reply = ctx.reply("Please wait ...").await?;
    let Some(sent) = reply.as_entity() else {
        warn!(reply = ?reply.failure(), "Ping reply was not sent");
        return Ok(());
    };

    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    ctx.edit(sent, format!("Ping took time: {elapsed:.3} ms"))
        .await?;
    Ok(())
}

/// Greets the sender by first name.
async fn greet(ctx: UpdateContext) -> ApiResult<()> {
    let Some(message) = ctx.message() else {
        return Ok(());
    };
    if message.command().is_some() {
        return Ok(());
    }

    let name = message
        .sender()
        .and_then(|user| user.string("first_name"))
        .unwrap_or_else(|| "there".to_string());
    let reply = ctx.reply(format!("Hi {name} :)")).await?;
    if let Some(failure) = reply.failure() {
        warn!(error = %failure, "Greeting rejected");
    }
    Ok(())
}

/// Answers messages mentioning `username`.
async fn mention(ctx: UpdateContext, username: String) -> ApiResult<()> {
    let Some(message) = ctx.message() else {
        return Ok(());
    };
    if message.mentions(&username) {
        debug!(username = %username, "Mentioned");
        ctx.reply("Yes?").await?;
    }
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = FerrogramRuntime::builder();
    if let Some(path) = &cli.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &cli.profile {
        builder = builder.profile(profile);
    }
    if let Some(mode) = &cli.mode {
        builder = builder.set("updates.mode", mode);
    }
    let mut runtime = builder.build()?;

    runtime.register(on(UpdateKind::Message, ping).named("ping"));
    runtime.register(on(UpdateKind::Message, greet).named("greet"));
    if let Some(username) = cli.username {
        let username = username.trim_start_matches('@').to_string();
        runtime.register(
            on(UpdateKind::Message, move |ctx: UpdateContext| {
                mention(ctx, username.clone())
            })
            .named("mention"),
        );
    }

    runtime.run().await?;
    Ok(())
}
