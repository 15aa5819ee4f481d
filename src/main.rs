// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::{env, net::SocketAddr};
use tokio::signal;
use visionai_node::{
    api::{start_server, AppState},
    cli::Cli,
    export::ExportService,
    version,
    vision::VisionModelManager,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    println!("🚀 Starting {}...", version::get_version_string());
    println!("✨ Features: {}\n", version::FEATURES.join(", "));

    let manager = VisionModelManager::new(&config).await?;
    println!(
        "🤖 Backend: {} ({})",
        manager.backend(),
        manager.device()
    );

    let exporter = ExportService::new(&config.export_dir)?;
    let state = AppState::new(manager, exporter)?;

    let addr: SocketAddr = config.listen_addr().parse()?;
    println!("🔗 URL: http://{}", addr);
    println!("\n💡 Press Ctrl+C to stop\n");

    let static_dir = config.static_dir.clone();
    let server = tokio::spawn(async move { start_server(state, addr, static_dir.as_deref()).await });

    tokio::select! {
        result = server => {
            result??;
        }
        _ = signal::ctrl_c() => {
            println!("\n⏹️  Shutting down...");
        }
    }

    println!("👋 Goodbye!");
    Ok(())
}
