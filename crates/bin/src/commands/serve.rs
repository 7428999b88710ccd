//! Serve command - runs the todolist HTTP server until a shutdown signal.

use std::time::Duration;

use tokio::signal::unix::{SignalKind, signal};

use todolist::{SessionConfig, SessionManager, TodoServer};

use crate::cli::ServeArgs;

/// Run the todolist server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig::new(Duration::from_secs(args.session_timeout))?;
    let mut server = TodoServer::new(SessionManager::with_config(config));

    let addr = format!("{}:{}", args.host, args.port);
    let local_addr = server.start(&addr).await?;

    // Print startup message
    println!("todolist server listening on http://localhost:{}", local_addr.port());
    println!();
    println!("Available endpoints:");
    println!("  POST   /register   - Create an account and log in");
    println!("  POST   /login      - Log in, replacing any previous session");
    println!("  GET    /item       - List your items");
    println!("  POST   /item       - Add an item");
    println!("  PUT    /item       - Update an item, or mark all with id -1");
    println!("  DELETE /item       - Remove an item, or all completed with id -1");
    println!("  GET    /health     - Server health");
    println!();
    println!("Sessions expire {}s after login", args.session_timeout);
    println!("Press Ctrl+C to shutdown");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
        _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
    }

    server.stop().await?;
    // Cancel pending expiry timers before exit
    server.manager().reset().await;

    println!("Server shut down");
    Ok(())
}
