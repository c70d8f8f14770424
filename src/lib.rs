//! Range fixture server
//!
//! A small HTTP/1.1 server with a fixed in-memory resource table and
//! single-range (`Range: bytes=start-end`) support, used to check that
//! tunnels and proxies carry partial-content reads correctly.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resources;
pub mod server;

use std::sync::Arc;

/// Bind, log the banner, install signal handlers and serve until shutdown
pub async fn run(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg)?;

    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let bound_addr = listener.local_addr()?;

    let state = Arc::new(config::AppState::new(&cfg));
    logger::log_server_start(&bound_addr, &cfg, &state.resources);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::start_server_loop(listener, state, Arc::clone(&signals.shutdown)).await?;
    Ok(())
}
