use clap::Parser;
use poolhttpd::application::config::{Cli, Config};
use poolhttpd::application::handler;
use poolhttpd::application::server::Server;
use poolhttpd::common::error::Result;
use poolhttpd::common::logger;
use poolhttpd::core::signal;
use std::thread;
use std::time::Duration;

const SIGNAL_POLL_INTERVAL_MS: u64 = 100;

fn main() {
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error in configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logger::init(&config.log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    signal::install_shutdown_handlers()?;

    let server_config = config.server_config();
    tracing::info!(
        address = %server_config.bind_address,
        backlog = server_config.backlog,
        threads = server_config.thread_count,
        handler = %config.handler,
        "Configuration loaded"
    );

    let mut server = Server::start(&server_config, handler::from_kind(config.handler))?;
    println!("listening on port {}...", server.local_addr().port());

    while !signal::shutdown_requested() {
        thread::sleep(Duration::from_millis(SIGNAL_POLL_INTERVAL_MS));
    }

    tracing::info!("Shutdown signal received");
    server.shutdown()
}
