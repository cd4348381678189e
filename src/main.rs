use std::process::ExitCode;

use tracing::{error, info};

use feedback_relay::{Config, Dispatcher, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FEEDBACK_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let config = match Config::load_with_env(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration with environment overrides.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = feedback_relay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        feedback_relay::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    let dispatcher = match Dispatcher::smtp(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("Failed to set up mailing: {e}");
            return ExitCode::FAILURE;
        }
    };

    let server = match WebServer::new(&config.server, dispatcher) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to set up web server: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Feedback relay starting on {}", server.addr());
    if let Err(e) = server.run().await {
        error!("Web server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
