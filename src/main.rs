use std::process::ExitCode;

use static_serve::config::Config;
use static_serve::error::StartupError;
use static_serve::logger;
use static_serve::server::{self, StaticFileServer};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging).map_err(StartupError::Logger)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), StartupError> {
    let server = StaticFileServer::from_config(&cfg)?;
    logger::log_server_start(&server.local_addr(), &cfg.server.root_directory);

    server
        .run_until(async {
            let name = server::shutdown_signal().await;
            logger::log_shutdown(name);
        })
        .await;

    Ok(())
}
