use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod config;
mod errors;
mod logging;
mod models;
mod observers;
mod services;
mod state;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load(std::env::args())?;
    let (mut log_writer, log_handle) = logging::LogWriter::new();
    logging::registry_logs(&mut log_writer, config.log.level, config.log.log_file()?)?;
    let log_writer = Arc::new(log_writer);

    let console = utils::Console::stdout(models::CurrencyFormat::new(
        config.console.currency_symbol.as_str(),
    ));
    let session = state::Session::build(&config, console)
        .await
        .context("Error: Failed to build the product catalog")?;
    tokio::spawn(shutdown_signal(
        session.shutdown_signal.clone(),
        log_writer.clone(),
    ));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = services::run(&session, stdin).await;

    log_writer.shutdown().await;
    log_handle.await.ok();
    result.context("Error: Session aborted")
}

// 128 plus the signal number
const SIGINT_EXIT: i32 = 130;
const SIGTERM_EXIT: i32 = 143;

async fn shutdown_signal(session_signal: CancellationToken, log_writer: Arc<logging::LogWriter>) {
    use tokio::signal;
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(reason = %err, "Install Ctrl+C handler failed");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(reason = %err, "Install signal handler failed");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    let code = tokio::select! {
        _ = ctrl_c => SIGINT_EXIT,
        _ = terminate => SIGTERM_EXIT,
        // the session finished on its own
        _ = session_signal.cancelled() => return,
    };
    session_signal.cancel();
    tracing::info!(code, "Shutdown...");
    log_writer.shutdown().await;
    // stdin reads block runtime shutdown, so leave without waiting for them
    std::process::exit(code);
}
