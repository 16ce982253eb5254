pub mod heartbeat;
pub mod prompt;

pub use prompt::run_prompt;

use crate::errors::Result;
use crate::state::Session;
use tokio::io::AsyncBufRead;

/// Runs the prompt loop next to the heartbeat and stops the heartbeat once
/// the prompt loop is done, whatever its outcome.
pub async fn run<R>(session: &Session, reader: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    tracing::info!("session started");
    let heartbeat = session
        .heartbeat_interval
        .map(|interval| heartbeat::spawn(interval, session.shutdown_signal.child_token()));
    let result = run_prompt(reader, session).await;
    session.shutdown_signal.cancel();
    if let Some(heartbeat) = heartbeat {
        if let Err(err) = heartbeat.await {
            tracing::warn!(reason = %err, "heartbeat task failed");
        }
    }
    match &result {
        Ok(()) => tracing::info!("session finished"),
        Err(err) => tracing::error!(reason = %err, "session aborted"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::ErrorKind;
    use crate::models::Price;
    use crate::observers::{PriceObserver, ProductSnapshot};
    use crate::utils::console::capture;
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use std::sync::Arc;

    struct Broken;

    impl PriceObserver for Broken {
        fn name(&self) -> &str {
            "Broken"
        }
        fn receive_update<'a>(
            &'a self,
            _product: &'a ProductSnapshot,
        ) -> BoxFuture<'a, anyhow::Result<()>> {
            async move { Err::<(), _>(anyhow::anyhow!("unreachable sink")) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_run_stops_heartbeat() {
        let (console, captured) = capture::console();
        let mut config = Config::default();
        config.console.heartbeat_interval_ms = 5;
        let session = Session::build(&config, console).await.unwrap();
        run(&session, "exit\n".as_bytes()).await.unwrap();
        assert!(session.shutdown_signal.is_cancelled());
        assert_eq!(captured.lines().len(), 2);
    }

    #[tokio::test]
    async fn test_observer_failure_ends_session() {
        let (console, captured) = capture::console();
        let session = Session::build(&Config::default(), console).await.unwrap();
        let broken: Arc<dyn PriceObserver> = Arc::new(Broken);
        let product = session.registry.get_by_name("Product B").unwrap();
        product.register(&broken).await;

        let err = run(&session, "B\n1500\nA\n1100\nexit\n".as_bytes())
            .await
            .unwrap_err();
        assert!(matches!(err, ErrorKind::Notify { observer, .. } if observer == "Broken"));
        assert!(session.shutdown_signal.is_cancelled());
        assert_eq!(product.price().await, Price::from(1500));
        let lines = captured.lines();
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Observer 2: The price of 'Product B' is now 1500.00.")
        );
        let a = session.registry.get_by_name("Product A").unwrap();
        assert_eq!(a.price().await, Price::from(1000));
    }
}
