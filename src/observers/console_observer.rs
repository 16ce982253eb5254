use super::{PriceObserver, ProductSnapshot};
use crate::utils::Console;
use anyhow::Context;
use futures::FutureExt;
use futures::future::BoxFuture;

/// Prints every price update it receives.
pub struct ConsoleObserver {
    name: String,
    console: Console,
}

impl ConsoleObserver {
    pub fn new(name: impl Into<String>, console: Console) -> Self {
        Self {
            name: name.into(),
            console,
        }
    }
}

impl PriceObserver for ConsoleObserver {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive_update<'a>(
        &'a self,
        product: &'a ProductSnapshot,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        async move {
            let line = format!(
                "{}: The price of '{}' is now {}.",
                self.name,
                product.name,
                self.console.amount(product.price)
            );
            let console = self.console.clone();
            tokio::task::spawn_blocking(move || console.line(line))
                .await
                .with_context(|| format!("Observer '{}' output task failed", self.name))?
                .with_context(|| format!("Observer '{}' failed to write update", self.name))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use crate::utils::console::capture;

    #[tokio::test]
    async fn test_update_line() {
        let (console, captured) = capture::console();
        let observer = ConsoleObserver::new("Observer 1", console);
        let snapshot = ProductSnapshot {
            name: "Product A".to_string(),
            price: Price::from(1200),
        };
        observer.receive_update(&snapshot).await.unwrap();
        observer.receive_update(&snapshot).await.unwrap();
        assert_eq!(observer.name(), "Observer 1");
        assert_eq!(
            captured.lines(),
            vec![
                "Observer 1: The price of 'Product A' is now 1200.00.",
                "Observer 1: The price of 'Product A' is now 1200.00.",
            ]
        );
    }
}
