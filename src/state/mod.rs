use crate::config::{Config, catalog_config};
use crate::errors::{ErrorKind, Result};
use crate::models::{Product, Registry};
use crate::observers::{ConsoleObserver, PriceObserver};
use crate::utils::Console;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct Selector {
    key: String,
    product: String,
}

/// Everything one interactive run works with. Dropping it tears the catalog down.
pub struct Session {
    pub registry: Arc<Registry>,
    pub console: Console,
    pub shutdown_signal: CancellationToken,
    pub heartbeat_interval: Option<Duration>,
    selectors: Vec<Selector>,
    // products only hold weak references, the session keeps observers alive
    observers: Vec<Arc<dyn PriceObserver>>,
}

impl Session {
    pub async fn build(config: &Config, console: Console) -> Result<Self> {
        catalog_config::validate(&config.products, &config.observers)?;
        let registry = Arc::new(Registry::new());
        let selectors = config
            .products
            .iter()
            .map(|it| {
                Product::new(&it.name, it.price, console.clone(), &registry);
                Selector {
                    key: it.selector.trim().to_string(),
                    product: it.name.clone(),
                }
            })
            .collect::<Vec<_>>();
        let mut observers = Vec::with_capacity(config.observers.len());
        for it in &config.observers {
            let observer: Arc<dyn PriceObserver> =
                Arc::new(ConsoleObserver::new(&it.name, console.clone()));
            for name in &it.subscribe {
                registry.get_by_name(name)?.register(&observer).await;
            }
            observers.push(observer);
        }
        tracing::info!(
            products = registry.len(),
            observers = observers.len(),
            "session ready"
        );
        Ok(Self {
            registry,
            console,
            shutdown_signal: CancellationToken::new(),
            heartbeat_interval: config.console.heartbeat_interval(),
            selectors,
            observers,
        })
    }
    /// `A/B` for the default catalog
    pub fn selector_hint(&self) -> String {
        self.selectors
            .iter()
            .map(|it| it.key.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
    /// Maps user input to a product name.
    pub fn resolve(&self, input: &str) -> Result<&str> {
        let input = input.trim();
        self.selectors
            .iter()
            .find(|it| it.key.eq_ignore_ascii_case(input))
            .map(|it| it.product.as_str())
            .ok_or_else(|| ErrorKind::InvalidSelector(input.to_string()))
    }
    #[allow(unused)]
    pub fn observers(&self) -> &[Arc<dyn PriceObserver>] {
        &self.observers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use crate::utils::console::capture;

    #[tokio::test]
    async fn test_default_session() {
        let (console, _) = capture::console();
        let session = Session::build(&Config::default(), console).await.unwrap();
        assert_eq!(session.registry.names(), vec!["Product A", "Product B"]);
        assert_eq!(session.selector_hint(), "A/B");
        assert_eq!(session.heartbeat_interval, Some(Duration::from_secs(1)));
        let names = session
            .observers()
            .iter()
            .map(|it| it.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Observer 1", "Observer 2"]);

        let a = session.registry.get_by_name("Product A").unwrap();
        let b = session.registry.get_by_name("Product B").unwrap();
        assert_eq!(a.price().await, Price::from(1000));
        assert_eq!(b.price().await, Price::from(1200));
        assert_eq!(a.observer_count().await, 1);
        assert_eq!(b.observer_count().await, 1);
    }

    #[tokio::test]
    async fn test_resolve() {
        let (console, _) = capture::console();
        let session = Session::build(&Config::default(), console).await.unwrap();
        assert_eq!(session.resolve("a").unwrap(), "Product A");
        assert_eq!(session.resolve(" B ").unwrap(), "Product B");
        assert!(matches!(
            session.resolve("C"),
            Err(ErrorKind::InvalidSelector(input)) if input == "C"
        ));
    }

    #[tokio::test]
    async fn test_invalid_catalog() {
        let (console, _) = capture::console();
        let mut config = Config::default();
        config.observers[0].subscribe.push("Product Z".to_string());
        let err = Session::build(&config, console).await.err().unwrap();
        assert!(matches!(err, ErrorKind::Config(_)));
    }
}
