use futures::future::BoxFuture;

mod console_observer;

pub use console_observer::ConsoleObserver;

/// What an observer sees of a product when it is notified.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: crate::models::Price,
}

pub trait PriceObserver: Send + Sync {
    fn name(&self) -> &str;
    /// Called once per committed price change, the snapshot already carries the new price.
    /// The product waits for the returned future before notifying the next observer.
    fn receive_update<'a>(
        &'a self,
        product: &'a ProductSnapshot,
    ) -> BoxFuture<'a, anyhow::Result<()>>;
}
