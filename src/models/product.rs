use crate::errors::{ErrorKind, Result};
use crate::models::{Price, Registry};
use crate::observers::{PriceObserver, ProductSnapshot};
use crate::utils::Console;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceChange {
    Unchanged,
    Changed {
        old: Price,
        new: Price,
        notified: usize,
    },
}

struct State {
    price: Price,
    observers: Vec<Weak<dyn PriceObserver>>,
}

/// An observable product.
///
/// Each price change is one transaction: compare, swap, notify every observer
/// in registration order, report. Transactions on the same product are
/// serialized, so observers see changes in the order they were committed.
/// Observers hold the product lock while notified and must not call back into it.
pub struct Product {
    name: String,
    console: Console,
    state: Mutex<State>,
}

impl Product {
    /// Creates the product and adds it to `registry`; an existing entry with the
    /// same name is kept.
    pub fn new(
        name: impl Into<String>,
        price: Price,
        console: Console,
        registry: &Registry,
    ) -> Arc<Self> {
        let product = Arc::new(Self {
            name: name.into(),
            console,
            state: Mutex::new(State {
                price,
                observers: Vec::new(),
            }),
        });
        if registry.add(product.clone()) {
            tracing::debug!(product = %product.name, %price, "product registered");
        } else {
            tracing::warn!(
                "product `{}` is already registered, keeping the existing entry",
                product.name
            );
        }
        product
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub async fn price(&self) -> Price {
        self.state.lock().await.price
    }
    /// Number of registered observers that are still alive, duplicates included.
    #[allow(unused)]
    pub async fn observer_count(&self) -> usize {
        let state = self.state.lock().await;
        state
            .observers
            .iter()
            .filter(|it| it.strong_count() > 0)
            .count()
    }
    pub async fn register(&self, observer: &Arc<dyn PriceObserver>) {
        let mut state = self.state.lock().await;
        state.observers.push(Arc::downgrade(observer));
        tracing::debug!(product = %self.name, observer = observer.name(), "observer registered");
    }
    /// Removes the first registration of `observer`, returns `false` if there was none.
    #[allow(unused)]
    pub async fn unregister(&self, observer: &Arc<dyn PriceObserver>) -> bool {
        let target = Arc::downgrade(observer);
        let mut state = self.state.lock().await;
        match state
            .observers
            .iter()
            .position(|it| Weak::ptr_eq(it, &target))
        {
            Some(index) => {
                state.observers.remove(index);
                tracing::debug!(product = %self.name, observer = observer.name(), "observer unregistered");
                true
            }
            None => false,
        }
    }
    pub async fn change_price(&self, new_price: Price) -> Result<PriceChange> {
        let mut state = self.state.lock().await;
        if state.price == new_price {
            self.console.line(format!(
                "No price change for {}. No notification sent.",
                self.name
            ))?;
            return Ok(PriceChange::Unchanged);
        }
        let old = std::mem::replace(&mut state.price, new_price);
        tracing::debug!(product = %self.name, %old, new = %new_price, "price committed");
        let notified = self.notify_all(&mut state, old).await?;
        Ok(PriceChange::Changed {
            old,
            new: new_price,
            notified,
        })
    }
    async fn notify_all(&self, state: &mut State, old: Price) -> Result<usize> {
        state.observers.retain(|it| it.strong_count() > 0);
        let observers = state
            .observers
            .iter()
            .filter_map(Weak::upgrade)
            .collect::<Vec<_>>();
        let snapshot = ProductSnapshot {
            name: self.name.clone(),
            price: state.price,
        };
        for observer in &observers {
            if let Err(source) = observer.receive_update(&snapshot).await {
                tracing::error!(
                    product = %self.name,
                    observer = observer.name(),
                    reason = ?source,
                    "observer failed, remaining notifications aborted"
                );
                return Err(ErrorKind::Notify {
                    observer: observer.name().to_string(),
                    product: self.name.clone(),
                    source,
                });
            }
            tracing::debug!(product = %self.name, observer = observer.name(), "observer notified");
        }
        self.console.line(format!(
            "Price changed from {} to {} for {}. Notifications sent.",
            self.console.amount(old),
            self.console.amount(state.price),
            self.name
        ))?;
        Ok(observers.len())
    }
}
