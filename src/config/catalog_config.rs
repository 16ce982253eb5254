use crate::errors::{ErrorKind, Result};
use crate::models::Price;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProductConfig {
    pub name: String,
    /// What the user types at the product prompt, matched case-insensitively.
    pub selector: String,
    pub price: Price,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    pub name: String,
    /// Product names, one registration per entry
    #[serde(default)]
    pub subscribe: Vec<String>,
}

pub(crate) fn default_products() -> Vec<ProductConfig> {
    vec![
        ProductConfig {
            name: "Product A".to_string(),
            selector: "A".to_string(),
            price: Price::from(1000),
        },
        ProductConfig {
            name: "Product B".to_string(),
            selector: "B".to_string(),
            price: Price::from(1200),
        },
    ]
}

pub(crate) fn default_observers() -> Vec<ObserverConfig> {
    vec![
        ObserverConfig {
            name: "Observer 1".to_string(),
            subscribe: vec!["Product A".to_string()],
        },
        ObserverConfig {
            name: "Observer 2".to_string(),
            subscribe: vec!["Product B".to_string()],
        },
    ]
}

pub(crate) fn validate(products: &[ProductConfig], observers: &[ObserverConfig]) -> Result<()> {
    if products.is_empty() {
        return Err(ErrorKind::Config("no products configured".to_string()));
    }
    let mut selectors = HashSet::new();
    for product in products {
        let selector = product.selector.trim().to_lowercase();
        if selector.is_empty() {
            return Err(ErrorKind::Config(format!(
                "product '{}' has an empty selector",
                product.name
            )));
        }
        if selector == "exit" {
            return Err(ErrorKind::Config(format!(
                "product '{}' uses the reserved selector 'exit'",
                product.name
            )));
        }
        if !selectors.insert(selector) {
            return Err(ErrorKind::Config(format!(
                "selector '{}' is used by more than one product",
                product.selector
            )));
        }
    }
    for observer in observers {
        for name in &observer.subscribe {
            if !products.iter().any(|it| &it.name == name) {
                return Err(ErrorKind::Config(format!(
                    "observer '{}' subscribes to unknown product '{}'",
                    observer.name, name
                )));
            }
        }
    }
    Ok(())
}
