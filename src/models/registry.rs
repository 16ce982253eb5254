use crate::errors::{ErrorKind, Result};
use crate::models::Product;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Lookup from product name to product, owned by the session that created it.
/// Entries are never removed.
#[derive(Default)]
pub struct Registry {
    products: DashMap<String, Arc<Product>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
    /// Inserts `product` unless its name is taken. Returns whether it was inserted.
    pub fn add(&self, product: Arc<Product>) -> bool {
        match self.products.entry(product.name().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(product);
                true
            }
        }
    }
    pub fn get_by_name(&self, name: &str) -> Result<Arc<Product>> {
        self.products
            .get(name)
            .map(|it| it.value().clone())
            .ok_or_else(|| ErrorKind::NotFound(name.to_string()))
    }
    pub fn len(&self) -> usize {
        self.products.len()
    }
    #[allow(unused)]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
    #[allow(unused)]
    pub fn names(&self) -> Vec<String> {
        let mut names = self
            .products
            .iter()
            .map(|it| it.key().clone())
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}
