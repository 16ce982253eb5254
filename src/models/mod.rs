pub mod price;
pub mod product;
pub mod registry;

pub use price::{CurrencyFormat, Price};
pub use product::{PriceChange, Product};
pub use registry::Registry;
