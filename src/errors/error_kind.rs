use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid product selector: {0:?}")]
    InvalidSelector(String),

    #[error("Invalid price {0:?}")]
    Parse(String),

    #[error("Observer '{observer}' failed to handle update of '{product}'")]
    Notify {
        observer: String,
        product: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Console I/O failed")]
    Io(#[from] std::io::Error),
}
