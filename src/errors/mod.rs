pub mod error_kind;

pub use error_kind::ErrorKind;

pub type Result<T> = std::result::Result<T, ErrorKind>;
