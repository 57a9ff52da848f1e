//! A dictionary built on separate chaining with a fixed number of buckets.
//!
//! Keys are any type implementing [`Key`], which supplies a 32-bit hash and an equality test.
//! [`StringKey`] is a ready-made string key hashed with CRC-32.

mod chain;
mod config;
mod dict;
mod error;
mod key;
mod string_key;
#[macro_use]
mod builder;

// Public exports.
pub use config::DictConfig;
pub use dict::{Dictionary, Iter};
pub use error::DictError;
pub use key::Key;
pub use string_key::StringKey;
