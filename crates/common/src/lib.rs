//! dpservice common library
//!
//! Semantic resource types, address-family helpers and the error type
//! shared by the wire client and the command-line front end.

pub mod error;
pub mod ip;
pub mod types;

pub use error::{Error, Result};
pub use ip::IpFamily;
pub use types::*;
