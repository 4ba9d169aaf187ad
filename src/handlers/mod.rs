//! HTTP request handlers.

pub mod entries;
pub mod http;
pub mod supplies;

pub use entries::*;
pub use http::*;
pub use supplies::*;
