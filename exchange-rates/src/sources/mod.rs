//! HTTP adapters for upstream quote providers.
//!
//! - `awesome` - primary provider, answers with a JSON array of quotes
//! - `frankfurter` - fallback provider, answers with a `rates` mapping

mod awesome;
mod frankfurter;
mod http;

pub use awesome::AwesomeApiSource;
pub use frankfurter::FrankfurterSource;
