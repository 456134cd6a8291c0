mod client;
mod errors;
mod normalize;
mod query;
pub mod types;
pub use self::client::{Client, Fetched};
pub use self::errors::Error;
pub use self::normalize::{normalize, NormalizeError};
pub use self::query::{ArchiveSearchQuery, RecentSearchQuery};
