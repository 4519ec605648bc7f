#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod finder;
pub mod listing;

pub use config::FinderConfig;
pub use finder::{FileLister, RevvedFinder};
pub use listing::{DirectoryLister, ListingError, StaticLister};
