//! Helpers for treating asset references as document text rather than host paths.
//!
//! References are written with forward slashes inside stylesheets and markup, so every
//! helper here follows POSIX path rules regardless of the platform the build runs on.
//! Filtering references and manipulating their path segments live in separate submodules
//! so each can be tested independently.

mod filters;
mod posix;

pub use filters::{is_passthrough_reference, split_root};
pub use posix::{basename, dirname, normalize, normalize_dir, to_forward_slashes};
