//! # Modkit Core Utilities
//!
//! Small, dependency-free helpers shared across the crate:
//!
//! - **[`merge`]**: recursive merging of `serde_json::Value` graphs, used for
//!   bundle configuration.
//! - [`short_type_name`]: the declared name of a type with its module path
//!   stripped, used for diagnostics.
pub mod merge;

pub use merge::{deep_merge, merge_into};

/// Returns the declared name of `T` without its module path.
///
/// Generic arguments are kept verbatim, so `alloc::vec::Vec<my_crate::Foo>`
/// becomes `Vec<my_crate::Foo>`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    shorten(std::any::type_name::<T>())
}

fn shorten(full: &'static str) -> &'static str {
    let head = match full.find('<') {
        Some(idx) => &full[..idx],
        None => full,
    };
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests;
