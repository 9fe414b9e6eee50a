//! URL handling module
//!
//! This module provides href canonicalization, syntactic URL validation,
//! and the regex and internal/external filters applied to discovered links.

mod canonicalize;
mod matcher;
mod parts;
mod validate;

// Re-export main types and functions
pub use canonicalize::{Canonicalizer, DEFAULT_SCHEME};
pub use matcher::{compile_full_match, host_of, LinkFilter, LinkVerdict, Scope};
pub use parts::{split_url, UrlParts};
pub use validate::is_valid_url;
