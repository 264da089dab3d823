//! URL handling module for site-mirror
//!
//! This module provides fragment stripping, seed URL parsing, origin
//! comparison and the filename sanitization rule shared by the path mapper
//! and the session store.

mod normalize;
mod origin;
mod sanitize;

// Re-export main functions
pub use normalize::{parse_seed_url, strip_fragment};
pub use origin::{is_same_origin, location_of, Origin};
pub use sanitize::sanitize_filename;
