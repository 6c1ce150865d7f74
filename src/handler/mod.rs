//! Request handling.
//!
//! The router decides per request whether the entry document (placeholder
//! injection) or the plain static-file path answers it.

pub mod inject;
pub mod router;
pub mod static_files;

pub use router::handle_request;
