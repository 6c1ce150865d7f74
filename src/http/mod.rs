//! HTTP protocol layer.
//!
//! Response builders and MIME detection, decoupled from routing and the
//! injection logic.

pub mod mime;
pub mod response;

pub use response::{build_404_response, build_405_response, build_500_response};
