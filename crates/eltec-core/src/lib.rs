//! eltec-core - shared plumbing for the enrichment pipeline
//!
//! Blocking HTTP over a shared runtime, logging that cooperates with
//! indicatif, and row progress reporting.

pub mod http;
pub mod logging;
pub mod progress;

pub use http::{QueryError, SHARED_RUNTIME, get_text, http_client};
pub use logging::init_logging;
pub use progress::{ProgressContext, percent};
