//! Domain layer for wol-server.
//!
//! Pure types with no dependencies on sockets, files, or the async runtime:
//!
//! - The JSON bodies the HTTP API returns
//! - The listener settings assembled from the command line

pub mod responses;
pub mod settings;

pub use responses::{ApiResponse, HealthResponse};
pub use settings::ServerSettings;
