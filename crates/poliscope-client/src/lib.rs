//! Transport collaborators: upload a policy PDF and ask questions over HTTP.

pub mod http;

pub use http::{ClientError, HealthStatus, PolicyClient};
