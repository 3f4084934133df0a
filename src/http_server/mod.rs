//! # HTTP Server Module
//!
//! Axum server exposing the grades API and hosting the front-end.
//!
//! # Endpoints
//!
//! - `POST /upload-grades` - CSV upload (multipart field `file`)
//! - `GET /students/more-than-3-twos` - students with more than 3 twos
//! - `GET /students/less-than-5-twos` - students with fewer than 5 twos
//! - `GET /students/twos?comparison=&threshold=` - either report, any threshold
//! - `GET /health` - static liveness check
//! - `GET /ready` - storage connectivity check
//! - `GET /` - redirect to the front-end, served under `/static`

pub mod config;
pub mod errors;
pub mod grades_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use grades_routes::{GradesState, UploadResponse, UPLOAD_FIELD};
pub use server::HttpServer;
