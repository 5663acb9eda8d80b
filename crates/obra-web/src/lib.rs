//! # obra-web
//!
//! HTTP surface of the obra budget tracker.
//!
//! Pages are served as HAL+JSON documents. Form posts are answered with a
//! 303 redirect carrying a flash message in its query string.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod representers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, Flash, HalResponse};
pub use routes::{app, router};

