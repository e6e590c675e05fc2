//! # HTTP Server Module
//!
//! axum binding of the content service.
//!
//! # Endpoints
//!
//! - `/health`, `/metrics`
//! - `/articles`, `/articles/:reference` and its `views`, `like`,
//!   `bookmark`, `likes`, `comments` subresources
//! - `/comments/:reference`
//! - `/users/:reference`, `/users/:reference/follow`, `/usernames/:username`
//! - `/reports`, `/reports/:id`

pub mod article_routes;
pub mod errors;
pub mod observability_routes;
pub mod report_routes;
pub mod server;
pub mod user_routes;

pub use errors::{ErrorResponse, ACTOR_HEADER};
pub use server::HttpServer;
