pub mod api;
pub mod auth;
pub mod commands;
pub mod endpoint;
pub mod error;
pub mod http;

pub use auth::Credentials;
pub use endpoint::{Cloud, Endpoint, Tier};
pub use error::{ClientError, TransportError};
pub use http::{RequestOptions, SigmaClient};
