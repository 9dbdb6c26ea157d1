//! Thin client for the parts of the Square Connect API that the demo server drives: the OAuth token endpoints,
//! location listing, and the v2 transaction and refund resources.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::{AuthHeader, SquareApi, OAUTH_SCOPES};
pub use config::{SquareConfig, DEFAULT_SQUARE_API_URL};
pub use data_objects::{Location, Money, NewRefund, OAuthToken, Refund, SortOrder, Tender, Transaction};
pub use error::SquareApiError;
