//! # Square demo server
//! A small web server that walks through Square's OAuth flow and the life of a point-of-sale transaction. It is
//! responsible for:
//! Rendering a status page with the current token, locations, transaction and refund, plus the links that drive the
//! next step.
//! Handing charges off to Square's point-of-sale app through deep links, and resolving the resulting transaction when
//! the app calls back.
//! Refunding that transaction.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/`: The status page.
//! * `/oauth`: Square's OAuth redirect target. Exchanges the authorization code for an access token.
//! * `/renew`, `/revoke`: Renew or revoke the held access token.
//! * `/locations`: Fetch the merchant's locations. The first one is used for charges and refunds.
//! * `/ios`, `/android`: Callbacks from the point-of-sale app after a charge.
//! * `/refund`: Refund the first tender of the current transaction.
//! * `/transactions`: List the most recent transactions of the active location as JSON.
//! * `/health`, `/test`: Liveness checks.
//!
//! Every action redirects back to `/` on success and returns the error payload on failure.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod deep_links;
pub mod errors;
pub mod routes;
pub mod server;
pub mod status_page;
