//! Square Demo Engine
//!
//! The engine holds the state of the demo server and the logic that drives the Square API. It is independent of the
//! HTTP layer that triggers it.
//!
//! The library is divided into three sections:
//! 1. The persisted [`Record`] and the [`RecordStore`] that owns it. There is exactly one record per process. It is
//!    loaded at start-up, every successful operation replaces one of its top-level fields, and every change is written
//!    back to disk in the background. Writes are last-writer-wins; there is no locking beyond the cell itself.
//! 2. The [`traits::SquareGateway`] seam. The engine never talks to Square directly, but through this trait, which is
//!    implemented for [`square_tools::SquareApi`] and mocked in tests.
//! 3. The public API ([`OAuthApi`], [`MerchantApi`], [`TransactionApi`], [`RefundApi`]). Each call checks its
//!    preconditions before anything is sent to Square, makes a single remote call and, on success, updates the record.
mod demo_api;
mod record;

pub mod traits;

pub use demo_api::{
    errors::ApiError,
    merchant_api::MerchantApi,
    oauth_api::OAuthApi,
    refund_api::{RefundApi, REFUND_REASON},
    transaction_api::TransactionApi,
    transaction_objects::{find_by_client_id, Correlation, TransactionLookup},
};
pub use record::{Record, RecordStore};
