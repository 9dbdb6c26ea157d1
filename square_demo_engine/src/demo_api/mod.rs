pub mod errors;
pub mod merchant_api;
pub mod oauth_api;
pub mod refund_api;
pub mod transaction_api;
pub mod transaction_objects;

#[cfg(test)]
mod mocks;
