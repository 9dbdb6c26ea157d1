use mockall::mock;
use serde_json::Value;
use square_tools::{Location, NewRefund, OAuthToken, Refund, SortOrder, SquareApiError, Transaction};

use crate::traits::SquareGateway;

mock! {
    pub Gateway {}
    impl SquareGateway for Gateway {
        async fn obtain_token(&self, code: &str, redirect_uri: &str) -> Result<OAuthToken, SquareApiError>;
        async fn renew_token(&self, access_token: &str) -> Result<OAuthToken, SquareApiError>;
        async fn revoke_token(&self, access_token: &str) -> Result<Value, SquareApiError>;
        async fn list_locations(&self, access_token: &str) -> Result<Vec<Location>, SquareApiError>;
        async fn retrieve_transaction(&self, access_token: &str, location_id: &str, transaction_id: &str) -> Result<Transaction, SquareApiError>;
        async fn list_transactions(&self, access_token: &str, location_id: &str, sort_order: Option<SortOrder>) -> Result<Vec<Transaction>, SquareApiError>;
        async fn create_refund(&self, access_token: &str, location_id: &str, transaction_id: &str, refund: &NewRefund) -> Result<Refund, SquareApiError>;
    }
}

pub fn authorized_record() -> crate::Record {
    crate::Record {
        oauth: OAuthToken { access_token: Some("sq0atp-1".into()), ..Default::default() },
        locations: vec![Location { id: Some("L1".into()), ..Default::default() }],
        ..Default::default()
    }
}

pub fn square_errors(status: u16, code: &str) -> SquareApiError {
    SquareApiError::RemoteError {
        status,
        body: serde_json::json!({ "errors": [{ "category": "INVALID_REQUEST_ERROR", "code": code }] }),
    }
}
