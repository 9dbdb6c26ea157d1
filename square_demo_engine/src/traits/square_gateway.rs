use serde_json::Value;
use square_tools::{Location, NewRefund, OAuthToken, Refund, SortOrder, SquareApi, SquareApiError, Transaction};

/// The remote operations the demo needs. Every method is a single call, with no retries.
#[allow(async_fn_in_trait)]
pub trait SquareGateway {
    /// Exchanges an authorization code for an access token. The redirect URI must match the one the code was issued
    /// for.
    async fn obtain_token(&self, code: &str, redirect_uri: &str) -> Result<OAuthToken, SquareApiError>;

    async fn renew_token(&self, access_token: &str) -> Result<OAuthToken, SquareApiError>;

    /// Revokes the access token. The response body is returned untouched.
    async fn revoke_token(&self, access_token: &str) -> Result<Value, SquareApiError>;

    async fn list_locations(&self, access_token: &str) -> Result<Vec<Location>, SquareApiError>;

    async fn retrieve_transaction(
        &self,
        access_token: &str,
        location_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, SquareApiError>;

    /// Fetches the first page of transactions for the location.
    async fn list_transactions(
        &self,
        access_token: &str,
        location_id: &str,
        sort_order: Option<SortOrder>,
    ) -> Result<Vec<Transaction>, SquareApiError>;

    async fn create_refund(
        &self,
        access_token: &str,
        location_id: &str,
        transaction_id: &str,
        refund: &NewRefund,
    ) -> Result<Refund, SquareApiError>;
}

impl SquareGateway for SquareApi {
    async fn obtain_token(&self, code: &str, redirect_uri: &str) -> Result<OAuthToken, SquareApiError> {
        SquareApi::obtain_token(self, code, redirect_uri).await
    }

    async fn renew_token(&self, access_token: &str) -> Result<OAuthToken, SquareApiError> {
        SquareApi::renew_token(self, access_token).await
    }

    async fn revoke_token(&self, access_token: &str) -> Result<Value, SquareApiError> {
        SquareApi::revoke_token(self, access_token).await
    }

    async fn list_locations(&self, access_token: &str) -> Result<Vec<Location>, SquareApiError> {
        SquareApi::list_locations(self, access_token).await
    }

    async fn retrieve_transaction(
        &self,
        access_token: &str,
        location_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, SquareApiError> {
        SquareApi::retrieve_transaction(self, access_token, location_id, transaction_id).await
    }

    async fn list_transactions(
        &self,
        access_token: &str,
        location_id: &str,
        sort_order: Option<SortOrder>,
    ) -> Result<Vec<Transaction>, SquareApiError> {
        SquareApi::list_transactions(self, access_token, location_id, sort_order).await
    }

    async fn create_refund(
        &self,
        access_token: &str,
        location_id: &str,
        transaction_id: &str,
        refund: &NewRefund,
    ) -> Result<Refund, SquareApiError> {
        SquareApi::create_refund(self, access_token, location_id, transaction_id, refund).await
    }
}
