use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use urlencoding::encode;

use crate::{
    config::SquareConfig,
    data_objects::{Location, NewRefund, OAuthToken, Refund, SortOrder, Transaction},
    SquareApiError,
};

/// Permissions requested on the authorize page.
pub const OAUTH_SCOPES: [&str; 3] = ["MERCHANT_PROFILE_READ", "PAYMENTS_READ", "PAYMENTS_WRITE"];

/// How a request authenticates against Square.
#[derive(Debug, Clone, Copy)]
pub enum AuthHeader<'a> {
    /// No `Authorization` header, e.g. for the authorization-code exchange, which carries the secret in the body.
    None,
    /// `Authorization: Bearer <access_token>`, for merchant resources.
    Bearer(&'a str),
    /// `Authorization: Client <app_secret>`, for token management.
    Client,
}

#[derive(Clone)]
pub struct SquareApi {
    config: SquareConfig,
    client: Arc<Client>,
}

impl SquareApi {
    pub fn new(config: SquareConfig) -> Result<Self, SquareApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent("Square Demo Server")
            .default_headers(headers)
            .build()
            .map_err(|e| SquareApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// The page a merchant visits to grant this application access. Square redirects back to the application's
    /// configured redirect URL with a `code` query parameter.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&scope={}",
            self.url("/oauth2/authorize"),
            encode(&self.config.app_id),
            encode(&OAUTH_SCOPES.join(","))
        )
    }

    /// Performs a single call against Square. No retries are attempted and the transport's default timeouts apply.
    ///
    /// A non-2xx status, or a 2xx body carrying a non-empty `errors` array, is returned as
    /// [`SquareApiError::RemoteError`] with the untouched JSON body.
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        auth: AuthHeader<'_>,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, SquareApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        match auth {
            AuthHeader::None => {},
            AuthHeader::Bearer(token) => req = req.header(AUTHORIZATION, format!("Bearer {token}")),
            AuthHeader::Client => {
                req = req.header(AUTHORIZATION, format!("Client {}", self.config.app_secret.reveal()))
            },
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| SquareApiError::RestRequestError(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| SquareApiError::RestResponseError(e.to_string()))?;
        let value = match serde_json::from_str::<Value>(&text) {
            Ok(v) => v,
            Err(e) if status.is_success() => return Err(SquareApiError::JsonError(e.to_string())),
            Err(_) => return Err(SquareApiError::QueryError { status: status.as_u16(), message: text }),
        };
        let has_errors = value["errors"].as_array().is_some_and(|e| !e.is_empty());
        if !status.is_success() || has_errors {
            debug!("REST query failed. {status}");
            return Err(SquareApiError::RemoteError { status: status.as_u16(), body: value });
        }
        trace!("REST query successful. {status}");
        serde_json::from_value(value).map_err(|e| SquareApiError::JsonError(e.to_string()))
    }

    /// `POST /oauth2/token`: exchanges an authorization code for an access token.
    pub async fn obtain_token(&self, code: &str, redirect_uri: &str) -> Result<OAuthToken, SquareApiError> {
        let body = json!({
            "client_id": self.config.app_id,
            "client_secret": self.config.app_secret.reveal(),
            "code": code,
            "redirect_uri": redirect_uri,
        });
        debug!("Exchanging authorization code for an access token");
        self.rest_query::<OAuthToken, Value>(Method::POST, "/oauth2/token", AuthHeader::None, &[], Some(body)).await
    }

    /// `POST /oauth2/clients/{app_id}/access-token/renew`
    pub async fn renew_token(&self, access_token: &str) -> Result<OAuthToken, SquareApiError> {
        let path = format!("/oauth2/clients/{}/access-token/renew", encode(&self.config.app_id));
        let body = json!({ "access_token": access_token });
        debug!("Renewing access token");
        self.rest_query::<OAuthToken, Value>(Method::POST, &path, AuthHeader::Client, &[], Some(body)).await
    }

    /// `POST /oauth2/revoke`. Square answers `{"success": true}`, but the body is returned as is.
    pub async fn revoke_token(&self, access_token: &str) -> Result<Value, SquareApiError> {
        let body = json!({
            "client_id": self.config.app_id,
            "access_token": access_token,
        });
        debug!("Revoking access token");
        self.rest_query::<Value, Value>(Method::POST, "/oauth2/revoke", AuthHeader::Client, &[], Some(body)).await
    }

    pub async fn list_locations(&self, access_token: &str) -> Result<Vec<Location>, SquareApiError> {
        #[derive(Deserialize)]
        struct LocationsResponse {
            #[serde(default)]
            locations: Vec<Location>,
        }
        let result = self
            .rest_query::<LocationsResponse, ()>(Method::GET, "/v2/locations", AuthHeader::Bearer(access_token), &[], None)
            .await?;
        info!("Fetched {} locations", result.locations.len());
        Ok(result.locations)
    }

    pub async fn retrieve_transaction(
        &self,
        access_token: &str,
        location_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, SquareApiError> {
        #[derive(Deserialize)]
        struct TransactionResponse {
            transaction: Transaction,
        }
        let path = format!("/v2/locations/{}/transactions/{}", encode(location_id), encode(transaction_id));
        debug!("Fetching transaction {transaction_id}");
        let result = self
            .rest_query::<TransactionResponse, ()>(Method::GET, &path, AuthHeader::Bearer(access_token), &[], None)
            .await?;
        Ok(result.transaction)
    }

    /// Lists the first page of transactions for the location. Square's default page size applies.
    pub async fn list_transactions(
        &self,
        access_token: &str,
        location_id: &str,
        sort_order: Option<SortOrder>,
    ) -> Result<Vec<Transaction>, SquareApiError> {
        #[derive(Deserialize)]
        struct TransactionsResponse {
            #[serde(default)]
            transactions: Vec<Transaction>,
        }
        let path = format!("/v2/locations/{}/transactions", encode(location_id));
        let params = sort_order.map(|o| vec![("sort_order", o.as_str())]).unwrap_or_default();
        let result = self
            .rest_query::<TransactionsResponse, ()>(Method::GET, &path, AuthHeader::Bearer(access_token), &params, None)
            .await?;
        debug!("Fetched {} transactions for location {location_id}", result.transactions.len());
        Ok(result.transactions)
    }

    pub async fn create_refund(
        &self,
        access_token: &str,
        location_id: &str,
        transaction_id: &str,
        refund: &NewRefund,
    ) -> Result<Refund, SquareApiError> {
        #[derive(Deserialize)]
        struct RefundResponse {
            refund: Refund,
        }
        let path = format!("/v2/locations/{}/transactions/{}/refund", encode(location_id), encode(transaction_id));
        debug!("Refunding {} on tender {} of transaction {transaction_id}", refund.amount_money, refund.tender_id);
        let result = self
            .rest_query::<RefundResponse, &NewRefund>(
                Method::POST,
                &path,
                AuthHeader::Bearer(access_token),
                &[],
                Some(refund),
            )
            .await?;
        Ok(result.refund)
    }
}
