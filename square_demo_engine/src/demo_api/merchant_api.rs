use std::fmt::Debug;

use log::*;
use square_tools::{Location, SortOrder, Transaction};

use crate::{demo_api::errors::ApiError, traits::SquareGateway, RecordStore};

/// Read access to the merchant's locations and transactions.
pub struct MerchantApi<B> {
    gateway: B,
    store: RecordStore,
}

impl<B> Debug for MerchantApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MerchantApi ({:?})", self.store)
    }
}

impl<B> MerchantApi<B> {
    pub fn new(gateway: B, store: RecordStore) -> Self {
        Self { gateway, store }
    }
}

impl<B> MerchantApi<B>
where B: SquareGateway
{
    /// Fetches the merchant's locations and stores them. The first location becomes the active one.
    pub async fn refresh_locations(&self) -> Result<Vec<Location>, ApiError> {
        let record = self.store.snapshot();
        let access_token = record.access_token().ok_or(ApiError::NotAuthorized)?;
        let locations = self.gateway.list_locations(access_token).await?;
        info!("📍️ Merchant has {} locations", locations.len());
        self.store.replace_locations(locations.clone());
        Ok(locations)
    }

    /// Lists the most recent page of transactions for the active location. The record is not changed.
    pub async fn list_transactions(&self, sort_order: Option<SortOrder>) -> Result<Vec<Transaction>, ApiError> {
        let record = self.store.snapshot();
        let access_token = record.access_token().ok_or(ApiError::NotAuthorized)?;
        let location_id = record.active_location_id().ok_or(ApiError::NoActiveLocation)?;
        let transactions = self.gateway.list_transactions(access_token, location_id, sort_order).await?;
        debug!("🧾️ Listed {} transactions for {location_id}", transactions.len());
        Ok(transactions)
    }
}
