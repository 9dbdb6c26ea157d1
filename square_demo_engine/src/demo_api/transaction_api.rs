//! Resolves the transaction produced by a point-of-sale charge.
//!
//! The charge itself happens in Square's mobile app. When the app hands control back it reports Square's transaction
//! id, or, in some situations, only the client transaction id it attached to the charge. In the latter case the
//! transaction is found by scanning the location's most recent transactions.
use std::fmt::Debug;

use log::*;
use square_tools::SortOrder;

use crate::{
    demo_api::{
        errors::ApiError,
        transaction_objects::{find_by_client_id, Correlation, TransactionLookup},
    },
    traits::SquareGateway,
    RecordStore,
};

pub struct TransactionApi<B> {
    gateway: B,
    store: RecordStore,
}

impl<B> Debug for TransactionApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransactionApi ({:?})", self.store)
    }
}

impl<B> TransactionApi<B> {
    pub fn new(gateway: B, store: RecordStore) -> Self {
        Self { gateway, store }
    }
}

impl<B> TransactionApi<B>
where B: SquareGateway
{
    /// Looks up a transaction of the active location and, if found, stores it as the current transaction.
    ///
    /// * [`TransactionLookup::ById`] fetches the transaction directly. Any failure, including "not found", is a
    ///   [`ApiError::TransactionLookup`] error.
    /// * [`TransactionLookup::ByClientId`] fetches the latest page of transactions, newest first, and takes the first
    ///   one with a matching client id. If there is none, the result is [`Correlation::NoMatch`] and the record is not
    ///   changed.
    pub async fn retrieve_transaction(&self, lookup: TransactionLookup) -> Result<Correlation, ApiError> {
        let record = self.store.snapshot();
        let access_token = record.access_token().ok_or(ApiError::NotAuthorized)?;
        let location_id = record.active_location_id().ok_or(ApiError::NoActiveLocation)?;
        let correlation = match lookup {
            TransactionLookup::ById(transaction_id) => {
                debug!("🧾️ Fetching transaction {transaction_id} at {location_id}");
                let transaction = self
                    .gateway
                    .retrieve_transaction(access_token, location_id, &transaction_id)
                    .await
                    .map_err(|source| {
                        warn!("🧾️ Transaction {transaction_id} could not be retrieved. {source}");
                        ApiError::TransactionLookup { transaction_id, source }
                    })?;
                Correlation::Resolved(transaction)
            },
            TransactionLookup::ByClientId(client_transaction_id) => {
                debug!("🧾️ Searching recent transactions at {location_id} for client id {client_transaction_id}");
                let transactions =
                    self.gateway.list_transactions(access_token, location_id, Some(SortOrder::Desc)).await?;
                match find_by_client_id(&transactions, &client_transaction_id) {
                    Some(tx) => Correlation::Resolved(tx.clone()),
                    None => {
                        info!(
                            "🧾️ None of the {} most recent transactions has client id {client_transaction_id}",
                            transactions.len()
                        );
                        Correlation::NoMatch { client_transaction_id }
                    },
                }
            },
        };
        if let Correlation::Resolved(tx) = &correlation {
            info!("🧾️ Resolved transaction {}", tx.id.as_deref().unwrap_or("<no id>"));
            self.store.replace_transaction(tx.clone());
        }
        Ok(correlation)
    }
}
