use std::fmt::Debug;

use log::*;
use square_tools::{NewRefund, Refund};
use uuid::Uuid;

use crate::{demo_api::errors::ApiError, traits::SquareGateway, RecordStore};

/// The reason attached to every refund the demo issues.
pub const REFUND_REASON: &str = "Square demo refund";

/// Refunds the current transaction.
pub struct RefundApi<B> {
    gateway: B,
    store: RecordStore,
}

impl<B> Debug for RefundApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RefundApi ({:?})", self.store)
    }
}

impl<B> RefundApi<B> {
    pub fn new(gateway: B, store: RecordStore) -> Self {
        Self { gateway, store }
    }
}

impl<B> RefundApi<B>
where B: SquareGateway
{
    /// Refunds the full amount of the first tender of the current transaction and stores Square's refund.
    ///
    /// Each call sends a new idempotency key, so calling this twice asks Square for two separate refunds. A refund
    /// Square rejects (e.g. because the tender was already refunded) is returned as an error and the stored refund is
    /// left as it was.
    pub async fn refund(&self) -> Result<Refund, ApiError> {
        let record = self.store.snapshot();
        let access_token = record.access_token().ok_or(ApiError::NotAuthorized)?;
        let location_id = record.active_location_id().ok_or(ApiError::NoActiveLocation)?;
        let transaction_id = record.transaction.id().ok_or(ApiError::NoTransaction)?;
        let tender = record.transaction.tenders.first().ok_or_else(|| ApiError::NoTenders(transaction_id.to_string()))?;
        let new_refund = NewRefund {
            idempotency_key: Uuid::new_v4().to_string(),
            tender_id: tender.id.clone(),
            reason: REFUND_REASON.to_string(),
            amount_money: tender.amount_money.clone(),
        };
        debug!("💸️ Requesting refund with idempotency key {}", new_refund.idempotency_key);
        let refund =
            self.gateway.create_refund(access_token, location_id, transaction_id, &new_refund).await.map_err(|e| {
                warn!("💸️ Refund of transaction {transaction_id} failed. {e}");
                ApiError::from(e)
            })?;
        info!(
            "💸️ Refund {} of {} issued for transaction {transaction_id}",
            refund.id.as_deref().unwrap_or("<no id>"),
            new_refund.amount_money
        );
        self.store.replace_refund(refund.clone());
        Ok(refund)
    }
}
