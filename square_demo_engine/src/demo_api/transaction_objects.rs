use square_tools::Transaction;

use crate::ApiError;

/// How to find the transaction a point-of-sale charge produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionLookup {
    /// Square's own transaction id. Looked up directly.
    ById(String),
    /// The correlation id the point-of-sale app attached to the transaction. Found by scanning the most recent page
    /// of transactions only: a match on an older page is not found.
    ByClientId(String),
}

impl TransactionLookup {
    /// Picks the lookup strategy from the ids a mobile callback reported. The transaction id wins when both are
    /// present; blank ids count as absent. Having neither is an error.
    pub fn from_ids(
        transaction_id: Option<String>,
        client_transaction_id: Option<String>,
    ) -> Result<Self, ApiError> {
        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        match (non_blank(transaction_id), non_blank(client_transaction_id)) {
            (Some(id), _) => Ok(Self::ById(id)),
            (None, Some(client_id)) => Ok(Self::ByClientId(client_id)),
            (None, None) => Err(ApiError::MissingTransactionId),
        }
    }
}

/// The result of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlation {
    Resolved(Transaction),
    /// No transaction in the most recent page carried the client transaction id. It may still exist further back.
    NoMatch { client_transaction_id: String },
}

impl Correlation {
    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Resolved(tx) => Some(tx),
            Self::NoMatch { .. } => None,
        }
    }
}

/// Returns the first transaction in `transactions` carrying the given client transaction id.
pub fn find_by_client_id<'a>(transactions: &'a [Transaction], client_transaction_id: &str) -> Option<&'a Transaction> {
    transactions.iter().find(|tx| tx.has_client_id(client_transaction_id))
}
