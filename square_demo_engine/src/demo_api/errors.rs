use square_tools::SquareApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No access token is held. Complete the OAuth flow first.")]
    NotAuthorized,
    #[error("An authorization code is required.")]
    MissingAuthorizationCode,
    #[error("There is no active location. Fetch the merchant's locations first.")]
    NoActiveLocation,
    #[error("No transaction has been resolved yet.")]
    NoTransaction,
    #[error("Transaction {0} has no tenders to refund.")]
    NoTenders(String),
    #[error("A transaction id or a client transaction id is required.")]
    MissingTransactionId,
    #[error("Could not retrieve transaction {transaction_id}. {source}")]
    TransactionLookup {
        transaction_id: String,
        #[source]
        source: SquareApiError,
    },
    #[error(transparent)]
    Remote(#[from] SquareApiError),
}

impl ApiError {
    /// True if the call was rejected before anything was sent to Square.
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            Self::NotAuthorized |
                Self::MissingAuthorizationCode |
                Self::NoActiveLocation |
                Self::NoTransaction |
                Self::NoTenders(_) |
                Self::MissingTransactionId
        )
    }

    /// The error Square reported, if the call got as far as Square.
    pub fn remote_error(&self) -> Option<&SquareApiError> {
        match self {
            Self::TransactionLookup { source, .. } => Some(source),
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }
}
