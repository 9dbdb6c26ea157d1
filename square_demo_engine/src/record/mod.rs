//! The single persisted aggregate of the demo server, and its owner.
mod record_store;

use serde::{Deserialize, Serialize};
use square_tools::{Location, OAuthToken, Refund, Transaction};

pub use record_store::RecordStore;

/// Everything the server remembers between requests and restarts. Each field holds the latest successful result of
/// one kind of operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub oauth: OAuthToken,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub transaction: Transaction,
    #[serde(default)]
    pub refund: Refund,
}

impl Default for Record {
    /// A fresh record holds a single blank location, so that the status page always has something to render.
    fn default() -> Self {
        Self {
            oauth: OAuthToken::default(),
            locations: vec![Location::default()],
            transaction: Transaction::default(),
            refund: Refund::default(),
        }
    }
}

impl Record {
    pub fn access_token(&self) -> Option<&str> {
        self.oauth.access_token()
    }

    /// The location that charges, lookups and refunds act on: always the first location Square returned.
    pub fn active_location(&self) -> Option<&Location> {
        self.locations.first()
    }

    /// The id of the [active location](Self::active_location), if there is one and it has an id.
    pub fn active_location_id(&self) -> Option<&str> {
        self.active_location().and_then(|l| l.id.as_deref()).filter(|id| !id.is_empty())
    }
}
