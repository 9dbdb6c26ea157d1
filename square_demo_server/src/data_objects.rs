use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query parameters Square appends when redirecting back from the authorize page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IosCallbackParams {
    /// JSON-encoded [`IosChargeResult`]
    pub data: String,
}

/// What the iOS point-of-sale app reports after a charge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IosChargeResult {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IosChargeResult {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

pub const ANDROID_SERVER_TRANSACTION_ID: &str = "com.squareup.pos.SERVER_TRANSACTION_ID";
pub const ANDROID_CLIENT_TRANSACTION_ID: &str = "com.squareup.pos.CLIENT_TRANSACTION_ID";
pub const ANDROID_REQUEST_METADATA: &str = "com.squareup.pos.RESULT_REQUEST_METADATA";

/// What the Android point-of-sale app reports after a charge, as the raw query string map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AndroidChargeResult(pub HashMap<String, String>);

impl AndroidChargeResult {
    pub fn transaction_id(&self) -> Option<String> {
        self.0.get(ANDROID_SERVER_TRANSACTION_ID).cloned()
    }

    pub fn client_transaction_id(&self) -> Option<String> {
        self.0.get(ANDROID_CLIENT_TRANSACTION_ID).cloned()
    }

    pub fn state(&self) -> Option<&str> {
        self.0.get(ANDROID_REQUEST_METADATA).map(String::as_str)
    }

    pub fn has_transaction_ids(&self) -> bool {
        [ANDROID_SERVER_TRANSACTION_ID, ANDROID_CLIENT_TRANSACTION_ID]
            .iter()
            .any(|k| self.0.get(*k).is_some_and(|v| !v.is_empty()))
    }
}
