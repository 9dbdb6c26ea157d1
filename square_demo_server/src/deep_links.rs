//! Links that hand a charge over to Square's point-of-sale app.
//!
//! The app is opened with the amount, the location and a callback URL. Once the charge is done (or cancelled), the
//! app opens the callback URL, which lands on the `/ios` or `/android` route of this server.
use serde::Serialize;
use urlencoding::encode;
use uuid::Uuid;

use crate::{config::ServerConfig, errors::ServerError};

pub const IOS_CALLBACK_PATH: &str = "/ios";
pub const ANDROID_CALLBACK_PATH: &str = "/android";

const IOS_API_VERSION: &str = "1.3";
const ANDROID_API_VERSION: &str = "v2.0";
/// Must be between 3200 and 10000 ms.
const ANDROID_AUTO_RETURN_TIMEOUT_MS: u32 = 3200;
const CHARGE_NOTE: &str = "Square demo charge";

#[derive(Debug, Clone)]
pub struct ChargeSettings {
    pub app_id: String,
    pub amount: i64,
    pub currency: String,
    /// Base URL the callbacks are addressed to.
    pub public_url: String,
    /// Passed to the app with every charge and echoed back in the callback.
    pub state: String,
}

impl ChargeSettings {
    /// Charge settings for this process. The state is freshly generated.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            app_id: config.square.app_id.clone(),
            amount: config.charge.amount,
            currency: config.charge.currency.clone(),
            public_url: config.public_url(),
            state: Uuid::new_v4().to_string(),
        }
    }

    pub fn ios_callback_url(&self) -> String {
        format!("{}{IOS_CALLBACK_PATH}", self.public_url)
    }

    pub fn android_callback_url(&self) -> String {
        format!("{}{ANDROID_CALLBACK_PATH}", self.public_url)
    }

    /// A human-readable amount, e.g. `1.00 CAD`. Assumes a currency with two decimals.
    pub fn display_amount(&self) -> String {
        format!("{}.{:02} {}", self.amount / 100, self.amount % 100, self.currency)
    }

    /// `square-commerce-v1://payment/create?data=...`, the iOS point-of-sale API.
    pub fn ios_link(&self, location_id: &str) -> Result<String, ServerError> {
        let request = IosChargeRequest {
            amount_money: IosMoney { amount: self.amount, currency_code: &self.currency },
            callback_url: self.ios_callback_url(),
            client_id: &self.app_id,
            location_id,
            version: IOS_API_VERSION,
            notes: CHARGE_NOTE,
            state: &self.state,
            options: IosChargeOptions {
                supported_tender_types: ["CREDIT_CARD", "CASH", "OTHER"],
                auto_return: true,
                skip_receipt: true,
            },
        };
        let data = serde_json::to_string(&request).map_err(|e| ServerError::RenderError(e.to_string()))?;
        Ok(format!("square-commerce-v1://payment/create?data={}", encode(&data)))
    }

    /// An `intent:` URL for the Android point-of-sale API.
    pub fn android_link(&self, location_id: &str) -> String {
        let extras = [
            format!("i.com.squareup.pos.TOTAL_AMOUNT={}", self.amount),
            format!("S.com.squareup.pos.CURRENCY_CODE={}", self.currency),
            format!("S.com.squareup.pos.WEB_CALLBACK_URI={}", self.android_callback_url()),
            format!("S.com.squareup.pos.CLIENT_ID={}", self.app_id),
            format!("S.com.squareup.pos.LOCATION_ID={location_id}"),
            format!("l.com.squareup.pos.AUTO_RETURN_TIMEOUT_MS={ANDROID_AUTO_RETURN_TIMEOUT_MS}"),
            format!("S.com.squareup.pos.API_VERSION={ANDROID_API_VERSION}"),
            format!("S.com.squareup.pos.NOTE={}", encode(CHARGE_NOTE)),
            format!("S.com.squareup.pos.REQUEST_METADATA={}", self.state),
            "S.com.squareup.pos.TENDER_TYPES=com.squareup.pos.TENDER_CARD,com.squareup.pos.TENDER_CASH,com.squareup.pos.\
             TENDER_OTHER"
                .to_string(),
        ];
        format!("intent:#Intent;action=com.squareup.pos.action.CHARGE;package=com.squareup;{};end;", extras.join(";"))
    }

    /// True if a callback carried the state this process handed out. Callbacks from an earlier run of the server
    /// carry a different one.
    pub fn is_own_state(&self, state: Option<&str>) -> bool {
        state == Some(self.state.as_str())
    }
}

#[derive(Serialize)]
struct IosMoney<'a> {
    amount: i64,
    currency_code: &'a str,
}

#[derive(Serialize)]
struct IosChargeOptions {
    supported_tender_types: [&'static str; 3],
    auto_return: bool,
    skip_receipt: bool,
}

#[derive(Serialize)]
struct IosChargeRequest<'a> {
    amount_money: IosMoney<'a>,
    callback_url: String,
    client_id: &'a str,
    location_id: &'a str,
    version: &'static str,
    notes: &'static str,
    state: &'a str,
    options: IosChargeOptions,
}
