use maud::{html, Markup, DOCTYPE};
use serde::Serialize;
use square_demo_engine::Record;

use crate::{deep_links::ChargeSettings, errors::ServerError};

/// The single page of the demo: the current record, and the links for every action that makes sense in that state.
#[derive(Debug, Clone)]
pub struct StatusPage {
    pub authorize_url: String,
    pub charge: ChargeSettings,
}

impl StatusPage {
    pub fn new(authorize_url: String, charge: ChargeSettings) -> Self {
        Self { authorize_url, charge }
    }

    pub fn render(&self, record: &Record) -> Result<String, ServerError> {
        let authenticated = record.access_token().is_some();
        let location_id = record.active_location_id();
        let charge_links = match location_id {
            Some(id) => Some((self.charge.ios_link(id)?, self.charge.android_link(id))),
            None => None,
        };
        let amount = self.charge.display_amount();
        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { "Square demo" }
                }
                body {
                    h1 { a href=(self.authorize_url) { "OAuth" } }
                    (json_block("OAuth", &record.oauth)?)
                    @if authenticated {
                        h1 { a href="/renew" { "Renew Token" } }
                        h1 { a href="/revoke" { "Revoke Token" } }
                    }
                    hr;
                    @if authenticated {
                        h1 { a href="/locations" { "Get Locations" } }
                    }
                    (json_block("Locations", &record.locations)?)
                    hr;
                    @if let Some((ios, android)) = &charge_links {
                        h1 { a href=(ios) { "iOS Charge (" (amount) ") to " (location_id.unwrap_or_default()) } }
                        h1 { a href=(android) { "Android Charge (" (amount) ") to " (location_id.unwrap_or_default()) } }
                    } @else {
                        p { "Fetch the merchant's locations to enable charges." }
                    }
                    (json_block("Transaction", &record.transaction)?)
                    hr;
                    @if !record.transaction.is_empty() {
                        h1 { a href="/refund" { "Fully Refund the First Tender" } }
                    }
                    (json_block("Refund", &record.refund)?)
                    hr;
                    @if authenticated {
                        h1 { a target="_blank" href="/transactions" { "List Transactions" } }
                    }
                }
            }
        };
        Ok(markup.into_string())
    }
}

fn json_block<T: Serialize>(label: &str, value: &T) -> Result<Markup, ServerError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ServerError::RenderError(e.to_string()))?;
    Ok(html! {
        pre { (label) ": " (json) }
    })
}
