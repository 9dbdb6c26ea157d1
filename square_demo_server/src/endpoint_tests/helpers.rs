use actix_web::{
    http::{header::LOCATION, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use log::debug;

use crate::deep_links::ChargeSettings;

pub const REDIRECT_URI: &str = "http://localhost:4000";

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn is_redirect_to_status_page(&self) -> bool {
        self.status == StatusCode::FOUND && self.location.as_deref() == Some("/")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}

pub fn charge_settings() -> ChargeSettings {
    ChargeSettings {
        app_id: "sq0idp-app".into(),
        amount: 100,
        currency: "CAD".into(),
        public_url: REDIRECT_URI.into(),
        state: "s1".into(),
    }
}

pub async fn get_request<F>(path: &str, configure: F) -> TestResponse
where F: FnOnce(&mut ServiceConfig) {
    let _ = env_logger::try_init();
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("Making request to {path}");
    let req = TestRequest::get().uri(path).to_request();
    let res = test::call_service(&app, req).await;
    let status = res.status();
    let location = res.headers().get(LOCATION).and_then(|v| v.to_str().ok()).map(String::from);
    let body = test::read_body(res).await;
    TestResponse { status, location, body: String::from_utf8_lossy(&body).into_owned() }
}
