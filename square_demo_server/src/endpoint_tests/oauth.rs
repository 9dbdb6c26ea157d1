use actix_web::{http::StatusCode, web};
use serde_json::json;
use square_demo_engine::{OAuthApi, Record, RecordStore};
use square_tools::{OAuthToken, SquareApiError};

use super::{
    helpers::{get_request, REDIRECT_URI},
    mocks::{authorized_record, MockGateway},
};
use crate::routes::{OauthCallbackRoute, RenewRoute, RevokeRoute};

fn configure(gateway: MockGateway, store: RecordStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let api = OAuthApi::new(gateway, store, REDIRECT_URI.to_string());
        cfg.app_data(web::Data::new(api))
            .service(OauthCallbackRoute::<MockGateway>::new())
            .service(RenewRoute::<MockGateway>::new())
            .service(RevokeRoute::<MockGateway>::new());
    }
}

#[actix_web::test]
async fn authorization_code_is_exchanged() {
    let mut gateway = MockGateway::new();
    gateway.expect_obtain_token().withf(|code, uri| code == "abc" && uri == REDIRECT_URI).times(1).returning(|_, _| {
        Ok(OAuthToken { access_token: Some("sq0atp-new".into()), merchant_id: Some("M1".into()), ..Default::default() })
    });
    let store = RecordStore::in_memory(Record::default());
    let res = get_request("/oauth?code=abc&state=xyz", configure(gateway, store.clone())).await;
    assert!(res.is_redirect_to_status_page());
    assert_eq!(store.snapshot().access_token(), Some("sq0atp-new"));
}

#[actix_web::test]
async fn missing_authorization_code() {
    let store = RecordStore::in_memory(Record::default());
    let res = get_request("/oauth", configure(MockGateway::new(), store.clone())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = get_request("/oauth?code=", configure(MockGateway::new(), store.clone())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(store.snapshot().oauth.access_token.is_none());
}

#[actix_web::test]
async fn declined_authorization() {
    let store = RecordStore::in_memory(Record::default());
    let res = get_request(
        "/oauth?error=access_denied&error_description=user%20denied%20access",
        configure(MockGateway::new(), store),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.contains("access_denied"));
    assert!(res.body.contains("user denied access"));
}

#[actix_web::test]
async fn square_errors_are_passed_through() {
    let mut gateway = MockGateway::new();
    gateway.expect_obtain_token().returning(|_, _| {
        Err(SquareApiError::RemoteError {
            status: 401,
            body: json!({ "message": "Authorization code is already redeemed", "type": "bad_request" }),
        })
    });
    let store = RecordStore::in_memory(authorized_record());
    let res = get_request("/oauth?code=stale", configure(gateway, store.clone())).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json(), json!({ "message": "Authorization code is already redeemed", "type": "bad_request" }));
    assert_eq!(store.snapshot().access_token(), Some("sq0atp-1"));
}

#[actix_web::test]
async fn unreachable_square() {
    let mut gateway = MockGateway::new();
    gateway.expect_obtain_token().returning(|_, _| Err(SquareApiError::RestRequestError("connection refused".into())));
    let res = get_request("/oauth?code=abc", configure(gateway, RecordStore::in_memory(Record::default()))).await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert!(res.json()["error"].as_str().unwrap().contains("connection refused"));
}

#[actix_web::test]
async fn renew_replaces_the_token() {
    let mut gateway = MockGateway::new();
    gateway.expect_renew_token().withf(|token| token == "sq0atp-1").times(1).returning(|_| {
        Ok(OAuthToken {
            access_token: Some("sq0atp-2".into()),
            expires_at: Some("2026-11-17T00:00:00Z".into()),
            ..Default::default()
        })
    });
    let store = RecordStore::in_memory(authorized_record());
    let res = get_request("/renew", configure(gateway, store.clone())).await;
    assert!(res.is_redirect_to_status_page());
    let record = store.snapshot();
    assert_eq!(record.access_token(), Some("sq0atp-2"));
    assert_eq!(record.oauth.expires_at.as_deref(), Some("2026-11-17T00:00:00Z"));
}

#[actix_web::test]
async fn renew_without_a_token() {
    let res = get_request("/renew", configure(MockGateway::new(), RecordStore::in_memory(Record::default()))).await;
    assert_eq!(res.status, StatusCode::PRECONDITION_FAILED);
}

#[actix_web::test]
async fn revoke_forgets_the_token() {
    let mut gateway = MockGateway::new();
    gateway.expect_revoke_token().withf(|token| token == "sq0atp-1").times(1).returning(|_| Ok(json!({ "success": true })));
    let store = RecordStore::in_memory(authorized_record());
    let res = get_request("/revoke", configure(gateway, store.clone())).await;
    assert!(res.is_redirect_to_status_page());
    let record = store.snapshot();
    assert!(record.access_token().is_none());
    assert_eq!(record.active_location_id(), Some("L1"));

    let res = get_request("/revoke", configure(MockGateway::new(), store)).await;
    assert_eq!(res.status, StatusCode::PRECONDITION_FAILED);
}
