use actix_web::{http::StatusCode, web};
use serde_json::json;
use square_demo_engine::{MerchantApi, Record, RecordStore};
use square_tools::{Location, SquareApiError, Transaction};

use super::{
    helpers::{charge_settings, get_request},
    mocks::{authorized_record, MockGateway},
};
use crate::{
    routes::{health, index, sanity, LocationsRoute, TransactionsRoute},
    status_page::StatusPage,
};

fn configure(gateway: MockGateway, store: RecordStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let authorize_url = "https://connect.squareup.com/oauth2/authorize?client_id=sq0idp-app".to_string();
        let page = StatusPage::new(authorize_url, charge_settings());
        cfg.app_data(web::Data::new(MerchantApi::new(gateway, store.clone())))
            .app_data(web::Data::new(store))
            .app_data(web::Data::new(page))
            .service(health)
            .service(sanity)
            .service(index)
            .service(LocationsRoute::<MockGateway>::new())
            .service(TransactionsRoute::<MockGateway>::new());
    }
}

#[actix_web::test]
async fn health_checks() {
    let store = RecordStore::in_memory(Record::default());
    let res = get_request("/health", configure(MockGateway::new(), store.clone())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "👍️\n");
    let res = get_request("/test", configure(MockGateway::new(), store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.starts_with("test "));
}

#[actix_web::test]
async fn status_page_reflects_the_record() {
    let store = RecordStore::in_memory(Record::default());
    let res = get_request("/", configure(MockGateway::new(), store.clone())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("oauth2/authorize?client_id=sq0idp-app"));
    assert!(!res.body.contains("/revoke"));

    let res = get_request("/", configure(MockGateway::new(), RecordStore::in_memory(authorized_record()))).await;
    assert!(res.body.contains("/revoke"));
    assert!(res.body.contains("square-commerce-v1://payment/create"));
    assert!(!res.body.contains("/refund"));
}

#[actix_web::test]
async fn locations_are_stored() {
    let mut gateway = MockGateway::new();
    gateway.expect_list_locations().withf(|token| token == "sq0atp-1").times(1).returning(|_| {
        Ok(vec![
            Location { id: Some("L2".into()), name: Some("Main St".into()), ..Default::default() },
            Location { id: Some("L3".into()), ..Default::default() },
        ])
    });
    let store = RecordStore::in_memory(authorized_record());
    let res = get_request("/locations", configure(gateway, store.clone())).await;
    assert!(res.is_redirect_to_status_page());
    let record = store.snapshot();
    assert_eq!(record.locations.len(), 2);
    assert_eq!(record.active_location_id(), Some("L2"));
}

#[actix_web::test]
async fn locations_need_a_token() {
    let res = get_request("/locations", configure(MockGateway::new(), RecordStore::in_memory(Record::default()))).await;
    assert_eq!(res.status, StatusCode::PRECONDITION_FAILED);
}

#[actix_web::test]
async fn transactions_are_listed_as_json() {
    let mut gateway = MockGateway::new();
    gateway.expect_list_transactions().withf(|_, loc, order| loc == "L1" && order.is_none()).times(1).returning(
        |_, _, _| Ok(vec![Transaction { id: Some("T1".into()), client_id: Some("C1".into()), ..Default::default() }]),
    );
    let store = RecordStore::in_memory(authorized_record());
    let res = get_request("/transactions", configure(gateway, store.clone())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!([{ "id": "T1", "client_id": "C1" }]));
    assert!(store.snapshot().transaction.is_empty());
}

#[actix_web::test]
async fn transaction_listing_errors() {
    let mut gateway = MockGateway::new();
    gateway.expect_list_transactions().returning(|_, _, _| Err(SquareApiError::JsonError("unexpected EOF".into())));
    let res = get_request("/transactions", configure(gateway, RecordStore::in_memory(authorized_record()))).await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn results_are_written_to_the_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, serde_json::to_string(&authorized_record()).unwrap()).unwrap();
    let mut gateway = MockGateway::new();
    gateway.expect_list_locations().returning(|_| Ok(vec![Location { id: Some("L5".into()), ..Default::default() }]));
    let res = get_request("/locations", configure(gateway, RecordStore::load(&path))).await;
    assert!(res.is_redirect_to_status_page());
    // The write happens in the background
    let mut saved = Record::default();
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let contents = std::fs::read_to_string(&path).unwrap_or_default();
        if let Ok(record) = serde_json::from_str::<Record>(&contents) {
            saved = record;
            if saved.active_location_id() == Some("L5") {
                break;
            }
        }
    }
    assert_eq!(saved.active_location_id(), Some("L5"));
    assert_eq!(saved.access_token(), Some("sq0atp-1"));
}
