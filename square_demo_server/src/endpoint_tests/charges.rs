use actix_web::{http::StatusCode, web};
use serde_json::json;
use square_demo_engine::{Record, RecordStore, TransactionApi};
use square_tools::{SortOrder, Transaction};

use super::{
    helpers::{charge_settings, get_request},
    mocks::{authorized_record, MockGateway},
};
use crate::routes::{AndroidCallbackRoute, IosCallbackRoute};

fn configure(gateway: MockGateway, store: RecordStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(TransactionApi::new(gateway, store)))
            .app_data(web::Data::new(charge_settings()))
            .service(IosCallbackRoute::<MockGateway>::new())
            .service(AndroidCallbackRoute::<MockGateway>::new());
    }
}

fn ios_path(data: serde_json::Value) -> String {
    format!("/ios?data={}", urlencoding::encode(&data.to_string()))
}

fn transaction(id: &str, client_id: &str) -> Transaction {
    Transaction {
        id: Some(id.into()),
        location_id: Some("L1".into()),
        client_id: Some(client_id.into()),
        ..Default::default()
    }
}

#[actix_web::test]
async fn ios_charge_by_transaction_id() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_retrieve_transaction()
        .withf(|token, loc, id| token == "sq0atp-1" && loc == "L1" && id == "T1")
        .times(1)
        .returning(|_, _, _| Ok(transaction("T1", "C1")));
    let store = RecordStore::in_memory(authorized_record());
    let path = ios_path(json!({ "status": "ok", "transaction_id": "T1", "client_transaction_id": "C1", "state": "s1" }));
    let res = get_request(&path, configure(gateway, store.clone())).await;
    assert!(res.is_redirect_to_status_page());
    assert_eq!(store.snapshot().transaction.id.as_deref(), Some("T1"));
}

#[actix_web::test]
async fn ios_charge_by_client_id() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_list_transactions()
        .withf(|_, loc, order| loc == "L1" && *order == Some(SortOrder::Desc))
        .times(1)
        .returning(|_, _, _| Ok(vec![transaction("T3", "C3"), transaction("T2", "C2"), transaction("T1", "C1")]));
    let store = RecordStore::in_memory(authorized_record());
    // Offline charges only report a client id. A foreign state is logged, not rejected.
    let path = ios_path(json!({ "status": "ok", "client_transaction_id": "C2", "state": "s0" }));
    let res = get_request(&path, configure(gateway, store.clone())).await;
    assert!(res.is_redirect_to_status_page());
    assert_eq!(store.snapshot().transaction.id.as_deref(), Some("T2"));
}

#[actix_web::test]
async fn unmatched_client_id() {
    let mut gateway = MockGateway::new();
    gateway.expect_list_transactions().returning(|_, _, _| Ok(vec![transaction("T1", "C1")]));
    let mut record = authorized_record();
    record.transaction = transaction("T0", "C0");
    let store = RecordStore::in_memory(record);
    let path = ios_path(json!({ "status": "ok", "client_transaction_id": "C9" }));
    let res = get_request(&path, configure(gateway, store.clone())).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.body.contains("C9"));
    assert_eq!(store.snapshot().transaction.id.as_deref(), Some("T0"));
}

#[actix_web::test]
async fn unsuccessful_ios_charge_is_echoed() {
    let store = RecordStore::in_memory(authorized_record());
    let path = ios_path(json!({ "status": "error", "error_code": "payment_canceled", "state": "s1" }));
    let res = get_request(&path, configure(MockGateway::new(), store.clone())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "status": "error", "error_code": "payment_canceled", "state": "s1" }));
    assert!(store.snapshot().transaction.is_empty());
}

#[actix_web::test]
async fn malformed_ios_callback() {
    let store = RecordStore::in_memory(authorized_record());
    let res = get_request("/ios?data=not%20json", configure(MockGateway::new(), store.clone())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = get_request("/ios", configure(MockGateway::new(), store.clone())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = get_request(&ios_path(json!({ "status": "ok" })), configure(MockGateway::new(), store)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn charge_callback_before_locations_are_known() {
    let mut record = authorized_record();
    record.locations = Record::default().locations;
    let store = RecordStore::in_memory(record);
    let res =
        get_request(&ios_path(json!({ "status": "ok", "transaction_id": "T1" })), configure(MockGateway::new(), store))
            .await;
    assert_eq!(res.status, StatusCode::PRECONDITION_FAILED);
}

#[actix_web::test]
async fn android_charge_by_server_id() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_retrieve_transaction()
        .withf(|_, loc, id| loc == "L1" && id == "T1")
        .times(1)
        .returning(|_, _, _| Ok(transaction("T1", "C1")));
    let store = RecordStore::in_memory(authorized_record());
    let path = "/android?com.squareup.pos.SERVER_TRANSACTION_ID=T1&com.squareup.pos.CLIENT_TRANSACTION_ID=C1&com.\
                squareup.pos.RESULT_REQUEST_METADATA=s1";
    let res = get_request(path, configure(gateway, store.clone())).await;
    assert!(res.is_redirect_to_status_page());
    assert_eq!(store.snapshot().transaction.client_id.as_deref(), Some("C1"));
}

#[actix_web::test]
async fn android_charge_by_client_id() {
    let mut gateway = MockGateway::new();
    gateway.expect_list_transactions().times(1).returning(|_, _, _| Ok(vec![transaction("T7", "C7")]));
    let store = RecordStore::in_memory(authorized_record());
    let res = get_request("/android?com.squareup.pos.CLIENT_TRANSACTION_ID=C7", configure(gateway, store.clone())).await;
    assert!(res.is_redirect_to_status_page());
    assert_eq!(store.snapshot().transaction.id.as_deref(), Some("T7"));
}

#[actix_web::test]
async fn unsuccessful_android_charge_is_echoed() {
    let store = RecordStore::in_memory(authorized_record());
    let path = "/android?com.squareup.pos.ERROR_CODE=com.squareup.pos.ERROR_TRANSACTION_CANCELED";
    let res = get_request(path, configure(MockGateway::new(), store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "com.squareup.pos.ERROR_CODE": "com.squareup.pos.ERROR_TRANSACTION_CANCELED" }));
}
