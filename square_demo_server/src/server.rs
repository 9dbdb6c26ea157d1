use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use square_demo_engine::{MerchantApi, OAuthApi, RecordStore, RefundApi, TransactionApi};
use square_tools::SquareApi;

use crate::{
    config::ServerConfig,
    deep_links::ChargeSettings,
    errors::ServerError,
    routes::{
        health,
        index,
        sanity,
        AndroidCallbackRoute,
        IosCallbackRoute,
        LocationsRoute,
        OauthCallbackRoute,
        RefundRoute,
        RenewRoute,
        RevokeRoute,
        TransactionsRoute,
    },
    status_page::StatusPage,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let gateway = SquareApi::new(config.square.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let store = RecordStore::load(&config.data_file);
    if let Some(path) = store.path() {
        info!("🚀️ Results are saved to {}", path.display());
    }
    let srv = create_server_instance(config, gateway, store)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    gateway: SquareApi,
    store: RecordStore,
) -> Result<Server, ServerError> {
    let redirect_uri = config.public_url();
    // One state per process, shared by every worker, so that any worker can recognise a callback
    let charge = ChargeSettings::from_config(&config);
    let page = StatusPage::new(gateway.authorize_url(), charge.clone());
    info!("🚀️ Point-of-sale callbacks go to {} and {}", charge.ios_callback_url(), charge.android_callback_url());
    let srv = HttpServer::new(move || {
        let oauth_api = OAuthApi::new(gateway.clone(), store.clone(), redirect_uri.clone());
        let merchant_api = MerchantApi::new(gateway.clone(), store.clone());
        let transaction_api = TransactionApi::new(gateway.clone(), store.clone());
        let refund_api = RefundApi::new(gateway.clone(), store.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sqd::access_log"))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(page.clone()))
            .app_data(web::Data::new(charge.clone()))
            .app_data(web::Data::new(oauth_api))
            .app_data(web::Data::new(merchant_api))
            .app_data(web::Data::new(transaction_api))
            .app_data(web::Data::new(refund_api))
            .service(health)
            .service(sanity)
            .service(index)
            .service(OauthCallbackRoute::<SquareApi>::new())
            .service(RenewRoute::<SquareApi>::new())
            .service(RevokeRoute::<SquareApi>::new())
            .service(LocationsRoute::<SquareApi>::new())
            .service(TransactionsRoute::<SquareApi>::new())
            .service(IosCallbackRoute::<SquareApi>::new())
            .service(AndroidCallbackRoute::<SquareApi>::new())
            .service(RefundRoute::<SquareApi>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
