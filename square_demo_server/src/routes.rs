//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Every action handler follows the same shape: call into the engine, redirect to the status page on success, and
//! return the error payload on failure. The engine updates the record and schedules the save before it returns, so
//! the status page the browser is redirected to already shows the new state.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. All calls to Square are asynchronous, so concurrent requests
//! proceed independently, and may overwrite each other's results in the record.
use actix_web::{get, http::header::LOCATION, web, HttpResponse, Responder};
use log::*;
use square_demo_engine::{
    traits::SquareGateway,
    Correlation,
    MerchantApi,
    OAuthApi,
    RecordStore,
    RefundApi,
    TransactionApi,
    TransactionLookup,
};

use crate::{
    data_objects::{AndroidChargeResult, IosCallbackParams, IosChargeResult, OAuthCallbackParams},
    deep_links::ChargeSettings,
    errors::ServerError,
    status_page::StatusPage,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

fn redirect_to_status_page() -> HttpResponse {
    HttpResponse::Found().insert_header((LOCATION, "/")).finish()
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[get("/test")]
pub async fn sanity() -> impl Responder {
    HttpResponse::Ok().body(format!("test {}", chrono::Utc::now().to_rfc2822()))
}

// ----------------------------------------------   Status page  ----------------------------------------------------
#[get("/")]
pub async fn index(
    store: web::Data<RecordStore>,
    page: web::Data<StatusPage>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Rendering status page");
    let html = page.render(&store.snapshot())?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

//----------------------------------------------   OAuth  ----------------------------------------------------
route!(oauth_callback => Get "/oauth" impl SquareGateway);
/// Square's OAuth redirect target. Square appends either a `code`, which is exchanged for an access token, or an
/// `error` if the merchant declined.
pub async fn oauth_callback<B: SquareGateway>(
    params: web::Query<OAuthCallbackParams>,
    api: web::Data<OAuthApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Received OAuth callback");
    let params = params.into_inner();
    if let Some(error) = params.error {
        info!("💻️ Authorization was not granted. {error}");
        let description = params.error_description.unwrap_or_default();
        return Err(ServerError::InvalidRequestParams(format!("Authorization was not granted. {error}. {description}")));
    }
    let code = params.code.ok_or_else(|| ServerError::InvalidRequestParams("No authorization code".into()))?;
    api.exchange_code(&code).await?;
    Ok(redirect_to_status_page())
}

route!(renew => Get "/renew" impl SquareGateway);
pub async fn renew<B: SquareGateway>(api: web::Data<OAuthApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Received token renewal request");
    api.renew().await?;
    Ok(redirect_to_status_page())
}

route!(revoke => Get "/revoke" impl SquareGateway);
pub async fn revoke<B: SquareGateway>(api: web::Data<OAuthApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Received token revocation request");
    api.revoke().await?;
    Ok(redirect_to_status_page())
}

//----------------------------------------------   Merchant  ----------------------------------------------------
route!(locations => Get "/locations" impl SquareGateway);
pub async fn locations<B: SquareGateway>(api: web::Data<MerchantApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Received locations request");
    api.refresh_locations().await?;
    Ok(redirect_to_status_page())
}

route!(transactions => Get "/transactions" impl SquareGateway);
pub async fn transactions<B: SquareGateway>(api: web::Data<MerchantApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Received transaction list request");
    let transactions = api.list_transactions(None).await?;
    Ok(HttpResponse::Ok().json(transactions))
}

//----------------------------------------------   Charge callbacks  ----------------------------------------------------
route!(ios_callback => Get "/ios" impl SquareGateway);
/// Called by the iOS point-of-sale app once a charge is finished. Unsuccessful charges are echoed back as JSON.
pub async fn ios_callback<B: SquareGateway>(
    params: web::Query<IosCallbackParams>,
    api: web::Data<TransactionApi<B>>,
    charge: web::Data<ChargeSettings>,
) -> Result<HttpResponse, ServerError> {
    let result = serde_json::from_str::<IosChargeResult>(&params.data).map_err(|e| {
        debug!("💻️ Could not read iOS callback data. {e}");
        ServerError::InvalidRequestParams(format!("Invalid callback data. {e}"))
    })?;
    debug!("💻️ Received iOS callback: {result:?}");
    check_state(&charge, result.state.as_deref());
    if !result.is_ok() {
        info!("💻️ iOS charge did not complete. {}", result.error_code.as_deref().unwrap_or(&result.status));
        return Ok(HttpResponse::Ok().json(result));
    }
    let lookup = TransactionLookup::from_ids(result.transaction_id, result.client_transaction_id)?;
    resolve_charge(&api, lookup).await
}

route!(android_callback => Get "/android" impl SquareGateway);
/// Called by the Android point-of-sale app once a charge is finished. Callbacks without any transaction id are
/// echoed back as JSON.
pub async fn android_callback<B: SquareGateway>(
    params: web::Query<AndroidChargeResult>,
    api: web::Data<TransactionApi<B>>,
    charge: web::Data<ChargeSettings>,
) -> Result<HttpResponse, ServerError> {
    let result = params.into_inner();
    debug!("💻️ Received Android callback: {result:?}");
    check_state(&charge, result.state());
    if !result.has_transaction_ids() {
        info!("💻️ Android charge did not report a transaction");
        return Ok(HttpResponse::Ok().json(result));
    }
    let lookup = TransactionLookup::from_ids(result.transaction_id(), result.client_transaction_id())?;
    resolve_charge(&api, lookup).await
}

fn check_state(charge: &ChargeSettings, state: Option<&str>) {
    if !charge.is_own_state(state) {
        warn!("💻️ Callback state {state:?} was not issued by this server instance");
    }
}

async fn resolve_charge<B: SquareGateway>(
    api: &TransactionApi<B>,
    lookup: TransactionLookup,
) -> Result<HttpResponse, ServerError> {
    match api.retrieve_transaction(lookup).await? {
        Correlation::Resolved(_) => Ok(redirect_to_status_page()),
        Correlation::NoMatch { client_transaction_id } => Err(ServerError::NoRecordFound(format!(
            "No transaction with client id {client_transaction_id} among the most recent transactions"
        ))),
    }
}

//----------------------------------------------   Refund  ----------------------------------------------------
route!(refund => Get "/refund" impl SquareGateway);
pub async fn refund<B: SquareGateway>(api: web::Data<RefundApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Received refund request");
    api.refund().await?;
    Ok(redirect_to_status_page())
}
