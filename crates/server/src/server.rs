use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{ServerError, statistics, transactions, user, wallets};
use engine::Engine;

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// `TypedHeader` for the acting user.
///
/// Authentication happens upstream; requests must carry the authenticated
/// user id in the "x-user-id" entry of the header.
#[derive(Debug)]
struct UserIdHeader(String);

impl Header for UserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(UserIdHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

/// The user every handler acts on behalf of.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

async fn auth(
    user_header: Option<TypedHeader<UserIdHeader>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(UserIdHeader(uid))) = user_header else {
        tracing::debug!(uri = %request.uri(), "request without user id");
        return Err(ServerError::Unauthorized);
    };

    request.extensions_mut().insert(CurrentUser(uid));
    Ok(next.run(request).await)
}

pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };
    Router::new()
        .route("/wallets", get(wallets::list).post(wallets::upsert))
        .route("/wallets/{id}", get(wallets::get).delete(wallets::delete))
        .route("/balance", get(wallets::balance))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::upsert),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get).delete(transactions::delete),
        )
        .route("/statistics", get(statistics::get_stats))
        .route(
            "/user",
            get(user::get).post(user::register).patch(user::update),
        )
        .route_layer(middleware::from_fn(auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}
