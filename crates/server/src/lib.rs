use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::{EngineError, Response};

pub use server::{CurrentUser, router, run_with_listener};

mod image;
mod server;
mod statistics;
mod transactions;
mod user;
mod wallets;

pub mod types {
    pub mod image {
        pub use api_types::image::ImagePayload;
    }

    pub mod wallet {
        pub use api_types::wallet::{BalanceView, WalletUpsert, WalletView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionDelete, TransactionKind, TransactionList, TransactionUpsert,
            TransactionView,
        };
    }

    pub mod stats {
        pub use api_types::stats::{BucketView, StatisticsQuery, StatisticsView, StatsWindow};
    }

    pub mod user {
        pub use api_types::user::{UserPatch, UserRegister, UserView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    /// Malformed request the engine never saw.
    Generic(String),
    Unauthorized,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Upload(_) => StatusCode::BAD_GATEWAY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation(_)
        | EngineError::InsufficientFunds(_)
        | EngineError::InvariantViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), Response::<()>::from(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, Response::failure(err)),
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Response::failure("Missing x-user-id header"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

// Extractor rejections, surfaced by handlers through `WithRejection`.
impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Generic(rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        Self::Generic(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Generic(rejection.body_text())
    }
}
