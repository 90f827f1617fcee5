//! Transactions API endpoints.

use api_types::transaction::{
    TransactionDelete, TransactionKind, TransactionList, TransactionUpsert, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use engine::{Money, Response, Transaction, TransactionInput, TransactionQuery};
use uuid::Uuid;

use crate::{CurrentUser, ServerError, image::decode_optional, server::ServerState};

fn engine_kind(kind: TransactionKind) -> engine::TransactionKind {
    match kind {
        TransactionKind::Income => engine::TransactionKind::Income,
        TransactionKind::Expense => engine::TransactionKind::Expense,
    }
}

fn wire_kind(kind: engine::TransactionKind) -> TransactionKind {
    match kind {
        engine::TransactionKind::Income => TransactionKind::Income,
        engine::TransactionKind::Expense => TransactionKind::Expense,
    }
}

pub(crate) fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        kind: wire_kind(tx.kind),
        amount_minor: tx.amount.cents(),
        category: tx.category,
        description: tx.description,
        date: tx.date.fixed_offset(),
        image: tx.image,
        created: tx.created.fixed_offset(),
    }
}

/// Lists the user's transactions, newest first.
pub async fn list(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Query(params), _): WithRejection<Query<TransactionList>, ServerError>,
) -> Result<Json<Response<Vec<TransactionView>>>, ServerError> {
    let query = TransactionQuery {
        uid: None,
        wallet_id: params.wallet_id,
        from: params.from.map(|d| d.with_timezone(&Utc)),
        to: params.to.map(|d| d.with_timezone(&Utc)),
        limit: params.limit,
    };

    let transactions = state.engine.list_transactions(&uid, query).await?;
    Ok(Json(Response::ok(
        transactions.into_iter().map(transaction_view).collect(),
    )))
}

/// Creates a transaction when `id` is absent, edits it otherwise.
pub async fn upsert(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionUpsert>, ServerError>,
) -> Result<(StatusCode, Json<Response<TransactionView>>), ServerError> {
    let status = if payload.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let input = TransactionInput {
        id: payload.id,
        kind: Some(engine_kind(payload.kind)),
        amount: Money::new(payload.amount_minor),
        wallet_id: Some(payload.wallet_id),
        category: payload.category,
        description: payload.description,
        date: payload.date.map(|d| d.with_timezone(&Utc)),
        image: decode_optional(payload.image)?,
    };

    let tx = state
        .engine
        .create_or_update_transaction(&uid, input)
        .await?;
    Ok((status, Json(Response::ok(transaction_view(tx)))))
}

pub async fn get(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<Response<TransactionView>>, ServerError> {
    let tx = state.engine.transaction(&uid, id).await?;
    Ok(Json(Response::ok(transaction_view(tx))))
}

pub async fn delete(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Query(params), _): WithRejection<Query<TransactionDelete>, ServerError>,
) -> Result<Json<Response<TransactionView>>, ServerError> {
    let tx = state
        .engine
        .delete_transaction(&uid, id, params.wallet_id)
        .await?;
    Ok(Json(
        Response::ok(transaction_view(tx)).with_message("Transaction deleted"),
    ))
}
