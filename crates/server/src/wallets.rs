//! Wallets API endpoints.

use api_types::wallet::{BalanceView, WalletUpsert, WalletView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Balance, Response, Wallet, WalletInput};
use uuid::Uuid;

use crate::{CurrentUser, ServerError, image::decode_optional, server::ServerState};

fn wallet_view(wallet: Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        amount_minor: wallet.amount.cents(),
        total_income_minor: wallet.total_income.cents(),
        total_expenses_minor: wallet.total_expenses.cents(),
        image: wallet.image,
        created: wallet.created.fixed_offset(),
    }
}

pub async fn list(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Response<Vec<WalletView>>>, ServerError> {
    let wallets = state.engine.wallets(&uid).await?;
    Ok(Json(Response::ok(
        wallets.into_iter().map(wallet_view).collect(),
    )))
}

/// Creates a wallet when `id` is absent, renames it otherwise.
pub async fn upsert(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<WalletUpsert>, ServerError>,
) -> Result<(StatusCode, Json<Response<WalletView>>), ServerError> {
    let status = if payload.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let input = WalletInput {
        id: payload.id,
        name: payload.name,
        image: decode_optional(payload.image)?,
    };

    let wallet = state.engine.create_or_update_wallet(&uid, input).await?;
    Ok((status, Json(Response::ok(wallet_view(wallet)))))
}

pub async fn get(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Path(wallet_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<Response<WalletView>>, ServerError> {
    let wallet = state.engine.wallet(&uid, wallet_id).await?;
    Ok(Json(Response::ok(wallet_view(wallet))))
}

/// Deletes the wallet and every transaction posted on it.
pub async fn delete(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Path(wallet_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<Response<Uuid>>, ServerError> {
    state.engine.delete_wallet(&uid, wallet_id).await?;
    Ok(Json(Response::ok(wallet_id).with_message("Wallet deleted")))
}

pub async fn balance(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Response<BalanceView>>, ServerError> {
    let Balance {
        amount,
        total_income,
        total_expenses,
    } = state.engine.balance(&uid).await?;
    Ok(Json(Response::ok(BalanceView {
        amount_minor: amount.cents(),
        total_income_minor: total_income.cents(),
        total_expenses_minor: total_expenses.cents(),
    })))
}
