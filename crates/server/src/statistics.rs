//! Statistics API endpoints

use api_types::stats::{BucketView, StatisticsQuery, StatisticsView, StatsWindow};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use engine::Response;

use crate::{CurrentUser, ServerError, server::ServerState, transactions::transaction_view};

fn engine_window(window: StatsWindow) -> engine::StatsWindow {
    match window {
        StatsWindow::Weekly => engine::StatsWindow::Weekly,
        StatsWindow::Monthly => engine::StatsWindow::Monthly,
        StatsWindow::Yearly => engine::StatsWindow::Yearly,
    }
}

/// Handle requests for the income/expense chart of the user
pub async fn get_stats(
    Extension(CurrentUser(uid)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    WithRejection(Query(params), _): WithRejection<Query<StatisticsQuery>, ServerError>,
) -> Result<Json<Response<StatisticsView>>, ServerError> {
    let stats = state
        .engine
        .statistics(&uid, engine_window(params.window))
        .await?;

    Ok(Json(Response::ok(StatisticsView {
        window: params.window,
        buckets: stats
            .buckets
            .into_iter()
            .map(|bucket| BucketView {
                start: bucket.start,
                income_minor: bucket.income.cents(),
                expense_minor: bucket.expense.cents(),
            })
            .collect(),
        transactions: stats
            .transactions
            .into_iter()
            .map(transaction_view)
            .collect(),
    })))
}
