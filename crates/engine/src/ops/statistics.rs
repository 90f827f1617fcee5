use chrono::{DateTime, Utc};

use crate::{
    ResultEngine, TransactionQuery,
    statistics::{Statistics, StatsWindow, aggregate},
};

use super::Engine;

impl Engine {
    /// Income and expense per bucket for the window ending today (UTC).
    pub async fn statistics(&self, uid: &str, window: StatsWindow) -> ResultEngine<Statistics> {
        self.statistics_at(uid, window, Utc::now()).await
    }

    /// Same as [`Engine::statistics`] with an explicit clock.
    pub async fn statistics_at(
        &self,
        uid: &str,
        window: StatsWindow,
        now: DateTime<Utc>,
    ) -> ResultEngine<Statistics> {
        let today = now.date_naive();
        let (from, to) = window.range(today)?;

        let query = TransactionQuery {
            from,
            to: Some(to),
            ..TransactionQuery::for_user(uid)
        };
        let transactions = self.transactions.query(&query).await?;
        tracing::debug!(
            ?window,
            %today,
            count = transactions.len(),
            "aggregating statistics"
        );
        aggregate(window, today, transactions)
    }
}
