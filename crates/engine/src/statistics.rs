//! Income/expense statistics over fixed calendar buckets.
//!
//! A window produces a skeleton of buckets (7 days, 12 months, or one per
//! year since the first transaction), ordered oldest first. Transactions are
//! then folded into the bucket that contains their `date`, truncated in UTC.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine, Transaction, TransactionKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsWindow {
    /// Last 7 calendar days, today included.
    Weekly,
    /// Last 12 calendar months, this month included.
    Monthly,
    /// Every calendar year from the first transaction to this year.
    Yearly,
}

impl TryFrom<&str> for StatsWindow {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::Validation(format!(
                "Invalid statistics window: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// First day covered by the bucket.
    pub start: NaiveDate,
    pub income: Money,
    pub expense: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub window: StatsWindow,
    pub buckets: Vec<Bucket>,
    /// Transactions returned by the window query, newest first.
    pub transactions: Vec<Transaction>,
}

fn out_of_range() -> EngineError {
    EngineError::Validation("Date out of range".to_string())
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn first_of_month(date: NaiveDate) -> ResultEngine<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).ok_or_else(out_of_range)
}

fn first_of_year(year: i32) -> ResultEngine<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)
}

impl StatsWindow {
    /// Query range `[from, to)` covering the window.
    ///
    /// The yearly window has no lower bound: its first bucket depends on the
    /// oldest transaction.
    pub fn range(self, today: NaiveDate) -> ResultEngine<(Option<DateTime<Utc>>, DateTime<Utc>)> {
        match self {
            Self::Weekly => {
                let from = today.checked_sub_days(Days::new(6)).ok_or_else(out_of_range)?;
                let to = today.checked_add_days(Days::new(1)).ok_or_else(out_of_range)?;
                Ok((Some(midnight(from)), midnight(to)))
            }
            Self::Monthly => {
                let this_month = first_of_month(today)?;
                let from = this_month
                    .checked_sub_months(Months::new(11))
                    .ok_or_else(out_of_range)?;
                let to = this_month
                    .checked_add_months(Months::new(1))
                    .ok_or_else(out_of_range)?;
                Ok((Some(midnight(from)), midnight(to)))
            }
            Self::Yearly => Ok((None, midnight(first_of_year(today.year() + 1)?))),
        }
    }

    /// Start of the bucket a date belongs to.
    pub fn bucket_start(self, date: NaiveDate) -> ResultEngine<NaiveDate> {
        match self {
            Self::Weekly => Ok(date),
            Self::Monthly => first_of_month(date),
            Self::Yearly => first_of_year(date.year()),
        }
    }

    /// Bucket start dates, oldest first.
    fn skeleton(self, today: NaiveDate, first_year: i32) -> ResultEngine<Vec<NaiveDate>> {
        match self {
            Self::Weekly => (0..7u64)
                .rev()
                .map(|i| today.checked_sub_days(Days::new(i)).ok_or_else(out_of_range))
                .collect(),
            Self::Monthly => {
                let this_month = first_of_month(today)?;
                (0..12u32)
                    .rev()
                    .map(|i| {
                        this_month
                            .checked_sub_months(Months::new(i))
                            .ok_or_else(out_of_range)
                    })
                    .collect()
            }
            Self::Yearly => (first_year.min(today.year())..=today.year())
                .map(first_of_year)
                .collect(),
        }
    }
}

/// Folds transactions into the bucket skeleton of `window`.
///
/// Transactions falling outside every bucket are skipped.
pub fn aggregate(
    window: StatsWindow,
    today: NaiveDate,
    transactions: Vec<Transaction>,
) -> ResultEngine<Statistics> {
    let first_year = transactions
        .iter()
        .map(|tx| tx.date.year())
        .min()
        .unwrap_or(today.year());

    let mut buckets: Vec<Bucket> = window
        .skeleton(today, first_year)?
        .into_iter()
        .map(|start| Bucket {
            start,
            income: Money::ZERO,
            expense: Money::ZERO,
        })
        .collect();
    let index: HashMap<NaiveDate, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| (bucket.start, i))
        .collect();

    for tx in &transactions {
        let key = window.bucket_start(tx.date.date_naive())?;
        let Some(&i) = index.get(&key) else {
            tracing::warn!(
                transaction_id = %tx.id,
                date = %tx.date,
                ?window,
                "transaction outside statistics window, skipped"
            );
            continue;
        };
        let bucket = &mut buckets[i];
        match tx.kind {
            TransactionKind::Income => bucket.income = bucket.income.try_add(tx.amount)?,
            TransactionKind::Expense => bucket.expense = bucket.expense.try_add(tx.amount)?,
        }
    }

    Ok(Statistics {
        window,
        buckets,
        transactions,
    })
}
