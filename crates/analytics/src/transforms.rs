//! The eleven aggregations behind the dashboard.
//!
//! Each function is a group-by + aggregate + sort over the rows it is given.
//! Rows whose grouping key is missing are left out of that grouping; missing
//! measures are skipped by sums, means and distinct counts.

use crate::error::AnalyticsError;
use crate::tables::{
    CategorySummary, CustomerCityCount, CustomerStateCount, OrderBucket, PaymentTypeOrders,
    ProductSales, RfmScore, SellerCityCount, SellerOrders, SellerStateCount,
};
use chrono::{Datelike, Months, NaiveDate};
use core_types::{BucketFill, DateRange, OrderRecord};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Calendar granularity of the order time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Day,
    /// Months are labelled by their last day.
    Month,
}

impl Interval {
    /// The bucket label a purchase date falls into.
    pub fn bucket_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Interval::Day => date,
            Interval::Month => month_end(date),
        }
    }
}

/// The last day of `date`'s month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

// ==============================================================================
// Time series
// ==============================================================================

#[derive(Default)]
struct BucketAccumulator<'a> {
    orders: HashSet<&'a str>,
    revenue: Decimal,
}

/// Orders and revenue per calendar day of `range`, ascending.
pub fn daily_orders(
    rows: &[OrderRecord],
    range: DateRange,
    fill: BucketFill,
) -> Result<Vec<OrderBucket>, AnalyticsError> {
    order_summary(rows, range, Interval::Day, fill)
}

/// Orders and revenue per calendar month of `range` (labelled by month end),
/// ascending.
pub fn monthly_orders(
    rows: &[OrderRecord],
    range: DateRange,
    fill: BucketFill,
) -> Result<Vec<OrderBucket>, AnalyticsError> {
    order_summary(rows, range, Interval::Month, fill)
}

/// Buckets rows by purchase date.
///
/// With `BucketFill::Dense` every bucket touched by `range` is emitted, from
/// the one holding `range.start` to the one holding `range.end`, and buckets
/// without orders carry zeros. Rows are expected to lie inside `range`; an
/// occupied bucket outside it is still emitted. No rows means no buckets
/// under either policy.
pub fn order_summary(
    rows: &[OrderRecord],
    range: DateRange,
    interval: Interval,
    fill: BucketFill,
) -> Result<Vec<OrderBucket>, AnalyticsError> {
    let mut buckets: BTreeMap<NaiveDate, BucketAccumulator<'_>> = BTreeMap::new();
    for row in rows {
        let acc = buckets
            .entry(interval.bucket_of(row.purchase_date()))
            .or_default();
        acc.orders.insert(row.order_id.as_str());
        acc.revenue = add(acc.revenue, row.payment_value, "revenue")?;
    }
    if buckets.is_empty() {
        return Ok(Vec::new());
    }

    let mut labels: BTreeSet<NaiveDate> = buckets.keys().copied().collect();
    if fill == BucketFill::Dense {
        labels.extend(range.days().map(|day| interval.bucket_of(day)));
    }

    Ok(labels
        .into_iter()
        .map(|label| match buckets.remove(&label) {
            Some(acc) => OrderBucket {
                bucket: label,
                order_count: acc.orders.len() as u64,
                revenue: acc.revenue,
            },
            None => OrderBucket {
                bucket: label,
                order_count: 0,
                revenue: Decimal::ZERO,
            },
        })
        .collect())
}

// ==============================================================================
// Products
// ==============================================================================

/// Units sold per product, best sellers first.
///
/// The unit count is the sum of `order_item_id`, the item's sequence number
/// within its order: an order holding three of a product contributes 1+2+3.
pub fn by_product(rows: &[OrderRecord]) -> Vec<ProductSales> {
    let totals = sum_by(
        rows,
        |r| r.product_id.as_deref(),
        |r| r.order_item_id.map(u64::from),
    );
    rank_descending(totals)
        .into_iter()
        .map(|(product_id, product_count)| ProductSales {
            product_id: product_id.to_string(),
            product_count,
        })
        .collect()
}

#[derive(Default)]
struct CategoryAccumulator<'a> {
    items: u64,
    sellers: HashSet<&'a str>,
    score_total: u64,
    score_count: u64,
}

/// Item volume, seller breadth and mean review score per category, sorted by
/// item volume descending.
pub fn by_category(rows: &[OrderRecord]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&str, CategoryAccumulator<'_>> = BTreeMap::new();
    for row in rows {
        let Some(category) = row.product_category_name_english.as_deref() else {
            continue;
        };
        let acc = groups.entry(category).or_default();
        acc.items += row.order_item_id.map_or(0, u64::from);
        if let Some(seller) = row.seller_id.as_deref() {
            acc.sellers.insert(seller);
        }
        if let Some(score) = row.review_score {
            acc.score_total += u64::from(score);
            acc.score_count += 1;
        }
    }

    let mut summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, acc)| CategorySummary {
            product_category_name_english: category.to_string(),
            order_count: acc.items,
            seller_count: acc.sellers.len() as u64,
            review_score: (acc.score_count > 0).then(|| {
                (Decimal::from(acc.score_total) / Decimal::from(acc.score_count)).round_dp(2)
            }),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then_with(|| a.product_category_name_english.cmp(&b.product_category_name_english))
    });
    summaries
}

// ==============================================================================
// Demographics
// ==============================================================================

/// Distinct customer accounts per customer city, largest first.
pub fn by_customer_city(rows: &[OrderRecord]) -> Vec<CustomerCityCount> {
    customer_counts(rows, |r| r.customer_city.as_deref())
        .into_iter()
        .map(|(customer_city, customer_count)| CustomerCityCount {
            customer_city,
            customer_count,
        })
        .collect()
}

/// Distinct customer accounts per customer state, largest first.
pub fn by_customer_state(rows: &[OrderRecord]) -> Vec<CustomerStateCount> {
    customer_counts(rows, |r| r.customer_state.as_deref())
        .into_iter()
        .map(|(customer_state, customer_count)| CustomerStateCount {
            customer_state,
            customer_count,
        })
        .collect()
}

/// Distinct sellers per seller city, largest first.
pub fn by_seller_city(rows: &[OrderRecord]) -> Vec<SellerCityCount> {
    seller_counts(rows, |r| r.seller_city.as_deref())
        .into_iter()
        .map(|(seller_city, seller_count)| SellerCityCount {
            seller_city,
            seller_count,
        })
        .collect()
}

/// Distinct sellers per seller state, largest first.
pub fn by_seller_state(rows: &[OrderRecord]) -> Vec<SellerStateCount> {
    seller_counts(rows, |r| r.seller_state.as_deref())
        .into_iter()
        .map(|(seller_state, seller_count)| SellerStateCount {
            seller_state,
            seller_count,
        })
        .collect()
}

fn customer_counts<'a>(
    rows: &'a [OrderRecord],
    key: impl Fn(&'a OrderRecord) -> Option<&'a str>,
) -> Vec<(String, u64)> {
    let counts = distinct_count_by(rows, key, |r| Some(r.customer_id.as_str()));
    rank_descending(counts)
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect()
}

fn seller_counts<'a>(
    rows: &'a [OrderRecord],
    key: impl Fn(&'a OrderRecord) -> Option<&'a str>,
) -> Vec<(String, u64)> {
    let counts = distinct_count_by(rows, key, |r| r.seller_id.as_deref());
    rank_descending(counts)
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect()
}

// ==============================================================================
// Sellers and payments
// ==============================================================================

/// Distinct orders per seller, busiest first.
pub fn by_seller_orders(rows: &[OrderRecord]) -> Vec<SellerOrders> {
    let counts = distinct_count_by(rows, |r| r.seller_id.as_deref(), |r| Some(r.order_id.as_str()));
    rank_descending(counts)
        .into_iter()
        .map(|(seller_id, order_count)| SellerOrders {
            seller_id: seller_id.to_string(),
            order_count,
        })
        .collect()
}

/// Distinct orders per payment type, in ascending payment type order.
pub fn by_payment_type(rows: &[OrderRecord]) -> Vec<PaymentTypeOrders> {
    distinct_count_by(rows, |r| r.payment_type.as_deref(), |r| Some(r.order_id.as_str()))
        .into_iter()
        .map(|(payment_type, order_count)| PaymentTypeOrders {
            payment_type: payment_type.to_string(),
            order_count,
        })
        .collect()
}

// ==============================================================================
// RFM
// ==============================================================================

#[derive(Default)]
struct CustomerAccumulator<'a> {
    orders: HashSet<&'a str>,
    monetary: Decimal,
    last_purchase: Option<NaiveDate>,
}

/// Recency, frequency and monetary value per physical customer
/// (`customer_unique_id`), in ascending customer order.
///
/// Recency is measured in whole days from each customer's latest purchase
/// date to `reference`.
pub fn rfm(rows: &[OrderRecord], reference: NaiveDate) -> Result<Vec<RfmScore>, AnalyticsError> {
    let mut customers: BTreeMap<&str, CustomerAccumulator<'_>> = BTreeMap::new();
    for row in rows {
        let acc = customers.entry(row.customer_unique_id.as_str()).or_default();
        acc.orders.insert(row.order_id.as_str());
        acc.monetary = add(acc.monetary, row.payment_value, "monetary")?;
        let purchased = row.purchase_date();
        acc.last_purchase = Some(acc.last_purchase.map_or(purchased, |d| d.max(purchased)));
    }

    Ok(customers
        .into_iter()
        .map(|(customer, acc)| RfmScore {
            customer_unique_id: customer.to_string(),
            frequency: acc.orders.len() as u64,
            monetary: acc.monetary,
            recency: acc
                .last_purchase
                .map_or(0, |last| (reference - last).num_days()),
        })
        .collect())
}

// ==============================================================================
// Group-by helpers
// ==============================================================================

/// Counts the distinct `value`s per `key`. A group whose rows all lack a value
/// is kept with a count of zero.
fn distinct_count_by<'a>(
    rows: &'a [OrderRecord],
    key: impl Fn(&'a OrderRecord) -> Option<&'a str>,
    value: impl Fn(&'a OrderRecord) -> Option<&'a str>,
) -> Vec<(&'a str, u64)> {
    let mut groups: BTreeMap<&'a str, HashSet<&'a str>> = BTreeMap::new();
    for row in rows {
        let Some(k) = key(row) else {
            continue;
        };
        let members = groups.entry(k).or_default();
        if let Some(v) = value(row) {
            members.insert(v);
        }
    }
    groups
        .into_iter()
        .map(|(k, members)| (k, members.len() as u64))
        .collect()
}

fn sum_by<'a>(
    rows: &'a [OrderRecord],
    key: impl Fn(&'a OrderRecord) -> Option<&'a str>,
    value: impl Fn(&'a OrderRecord) -> Option<u64>,
) -> Vec<(&'a str, u64)> {
    let mut groups: BTreeMap<&'a str, u64> = BTreeMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            *groups.entry(k).or_default() += value(row).unwrap_or(0);
        }
    }
    groups.into_iter().collect()
}

/// Largest measure first; equal measures in ascending key order.
fn rank_descending(mut groups: Vec<(&str, u64)>) -> Vec<(&str, u64)> {
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    groups
}

fn add(total: Decimal, value: Option<Decimal>, measure: &str) -> Result<Decimal, AnalyticsError> {
    match value {
        None => Ok(total),
        Some(v) => total
            .checked_add(v)
            .ok_or_else(|| AnalyticsError::Overflow(measure.to_string())),
    }
}
