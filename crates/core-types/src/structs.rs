use crate::enums::{BucketFill, RecencyReference};
use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the joined e-commerce export: an order, one of its items, one of
/// its payments and its review, flattened together with the customer, seller
/// and product attributes.
///
/// Only the identifiers that every order has are mandatory. Everything else
/// can legitimately be absent in the join (orders without items, payments or
/// reviews), so it is modelled as `Option` and skipped by aggregations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    // I. Identifiers
    pub order_id: String,
    pub order_item_id: Option<u32>,
    pub product_id: Option<String>,
    pub customer_id: String,
    pub customer_unique_id: String,
    pub seller_id: Option<String>,

    // II. Order lifecycle
    pub order_status: Option<String>,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_approved_at: Option<NaiveDateTime>,
    pub order_delivered_carrier_date: Option<NaiveDateTime>,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub order_estimated_delivery_date: Option<NaiveDateTime>,
    pub shipping_limit_date: Option<NaiveDateTime>,
    pub review_creation_date: Option<NaiveDateTime>,
    pub review_answer_timestamp: Option<NaiveDateTime>,

    // III. Categorical attributes
    pub product_category_name_english: Option<String>,
    pub customer_city: Option<String>,
    pub customer_state: Option<String>,
    pub seller_city: Option<String>,
    pub seller_state: Option<String>,
    pub payment_type: Option<String>,

    // IV. Measures
    pub payment_value: Option<Decimal>,
    pub review_score: Option<u8>,
}

impl OrderRecord {
    /// Creates a record with the mandatory fields set and every optional
    /// attribute empty.
    pub fn new(
        order_id: impl Into<String>,
        customer_id: impl Into<String>,
        customer_unique_id: impl Into<String>,
        order_purchase_timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            order_item_id: None,
            product_id: None,
            customer_id: customer_id.into(),
            customer_unique_id: customer_unique_id.into(),
            seller_id: None,
            order_status: None,
            order_purchase_timestamp,
            order_approved_at: None,
            order_delivered_carrier_date: None,
            order_delivered_customer_date: None,
            order_estimated_delivery_date: None,
            shipping_limit_date: None,
            review_creation_date: None,
            review_answer_timestamp: None,
            product_category_name_english: None,
            customer_city: None,
            customer_state: None,
            seller_city: None,
            seller_state: None,
            payment_type: None,
            payment_value: None,
            review_score: None,
        }
    }

    /// The calendar day the order was placed on.
    pub fn purchase_date(&self) -> NaiveDate {
        self.order_purchase_timestamp.date()
    }

    /// Checks the invariants that the type system cannot express: the
    /// mandatory identifiers are non-blank and the review score is on the 1-5
    /// scale.
    pub fn validate(&self) -> Result<(), CoreError> {
        let required = [
            ("order_id", &self.order_id),
            ("customer_id", &self.customer_id),
            ("customer_unique_id", &self.customer_unique_id),
        ];
        for (column, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    column.to_string(),
                    "value is required".to_string(),
                ));
            }
        }

        if let Some(score) = self.review_score {
            if !(1..=5).contains(&score) {
                return Err(CoreError::InvalidInput(
                    "review_score".to_string(),
                    format!("{score} is outside 1..=5"),
                ));
            }
        }

        Ok(())
    }
}

/// An inclusive range of calendar days.
///
/// A range whose start lies after its end is valid and simply covers nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one day.
    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Iterates over every covered day in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start
            .iter_days()
            .take_while(move |day| *day <= self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Policies for the aggregation layer's two ambiguous choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Whether empty days/months appear in the time series as zero rows.
    #[serde(default)]
    pub bucket_fill: BucketFill,
    /// Which latest date RFM recency is measured against.
    #[serde(default)]
    pub recency_reference: RecencyReference,
}
