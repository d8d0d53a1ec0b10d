use crate::error::DatasetError;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::OrderRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use std::str::FromStr;

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A row exactly as the export writes it: every cell is text and any cell may
/// be blank. Columns that are absent from the header deserialize as `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawRow {
    order_id: Option<String>,
    order_item_id: Option<String>,
    product_id: Option<String>,
    customer_id: Option<String>,
    customer_unique_id: Option<String>,
    seller_id: Option<String>,
    order_status: Option<String>,
    order_purchase_timestamp: Option<String>,
    order_approved_at: Option<String>,
    order_delivered_carrier_date: Option<String>,
    order_delivered_customer_date: Option<String>,
    order_estimated_delivery_date: Option<String>,
    shipping_limit_date: Option<String>,
    review_creation_date: Option<String>,
    review_answer_timestamp: Option<String>,
    product_category_name_english: Option<String>,
    customer_city: Option<String>,
    customer_state: Option<String>,
    seller_city: Option<String>,
    seller_state: Option<String>,
    payment_type: Option<String>,
    payment_value: Option<String>,
    review_score: Option<String>,
}

/// Binds a line number to the column-level parsers so every error can say
/// where it happened.
struct Cells {
    line: u64,
}

impl Cells {
    fn invalid(&self, column: &str, value: &str, reason: impl Into<String>) -> DatasetError {
        DatasetError::InvalidField {
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn required(&self, column: &str, value: Option<String>) -> Result<String, DatasetError> {
        present(value).ok_or_else(|| self.invalid(column, "", "value is required"))
    }

    fn timestamp(&self, column: &str, value: Option<String>) -> Result<Option<NaiveDateTime>, DatasetError> {
        let Some(text) = present(value) else {
            return Ok(None);
        };
        parse_timestamp(&text)
            .map(Some)
            .ok_or_else(|| self.invalid(column, &text, "expected YYYY-MM-DD[ HH:MM:SS]"))
    }

    fn decimal(&self, column: &str, value: Option<String>) -> Result<Option<Decimal>, DatasetError> {
        let Some(text) = present(value) else {
            return Ok(None);
        };
        Decimal::from_str(&text)
            .map(Some)
            .map_err(|e| self.invalid(column, &text, e.to_string()))
    }

    /// Parses a whole number that the export may have written as a float
    /// (`"3.0"`) because its column contains blanks.
    fn whole<T>(&self, column: &str, value: Option<String>) -> Result<Option<T>, DatasetError>
    where
        T: TryFrom<u64>,
    {
        let Some(text) = present(value) else {
            return Ok(None);
        };
        let number = Decimal::from_str(&text).map_err(|e| self.invalid(column, &text, e.to_string()))?;
        if !number.fract().is_zero() || number.is_sign_negative() {
            return Err(self.invalid(column, &text, "expected a non-negative whole number"));
        }
        number
            .to_u64()
            .and_then(|n| T::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| self.invalid(column, &text, "number is out of range"))
    }
}

impl RawRow {
    /// Converts the text cells into a typed, validated `OrderRecord`.
    pub(crate) fn into_record(self, line: u64) -> Result<OrderRecord, DatasetError> {
        let cells = Cells { line };

        let purchase = cells.required("order_purchase_timestamp", self.order_purchase_timestamp)?;
        let order_purchase_timestamp = cells
            .timestamp("order_purchase_timestamp", Some(purchase))?
            .ok_or_else(|| cells.invalid("order_purchase_timestamp", "", "value is required"))?;

        let mut record = OrderRecord::new(
            cells.required("order_id", self.order_id)?,
            cells.required("customer_id", self.customer_id)?,
            cells.required("customer_unique_id", self.customer_unique_id)?,
            order_purchase_timestamp,
        );

        record.order_item_id = cells.whole("order_item_id", self.order_item_id)?;
        record.product_id = present(self.product_id);
        record.seller_id = present(self.seller_id);

        record.order_status = present(self.order_status);
        record.order_approved_at = cells.timestamp("order_approved_at", self.order_approved_at)?;
        record.order_delivered_carrier_date =
            cells.timestamp("order_delivered_carrier_date", self.order_delivered_carrier_date)?;
        record.order_delivered_customer_date =
            cells.timestamp("order_delivered_customer_date", self.order_delivered_customer_date)?;
        record.order_estimated_delivery_date =
            cells.timestamp("order_estimated_delivery_date", self.order_estimated_delivery_date)?;
        record.shipping_limit_date = cells.timestamp("shipping_limit_date", self.shipping_limit_date)?;
        record.review_creation_date = cells.timestamp("review_creation_date", self.review_creation_date)?;
        record.review_answer_timestamp =
            cells.timestamp("review_answer_timestamp", self.review_answer_timestamp)?;

        record.product_category_name_english = present(self.product_category_name_english);
        record.customer_city = present(self.customer_city);
        record.customer_state = present(self.customer_state);
        record.seller_city = present(self.seller_city);
        record.seller_state = present(self.seller_state);
        record.payment_type = present(self.payment_type);

        record.payment_value = cells.decimal("payment_value", self.payment_value)?;
        record.review_score = cells.whole("review_score", self.review_score)?;

        record
            .validate()
            .map_err(|source| DatasetError::InvalidRecord { line, source })?;

        Ok(record)
    }
}

/// Blank and whitespace-only cells count as missing.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
}
