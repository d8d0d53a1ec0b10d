use crate::summary::SummaryMetrics;
use chrono::NaiveDate;
use core_types::DateRange;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One calendar bucket (a day, or a month labelled by its last day) of the
/// order time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBucket {
    #[serde(rename = "order_purchase_timestamp")]
    pub bucket: NaiveDate,
    /// Distinct orders placed in the bucket.
    pub order_count: u64,
    /// Sum of `payment_value` over the bucket's rows.
    pub revenue: Decimal,
}

/// Units sold per product, where a unit is the summed `order_item_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: String,
    pub product_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub product_category_name_english: String,
    /// Summed `order_item_id`, the same quantity proxy as `ProductSales`.
    pub order_count: u64,
    /// Distinct sellers offering the category.
    pub seller_count: u64,
    /// Mean review score rounded to 2 decimals; `None` when no row of the
    /// category carries a review.
    pub review_score: Option<Decimal>,
}

/// Distinct customer accounts (`customer_id`) per customer city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCityCount {
    pub customer_city: String,
    pub customer_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerStateCount {
    pub customer_state: String,
    pub customer_count: u64,
}

/// Distinct sellers per seller city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerCityCount {
    pub seller_city: String,
    pub seller_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerStateCount {
    pub seller_state: String,
    pub seller_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerOrders {
    pub seller_id: String,
    pub order_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeOrders {
    pub payment_type: String,
    pub order_count: u64,
}

/// Recency / Frequency / Monetary scores of one physical customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfmScore {
    pub customer_unique_id: String,
    /// Distinct orders across all of the customer's accounts.
    pub frequency: u64,
    /// Sum of `payment_value` across all of the customer's rows.
    pub monetary: Decimal,
    /// Whole days between the reference date and the customer's latest purchase.
    pub recency: i64,
}

/// Everything the dashboard shows for one date range.
///
/// This is the data transfer object handed to the presentation layer; it is
/// rebuilt from scratch on every filter change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub range: DateRange,
    /// The date RFM recency was measured against; `None` when the range holds
    /// no orders.
    pub recency_reference_date: Option<NaiveDate>,
    pub summary: SummaryMetrics,

    // I. Time series
    pub daily_orders: Vec<OrderBucket>,
    pub monthly_orders: Vec<OrderBucket>,

    // II. Products
    pub by_product: Vec<ProductSales>,
    pub by_category: Vec<CategorySummary>,

    // III. Demographics
    pub by_customer_city: Vec<CustomerCityCount>,
    pub by_customer_state: Vec<CustomerStateCount>,
    pub by_seller_city: Vec<SellerCityCount>,
    pub by_seller_state: Vec<SellerStateCount>,

    // IV. Sellers, payments and customers
    pub by_seller_orders: Vec<SellerOrders>,
    pub by_payment_type: Vec<PaymentTypeOrders>,
    pub rfm: Vec<RfmScore>,
}

impl Dashboard {
    /// Whether every derived table is empty.
    pub fn is_empty(&self) -> bool {
        self.daily_orders.is_empty()
            && self.monthly_orders.is_empty()
            && self.by_product.is_empty()
            && self.by_category.is_empty()
            && self.by_customer_city.is_empty()
            && self.by_customer_state.is_empty()
            && self.by_seller_city.is_empty()
            && self.by_seller_state.is_empty()
            && self.by_seller_orders.is_empty()
            && self.by_payment_type.is_empty()
            && self.rfm.is_empty()
    }
}
