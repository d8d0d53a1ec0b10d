use crate::error::AnalyticsError;
use crate::tables::{OrderBucket, RfmScore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The headline numbers shown above the charts.
///
/// Totals over an empty range are zero. Means over an empty RFM table are
/// `None` so the presentation layer can print "no data" instead of a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_orders: u64,
    pub total_revenue: Decimal,
    /// Mean RFM recency in days, rounded to 1 decimal.
    pub average_recency: Option<Decimal>,
    /// Mean RFM frequency, rounded to 2 decimals.
    pub average_frequency: Option<Decimal>,
    /// Mean RFM monetary value, rounded to 2 decimals.
    pub average_monetary: Option<Decimal>,
}

impl SummaryMetrics {
    /// Creates a zeroed-out summary, the result for a range with no orders.
    pub fn new() -> Self {
        Self {
            total_orders: 0,
            total_revenue: Decimal::ZERO,
            average_recency: None,
            average_frequency: None,
            average_monetary: None,
        }
    }

    /// Derives the summary from the daily series and the RFM table.
    pub fn calculate(
        daily_orders: &[OrderBucket],
        rfm: &[RfmScore],
    ) -> Result<Self, AnalyticsError> {
        let mut summary = Self::new();

        for bucket in daily_orders {
            summary.total_orders += bucket.order_count;
            summary.total_revenue = summary
                .total_revenue
                .checked_add(bucket.revenue)
                .ok_or_else(|| AnalyticsError::Overflow("total_revenue".to_string()))?;
        }

        if rfm.is_empty() {
            return Ok(summary);
        }

        let customers = Decimal::from(rfm.len());
        let recency: i64 = rfm.iter().map(|r| r.recency).sum();
        let frequency: u64 = rfm.iter().map(|r| r.frequency).sum();
        let monetary = rfm
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.monetary))
            .ok_or_else(|| AnalyticsError::Overflow("average_monetary".to_string()))?;

        summary.average_recency = Some((Decimal::from(recency) / customers).round_dp(1));
        summary.average_frequency = Some((Decimal::from(frequency) / customers).round_dp(2));
        summary.average_monetary = Some((monetary / customers).round_dp(2));

        Ok(summary)
    }
}

impl Default for SummaryMetrics {
    fn default() -> Self {
        Self::new()
    }
}
