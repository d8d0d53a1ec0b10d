use crate::error::AnalyticsError;
use crate::summary::SummaryMetrics;
use crate::tables::Dashboard;
use crate::transforms;
use chrono::NaiveDate;
use core_types::{AnalysisSettings, DateRange, RecencyReference};
use dataset::{Dataset, FilteredView};

/// A stateless calculator that turns a dataset and a date range into a
/// `Dashboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {
    settings: AnalysisSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> AnalysisSettings {
        self.settings
    }

    /// The main entry point for building the dashboard.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The full, immutable dataset loaded at startup.
    /// * `range` - The inclusive date filter. An inverted range or a range
    ///   without orders yields an empty dashboard, not an error.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Dashboard` or an `AnalyticsError`.
    pub fn build(&self, dataset: &Dataset, range: DateRange) -> Result<Dashboard, AnalyticsError> {
        let view = dataset.filter(range);
        let reference = self.recency_reference_date(dataset, &view);
        self.build_view(&view, reference)
    }

    /// The date RFM recency is measured against under the configured policy.
    pub fn recency_reference_date(
        &self,
        dataset: &Dataset,
        view: &FilteredView<'_>,
    ) -> Option<NaiveDate> {
        if view.is_empty() {
            return None;
        }
        match self.settings.recency_reference {
            RecencyReference::Filtered => view.latest_purchase_date(),
            RecencyReference::Dataset => dataset.latest_purchase_date(),
        }
    }

    /// Runs every transform over an already filtered view.
    pub fn build_view(
        &self,
        view: &FilteredView<'_>,
        recency_reference_date: Option<NaiveDate>,
    ) -> Result<Dashboard, AnalyticsError> {
        let rows = view.rows();
        if rows.is_empty() {
            tracing::info!(range = %view.range(), "No orders in range; dashboard is empty.");
        }

        let fill = self.settings.bucket_fill;
        let daily_orders = transforms::daily_orders(rows, view.range(), fill)?;
        let monthly_orders = transforms::monthly_orders(rows, view.range(), fill)?;
        let rfm = match recency_reference_date {
            Some(reference) => transforms::rfm(rows, reference)?,
            None => Vec::new(),
        };
        let summary = SummaryMetrics::calculate(&daily_orders, &rfm)?;

        let dashboard = Dashboard {
            range: view.range(),
            recency_reference_date,
            summary,
            daily_orders,
            monthly_orders,
            by_product: transforms::by_product(rows),
            by_category: transforms::by_category(rows),
            by_customer_city: transforms::by_customer_city(rows),
            by_customer_state: transforms::by_customer_state(rows),
            by_seller_city: transforms::by_seller_city(rows),
            by_seller_state: transforms::by_seller_state(rows),
            by_seller_orders: transforms::by_seller_orders(rows),
            by_payment_type: transforms::by_payment_type(rows),
            rfm,
        };

        tracing::debug!(
            rows = rows.len(),
            days = dashboard.daily_orders.len(),
            products = dashboard.by_product.len(),
            categories = dashboard.by_category.len(),
            customers = dashboard.rfm.len(),
            %fill,
            "Dashboard built."
        );
        Ok(dashboard)
    }
}
