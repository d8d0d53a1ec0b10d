use analytics::ranking::{
    categories_by_review_score, categories_by_seller_count, customers_by_frequency,
    customers_by_monetary, customers_by_recency, top_n,
};
use analytics::{CategorySummary, Dashboard, RfmScore};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use configuration::DisplaySettings;
use rust_decimal::Decimal;
use std::fmt::Display;

const NO_DATA: &str = "No data for this range.";
const NOT_AVAILABLE: &str = "n/a";

/// Accumulates the titled sections of the terminal report.
struct Report<'a> {
    out: String,
    currency: &'a str,
}

impl<'a> Report<'a> {
    fn new(currency: &'a str) -> Self {
        Self {
            out: String::new(),
            currency,
        }
    }

    fn heading(&mut self, title: &str) {
        self.out.push('\n');
        self.out.push_str(title);
        self.out.push('\n');
        self.out.push_str(&"=".repeat(title.chars().count()));
        self.out.push('\n');
    }

    /// Prints one table, or the empty-range notice when there are no rows.
    fn table<T>(&mut self, title: &str, headers: &[&str], rows: &[T], row: impl Fn(&T) -> Vec<Cell>) {
        self.out.push('\n');
        self.out.push_str(title);
        self.out.push('\n');
        if rows.is_empty() {
            self.out.push_str(NO_DATA);
            self.out.push('\n');
            return;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(headers.iter().map(Cell::new));
        for item in rows {
            table.add_row(row(item));
        }
        self.out.push_str(&table.to_string());
        self.out.push('\n');
    }

    fn money(&self, value: Decimal) -> String {
        format!("{} {:.2}", self.currency, value)
    }
}

fn number<T: Display>(value: T) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn optional<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn category_row(c: &CategorySummary) -> Vec<Cell> {
    vec![
        Cell::new(&c.product_category_name_english),
        number(c.order_count),
        number(c.seller_count),
        number(optional(c.review_score)),
    ]
}

/// Renders the whole dashboard as a plain-text report.
pub fn report(dashboard: &Dashboard, display: &DisplaySettings, include_daily: bool) -> String {
    let mut report = Report::new(&display.currency);
    let summary = &dashboard.summary;

    report.heading(&format!("E-Commerce Dashboard: {}", dashboard.range));
    let metrics = [
        ("Total Orders", summary.total_orders.to_string()),
        ("Total Revenue", report.money(summary.total_revenue)),
        ("Average Recency (days)", optional(summary.average_recency)),
        ("Average Frequency", optional(summary.average_frequency)),
        (
            "Average Monetary",
            summary
                .average_monetary
                .map_or_else(|| NOT_AVAILABLE.to_string(), |v| report.money(v)),
        ),
    ];
    report.table("Summary", &["Metric", "Value"], &metrics, |(name, value)| {
        vec![Cell::new(name), number(value)]
    });

    // I. Orders over time
    let bucket_row = |b: &analytics::OrderBucket| {
        vec![
            Cell::new(b.bucket),
            number(b.order_count),
            number(format!("{:.2}", b.revenue)),
        ]
    };
    report.table(
        "Monthly Orders",
        &["Month End", "Orders", "Revenue"],
        &dashboard.monthly_orders,
        bucket_row,
    );
    if include_daily {
        report.table(
            "Daily Orders",
            &["Day", "Orders", "Revenue"],
            &dashboard.daily_orders,
            bucket_row,
        );
    }

    // II. Products and categories
    report.heading("Products");
    report.table(
        "Best Products by Number of Sales",
        &["Product ID", "Units"],
        top_n(&dashboard.by_product, display.top_n),
        |p| vec![Cell::new(&p.product_id), number(p.product_count)],
    );
    let category_headers = ["Category", "Units", "Sellers", "Review Score"];
    report.table(
        "Best Categories by Number of Sales",
        &category_headers,
        top_n(&dashboard.by_category, display.top_n),
        category_row,
    );
    let by_sellers = categories_by_seller_count(&dashboard.by_category);
    report.table(
        "Most Sold Categories by Number of Sellers",
        &category_headers,
        top_n(&by_sellers, display.top_n),
        category_row,
    );
    let by_score = categories_by_review_score(&dashboard.by_category);
    report.table(
        "Best Categories by Review Score",
        &category_headers,
        top_n(&by_score, display.top_n),
        category_row,
    );

    // III. Demographics
    report.heading("Customer and Seller Demographics");
    let demographics = display.demographics_top_n;
    report.table(
        "Customers by City",
        &["City", "Customers"],
        top_n(&dashboard.by_customer_city, demographics),
        |c| vec![Cell::new(&c.customer_city), number(c.customer_count)],
    );
    report.table(
        "Customers by State",
        &["State", "Customers"],
        top_n(&dashboard.by_customer_state, demographics),
        |c| vec![Cell::new(&c.customer_state), number(c.customer_count)],
    );
    report.table(
        "Sellers by City",
        &["City", "Sellers"],
        top_n(&dashboard.by_seller_city, demographics),
        |s| vec![Cell::new(&s.seller_city), number(s.seller_count)],
    );
    report.table(
        "Sellers by State",
        &["State", "Sellers"],
        top_n(&dashboard.by_seller_state, demographics),
        |s| vec![Cell::new(&s.seller_state), number(s.seller_count)],
    );

    // IV. Sellers and payments
    report.heading("Sellers and Payments");
    report.table(
        "Best Sellers by Number of Orders",
        &["Seller ID", "Orders"],
        top_n(&dashboard.by_seller_orders, display.top_n),
        |s| vec![Cell::new(&s.seller_id), number(s.order_count)],
    );
    let payment_total: u64 = dashboard.by_payment_type.iter().map(|p| p.order_count).sum();
    report.table(
        "Payment Types by Number of Orders",
        &["Payment Type", "Orders", "Share"],
        &dashboard.by_payment_type,
        |p| {
            vec![
                Cell::new(&p.payment_type),
                number(p.order_count),
                number(share(p.order_count, payment_total)),
            ]
        },
    );

    // V. RFM
    report.heading("Best Customers by RFM");
    let rfm_headers = ["Customer Unique ID", "Recency (days)", "Frequency", "Monetary"];
    let rfm_row = |s: &RfmScore| {
        vec![
            Cell::new(&s.customer_unique_id),
            number(s.recency),
            number(s.frequency),
            number(format!("{:.2}", s.monetary)),
        ]
    };
    let rfm_n = display.rfm_top_n;
    report.table(
        "By Recency",
        &rfm_headers,
        top_n(&customers_by_recency(&dashboard.rfm), rfm_n),
        rfm_row,
    );
    report.table(
        "By Frequency",
        &rfm_headers,
        top_n(&customers_by_frequency(&dashboard.rfm), rfm_n),
        rfm_row,
    );
    report.table(
        "By Monetary",
        &rfm_headers,
        top_n(&customers_by_monetary(&dashboard.rfm), rfm_n),
        rfm_row,
    );

    report.out
}

/// A count as a percentage of `total` with one decimal, like a pie-chart label.
fn share(count: u64, total: u64) -> String {
    if total == 0 {
        return NOT_AVAILABLE.to_string();
    }
    let pct = (Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(1);
    format!("{pct:.1}%")
}
