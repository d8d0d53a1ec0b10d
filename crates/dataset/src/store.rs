use chrono::NaiveDate;
use core_types::{DateRange, OrderRecord};

/// The loaded export, ordered by purchase timestamp.
///
/// A `Dataset` is built once and only ever read afterwards. Because the rows
/// are sorted, the rows of any date range form one contiguous slice.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<OrderRecord>,
}

/// The rows of a `Dataset` that fall inside an inclusive `DateRange`.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    range: DateRange,
    rows: &'a [OrderRecord],
}

impl Dataset {
    /// Builds a dataset from in-memory records. Rows are stably sorted by
    /// purchase timestamp so that equal timestamps keep their input order.
    pub fn from_records(mut records: Vec<OrderRecord>) -> Self {
        records.sort_by_key(|r| r.order_purchase_timestamp);
        Self { records }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The default filter: first to last purchase date. `None` when empty.
    pub fn bounds(&self) -> Option<DateRange> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some(DateRange::new(first.purchase_date(), last.purchase_date()))
    }

    pub fn latest_purchase_date(&self) -> Option<NaiveDate> {
        self.records.last().map(OrderRecord::purchase_date)
    }

    /// Selects the rows whose purchase day lies within `range`, both ends
    /// included. An inverted range selects nothing.
    pub fn filter(&self, range: DateRange) -> FilteredView<'_> {
        let rows = if range.is_empty() {
            &self.records[..0]
        } else {
            let lo = self
                .records
                .partition_point(|r| r.purchase_date() < range.start);
            let hi = self
                .records
                .partition_point(|r| r.purchase_date() <= range.end);
            &self.records[lo..hi.max(lo)]
        };

        tracing::debug!(%range, rows = rows.len(), "Filtered dataset.");
        FilteredView { range, rows }
    }

    /// A view over every row, using the dataset's own bounds as the range.
    pub fn all(&self) -> FilteredView<'_> {
        match self.bounds() {
            Some(range) => FilteredView {
                range,
                rows: &self.records,
            },
            None => {
                let floor = NaiveDate::MIN;
                FilteredView {
                    range: DateRange::new(floor.succ_opt().unwrap_or(floor), floor),
                    rows: &self.records,
                }
            }
        }
    }
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &'a [OrderRecord] {
        self.rows
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The latest purchase day among the selected rows.
    pub fn latest_purchase_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(OrderRecord::purchase_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order: &str, day: u32, hour: u32) -> OrderRecord {
        let ts = NaiveDate::from_ymd_opt(2018, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        OrderRecord::new(order, "c", "u", ts)
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("o3", 9, 12),
            record("o1", 1, 8),
            record("o2", 5, 23),
            record("o4", 9, 1),
        ])
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 5, day).unwrap()
    }

    #[test]
    fn rows_are_sorted_and_bounds_cover_them() {
        let ds = dataset();
        let ids: Vec<_> = ds.records().iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, ["o1", "o2", "o4", "o3"]);
        assert_eq!(ds.bounds(), Some(DateRange::new(date(1), date(9))));
        assert_eq!(ds.latest_purchase_date(), Some(date(9)));
    }

    #[test]
    fn filter_includes_late_times_on_the_end_day() {
        let ds = dataset();
        let view = ds.filter(DateRange::new(date(2), date(5)));
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].order_id, "o2");
    }

    #[test]
    fn filter_on_an_empty_day_or_inverted_range_is_empty() {
        let ds = dataset();
        assert!(ds.filter(DateRange::single(date(3))).is_empty());
        assert!(ds.filter(DateRange::new(date(9), date(1))).is_empty());
    }

    #[test]
    fn filter_never_touches_the_base_rows() {
        let ds = dataset();
        let before = ds.records().to_vec();
        let _ = ds.filter(DateRange::single(date(9)));
        assert_eq!(ds.records(), before.as_slice());
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = Dataset::default();
        assert_eq!(ds.bounds(), None);
        assert!(ds.all().is_empty());
        assert!(ds.all().range().is_empty());
    }
}
