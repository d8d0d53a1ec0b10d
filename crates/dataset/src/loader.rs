use crate::error::DatasetError;
use crate::row::RawRow;
use crate::store::Dataset;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns the aggregation layer reads. A header without any of them is
/// rejected before a single row is parsed. The remaining lifecycle columns are
/// optional and load as `None` when absent.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "order_id",
    "order_item_id",
    "product_id",
    "customer_id",
    "customer_unique_id",
    "seller_id",
    "order_purchase_timestamp",
    "product_category_name_english",
    "customer_city",
    "customer_state",
    "seller_city",
    "seller_state",
    "payment_type",
    "payment_value",
    "review_score",
];

/// Parsing options for the delimited export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Opens and parses the dataset file at `path`.
///
/// This is the single load-time entry point of the application. Any failure is
/// fatal: the caller gets one `DatasetError` describing the first problem.
pub fn load_csv(path: &Path, options: LoadOptions) -> Result<Dataset, DatasetError> {
    tracing::info!(path = %path.display(), "Loading dataset.");
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_csv(file, options)?;

    match dataset.bounds() {
        Some(bounds) => {
            tracing::info!(rows = dataset.len(), %bounds, "Dataset loaded.")
        }
        None => tracing::warn!(path = %path.display(), "Dataset file contains no rows."),
    }
    Ok(dataset)
}

/// Parses a dataset from any reader. The first record must be the header.
pub fn read_csv<R: Read>(reader: R, options: LoadOptions) -> Result<Dataset, DatasetError> {
    if options.delimiter == b'"' || options.delimiter == b'\n' {
        return Err(DatasetError::InvalidOptions(format!(
            "{:?} cannot be used as a delimiter",
            options.delimiter as char
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(DatasetError::MissingColumn(missing.to_string()));
    }

    let mut records = Vec::new();
    let mut row = csv::StringRecord::new();
    while reader.read_record(&mut row)? {
        let line = row.position().map_or(0, |p| p.line());
        let raw: RawRow = row.deserialize(Some(&headers))?;
        records.push(raw.into_record(line)?);
    }

    tracing::debug!(rows = records.len(), "Parsed dataset rows.");
    Ok(Dataset::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        REQUIRED_COLUMNS.join(",")
    }

    #[test]
    fn header_without_a_required_column_is_rejected() {
        let input = "order_id,customer_id\no1,c1\n";
        let err = read_csv(input.as_bytes(), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "order_item_id"));
    }

    #[test]
    fn header_only_file_loads_as_empty_dataset() {
        let input = format!("{}\n", header());
        let dataset = read_csv(input.as_bytes(), LoadOptions::default()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.bounds(), None);
    }

    #[test]
    fn custom_delimiter_is_honoured() {
        let input = format!(
            "{}\no1;1;p1;c1;u1;s1;2018-01-05 09:00:00;toys;sp;SP;rio;RJ;boleto;10.00;4\n",
            REQUIRED_COLUMNS.join(";")
        );
        let dataset = read_csv(input.as_bytes(), LoadOptions { delimiter: b';' }).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].payment_type.as_deref(), Some("boleto"));
    }

    #[test]
    fn quote_is_not_a_valid_delimiter() {
        let err = read_csv("".as_bytes(), LoadOptions { delimiter: b'"' }).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidOptions(_)));
    }
}
