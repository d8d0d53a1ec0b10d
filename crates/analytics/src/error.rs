use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Calculation error: decimal overflow while summing '{0}'")]
    Overflow(String),
}
