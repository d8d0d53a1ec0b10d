use crate::error::ConfigError;
use core_types::AnalysisSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Where the joined export lives and how it is delimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// Path to the delimited file, relative to the working directory.
    pub path: PathBuf,
    /// A single ASCII character separating fields.
    pub delimiter: String,
}

/// How many rows of each ranking the terminal report prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Products, categories and sellers.
    pub top_n: usize,
    /// Customer and seller cities/states.
    pub demographics_top_n: usize,
    /// Customers in each RFM ranking.
    pub rfm_top_n: usize,
    /// Currency code printed next to money values.
    pub currency: String,
}

// --- Default Implementations ---
// These match the layout of the original dashboard: top 10 products,
// categories and sellers, top 5 cities/states and top 5 customers per RFM
// dimension.

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dashboard/main_data.csv"),
            delimiter: ",".to_string(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            demographics_top_n: 5,
            rfm_top_n: 5,
            currency: "BRL".to_string(),
        }
    }
}

impl Settings {
    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dataset.delimiter_byte()?;

        let limits = [
            ("display.top_n", self.display.top_n),
            ("display.demographics_top_n", self.display.demographics_top_n),
            ("display.rfm_top_n", self.display.rfm_top_n),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be at least 1"
            )));
        }

        if self.display.currency.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "display.currency must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl DatasetSettings {
    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() && *byte != b'"' && *byte != b'\n' => Ok(*byte),
            _ => Err(ConfigError::ValidationError(format!(
                "dataset.delimiter must be a single ASCII character other than a quote or newline, got {:?}",
                self.delimiter
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{BucketFill, RecencyReference};

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.dataset.delimiter_byte().unwrap(), b',');
        assert_eq!(settings.analysis.bucket_fill, BucketFill::Dense);
        assert_eq!(settings.analysis.recency_reference, RecencyReference::Filtered);
    }

    #[test]
    fn multi_character_delimiter_is_rejected() {
        let mut settings = Settings::default();
        settings.dataset.delimiter = "||".to_string();
        assert!(matches!(settings.validate(), Err(ConfigError::ValidationError(_))));
        settings.dataset.delimiter = String::new();
        assert!(settings.validate().is_err());
        settings.dataset.delimiter = "\t".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_row_limits_are_rejected() {
        let mut settings = Settings::default();
        settings.display.rfm_top_n = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("display.rfm_top_n"));
    }
}
