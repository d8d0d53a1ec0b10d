use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How time-series summaries treat calendar buckets that contain no orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketFill {
    /// Every bucket between the first and the last occupied bucket is emitted;
    /// gaps carry zero orders and zero revenue.
    #[default]
    Dense,
    /// Only buckets that contain at least one order are emitted.
    Sparse,
}

/// Which "today" RFM recency is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecencyReference {
    /// The latest purchase date inside the filtered window.
    #[default]
    Filtered,
    /// The latest purchase date in the whole dataset, regardless of the filter.
    Dataset,
}

impl fmt::Display for BucketFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketFill::Dense => write!(f, "dense"),
            BucketFill::Sparse => write!(f, "sparse"),
        }
    }
}

impl fmt::Display for RecencyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecencyReference::Filtered => write!(f, "filtered"),
            RecencyReference::Dataset => write!(f, "dataset"),
        }
    }
}

impl FromStr for BucketFill {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" => Ok(BucketFill::Dense),
            "sparse" => Ok(BucketFill::Sparse),
            other => Err(CoreError::InvalidInput(
                "bucket fill".to_string(),
                format!("'{other}' is not one of dense, sparse"),
            )),
        }
    }
}

impl FromStr for RecencyReference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filtered" => Ok(RecencyReference::Filtered),
            "dataset" => Ok(RecencyReference::Dataset),
            other => Err(CoreError::InvalidInput(
                "recency reference".to_string(),
                format!("'{other}' is not one of filtered, dataset"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_use_lowercase_names() {
        let fill: BucketFill = serde_json::from_str("\"sparse\"").unwrap();
        assert_eq!(fill, BucketFill::Sparse);
        let reference: RecencyReference = serde_json::from_str("\"dataset\"").unwrap();
        assert_eq!(reference, RecencyReference::Dataset);
        assert_eq!(BucketFill::default().to_string(), "dense");
        assert_eq!(RecencyReference::default().to_string(), "filtered");
    }

    #[test]
    fn policies_parse_from_flags() {
        assert_eq!("Sparse".parse::<BucketFill>(), Ok(BucketFill::Sparse));
        assert_eq!(" dataset ".parse::<RecencyReference>(), Ok(RecencyReference::Dataset));
        assert!(matches!(
            "weekly".parse::<BucketFill>(),
            Err(CoreError::InvalidInput(..))
        ));
    }
}
