//! Report-generation identity codec.
//!
//! One render of one CI run is identified by the triple of commit hash,
//! pipeline run id, and the millisecond timestamp captured at the start of
//! execution. The triple as a whole is the unique key (the timestamp exists
//! to disambiguate re-runs that share a run id); its encoded form names the
//! report directory on disk, and the timestamp is the sort key for picking
//! the most recent generation.

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// Field delimiter for encoded identifiers. None of the three fields may
/// contain it; pipeline-supplied hashes and run ids satisfy this by
/// construction and no validation is performed on encode.
const SEPARATOR: char = '_';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportId {
    pub git_hash: String,
    pub run_id: String,
    pub run_timestamp: u128,
}

impl ReportId {
    pub fn new(git_hash: String, run_id: String, run_timestamp: u128) -> Self {
        Self {
            git_hash,
            run_id,
            run_timestamp,
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.git_hash, self.run_id, self.run_timestamp
        )
    }
}

impl FromStr for ReportId {
    type Err = anyhow::Error;

    /// Decodes a directory name back into its three fields. A name that does
    /// not split into exactly three parts, or whose third part is not an
    /// integer, is an explicit error; callers listing the destination tree
    /// skip such entries instead of letting a garbage timestamp participate
    /// in sorting.
    fn from_str(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split(SEPARATOR).collect();
        let [git_hash, run_id, timestamp] = parts.as_slice() else {
            return Err(anyhow!(
                "expected <hash>_<run>_<timestamp>, got {name:?}"
            ));
        };
        let run_timestamp = timestamp
            .parse::<u128>()
            .map_err(|_| anyhow!("invalid run timestamp in {name:?}"))?;
        Ok(Self {
            git_hash: (*git_hash).to_string(),
            run_id: (*run_id).to_string(),
            run_timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_encoded_identifiers() {
        let id = ReportId::new("2f9c01d".to_string(), "4412".to_string(), 1_714_003_200_123);
        let decoded: ReportId = id.to_string().parse().expect("decode");
        assert_eq!(decoded, id);
    }

    #[test]
    fn encodes_with_underscore_separator() {
        let id = ReportId::new("abc".to_string(), "7".to_string(), 100);
        assert_eq!(id.to_string(), "abc_7_100");
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!("abc_7".parse::<ReportId>().is_err());
        assert!("a_b_c_100".parse::<ReportId>().is_err());
        assert!("history".parse::<ReportId>().is_err());
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        assert!("abc_7_latest".parse::<ReportId>().is_err());
    }
}
