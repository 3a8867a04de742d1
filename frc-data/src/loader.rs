use std::collections::BTreeSet;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use frc_core::{FundRepository, NewIrrfBracket, RepositoryError};

/// Errors that can occur when loading IRRF bracket data.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the IRRF brackets CSV file.
///
/// Columns:
/// - `year`: base calendar year of the table (e.g., 2025)
/// - `min_value`: inclusive lower bound of the bracket
/// - `max_value`: inclusive upper bound (empty for the open top bracket)
/// - `rate`: rate applied to the full gross value, as a decimal fraction
/// - `deduction`: fixed amount subtracted after the rate multiplication
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub year: i32,
    pub min_value: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_value: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for IRRF bracket tables from CSV files.
///
/// Reads CSV data and writes it through the [`FundRepository`] trait, so it
/// works with any database backend.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type implementing `Read`, such as a file or a
    /// string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Load bracket records into the database.
    ///
    /// Each year present in the records has its existing table deleted before
    /// the new rows are inserted, so loading is idempotent: running the same
    /// load twice produces the same result.
    ///
    /// Returns the number of brackets inserted.
    pub async fn load(
        repo: &impl FundRepository,
        records: &[BracketRecord],
    ) -> Result<usize, BracketLoaderError> {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        for &year in &years {
            let removed = repo.delete_brackets_for_year(year).await?;
            if removed > 0 {
                info!(year, removed, "replacing existing bracket table");
            }
        }

        let mut inserted = 0;
        for record in records {
            repo.create_bracket(NewIrrfBracket {
                year: record.year,
                min_value: record.min_value,
                max_value: record.max_value,
                rate: record.rate,
                deduction: record.deduction,
            })
            .await?;
            inserted += 1;
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const SAMPLE_CSV: &str = "\
year,min_value,max_value,rate,deduction
2025,0,2259.20,0,0
2025,2259.21,2826.65,0.075,169.44
2025,2826.66,3751.05,0.15,381.44
2025,3751.06,4664.68,0.225,662.77
2025,4664.69,,0.275,896.00
";

    #[test]
    fn parses_complete_table() {
        let records = BracketLoader::parse(SAMPLE_CSV.as_bytes()).expect("Should parse CSV");

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].min_value, dec!(0));
        assert_eq!(records[0].max_value, Some(dec!(2259.20)));
        assert_eq!(records[1].rate, dec!(0.075));
        assert_eq!(records[1].deduction, dec!(169.44));
    }

    #[test]
    fn empty_max_value_becomes_open_top() {
        let records = BracketLoader::parse(SAMPLE_CSV.as_bytes()).expect("Should parse CSV");

        assert_eq!(records[4].max_value, None);
        assert_eq!(records[4].rate, dec!(0.275));
    }

    #[test]
    fn rejects_malformed_decimal() {
        let csv = "year,min_value,max_value,rate,deduction\n2025,abc,,0.1,0\n";

        let result = BracketLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(BracketLoaderError::CsvParse(_))));
    }

    #[test]
    fn header_only_csv_parses_to_no_records() {
        let csv = "year,min_value,max_value,rate,deduction\n";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Should parse CSV");

        assert!(records.is_empty());
    }
}
