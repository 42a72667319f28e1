//! CSV ingestion of the raw Price Paid Data files.
//!
//! The published files have no header row and a fixed positional layout of
//! 15 columns, with a 16th `Record_status` column when the file carries
//! monthly-update statuses.

use std::io::Read;
use std::path::{Path, PathBuf};

use ppd_core::error::{PpdError, Result};
use ppd_core::models::{PpdCategory, PropertyType, RecordStatus, Tenure, Transaction};
use ppd_core::time_utils::parse_transfer_date;
use tracing::{debug, warn};

// ── Schema ────────────────────────────────────────────────────────────────────

/// Column names in positional order, as documented for the PPD download.
pub const COLUMNS: [&str; 16] = [
    "UID",
    "Price",
    "Date_of_transfer",
    "Postcode",
    "Property_type",
    "Old_or_new",
    "Duration",
    "PAON",
    "SAON",
    "Street",
    "Locality",
    "Town_city",
    "District",
    "County",
    "PPD_cat",
    "Record_status",
];

/// Layout options for raw files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestConfig {
    /// Expect the trailing `Record_status` column of monthly update files.
    pub expect_record_status: bool,
}

impl IngestConfig {
    /// Number of columns every record must have.
    pub fn expected_columns(&self) -> usize {
        if self.expect_record_status {
            COLUMNS.len()
        } else {
            COLUMNS.len() - 1
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_path`, sorted by path.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every transaction from `path`, which is either a single CSV file or
/// a directory searched recursively for CSV files.
///
/// Files are read in path order and their records concatenated. The first
/// schema violation aborts the whole load.
pub fn load_transactions(path: &Path, config: &IngestConfig) -> Result<Vec<Transaction>> {
    if !path.exists() {
        return Err(PpdError::DataPathNotFound(path.to_path_buf()));
    }

    let files = if path.is_dir() {
        let files = find_csv_files(path);
        if files.is_empty() {
            return Err(PpdError::NoDataFiles(path.to_path_buf()));
        }
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut all = Vec::new();
    for file_path in &files {
        let file = std::fs::File::open(file_path).map_err(|source| PpdError::FileRead {
            path: file_path.clone(),
            source,
        })?;
        let transactions = read_transactions(std::io::BufReader::new(file), config)?;
        debug!(
            "File {}: {} transactions",
            file_path.display(),
            transactions.len()
        );
        all.extend(transactions);
    }

    debug!("Loaded {} transactions from {} files", all.len(), files.len());
    Ok(all)
}

/// Parse headerless PPD CSV from `reader`.
pub fn read_transactions<R: Read>(reader: R, config: &IngestConfig) -> Result<Vec<Transaction>> {
    // `flexible` so that a short or long row reaches `parse_record` and is
    // reported with its line number rather than as a generic CSV error.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut transactions = Vec::new();
    let mut record = csv::StringRecord::new();
    while rdr.read_record(&mut record)? {
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        transactions.push(parse_record(&record, config)?);
    }
    Ok(transactions)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Convert one positional record into a [`Transaction`].
fn parse_record(record: &csv::StringRecord, config: &IngestConfig) -> Result<Transaction> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let expected = config.expected_columns();
    if record.len() != expected {
        return Err(PpdError::ColumnCount {
            line,
            expected,
            found: record.len(),
        });
    }

    let text = |idx: usize| record[idx].trim().to_string();
    let invalid = |idx: usize| PpdError::InvalidField {
        line,
        column: COLUMNS[idx],
        value: record[idx].to_string(),
    };

    let price = record[1].trim().parse::<u64>().map_err(|_| invalid(1))?;
    let date_of_transfer = parse_transfer_date(&record[2]).ok_or_else(|| invalid(2))?;
    let property_type = PropertyType::from_code(&record[4]).ok_or_else(|| invalid(4))?;
    let is_new_build = match record[5].trim() {
        "Y" => true,
        "N" => false,
        _ => return Err(invalid(5)),
    };
    let tenure = Tenure::from_code(&record[6]).ok_or_else(|| invalid(6))?;
    let category = PpdCategory::from_code(&record[14]).ok_or_else(|| invalid(14))?;
    let record_status = if config.expect_record_status {
        Some(RecordStatus::from_code(&record[15]).ok_or_else(|| invalid(15))?)
    } else {
        None
    };

    Ok(Transaction {
        uid: text(0),
        price,
        date_of_transfer,
        postcode: text(3),
        property_type,
        is_new_build,
        tenure,
        paon: text(7),
        saon: text(8),
        street: text(9),
        locality: text(10),
        town_city: text(11),
        district: text(12),
        county: text(13),
        category,
        record_status,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    const ROW_BATH: &str = r#""{A1B2C3D4-0001-0000-0000-000000000001}","425000","2023-01-27 00:00","BA1 1LT","T","N","F","12","","GAY STREET","","BATH","BATH AND NORTH EAST SOMERSET","BATH AND NORTH EAST SOMERSET","A""#;
    const ROW_BEDFORD: &str = r#""{A1B2C3D4-0002-0000-0000-000000000002}","310000","2023-05-02 00:00","MK40 2AB","F","Y","L","FLAT 3","THE COURT","HIGH STREET","","BEDFORD","BEDFORD","BEDFORD","B""#;

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn read_str(data: &str, config: &IngestConfig) -> Result<Vec<Transaction>> {
        read_transactions(data.as_bytes(), config)
    }

    // ── read_transactions ─────────────────────────────────────────────────────

    #[test]
    fn test_read_standard_rows() {
        let data = format!("{ROW_BATH}\n{ROW_BEDFORD}\n");
        let txs = read_str(&data, &IngestConfig::default()).unwrap();

        assert_eq!(txs.len(), 2);
        let bath = &txs[0];
        assert_eq!(bath.uid, "{A1B2C3D4-0001-0000-0000-000000000001}");
        assert_eq!(bath.price, 425_000);
        assert_eq!(
            bath.date_of_transfer,
            NaiveDate::from_ymd_opt(2023, 1, 27).unwrap()
        );
        assert_eq!(bath.postcode, "BA1 1LT");
        assert_eq!(bath.property_type, PropertyType::Terraced);
        assert!(!bath.is_new_build);
        assert_eq!(bath.tenure, Tenure::Freehold);
        assert_eq!(bath.street, "GAY STREET");
        assert_eq!(bath.town_city, "BATH");
        assert_eq!(bath.category, PpdCategory::Standard);
        assert_eq!(bath.record_status, None);

        let bedford = &txs[1];
        assert_eq!(bedford.property_type, PropertyType::Flat);
        assert!(bedford.is_new_build);
        assert_eq!(bedford.tenure, Tenure::Leasehold);
        assert_eq!(bedford.saon, "THE COURT");
        assert_eq!(bedford.category, PpdCategory::Additional);
    }

    #[test]
    fn test_read_monthly_update_rows() {
        let data = format!("{ROW_BATH},\"D\"\n");
        let config = IngestConfig {
            expect_record_status: true,
        };
        let txs = read_str(&data, &config).unwrap();
        assert_eq!(txs[0].record_status, Some(RecordStatus::Deleted));
    }

    #[test]
    fn test_missing_record_status_column_is_fatal() {
        let config = IngestConfig {
            expect_record_status: true,
        };
        let err = read_str(ROW_BATH, &config).unwrap_err();
        assert!(matches!(
            err,
            PpdError::ColumnCount {
                line: 1,
                expected: 16,
                found: 15
            }
        ));
    }

    #[test]
    fn test_wrong_column_count_reports_line() {
        let data = format!("{ROW_BATH}\n\"x\",\"1\"\n");
        let err = read_str(&data, &IngestConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PpdError::ColumnCount {
                line: 2,
                expected: 15,
                found: 2
            }
        ));
    }

    #[test]
    fn test_invalid_price_is_fatal() {
        let data = ROW_BATH.replace("\"425000\"", "\"-5\"");
        let err = read_str(&data, &IngestConfig::default()).unwrap_err();
        match err {
            PpdError::InvalidField { column, value, .. } => {
                assert_eq!(column, "Price");
                assert_eq!(value, "-5");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_codes_are_fatal() {
        let bad_type = ROW_BATH.replace(",\"T\",", ",\"X\",");
        let err = read_str(&bad_type, &IngestConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PpdError::InvalidField {
                column: "Property_type",
                ..
            }
        ));

        let bad_date = ROW_BATH.replace("2023-01-27 00:00", "27/01/2023");
        let err = read_str(&bad_date, &IngestConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PpdError::InvalidField {
                column: "Date_of_transfer",
                ..
            }
        ));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let data = format!("{ROW_BATH}\n\n{ROW_BEDFORD}\n");
        let txs = read_str(&data, &IngestConfig::default()).unwrap();
        assert_eq!(txs.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let txs = read_str("", &IngestConfig::default()).unwrap();
        assert!(txs.is_empty());
    }

    // ── find_csv_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_csv_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("2022");
        std::fs::create_dir_all(&sub).unwrap();
        write_csv(dir.path(), "pp-2023.csv", &[ROW_BATH]);
        write_csv(&sub, "pp-2022.csv", &[ROW_BATH]);
        write_csv(dir.path(), "notes.txt", &["not data"]);

        let files = find_csv_files(dir.path());
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["pp-2022.csv", "pp-2023.csv"]);
    }

    #[test]
    fn test_find_csv_files_nonexistent_path() {
        let files = find_csv_files(Path::new("/tmp/does-not-exist-ppd-test-xyz"));
        assert!(files.is_empty());
    }

    // ── load_transactions ─────────────────────────────────────────────────────

    #[test]
    fn test_load_single_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "pp.csv", &[ROW_BATH, ROW_BEDFORD]);

        let txs = load_transactions(&path, &IngestConfig::default()).unwrap();
        assert_eq!(txs.len(), 2);
    }

    #[test]
    fn test_load_directory_concatenates_in_path_order() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "b.csv", &[ROW_BEDFORD]);
        write_csv(dir.path(), "a.csv", &[ROW_BATH]);

        let txs = load_transactions(dir.path(), &IngestConfig::default()).unwrap();
        let towns: Vec<&str> = txs.iter().map(|t| t.town_city.as_str()).collect();
        assert_eq!(towns, vec!["BATH", "BEDFORD"]);
    }

    #[test]
    fn test_load_missing_path() {
        let err = load_transactions(
            Path::new("/tmp/does-not-exist-ppd-test-xyz"),
            &IngestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PpdError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_directory_without_csv() {
        let dir = TempDir::new().unwrap();
        let err = load_transactions(dir.path(), &IngestConfig::default()).unwrap_err();
        assert!(matches!(err, PpdError::NoDataFiles(_)));
    }
}
