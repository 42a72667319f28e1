//! Columnar snapshot of a transaction collection.
//!
//! Snapshots are Arrow IPC files (the Feather v2 format), produced once from
//! the raw CSV so later runs can skip CSV parsing. One row per transaction;
//! categorical columns hold the single-letter PPD codes.
//!
//! Schema:
//! - `uid`, `postcode`, `paon`, `saon`, `street`, `locality`, `town_city`,
//!   `district`, `county` (Utf8)
//! - `price` (UInt64)
//! - `date_of_transfer` (Date32)
//! - `property_type`, `tenure`, `ppd_category` (Utf8 code)
//! - `is_new_build` (Boolean)
//! - `record_status` (Utf8 code, nullable)

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Date32Array, StringArray, UInt64Array,
};
use arrow::datatypes::{DataType, Date32Type, Field, Schema, SchemaRef, UInt64Type};
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use ppd_core::models::{PpdCategory, PropertyType, RecordStatus, Tenure, Transaction};
use tracing::debug;

/// Rows per record batch when writing.
const BATCH_ROWS: usize = 64 * 1024;

/// Error type for snapshot read/write.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column '{col}' has wrong type: expected {expected}, got {actual}")]
    WrongType {
        col: String,
        expected: String,
        actual: String,
    },

    #[error("column '{col}' row {row}: invalid value {value:?}")]
    InvalidValue {
        col: String,
        row: usize,
        value: String,
    },
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// The snapshot schema.
pub fn snapshot_schema() -> SchemaRef {
    let utf8 = |name: &str| Field::new(name, DataType::Utf8, false);
    Arc::new(Schema::new(vec![
        utf8("uid"),
        Field::new("price", DataType::UInt64, false),
        Field::new("date_of_transfer", DataType::Date32, false),
        utf8("postcode"),
        utf8("property_type"),
        Field::new("is_new_build", DataType::Boolean, false),
        utf8("tenure"),
        utf8("paon"),
        utf8("saon"),
        utf8("street"),
        utf8("locality"),
        utf8("town_city"),
        utf8("district"),
        utf8("county"),
        utf8("ppd_category"),
        Field::new("record_status", DataType::Utf8, true),
    ]))
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

// ── Export ────────────────────────────────────────────────────────────────────

/// Build one record batch holding `transactions`.
pub fn transactions_to_record_batch(
    transactions: &[Transaction],
) -> Result<RecordBatch, SnapshotError> {
    let strings = |f: fn(&Transaction) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(transactions.iter().map(f)))
    };

    let epoch = epoch();
    let prices = UInt64Array::from_iter_values(transactions.iter().map(|t| t.price));
    let dates = Date32Array::from_iter_values(
        transactions
            .iter()
            .map(|t| (t.date_of_transfer - epoch).num_days() as i32),
    );
    let new_build = BooleanArray::from(
        transactions
            .iter()
            .map(|t| t.is_new_build)
            .collect::<Vec<_>>(),
    );
    let status: StringArray = transactions
        .iter()
        .map(|t| t.record_status.map(|s| s.code()))
        .collect();

    let columns: Vec<ArrayRef> = vec![
        strings(|t| &t.uid),
        Arc::new(prices),
        Arc::new(dates),
        strings(|t| &t.postcode),
        strings(|t| t.property_type.code()),
        Arc::new(new_build),
        strings(|t| t.tenure.code()),
        strings(|t| &t.paon),
        strings(|t| &t.saon),
        strings(|t| &t.street),
        strings(|t| &t.locality),
        strings(|t| &t.town_city),
        strings(|t| &t.district),
        strings(|t| &t.county),
        strings(|t| t.category.code()),
        Arc::new(status),
    ];

    Ok(RecordBatch::try_new(snapshot_schema(), columns)?)
}

/// Write `transactions` as an Arrow IPC file to `writer`.
pub fn write_snapshot_to<W: Write>(
    writer: W,
    transactions: &[Transaction],
) -> Result<(), SnapshotError> {
    let schema = snapshot_schema();
    let mut writer = FileWriter::try_new(writer, &schema)?;
    for chunk in transactions.chunks(BATCH_ROWS) {
        writer.write(&transactions_to_record_batch(chunk)?)?;
    }
    writer.finish()?;
    Ok(())
}

/// Write `transactions` to a snapshot file at `path`.
pub fn write_snapshot(path: &Path, transactions: &[Transaction]) -> Result<(), SnapshotError> {
    let file = File::create(path)?;
    let mut buf = BufWriter::new(file);
    write_snapshot_to(&mut buf, transactions)?;
    buf.flush()?;
    debug!(
        "Wrote {} transactions to snapshot {}",
        transactions.len(),
        path.display()
    );
    Ok(())
}

/// Write `transactions` to snapshot bytes in memory.
pub fn write_snapshot_bytes(transactions: &[Transaction]) -> Result<Vec<u8>, SnapshotError> {
    let mut buf = Vec::new();
    write_snapshot_to(&mut buf, transactions)?;
    Ok(buf)
}

// ── Import ────────────────────────────────────────────────────────────────────

/// Read every transaction from an Arrow IPC file.
pub fn read_snapshot_from<R: Read + Seek>(reader: R) -> Result<Vec<Transaction>, SnapshotError> {
    let reader = FileReader::try_new(reader, None)?;
    let batches: Result<Vec<_>, _> = reader.collect();
    transactions_from_record_batches(&batches?)
}

/// Read a snapshot file written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<Vec<Transaction>, SnapshotError> {
    let file = File::open(path)?;
    let transactions = read_snapshot_from(BufReader::new(file))?;
    debug!(
        "Read {} transactions from snapshot {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

/// Read snapshot bytes produced by [`write_snapshot_bytes`].
pub fn read_snapshot_bytes(data: &[u8]) -> Result<Vec<Transaction>, SnapshotError> {
    read_snapshot_from(Cursor::new(data))
}

/// Convert record batches with the snapshot schema back into transactions.
pub fn transactions_from_record_batches(
    batches: &[RecordBatch],
) -> Result<Vec<Transaction>, SnapshotError> {
    let mut transactions = Vec::with_capacity(batches.iter().map(|b| b.num_rows()).sum());
    for batch in batches {
        extract_rows(batch, &mut transactions)?;
    }
    Ok(transactions)
}

/// Append the rows of one batch to `out`.
fn extract_rows(batch: &RecordBatch, out: &mut Vec<Transaction>) -> Result<(), SnapshotError> {
    let uid = string_column(batch, "uid")?;
    let price = required_column(batch, "price", &DataType::UInt64)?.as_primitive::<UInt64Type>();
    let date = required_column(batch, "date_of_transfer", &DataType::Date32)?
        .as_primitive::<Date32Type>();
    let postcode = string_column(batch, "postcode")?;
    let property_type = string_column(batch, "property_type")?;
    let new_build = required_column(batch, "is_new_build", &DataType::Boolean)?.as_boolean();
    let tenure = string_column(batch, "tenure")?;
    let paon = string_column(batch, "paon")?;
    let saon = string_column(batch, "saon")?;
    let street = string_column(batch, "street")?;
    let locality = string_column(batch, "locality")?;
    let town_city = string_column(batch, "town_city")?;
    let district = string_column(batch, "district")?;
    let county = string_column(batch, "county")?;
    let category = string_column(batch, "ppd_category")?;
    let status = column(batch, "record_status", &DataType::Utf8)?.as_string::<i32>();

    let epoch = epoch();
    for row in 0..batch.num_rows() {
        let invalid = |col: &str, value: String| SnapshotError::InvalidValue {
            col: col.to_string(),
            row,
            value,
        };

        let days = date.value(row);
        let date_of_transfer = epoch
            .checked_add_signed(chrono::Duration::days(i64::from(days)))
            .ok_or_else(|| invalid("date_of_transfer", days.to_string()))?;
        let record_status = if status.is_null(row) {
            None
        } else {
            let code = status.value(row);
            Some(
                RecordStatus::from_code(code)
                    .ok_or_else(|| invalid("record_status", code.to_string()))?,
            )
        };

        out.push(Transaction {
            uid: uid.value(row).to_string(),
            price: price.value(row),
            date_of_transfer,
            postcode: postcode.value(row).to_string(),
            property_type: PropertyType::from_code(property_type.value(row))
                .ok_or_else(|| invalid("property_type", property_type.value(row).to_string()))?,
            is_new_build: new_build.value(row),
            tenure: Tenure::from_code(tenure.value(row))
                .ok_or_else(|| invalid("tenure", tenure.value(row).to_string()))?,
            paon: paon.value(row).to_string(),
            saon: saon.value(row).to_string(),
            street: street.value(row).to_string(),
            locality: locality.value(row).to_string(),
            town_city: town_city.value(row).to_string(),
            district: district.value(row).to_string(),
            county: county.value(row).to_string(),
            category: PpdCategory::from_code(category.value(row))
                .ok_or_else(|| invalid("ppd_category", category.value(row).to_string()))?,
            record_status,
        });
    }
    Ok(())
}

/// Look up `name` and check its type.
fn column<'a>(
    batch: &'a RecordBatch,
    name: &str,
    expected: &DataType,
) -> Result<&'a ArrayRef, SnapshotError> {
    let array = batch
        .column_by_name(name)
        .ok_or_else(|| SnapshotError::MissingColumn(name.to_string()))?;
    if array.data_type() != expected {
        return Err(SnapshotError::WrongType {
            col: name.to_string(),
            expected: format!("{expected:?}"),
            actual: format!("{:?}", array.data_type()),
        });
    }
    Ok(array)
}

/// Like [`column`], but nulls are rejected.
fn required_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
    expected: &DataType,
) -> Result<&'a ArrayRef, SnapshotError> {
    let array = column(batch, name, expected)?;
    if array.null_count() > 0 {
        let row = (0..array.len()).find(|&i| array.is_null(i)).unwrap_or(0);
        return Err(SnapshotError::InvalidValue {
            col: name.to_string(),
            row,
            value: "null".to_string(),
        });
    }
    Ok(array)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, SnapshotError> {
    Ok(required_column(batch, name, &DataType::Utf8)?.as_string::<i32>())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
