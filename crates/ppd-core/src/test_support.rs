//! `Transaction` fixtures shared by the workspace's tests.

use chrono::NaiveDate;

use crate::models::{PpdCategory, PropertyType, RecordStatus, Tenure, Transaction};

/// Transaction with the given price and `YYYY-MM-DD` date; other columns get
/// fixed values that individual tests override with the helpers below.
pub fn transaction(uid: &str, price: u64, date: &str) -> Transaction {
    Transaction {
        uid: uid.to_string(),
        price,
        date_of_transfer: NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .expect("fixture dates are YYYY-MM-DD"),
        postcode: "BA1 1LT".to_string(),
        property_type: PropertyType::Terraced,
        is_new_build: false,
        tenure: Tenure::Freehold,
        paon: "1".to_string(),
        saon: String::new(),
        street: "HIGH STREET".to_string(),
        locality: String::new(),
        town_city: "BATH".to_string(),
        district: "BATH AND NORTH EAST SOMERSET".to_string(),
        county: "BATH AND NORTH EAST SOMERSET".to_string(),
        category: PpdCategory::Standard,
        record_status: None,
    }
}

pub fn in_county(mut tx: Transaction, county: &str) -> Transaction {
    tx.county = county.to_string();
    tx
}

pub fn at_postcode(mut tx: Transaction, postcode: &str) -> Transaction {
    tx.postcode = postcode.to_string();
    tx
}

pub fn of_type(mut tx: Transaction, property_type: PropertyType) -> Transaction {
    tx.property_type = property_type;
    tx
}

pub fn with_status(mut tx: Transaction, status: RecordStatus) -> Transaction {
    tx.record_status = Some(status);
    tx
}
