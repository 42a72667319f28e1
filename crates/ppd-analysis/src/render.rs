//! Terminal tables for report output.
//!
//! Each report maps its rows onto a small `Tabled` row struct holding the
//! already-formatted cells; amounts and percentages go through the
//! `ppd_core::formatting` helpers.

use ppd_core::formatting::{format_number, format_percent_change, format_pounds, format_price};
use ppd_reports::comparison::{CohortComparison, CohortFilter};
use ppd_reports::extremes::CountyExtreme;
use ppd_reports::quarterly::QuarterlyDistrictTotal;
use ppd_reports::value_share::ValueShare;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

// ── Row shapes ────────────────────────────────────────────────────────────────

#[derive(Debug, Tabled)]
struct ExtremeRow {
    #[tabled(rename = "County")]
    county: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Postcode")]
    postcode: String,
    #[tabled(rename = "Type")]
    property_type: String,
    #[tabled(rename = "Town/City")]
    town_city: String,
}

#[derive(Debug, Tabled)]
struct DistrictRow {
    #[tabled(rename = "Quarter")]
    period: String,
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Sales")]
    sales: usize,
}

#[derive(Debug, Tabled)]
struct ValueShareRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Type")]
    property_type: String,
    #[tabled(rename = "Sales")]
    sales: usize,
    #[tabled(rename = "In top share")]
    in_top_share: usize,
    #[tabled(rename = "% of sales")]
    percent: String,
    #[tabled(rename = "Total value")]
    total_value: String,
}

#[derive(Debug, Tabled)]
struct BucketRow {
    #[tabled(rename = "Price range")]
    range: &'static str,
    #[tabled(rename = "Old sales")]
    old_count: usize,
    #[tabled(rename = "New sales")]
    new_count: usize,
    #[tabled(rename = "Change")]
    count_change: String,
    #[tabled(rename = "Old median")]
    old_median: String,
    #[tabled(rename = "New median")]
    new_median: String,
    #[tabled(rename = "Change")]
    median_change: String,
}

/// psql-style table with the given column indices right-aligned.
fn table<T: Tabled>(rows: Vec<T>, right_aligned: &[usize]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    for &column in right_aligned {
        table.with(Modify::new(Columns::single(column)).with(Alignment::right()));
    }
    format!("{table}\n")
}

// ── Reports ───────────────────────────────────────────────────────────────────

pub fn extremes(rows: &[CountyExtreme]) -> String {
    let rows = rows
        .iter()
        .map(|row| {
            let tx = &row.transaction;
            ExtremeRow {
                county: row.county.clone(),
                price: format_pounds(tx.price),
                date: tx.date_of_transfer.format("%Y-%m-%d").to_string(),
                postcode: tx.postcode.clone(),
                property_type: tx.property_type.label().to_string(),
                town_city: tx.town_city.clone(),
            }
        })
        .collect();
    table(rows, &[1])
}

pub fn top_districts(rows: &[QuarterlyDistrictTotal]) -> String {
    let rows = rows
        .iter()
        .map(|row| DistrictRow {
            period: row.period.clone(),
            rank: row.rank,
            district: row.district.clone(),
            total: format_pounds(row.total_price),
            sales: row.transactions,
        })
        .collect();
    table(rows, &[1, 3, 4])
}

pub fn value_share(rows: &[ValueShare], share_percent: u8) -> String {
    let rows = rows
        .iter()
        .map(|row| ValueShareRow {
            year: row.year,
            property_type: row.property_type.label().to_string(),
            sales: row.transactions,
            in_top_share: row.in_top_share,
            percent: format!("{}%", format_number(row.percent_in_top_share, 2)),
            total_value: format_pounds(row.total_value),
        })
        .collect();
    format!(
        "Sales making up the top {}% of value\n\n{}",
        share_percent,
        table(rows, &[2, 3, 4, 5])
    )
}

pub fn comparison(cmp: &CohortComparison, old: &CohortFilter, new: &CohortFilter) -> String {
    let rows = cmp
        .rows
        .iter()
        .map(|row| BucketRow {
            range: row.label,
            old_count: row.old.count,
            new_count: row.new.count,
            count_change: format_percent_change(row.count_pct_diff),
            old_median: format_price(row.old.median),
            new_median: format_price(row.new.median),
            median_change: format_percent_change(row.median_pct_diff),
        })
        .collect();
    format!(
        "Old: {}\nNew: {}\n\n{}",
        old.describe(),
        new.describe(),
        table(rows, &[1, 2, 3, 4, 5, 6])
    )
}
