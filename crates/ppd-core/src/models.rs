use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time_utils::Quarter;

/// Declares a single-letter PPD code enum with `code()` / `from_code()`.
macro_rules! ppd_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $code:literal, $label:literal;)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The single-letter code used in the published files.
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Parse the single-letter code; surrounding whitespace is ignored.
            pub fn from_code(code: &str) -> Option<Self> {
                match code.trim() {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Human-readable name.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

ppd_code_enum! {
    /// Property type of the sale.
    PropertyType {
        Detached => "D", "Detached";
        SemiDetached => "S", "Semi-Detached";
        Terraced => "T", "Terraced";
        /// Flats and maisonettes.
        Flat => "F", "Flat";
        Other => "O", "Other";
    }
}

ppd_code_enum! {
    /// Tenure (the `Duration` column).
    Tenure {
        Freehold => "F", "Freehold";
        Leasehold => "L", "Leasehold";
        Unknown => "U", "Unknown";
    }
}

ppd_code_enum! {
    /// Price Paid Data category.
    PpdCategory {
        /// Standard entry: full market value residential sale.
        Standard => "A", "Standard";
        /// Additional entry: repossessions, buy-to-lets, transfers to non-private individuals.
        Additional => "B", "Additional";
    }
}

ppd_code_enum! {
    /// Monthly-update record status; only present in monthly change files.
    RecordStatus {
        Added => "A", "Added";
        Changed => "C", "Changed";
        Deleted => "D", "Deleted";
    }
}

/// A single sale from the Price Paid Data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction unique identifier.
    pub uid: String,
    /// Sale price in whole pounds.
    pub price: u64,
    /// Completion date as stated on the transfer deed.
    pub date_of_transfer: NaiveDate,
    /// Full postcode, e.g. `"BA1 1LT"`; empty when unknown.
    pub postcode: String,
    pub property_type: PropertyType,
    /// `true` for a newly built property (`Old_or_new == "Y"`).
    pub is_new_build: bool,
    pub tenure: Tenure,
    /// Primary addressable object name, typically the house number or name.
    pub paon: String,
    /// Secondary addressable object name, e.g. the flat within a building.
    pub saon: String,
    pub street: String,
    pub locality: String,
    pub town_city: String,
    /// Local authority district as published. Reports that group by
    /// district derive it from the postcode instead.
    pub district: String,
    pub county: String,
    pub category: PpdCategory,
    pub record_status: Option<RecordStatus>,
}

impl Transaction {
    /// Calendar year of the transfer.
    pub fn year(&self) -> i32 {
        self.date_of_transfer.year()
    }

    /// Calendar quarter of the transfer.
    pub fn quarter(&self) -> Quarter {
        Quarter::from_date(self.date_of_transfer)
    }

    /// Outward code of the postcode (the part before the first space),
    /// e.g. `"BA1"` for `"BA1 1LT"`. `None` when the postcode is blank.
    pub fn postcode_district(&self) -> Option<&str> {
        self.postcode.split_whitespace().next()
    }
}
