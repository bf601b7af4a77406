//! Value conversion between form values and their textual form
//!
//! - `codec`: per-type `to_external` / `to_internal` rules
//! - `dates`: explicit date parsing and formatting

pub mod codec;
pub mod dates;

pub use codec::{ColumnCodec, decode_record, encode_record};
pub use dates::{DateParseError, format_date, format_date_time, parse_day, parse_day_str};
