//! Value coercion and display helpers shared by the model, compute and
//! frontend crates.
//!
//! Form input and backend rows both arrive as loosely typed text/JSON; the
//! converters here are the single place where those become `Decimal`s and
//! where `Decimal`s become display strings.

pub mod converters;

pub use converters::{
    amount_from_json, format_compact_thousands, format_date, format_money, parse_amount,
    parse_amount_strict,
};
