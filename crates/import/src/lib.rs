pub mod csv;

pub use csv::{parse_csv, parse_file, ParseError};
