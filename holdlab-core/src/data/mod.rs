//! Holdings dataset I/O

pub mod csv_io;

pub use csv_io::{
    holdings_to_csv_string, read_holdings_csv, read_holdings_csv_path, write_holdings_csv,
    write_records_csv, CoercedCell, CsvIngest, IngestError,
};
