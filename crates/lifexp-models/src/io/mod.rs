//! Dataset readers.
pub mod table_csv;

pub use table_csv::{read_table, read_table_with_config, TableReaderConfig};
