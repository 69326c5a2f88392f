//! Batch processing of one camera directory
//!
//! Reads the screened image list, runs the per-image pipeline over every
//! row and writes one output row per input row, in input order.

mod driver;
mod table;


pub use driver::{BatchDriver, BatchOptions, BatchSummary};
pub use table::{
    discover_input_table, output_table_path, read_input_table, write_output_table, ImageResult,
    InputRow, INPUT_TABLE_PREFIX, OUTPUT_HEADER,
};
