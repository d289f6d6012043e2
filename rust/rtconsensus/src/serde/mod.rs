mod record_table;

pub use record_table::{
    REQUIRED_COLUMNS,
    canonical_column,
    delimiter_for_path,
    missing_columns,
    read_record_table,
    read_record_table_from_reader,
    write_record_table,
    write_record_table_to_writer,
};
