mod read;

pub use read::read_csv_bytes;
