mod read;

pub use read::read_geoparquet_bytes;
