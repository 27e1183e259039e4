mod read;
mod write;

pub use read::{read_records_file, read_records_geojson};
