//! File formats for records and corridors.
//!
//! - `geojson` - record loading and corridor export

mod geojson;

pub use geojson::{read_records_file, read_records_geojson};
