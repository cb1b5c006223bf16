//! Station catalog.
//!
//! A static, ordered collection of live stations partitioned by region,
//! plus the fallback address table consulted when a stream fails.

pub mod fallback;
pub mod station;
pub mod stations;

pub use {
    fallback::FallbackTable,
    station::{Station, StationCategory, StationId},
    stations::Catalog,
};
