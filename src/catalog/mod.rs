//! Event catalog and station inventory loading.

mod events;
mod stations;

pub use events::{EventRecord, load_catalog, parse_catalog};
pub use stations::{
    StationInventory, StationKey, StationRecord, resolve_inventory_path,
};
