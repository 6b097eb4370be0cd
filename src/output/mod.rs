//! Output naming, record writing and run-level artifacts.

mod missed;
mod naming;
pub mod progress;
mod types;
mod writer;

pub use missed::MissedStationLog;
pub use naming::{event_dir, record_file_name, station_glob};
pub use types::OutputRecord;
pub use writer::{RecordWriter, SacWriter};
