//! Processing pipeline components.

mod coordinator;
mod enrich;
mod locator;
mod processor;
mod window;

pub use coordinator::{
    EventSummary, EventTask, ProcessCheck, RunContext, RunSummary, process_event, run_events,
    should_process,
};
pub use enrich::build_header;
pub use locator::{
    DayListing, EventListings, StationFileDescriptor, list_day_folder, locate_event_files,
};
pub use processor::{ProcessResult, process_station};
pub use window::TimeWindow;
