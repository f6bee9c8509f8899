pub mod track;
pub mod vessel;

pub use track::{TrackPoint, TrackRecorder, BREADCRUMB_CAPACITY};
pub use vessel::{normalize_heading, Vessel, VesselConfig};
