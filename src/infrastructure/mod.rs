pub mod progress_tracker;

pub use progress_tracker::{checkpoint, ProgressTracker};
