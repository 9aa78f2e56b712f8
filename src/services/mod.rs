pub mod extractor;
pub mod report;

pub use extractor::UnitExtractor;
pub use report::{build_report, export_csv};
