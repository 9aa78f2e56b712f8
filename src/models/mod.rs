pub mod input_file;
pub mod loaders;
pub mod progress;
pub mod report;
pub mod verification;

pub use input_file::{ContentFormat, InputFile};
pub use loaders::load_input_files;
pub use progress::{FileProgress, FileStatus};
pub use report::{BatchReport, FileFailure, ReportSummary};
pub use verification::{
    BatchSummary, BatchVerifyRequest, BatchVerifyResponse, HealthStatus, LayerResult,
    VerificationLayers, VerificationResult, VerificationStatus, VerificationUnit,
};
