pub mod verify_client;

pub use verify_client::{VerificationBackend, VerifyClient};
