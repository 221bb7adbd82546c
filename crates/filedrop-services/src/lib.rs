//! Filedrop services
//!
//! The two long-lived services built on top of core policy and storage:
//! upload intake orchestration and the retention sweeper.

pub mod intake;
pub mod retention;

pub use intake::{IntakeService, UploadReceipt, UploadRequest};
pub use retention::{RetentionSweeper, SweepStats};
