mod client;
mod scheduler;

pub use client::StudyClient;
pub use scheduler::{SyncFault, SyncScheduler};
