//! Small tokio actor runtime plus the fact-check worker that runs on it.
pub mod actor;
pub mod builder;
pub mod fact_check;
pub mod registry;
pub mod system;

pub use fact_check::{CheckCmd, CheckReply, FactCheckActor};
