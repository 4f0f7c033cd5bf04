pub mod error;
pub mod local;
pub mod remote;
pub mod store;
pub mod telemetry;
