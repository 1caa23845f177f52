//! Plumbing shared by Proposta services.

pub mod middleware;
pub mod serde;
pub mod tracing;
