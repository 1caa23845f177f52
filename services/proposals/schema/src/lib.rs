//! sea-orm entities for the proposals service.

pub mod proposals;
