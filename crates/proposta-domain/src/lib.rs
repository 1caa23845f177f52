//! Proposal domain types: identifiers, the status lifecycle and validity dates.
//!
//! Pure types with no framework dependencies.

pub mod id;
pub mod status;
pub mod validity;
