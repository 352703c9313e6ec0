//! Core resolvers: formulary lookups, the two-tier medicine directory,
//! and the prescription extraction boundary.

pub mod directory;
pub mod extract;
pub mod formulary;
