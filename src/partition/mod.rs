//! The integer-partition subsystem: recognising a sum-equality
//! constraint as a partition ([`design`]) and enumerating/counting it
//! specially rather than through the general constraint search
//! ([`enumerate`]).

pub mod design;
pub mod enumerate;

pub use design::{recognize, ConstraintType, PartDesign, PartDesignReport, PartitionType};
