//! Feature groups. Each computes a fixed number of slots and fails as a
//! unit; the processor substitutes that group's defaults on error.

pub mod derived;
pub mod device;
pub mod historical;
pub mod preference;
pub mod temporal;
