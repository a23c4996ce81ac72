//! Type definitions shared across Brokkr crates

mod provision_types;
mod resource_types;

pub use provision_types::*;
pub use resource_types::*;
