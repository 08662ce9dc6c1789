pub mod attributes;
pub mod verdict;

pub use attributes::*;
pub use verdict::*;
