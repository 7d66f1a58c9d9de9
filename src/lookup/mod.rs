mod boundary;
mod postcode;

pub use boundary::BoundaryIndex;
pub use postcode::{PostcodeIndex, normalize_postcode};
