pub mod observation;
pub mod verdict;

pub use observation::*;
pub use verdict::*;
