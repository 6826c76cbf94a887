pub mod finding;
pub mod performance;
pub mod comparison;
pub mod benchmark;
pub mod contract;

pub use finding::*;
pub use performance::*;
pub use comparison::*;
pub use benchmark::*;
pub use contract::*;
