pub mod digits;
pub mod set;

pub use digits::*;
pub use set::*;
