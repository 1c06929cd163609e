pub mod bmi;
pub mod input;
pub mod risk;

pub use bmi::*;
pub use input::*;
pub use risk::*;
