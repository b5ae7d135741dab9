pub mod chart;
pub mod enums;
pub mod render;

pub use chart::*;
pub use enums::*;
