pub mod bar;
pub mod campaign;
pub mod period;
pub mod trend;

pub use bar::{Bar, BarSeries};
pub use campaign::*;
pub use period::Period;
pub use trend::*;
