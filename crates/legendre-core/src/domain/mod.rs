pub mod errors;

pub use errors::{LegendreError, LegendreErrorCategory, LegendreResult};
