mod interval;
mod meter;
mod reading;

pub use interval::IntervalConsumption;
pub use meter::Meter;
pub use reading::{Reading, ReadingError};

pub(crate) use interval::hours_between;
pub(crate) use meter::display_name;
