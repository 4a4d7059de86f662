pub mod decimal;
pub mod logging;

pub use decimal::parse_decimal;
