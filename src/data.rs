mod config_ort;
mod filesystem_access;
mod time_calc;
pub mod send_channels;

pub use config_ort::ConfigOrt;
pub use filesystem_access::FsAccess;
pub use send_channels::RequestToken;
pub use time_calc::TimeCalc;

pub(crate) const CROSS_MARK: &str = "❌";
