pub mod cancel;
pub mod config;
pub mod driver;
pub mod export;
pub mod format;
pub mod logging;
pub mod system;
pub mod thresholds;
