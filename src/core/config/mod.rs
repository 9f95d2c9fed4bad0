pub mod data;
pub mod defaults;
pub mod io;
pub mod printing;

pub use data::Config;
pub use io::{config_path, data_dir, ConfigError};
