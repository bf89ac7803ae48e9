mod loader;
mod schema;

pub use loader::{config_path, load_config, load_or_default, save_config};
pub use schema::{Config, PlayerConfig, TmdbConfig};
