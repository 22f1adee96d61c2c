// Route table configuration

pub mod routes;
pub mod yml_settings;

pub use routes::{load_route_table, parse_route_table, DEFAULT_CONFIG_FILE};
pub use yml_settings::YmlSettings;
