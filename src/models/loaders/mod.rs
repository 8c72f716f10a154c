pub mod toml_loader;

pub use toml_loader::{load_setup_file, parse_setup};
