//! Configuration module for taskenv
//!
//! Provides XDG-compliant layered configuration loading and template
//! interpolation for literal variable values.

pub mod interpolate;
pub mod loader;
pub mod model;

pub use interpolate::{interpolate_env_vars, render_template};
pub use loader::{config_paths, find_config_files, load_config};
pub use model::*;
