//! Configuration module for statement review
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Built-in taxonomy and starter rules

pub mod defaults;
pub mod paths;
pub mod settings;

pub use paths::ReviewPaths;
pub use settings::Settings;
