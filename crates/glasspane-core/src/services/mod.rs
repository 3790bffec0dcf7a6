//! Glasspane 服务模块

pub mod settings;

pub use settings::SettingsManager;
