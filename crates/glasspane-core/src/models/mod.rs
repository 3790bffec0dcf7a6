//! Glasspane 数据模型

pub mod settings;

pub use settings::*;
