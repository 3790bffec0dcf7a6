//! Glasspane 命令模块
//!
//! Request handlers behind the scripting bridge and the C ABI.

pub mod devtools;
pub mod theme;
pub mod window_effects;

pub use devtools::*;
pub use theme::*;
pub use window_effects::*;
