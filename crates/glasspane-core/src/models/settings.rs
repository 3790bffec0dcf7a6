//! 应用程序设置数据模型

use serde::{Deserialize, Serialize};

/// 主题模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// 调试工具设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevToolsSettings {
    /// 远程调试端口（0 = 禁用远程调试）
    pub remote_debugging_port: u16,
    /// 宿主窗口标题，用于调试窗口标题
    pub window_title: String,
}

impl Default for DevToolsSettings {
    fn default() -> Self {
        Self {
            remote_debugging_port: 0,
            window_title: String::from("Glasspane"),
        }
    }
}

/// 日志设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// 默认日志级别（可被 RUST_LOG 覆盖）
    pub level: String,
    /// 是否写入滚动日志文件
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            file: true,
        }
    }
}

/// 应用程序设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// 窗口主题模式
    pub theme: ThemeMode,
    /// 调试工具设置
    pub devtools: DevToolsSettings,
    /// 日志设置
    pub logging: LoggingSettings,
}
