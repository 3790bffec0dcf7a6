//! Glasspane 错误处理模块
//!
//! `EffectError` covers the effects engine; `AppError` covers the layers
//! around it (settings, logging, devtools).

use serde::Serialize;
use thiserror::Error;

/// Failure of a window-effect or theme operation.
///
/// None of these are exceptional: an older OS simply reports
/// `UnsupportedPlatform` and the caller turns it into `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    /// No native mechanism exists for the detected OS version.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(&'static str),

    /// A native entry point could not be resolved at runtime.
    #[error("native API unavailable: {0}")]
    NativeApiUnavailable(&'static str),

    /// The requested effect name is not recognized.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// No target window has been attached.
    #[error("no target window")]
    NoWindow,

    /// A native call was made but reported failure.
    #[error("native call failed: {0}")]
    Native(String),
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 配置错误
    #[error("config error: {0}")]
    Config(String),

    /// 窗口效果错误
    #[error(transparent)]
    Effect(#[from] EffectError),

    /// 调试工具错误
    #[error("devtools error: {0}")]
    DevTools(String),

    /// 通用错误
    #[error("{0}")]
    General(String),
}

/// Error wrapper handed back across the scripting bridge and the C ABI.
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::Io(_) => "E_IO_ERROR",
            AppError::Json(_) => "E_JSON_ERROR",
            AppError::Config(_) => "E_CONFIG",
            AppError::Effect(EffectError::UnsupportedPlatform(_)) => "E_UNSUPPORTED_PLATFORM",
            AppError::Effect(EffectError::NativeApiUnavailable(_)) => "E_NATIVE_UNAVAILABLE",
            AppError::Effect(EffectError::UnknownEffect(_)) => "E_UNKNOWN_EFFECT",
            AppError::Effect(EffectError::NoWindow) => "E_NO_WINDOW",
            AppError::Effect(EffectError::Native(_)) => "E_NATIVE",
            AppError::DevTools(_) => "E_DEVTOOLS",
            AppError::General(_) => "E_GENERAL",
        };

        CommandError {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<EffectError> for CommandError {
    fn from(err: EffectError) -> Self {
        AppError::from(err).into()
    }
}

// 实现 Serialize 以便可以直接返回给脚本桥
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let cmd_error = CommandError::from(AppError::General(self.to_string()));
        cmd_error.serialize(serializer)
    }
}

/// 应用程序结果类型别名
pub type AppResult<T> = Result<T, AppError>;
