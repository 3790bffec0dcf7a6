//! 应用程序设置服务
//!
//! 负责设置的读取、保存和管理

use crate::models::AppSettings;
use crate::paths::PathProvider;
use crate::utils::error::AppError;
use std::fs;
use std::path::PathBuf;

/// 设置管理器
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// 使用 PathProvider 创建设置管理器
    pub fn new(provider: &dyn PathProvider) -> Result<Self, AppError> {
        Self::from_path(provider.settings_path())
    }

    /// 从指定路径创建设置管理器
    pub fn from_path(settings_path: PathBuf) -> Result<Self, AppError> {
        if let Some(parent) = settings_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("cannot create config dir: {}", e)))?;
        }

        Ok(Self { settings_path })
    }

    /// 加载设置，文件不存在时返回默认设置
    pub fn load(&self) -> Result<AppSettings, AppError> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Ok(AppSettings::default());
        }

        let content = fs::read_to_string(&self.settings_path)
            .map_err(|e| AppError::Config(format!("cannot read settings file: {}", e)))?;

        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("malformed settings file: {}", e)))?;

        tracing::info!("Loaded settings: {:?}", self.settings_path);
        Ok(settings)
    }

    /// 保存设置
    pub fn save(&self, settings: &AppSettings) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Config(format!("cannot serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content)
            .map_err(|e| AppError::Config(format!("cannot write settings file: {}", e)))?;

        tracing::info!("Saved settings: {:?}", self.settings_path);
        Ok(())
    }

    /// 重置为默认设置
    pub fn reset(&self) -> Result<AppSettings, AppError> {
        let default_settings = AppSettings::default();
        self.save(&default_settings)?;
        Ok(default_settings)
    }

    /// 获取设置文件路径
    pub fn path(&self) -> &PathBuf {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThemeMode;
    use crate::paths::AppDataPathProvider;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme, ThemeMode::System);
        assert_eq!(settings.devtools.remote_debugging_port, 0);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"theme":"dark","devtools":{"remoteDebuggingPort":8999}}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert_eq!(settings.devtools.remote_debugging_port, 8999);
        assert_eq!(settings.devtools.window_title, "Glasspane");
        assert!(settings.logging.file);
    }

    #[test]
    fn test_settings_manager_round_trip() {
        let tmp = TempDir::new().unwrap();
        let provider = AppDataPathProvider::with_base_dir(tmp.path().to_path_buf());
        let manager = SettingsManager::new(&provider).unwrap();

        let settings = manager.load().unwrap();
        assert_eq!(settings, AppSettings::default());

        let mut changed = settings.clone();
        changed.theme = ThemeMode::Light;
        manager.save(&changed).unwrap();
        assert_eq!(manager.load().unwrap(), changed);

        assert_eq!(manager.reset().unwrap(), AppSettings::default());
        assert_eq!(manager.load().unwrap().theme, ThemeMode::System);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let manager = SettingsManager::from_path(tmp.path().join("settings.json")).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(AppError::Config(_))));
    }
}
