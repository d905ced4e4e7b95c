//! Host Config - 통합 설정
//!
//! 글로벌(`<config_dir>/tessera/config.json`)과 프로젝트(`.tessera/config.json`)
//! 설정을 병합한다. 프로젝트 값이 우선.

use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 설정 파일명
pub const HOST_CONFIG_FILE: &str = "config.json";

// ============================================================================
// Host Config (통합)
// ============================================================================

/// Tessera 호스트 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    /// 플러그인 매니저 기본값
    #[serde(default)]
    pub plugins: PluginSettings,

    /// 로깅
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<HostConfig>(HOST_CONFIG_FILE)? {
                debug!("Loaded global config from {}", global.base_dir().display());
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) = project.load_optional::<HostConfig>(HOST_CONFIG_FILE)? {
                debug!("Loaded project config from {}", project.base_dir().display());
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// 특정 저장소에서만 로드 (없으면 기본값)
    pub fn load_from(store: &JsonStore) -> Result<Self> {
        Ok(store
            .load_optional::<HostConfig>(HOST_CONFIG_FILE)?
            .unwrap_or_default())
    }

    /// 저장
    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.save(HOST_CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: HostConfig) {
        self.plugins.merge(other.plugins);
        self.logging.merge(other.logging);
    }
}

// ============================================================================
// Plugin Settings
// ============================================================================

/// 플러그인 매니저 설정. 값이 없으면 매니저 기본값(둘 다 true)을 따른다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_logging: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_activate: Option<bool>,
}

impl PluginSettings {
    fn merge(&mut self, other: PluginSettings) {
        if other.enable_logging.is_some() {
            self.enable_logging = other.enable_logging;
        }
        if other.auto_activate.is_some() {
            self.auto_activate = other.auto_activate;
        }
    }
}

// ============================================================================
// Logging Settings
// ============================================================================

/// 로깅 설정 (tracing EnvFilter 지시어)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl LoggingSettings {
    fn merge(&mut self, other: LoggingSettings) {
        if other.level.is_some() {
            self.level = other.level;
        }
    }
}
