//! Error types for Tessera
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Tessera 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 레지스트리 검증
    // ========================================================================
    #[error("Plugin {0} is already registered")]
    AlreadyRegistered(String),

    #[error("Plugin {plugin} depends on {dependency}, which is not registered")]
    MissingDependency { plugin: String, dependency: String },

    #[error("Plugin {0} is not registered")]
    PluginNotFound(String),

    #[error("Plugin {plugin} {message}")]
    InvalidState { plugin: String, message: String },

    // ========================================================================
    // 플러그인 훅
    // ========================================================================
    #[error("Plugin {plugin} failed in {hook}: {message}")]
    Hook {
        plugin: String,
        hook: String,
        message: String,
    },

    // ========================================================================
    // 플랫폼 (element registry / document)
    // ========================================================================
    #[error("Element registry error: {0}")]
    ElementRegistry(String),

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 사용자에게 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::AlreadyRegistered(_)
                | Error::MissingDependency { .. }
                | Error::PluginNotFound(_)
                | Error::InvalidState { .. }
                | Error::InvalidInput(_)
        )
    }

    /// 레지스트리 검증 실패인지 확인 (부작용 없이 즉시 반환되는 에러)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::AlreadyRegistered(_)
                | Error::MissingDependency { .. }
                | Error::PluginNotFound(_)
                | Error::InvalidState { .. }
        )
    }

    /// 상태 전이 에러 생성 헬퍼
    pub fn invalid_state(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidState {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// 훅 실패 에러 생성 헬퍼
    pub fn hook(
        plugin: impl Into<String>,
        hook: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Hook {
            plugin: plugin.into(),
            hook: hook.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
