//! Plugin traits - 핵심 플러그인 인터페이스

use super::context::PluginContext;
use super::metadata::PluginMetadata;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tessera_foundation::Result;

// ============================================================================
// Plugin Trait - 모든 플러그인이 구현해야 하는 인터페이스
// ============================================================================

/// 플러그인 트레이트
///
/// `install`만 필수다. 나머지 라이프사이클 훅은 기본 구현이 아무것도 하지 않으며,
/// 필요한 훅만 오버라이드한다. 모든 훅은 매니저가 끝까지 await한 뒤 다음 단계로 간다.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// 플러그인 메타데이터 반환
    fn metadata(&self) -> PluginMetadata;

    /// 설치 시 호출. 컴포넌트/테마/토큰/스타일을 여기서 등록한다.
    async fn install(&self, ctx: &PluginContext) -> Result<()>;

    /// `install` 직후 호출
    async fn on_install(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// 활성화 시 호출
    async fn on_activate(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// 비활성화 시 호출
    async fn on_deactivate(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// 제거 시 호출 (컨텍스트 cleanup 전)
    async fn on_uninstall(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// PluginState - 라이프사이클 상태
// ============================================================================

/// 플러그인 상태
///
/// ```text
/// Uninstalled ─install─► Installed ─activate─► Active ─deactivate─► Inactive
///                                                ▲                     │
///                                                └──────activate───────┘
/// 훅 실패 ─► Error (종료 상태, unregister 후 재등록만 가능)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// 등록됨, 아직 설치 안됨
    Uninstalled,

    /// 설치됨 (아직 활성화 안됨)
    Installed,

    /// 활성화됨
    Active,

    /// 비활성화됨
    Inactive,

    /// 오류 상태
    Error,
}

impl PluginState {
    /// activate 가능한 상태인지
    pub fn can_activate(&self) -> bool {
        matches!(self, Self::Installed | Self::Inactive)
    }

    /// uninstall 가능한 상태인지 (Active는 먼저 비활성화됨)
    pub fn can_uninstall(&self) -> bool {
        matches!(self, Self::Installed | Self::Inactive | Self::Active)
    }
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninstalled => write!(f, "uninstalled"),
            Self::Installed => write!(f, "installed"),
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Error => write!(f, "error"),
        }
    }
}
