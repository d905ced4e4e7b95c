//! tessera-core: Plugin Runtime for Tessera
//!
//! Layer2 - 디자인 시스템 플러그인 호스트
//!
//! # 주요 모듈
//!
//! - `plugin`: PluginManager (레지스트리 + 상태 머신), PluginContext (capability 표면),
//!   Platform (element registry / document 추상화), ThemePack (선언형 플러그인)
//!
//! # 사용 예시
//!
//! ```ignore
//! use tessera_core::{PluginManager, PluginManagerConfig, RegisterOptions, ThemePack, ThemePackPlugin};
//!
//! let manager = PluginManager::new(PluginManagerConfig::default());
//! let pack = ThemePack::from_file("brand.json")?;
//! manager.register(Arc::new(ThemePackPlugin::new(pack)), RegisterOptions::new()).await?;
//!
//! assert!(manager.is_active("brand"));
//! manager.cleanup().await;
//! ```

pub mod plugin;

// Re-exports: Plugin
pub use plugin::{
    // Platform
    CustomElement,
    // Theme
    DarkVariant,
    Document,
    ElementConstructor,
    ElementRegistry,
    // Events
    EventHandler,
    ListenerId,
    // Logger
    LogLevel,
    Logger,
    MemoryDocument,
    MemoryElementRegistry,
    Platform,
    // Traits
    Plugin,
    PluginContext,
    // Manager
    PluginManager,
    PluginManagerConfig,
    // Metadata
    PluginMetadata,
    PluginState,
    PluginSummary,
    RegisterOptions,
    StyleElement,
    ThemeDefinition,
    // Theme Pack
    ThemePack,
    ThemePackPlugin,
    TokenMap,
};

// Layer1 re-exports
pub use tessera_foundation::{Error, Result};

/// Layer2 버전
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_plugin_exports() {
        let manager = PluginManager::default();
        assert!(manager.get_all_plugins().is_empty());
        assert_eq!(manager.summary(), PluginSummary::default());
    }
}
