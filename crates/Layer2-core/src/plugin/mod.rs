//! # Plugin System
//!
//! 디자인 시스템 확장 플러그인 호스트
//!
//! ## 개요
//!
//! 서드파티 플러그인이 런타임에 다음을 등록할 수 있다:
//! - 새로운 컴포넌트 (custom element)
//! - 테마 (토큰 + CSS + 다크 모드 변형)
//! - 디자인 토큰 확장
//! - 전역 스타일
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       PluginManager                          │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  entries: id → PluginEntry { plugin, state, context }  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                            │                                 │
//! │  ┌─────────────────────────┼──────────────────────────────┐  │
//! │  │     PluginContext (플러그인마다 하나)                    │  │
//! │  │  - register_component / register_theme                 │  │
//! │  │  - extend_tokens / add_global_styles                   │  │
//! │  │  - on / off / emit (전용 이벤트 버스)                     │  │
//! │  └─────────────────────────┼──────────────────────────────┘  │
//! │                            ▼                                 │
//! │        Platform { ElementRegistry, Document } (공유)          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! 격리(sandbox)는 없다. 플러그인은 공유 상태를 자유롭게 변경할 수 있고,
//! 모든 상태는 프로세스 메모리에만 존재한다.
//!
//! ## 예시
//!
//! ```ignore
//! struct BrandPlugin;
//!
//! #[async_trait]
//! impl Plugin for BrandPlugin {
//!     fn metadata(&self) -> PluginMetadata {
//!         PluginMetadata::new("brand", "Brand Theme").with_dependency("base-tokens")
//!     }
//!
//!     async fn install(&self, ctx: &PluginContext) -> Result<()> {
//!         ctx.register_theme("brand", ThemeDefinition::new("brand").with_token("--brand", "#0050ff"));
//!         Ok(())
//!     }
//! }
//!
//! let manager = PluginManager::new(PluginManagerConfig::default());
//! manager.register(Arc::new(BrandPlugin), RegisterOptions::new()).await?;
//! ```

mod context;
mod events;
mod logger;
mod manager;
mod metadata;
mod platform;
mod theme;
mod theme_pack;
mod traits;

pub use context::PluginContext;
pub use events::{EventEmitter, EventHandler, ListenerId};
pub use logger::{LogLevel, LogRecord, Logger};
pub use manager::{
    PluginEntry, PluginManager, PluginManagerConfig, PluginSummary, RegisterOptions,
};
pub use metadata::PluginMetadata;
pub use platform::{
    is_valid_custom_element_name, CustomElement, Document, ElementConstructor, ElementRegistry,
    MemoryDocument, MemoryElementRegistry, Platform, StyleElement, StyleId,
};
pub use theme::{DarkVariant, ThemeDefinition, TokenMap, DARK_MEDIA_QUERY};
pub use theme_pack::{ThemePack, ThemePackPlugin, EVENT_ACTIVATED, EVENT_DEACTIVATED};
pub use traits::{Plugin, PluginState};
