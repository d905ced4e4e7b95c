//! # tessera-foundation
//!
//! Foundation layer for Tessera:
//! - Error: 플러그인 호스트 전체에서 공유하는 에러 타입
//! - Storage: JsonStore (글로벌 / 프로젝트 설정 파일)
//! - Config: 호스트 설정 (HostConfig)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  tessera-cli (host binary)                  │
//! │                     │                       │
//! │                     ▼                       │
//! │  tessera-core (PluginManager/PluginContext) │
//! │                     │                       │
//! │                     ▼                       │
//! │  tessera-foundation (Error, HostConfig)     │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{HostConfig, LoggingSettings, PluginSettings, HOST_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;
