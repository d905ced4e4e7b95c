//! Config - 호스트 설정 관리
//!
//! - `host.rs` - HostConfig 통합 설정 (플러그인 매니저 기본값, 로깅)

mod host;

pub use host::{HostConfig, LoggingSettings, PluginSettings, HOST_CONFIG_FILE};
