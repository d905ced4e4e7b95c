//! Plugin Metadata - 플러그인 메타데이터 정의

use serde::{Deserialize, Serialize};
use tessera_foundation::{Error, Result};

/// 플러그인 메타데이터
///
/// `dependencies`는 다른 플러그인의 ID 목록이다 (버전 범위 아님).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    /// 고유 플러그인 ID (예: "brand-theme")
    pub id: String,

    /// 표시 이름
    pub name: String,

    /// 버전 문자열
    pub version: String,

    /// 의존하는 플러그인 ID 목록
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl PluginMetadata {
    /// 새 메타데이터 생성 (버전 기본값 "1.0.0")
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: "1.0.0".to_string(),
            dependencies: vec![],
        }
    }

    /// 빌더 패턴: 버전 설정
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// 빌더 패턴: 의존성 추가
    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// 등록 전 최소 검증
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidInput("plugin id must not be empty".to_string()));
        }
        if self.dependencies.iter().any(|dep| dep == &self.id) {
            return Err(Error::InvalidInput(format!(
                "plugin {} cannot depend on itself",
                self.id
            )));
        }
        Ok(())
    }
}
