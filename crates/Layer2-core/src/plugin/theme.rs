//! Theme Definition - 디자인 토큰 묶음 + 선택적 CSS, 다크 모드 변형

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 다크 모드 미디어 쿼리
pub const DARK_MEDIA_QUERY: &str = "@media (prefers-color-scheme: dark)";

/// 디자인 토큰 맵 (CSS custom property 이름 → 값)
pub type TokenMap = BTreeMap<String, String>;

/// 테마 정의
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDefinition {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub tokens: TokenMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<DarkVariant>,
}

/// 다크 모드 변형
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DarkVariant {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tokens: TokenMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
}

impl ThemeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(name.into(), value.into());
        self
    }

    pub fn with_styles(mut self, css: impl Into<String>) -> Self {
        self.styles = Some(css.into());
        self
    }

    pub fn with_dark(mut self, dark: DarkVariant) -> Self {
        self.dark = Some(dark);
        self
    }

    /// 다크 모드 스타일시트. 다크 변형이 없거나 비어 있으면 None.
    pub fn dark_stylesheet(&self) -> Option<String> {
        let dark = self.dark.as_ref()?;
        let styles = dark.styles.as_deref().filter(|s| !s.trim().is_empty());
        if dark.tokens.is_empty() && styles.is_none() {
            return None;
        }

        let mut css = format!("{} {{\n", DARK_MEDIA_QUERY);
        if !dark.tokens.is_empty() {
            css.push_str("  :root {\n");
            for (name, value) in &dark.tokens {
                css.push_str(&format!("    {}: {};\n", name, value));
            }
            css.push_str("  }\n");
        }
        if let Some(styles) = styles {
            css.push_str(styles);
            css.push('\n');
        }
        css.push('}');
        Some(css)
    }
}

impl DarkVariant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(name.into(), value.into());
        self
    }

    pub fn with_styles(mut self, css: impl Into<String>) -> Self {
        self.styles = Some(css.into());
        self
    }
}
