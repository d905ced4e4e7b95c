//! Theme Pack - JSON으로 선언하는 테마/토큰 플러그인
//!
//! ```json
//! {
//!   "id": "brand",
//!   "name": "Brand Theme",
//!   "version": "1.0.0",
//!   "dependencies": ["base-tokens"],
//!   "themes": { "brand": { "tokens": { "--brand-primary": "#0050ff" } } },
//!   "tokens": { "--radius-md": "6px" },
//!   "globalStyles": [":root { font-family: system-ui; }"]
//! }
//! ```

use super::context::PluginContext;
use super::metadata::PluginMetadata;
use super::theme::{ThemeDefinition, TokenMap};
use super::traits::Plugin;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use tessera_foundation::{Error, Result};

/// 활성화 / 비활성화 시 플러그인 버스에 발행되는 이벤트
pub const EVENT_ACTIVATED: &str = "activated";
pub const EVENT_DEACTIVATED: &str = "deactivated";

/// 선언형 테마 팩
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePack {
    #[serde(flatten)]
    pub metadata: PluginMetadata,

    /// 테마 이름 → 정의 (정의의 name이 비어 있으면 키로 채운다)
    #[serde(default)]
    pub themes: BTreeMap<String, ThemeDefinition>,

    #[serde(default)]
    pub tokens: TokenMap,

    #[serde(default)]
    pub global_styles: Vec<String>,
}

impl ThemePack {
    /// JSON 문자열 파싱 + 검증
    pub fn from_json(content: &str) -> Result<Self> {
        let mut pack: ThemePack = serde_json::from_str(content)?;
        for (key, theme) in pack.themes.iter_mut() {
            if theme.name.is_empty() {
                theme.name = key.clone();
            }
        }
        pack.metadata.validate()?;
        Ok(pack)
    }

    /// 파일에서 로드
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}

/// ThemePack을 적용하는 플러그인
#[derive(Debug, Clone)]
pub struct ThemePackPlugin {
    pack: ThemePack,
}

impl ThemePackPlugin {
    pub fn new(pack: ThemePack) -> Self {
        Self { pack }
    }

    pub fn pack(&self) -> &ThemePack {
        &self.pack
    }
}

#[async_trait]
impl Plugin for ThemePackPlugin {
    fn metadata(&self) -> PluginMetadata {
        self.pack.metadata.clone()
    }

    async fn install(&self, ctx: &PluginContext) -> Result<()> {
        for (name, theme) in &self.pack.themes {
            ctx.register_theme(name, theme.clone());
        }

        if !self.pack.tokens.is_empty() {
            ctx.extend_tokens(self.pack.tokens.clone());
        }

        for css in &self.pack.global_styles {
            ctx.add_global_styles(css);
        }
        Ok(())
    }

    async fn on_activate(&self, ctx: &PluginContext) -> Result<()> {
        ctx.emit(EVENT_ACTIVATED, &[json!(self.pack.metadata.id)]);
        Ok(())
    }

    async fn on_deactivate(&self, ctx: &PluginContext) -> Result<()> {
        ctx.emit(EVENT_DEACTIVATED, &[json!(self.pack.metadata.id)]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::manager::{PluginManager, RegisterOptions};
    use crate::plugin::platform::Document;
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::sync::Arc;

    const BRAND: &str = r##"{
        "id": "brand",
        "name": "Brand Theme",
        "version": "1.2.0",
        "themes": {
            "brand": {
                "tokens": { "--brand-primary": "#0050ff" },
                "styles": ".btn { background: var(--brand-primary); }",
                "dark": { "tokens": { "--brand-primary": "#6f9bff" } }
            }
        },
        "tokens": { "--radius-md": "6px" },
        "globalStyles": [":root { font-family: system-ui; }"]
    }"##;

    #[test]
    fn test_parse_pack() {
        let pack = ThemePack::from_json(BRAND).unwrap();
        assert_eq!(pack.id(), "brand");
        assert_eq!(pack.metadata.version, "1.2.0");
        assert_eq!(pack.themes["brand"].name, "brand");
        assert_eq!(pack.global_styles.len(), 1);
    }

    #[test]
    fn test_parse_rejects_bad_metadata() {
        assert!(ThemePack::from_json(r#"{ "id": "", "name": "x", "version": "1" }"#).is_err());
        assert!(ThemePack::from_json(r#"{ "name": "x" }"#).is_err());
    }

    #[tokio::test]
    async fn test_pack_lifecycle() {
        let manager = PluginManager::default();
        let pack = ThemePack::from_json(BRAND).unwrap();

        manager
            .register(
                Arc::new(ThemePackPlugin::new(pack)),
                RegisterOptions::new().auto_activate(false),
            )
            .await
            .unwrap();

        let document = &manager.platform().document;
        assert_eq!(
            document.root_property("--brand-primary").as_deref(),
            Some("#0050ff")
        );
        assert_eq!(document.root_property("--radius-md").as_deref(), Some("6px"));
        // theme styles + dark + global
        assert_eq!(document.styles_for("brand").len(), 3);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        manager.context("brand").unwrap().on(
            EVENT_ACTIVATED,
            Arc::new(move |args: &[Value]| -> Result<()> {
                sink.lock().push(args.to_vec());
                Ok(())
            }),
        );

        manager.activate("brand").await.unwrap();
        assert_eq!(*seen.lock(), vec![vec![json!("brand")]]);

        manager.uninstall("brand").await.unwrap();
        assert!(document.styles_for("brand").is_empty());
    }
}
