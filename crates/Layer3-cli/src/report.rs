//! apply 결과 리포트 (텍스트 / JSON)

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use tessera_core::{MemoryDocument, PluginManager, PluginState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub plugins: Vec<PluginReport>,
    pub root_properties: BTreeMap<String, String>,
    pub styles: Vec<StyleReport>,
    pub failures: Vec<Failure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PluginReport {
    pub id: String,
    pub name: String,
    pub version: String,
    pub state: PluginState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleReport {
    pub plugin: String,
    pub css: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub path: String,
    pub error: String,
}

impl Report {
    /// 매니저와 document의 현재 상태 캡처
    pub fn capture(manager: &PluginManager, document: &MemoryDocument, failures: &[Failure]) -> Self {
        let plugins = manager
            .get_all_plugins()
            .iter()
            .filter_map(|plugin| {
                let metadata = plugin.metadata();
                let state = manager.get_state(&metadata.id)?;
                Some(PluginReport {
                    error: manager.get_error(&metadata.id),
                    id: metadata.id,
                    name: metadata.name,
                    version: metadata.version,
                    state,
                })
            })
            .collect();

        let styles = tessera_core::Document::styles(document)
            .into_iter()
            .map(|style| StyleReport {
                plugin: style.plugin_id,
                css: style.css,
            })
            .collect();

        Self {
            plugins,
            root_properties: document.root_properties(),
            styles,
            failures: failures.to_vec(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Plugins");
        let _ = writeln!(out, "{}", "-".repeat(60));
        for plugin in &self.plugins {
            let _ = writeln!(
                out,
                "{:<20} {:<12} {:<10} {}",
                plugin.id,
                plugin.version,
                plugin.state.to_string(),
                plugin.name
            );
            if let Some(error) = &plugin.error {
                let _ = writeln!(out, "  └─ {}", error);
            }
        }

        let _ = writeln!(out, "\nRoot custom properties ({})", self.root_properties.len());
        for (name, value) in &self.root_properties {
            let _ = writeln!(out, "  {}: {};", name, value);
        }

        let _ = writeln!(out, "\nStyle elements ({})", self.styles.len());
        for style in &self.styles {
            let _ = writeln!(out, "<style data-plugin=\"{}\">", style.plugin);
            let _ = writeln!(out, "{}", style.css);
            let _ = writeln!(out, "</style>");
        }

        if !self.failures.is_empty() {
            let _ = writeln!(out, "\nFailures ({})", self.failures.len());
            for failure in &self.failures {
                let _ = writeln!(out, "  ✗ {}: {}", failure.path, failure.error);
            }
        }

        out
    }
}
