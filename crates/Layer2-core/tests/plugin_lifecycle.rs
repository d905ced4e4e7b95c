//! 플러그인 라이프사이클 통합 테스트
//!
//! `cargo test -p tessera-core --test plugin_lifecycle`

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tessera_core::{
    Document, Error, LogLevel, Plugin, PluginContext, PluginManager, PluginManagerConfig,
    PluginMetadata, PluginState, RegisterOptions, Result, ThemeDefinition,
};

type CallLog = Arc<Mutex<Vec<String>>>;

/// 훅 호출을 기록하는 플러그인
struct Probe {
    metadata: PluginMetadata,
    calls: CallLog,
    fail_install: bool,
}

impl Probe {
    fn new(id: &str) -> Self {
        Self {
            metadata: PluginMetadata::new(id, format!("Probe {}", id)),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_install: false,
        }
    }

    fn with_dependency(mut self, id: &str) -> Self {
        self.metadata = self.metadata.with_dependency(id);
        self
    }

    fn failing_install(mut self) -> Self {
        self.fail_install = true;
        self
    }

    fn calls(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    fn record(&self, hook: &str) {
        self.calls.lock().push(hook.to_string());
    }
}

#[async_trait]
impl Plugin for Probe {
    fn metadata(&self) -> PluginMetadata {
        self.metadata.clone()
    }

    async fn install(&self, _ctx: &PluginContext) -> Result<()> {
        // 비동기 훅도 끝까지 await 되어야 한다
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.record("install");
        if self.fail_install {
            return Err(Error::hook(&self.metadata.id, "install", "install rejected"));
        }
        Ok(())
    }

    async fn on_activate(&self, _ctx: &PluginContext) -> Result<()> {
        self.record("on_activate");
        Ok(())
    }

    async fn on_deactivate(&self, _ctx: &PluginContext) -> Result<()> {
        self.record("on_deactivate");
        Ok(())
    }

    async fn on_uninstall(&self, _ctx: &PluginContext) -> Result<()> {
        self.record("on_uninstall");
        Ok(())
    }
}

fn manager() -> PluginManager {
    PluginManager::new(PluginManagerConfig::default())
}

#[tokio::test]
async fn test_duplicate_registration() {
    let manager = manager();
    manager
        .register(Arc::new(Probe::new("P")), RegisterOptions::new())
        .await
        .unwrap();

    let err = manager
        .register(Arc::new(Probe::new("P")), RegisterOptions::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already registered"));
    assert!(manager.is_active("P"));
}

#[tokio::test]
async fn test_missing_dependency() {
    let manager = manager();
    let err = manager
        .register(
            Arc::new(Probe::new("A").with_dependency("missing")),
            RegisterOptions::new(),
        )
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("depends on"));
    assert!(msg.contains("missing"));
}

#[tokio::test]
async fn test_default_register_activates() {
    let manager = manager();
    manager
        .register(Arc::new(Probe::new("P")), RegisterOptions::new())
        .await
        .unwrap();

    assert!(manager.is_installed("P"));
    assert!(manager.is_active("P"));
}

#[tokio::test]
async fn test_register_without_auto_activate() {
    let manager = manager();
    let probe = Probe::new("P");
    let calls = probe.calls();

    manager
        .register(Arc::new(probe), RegisterOptions::new().auto_activate(false))
        .await
        .unwrap();

    assert!(manager.is_installed("P"));
    assert!(!manager.is_active("P"));
    assert!(!calls.lock().iter().any(|c| c == "on_activate"));
}

#[tokio::test]
async fn test_activate_twice_is_noop() {
    let manager = manager();
    let probe = Probe::new("P");
    let calls = probe.calls();

    manager
        .register(Arc::new(probe), RegisterOptions::new())
        .await
        .unwrap();
    manager.activate("P").await.unwrap();

    let activations = calls.lock().iter().filter(|c| *c == "on_activate").count();
    assert_eq!(activations, 1);
}

#[tokio::test]
async fn test_uninstall_active_plugin() {
    let manager = manager();
    let probe = Probe::new("P");
    let calls = probe.calls();

    manager
        .register(Arc::new(probe), RegisterOptions::new())
        .await
        .unwrap();
    manager.uninstall("P").await.unwrap();

    assert_eq!(
        *calls.lock(),
        vec!["install", "on_activate", "on_deactivate", "on_uninstall"]
    );
    assert!(manager.get_plugin("P").is_none());
    assert_eq!(manager.get_state("P"), None);
}

#[tokio::test]
async fn test_theme_tokens_reach_document_root() {
    let manager = manager();
    manager
        .register(Arc::new(Probe::new("theme")), RegisterOptions::new())
        .await
        .unwrap();

    let ctx = manager.context("theme").unwrap();
    ctx.register_theme("t", ThemeDefinition::new("t").with_token("--x", "#ff0000"));

    assert_eq!(
        manager.platform().document.root_property("--x").as_deref(),
        Some("#ff0000")
    );
}

#[tokio::test]
async fn test_global_styles_removed_on_cleanup() {
    let manager = manager();
    manager
        .register(Arc::new(Probe::new("styles")), RegisterOptions::new())
        .await
        .unwrap();

    let ctx = manager.context("styles").unwrap();
    let css = "body { margin: 0; }";
    let first = ctx.add_global_styles(css);
    let second = ctx.add_global_styles(css);

    assert_ne!(first, second);
    assert_eq!(ctx.injected_styles().len(), 2);

    ctx.cleanup();
    assert!(manager.platform().document.styles_for("styles").is_empty());
}

#[tokio::test]
async fn test_throwing_listener_does_not_stop_others() {
    let manager = manager();
    manager
        .register(Arc::new(Probe::new("events")), RegisterOptions::new())
        .await
        .unwrap();

    let ctx = manager.context("events").unwrap();
    let hits = Arc::new(Mutex::new(Vec::new()));

    ctx.on(
        "evt",
        Arc::new(|_: &[Value]| -> Result<()> { Err(Error::from("h1 failed")) }),
    );
    let sink = Arc::clone(&hits);
    ctx.on(
        "evt",
        Arc::new(move |_: &[Value]| -> Result<()> {
            sink.lock().push("h2");
            Ok(())
        }),
    );

    let ran = ctx.emit("evt", &[]);

    assert_eq!(ran, 1);
    assert_eq!(*hits.lock(), vec!["h2"]);
    let errors = ctx.logger().records_at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.starts_with("[Plugin:events]"));
    assert!(errors[0].message.contains("h1 failed"));
}

#[tokio::test]
async fn test_install_failure_marks_error() {
    let manager = manager();
    let err = manager
        .register(Arc::new(Probe::new("P").failing_install()), RegisterOptions::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("install rejected"));
    assert_eq!(manager.get_state("P"), Some(PluginState::Error));
    assert_eq!(manager.get_state("P").unwrap().to_string(), "error");
    assert!(manager.get_error("P").unwrap().contains("install rejected"));
}

#[tokio::test]
async fn test_dependency_order_is_callers_responsibility() {
    let manager = manager();

    let first = manager
        .register(
            Arc::new(Probe::new("A").with_dependency("B")),
            RegisterOptions::new(),
        )
        .await;
    assert!(first.is_err());

    manager
        .register(Arc::new(Probe::new("B")), RegisterOptions::new())
        .await
        .unwrap();
    manager
        .register(
            Arc::new(Probe::new("A").with_dependency("B")),
            RegisterOptions::new(),
        )
        .await
        .unwrap();

    assert!(manager.is_active("A"));
    assert!(manager.is_active("B"));
}

#[tokio::test]
async fn test_dependency_need_not_be_active() {
    let manager = manager();
    manager
        .register(
            Arc::new(Probe::new("base")),
            RegisterOptions::new().auto_activate(false),
        )
        .await
        .unwrap();

    manager
        .register(
            Arc::new(Probe::new("ext").with_dependency("base")),
            RegisterOptions::new(),
        )
        .await
        .unwrap();
    assert!(manager.is_active("ext"));
    assert!(!manager.is_active("base"));
}

#[tokio::test]
async fn test_different_ids_progress_concurrently() {
    let manager = Arc::new(manager());

    let registrations = ["one", "two", "three"].map(|id| {
        let manager = Arc::clone(&manager);
        async move {
            manager
                .register(Arc::new(Probe::new(id)), RegisterOptions::new())
                .await
        }
    });

    for result in futures::future::join_all(registrations).await {
        result.unwrap();
    }
    assert_eq!(manager.get_active_plugins().len(), 3);
}

#[tokio::test]
async fn test_shared_instance_reset() {
    let shared = PluginManager::instance(PluginManagerConfig::default());
    shared
        .register(Arc::new(Probe::new("shared")), RegisterOptions::new())
        .await
        .unwrap();

    let again = PluginManager::instance(PluginManagerConfig::default());
    assert!(Arc::ptr_eq(&shared, &again));
    assert!(again.has("shared"));

    PluginManager::reset_instance().await;

    assert!(!shared.has("shared"));
    let fresh = PluginManager::instance(PluginManagerConfig::default());
    assert!(!Arc::ptr_eq(&shared, &fresh));
    assert!(!fresh.has("shared"));
}
