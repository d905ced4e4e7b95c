//! Plugin Manager - 플러그인 라이프사이클 관리
//!
//! - 레지스트리 소유 (ID 유일성, 의존성 검사)
//! - install / activate / deactivate / uninstall 상태 머신
//! - 플러그인마다 Logger + PluginContext 하나씩 생성/정리
//!
//! 레지스트리 락은 훅을 await하는 동안 절대 잡고 있지 않는다. 서로 다른 ID에 대한
//! 호출은 동시에 진행될 수 있지만, 같은 ID에 대한 동시 호출은 호출자가 직렬화해야 한다.

use super::context::PluginContext;
use super::logger::Logger;
use super::metadata::PluginMetadata;
use super::platform::Platform;
use super::traits::{Plugin, PluginState};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tessera_foundation::{Error, PluginSettings, Result};
use tracing::{debug, info, warn};

/// 프로세스 전역 매니저 (instance / reset_instance)
static INSTANCE: Mutex<Option<Arc<PluginManager>>> = parking_lot::const_mutex(None);

// ============================================================================
// 설정
// ============================================================================

/// 플러그인 매니저 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManagerConfig {
    /// 플러그인 로거 활성화
    #[serde(default = "default_true")]
    pub enable_logging: bool,

    /// register 후 자동 활성화
    #[serde(default = "default_true")]
    pub auto_activate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PluginManagerConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
            auto_activate: true,
        }
    }
}

impl From<&PluginSettings> for PluginManagerConfig {
    fn from(settings: &PluginSettings) -> Self {
        let defaults = Self::default();
        Self {
            enable_logging: settings.enable_logging.unwrap_or(defaults.enable_logging),
            auto_activate: settings.auto_activate.unwrap_or(defaults.auto_activate),
        }
    }
}

/// register 호출별 옵션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// None이면 매니저 설정을 따른다
    pub auto_activate: Option<bool>,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_activate(mut self, auto_activate: bool) -> Self {
        self.auto_activate = Some(auto_activate);
        self
    }
}

// ============================================================================
// PluginEntry
// ============================================================================

/// 레지스트리 항목 (매니저가 독점 소유)
pub struct PluginEntry {
    pub plugin: Arc<dyn Plugin>,
    pub metadata: PluginMetadata,
    pub state: PluginState,
    pub context: Arc<PluginContext>,
    pub logger: Logger,

    /// 실패한 훅의 에러 메시지
    pub error: Option<String>,

    load_order: usize,
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("id", &self.metadata.id)
            .field("state", &self.state)
            .field("error", &self.error)
            .field("load_order", &self.load_order)
            .finish()
    }
}

/// 훅 실행에 필요한 것들의 스냅샷 (락 밖에서 await하기 위해)
struct Snapshot {
    plugin: Arc<dyn Plugin>,
    context: Arc<PluginContext>,
    logger: Logger,
    state: PluginState,
}

// ============================================================================
// PluginManager
// ============================================================================

/// 플러그인 매니저 - 전체 플러그인 시스템 관리
pub struct PluginManager {
    entries: RwLock<HashMap<String, PluginEntry>>,
    load_counter: AtomicUsize,
    platform: Platform,
    config: PluginManagerConfig,
}

impl PluginManager {
    /// 새 매니저 생성 (메모리 플랫폼)
    pub fn new(config: PluginManagerConfig) -> Self {
        Self::with_platform(config, Platform::in_memory())
    }

    /// 외부 플랫폼과 함께 생성
    pub fn with_platform(config: PluginManagerConfig, platform: Platform) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            load_counter: AtomicUsize::new(0),
            platform,
            config,
        }
    }

    // ========================================================================
    // 전역 인스턴스
    // ========================================================================

    /// 전역 매니저. 최초 호출의 설정으로 한 번만 생성된다.
    pub fn instance(config: PluginManagerConfig) -> Arc<PluginManager> {
        let mut guard = INSTANCE.lock();
        guard
            .get_or_insert_with(|| Arc::new(PluginManager::new(config)))
            .clone()
    }

    /// 전역 매니저를 정리하고 버린다. 다음 `instance` 호출은 새 매니저를 만든다.
    pub async fn reset_instance() {
        let current = INSTANCE.lock().take();
        if let Some(manager) = current {
            manager.cleanup().await;
        }
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 플러그인 등록 → install → (자동) activate
    ///
    /// 검증 실패는 부작용 없이 반환된다. install/activate 실패 시 항목은
    /// `Error` 상태로 레지스트리에 남는다.
    pub async fn register(&self, plugin: Arc<dyn Plugin>, options: RegisterOptions) -> Result<()> {
        let metadata = plugin.metadata();
        metadata.validate()?;
        let id = metadata.id.clone();

        let logger = {
            let mut entries = self.entries.write();

            if entries.contains_key(&id) {
                return Err(Error::AlreadyRegistered(id));
            }

            // 의존성은 등록만 되어 있으면 된다 (활성 여부 무관)
            if let Some(missing) = metadata
                .dependencies
                .iter()
                .find(|dep| !entries.contains_key(dep.as_str()))
            {
                return Err(Error::MissingDependency {
                    plugin: id,
                    dependency: missing.clone(),
                });
            }

            let logger = Logger::new(&id, self.config.enable_logging);
            let context = Arc::new(PluginContext::new(
                id.clone(),
                logger.clone(),
                self.platform.clone(),
            ));
            let load_order = self.load_counter.fetch_add(1, Ordering::Relaxed) + 1;

            entries.insert(
                id.clone(),
                PluginEntry {
                    plugin,
                    metadata: metadata.clone(),
                    state: PluginState::Uninstalled,
                    context,
                    logger: logger.clone(),
                    error: None,
                    load_order,
                },
            );
            logger
        };

        logger.info(format!(
            "Registered {} (v{})",
            metadata.name, metadata.version
        ));

        if let Err(e) = self.install(&id).await {
            self.mark_failed(&id, &e);
            return Err(e);
        }

        if options.auto_activate.unwrap_or(self.config.auto_activate) {
            if let Err(e) = self.activate(&id).await {
                self.mark_failed(&id, &e);
                return Err(e);
            }
        }

        Ok(())
    }

    // ========================================================================
    // 라이프사이클
    // ========================================================================

    /// Uninstalled → Installed (`install` 후 `on_install`)
    pub async fn install(&self, id: &str) -> Result<()> {
        let snap = self.snapshot(id)?;
        reject_error_state(id, snap.state)?;
        if snap.state != PluginState::Uninstalled {
            return Err(Error::invalid_state(id, "is already installed"));
        }

        snap.logger.info("Installing");
        let result = async {
            snap.plugin.install(&snap.context).await?;
            snap.plugin.on_install(&snap.context).await
        }
        .await;

        self.complete(id, &snap.logger, result, PluginState::Installed)
    }

    /// Installed | Inactive → Active. 이미 Active면 아무것도 하지 않는다.
    pub async fn activate(&self, id: &str) -> Result<()> {
        let snap = self.snapshot(id)?;
        if snap.state == PluginState::Active {
            return Ok(());
        }
        reject_error_state(id, snap.state)?;
        if !snap.state.can_activate() {
            return Err(Error::invalid_state(
                id,
                format!(
                    "must be installed or inactive to activate (current state: {})",
                    snap.state
                ),
            ));
        }

        snap.logger.info("Activating");
        let result = snap.plugin.on_activate(&snap.context).await;
        self.complete(id, &snap.logger, result, PluginState::Active)
    }

    /// Active → Inactive
    pub async fn deactivate(&self, id: &str) -> Result<()> {
        let snap = self.snapshot(id)?;
        reject_error_state(id, snap.state)?;
        if snap.state != PluginState::Active {
            return Err(Error::invalid_state(id, "is not active"));
        }

        snap.logger.info("Deactivating");
        let result = snap.plugin.on_deactivate(&snap.context).await;
        self.complete(id, &snap.logger, result, PluginState::Inactive)
    }

    /// (Active면 먼저 deactivate) → `on_uninstall` → 컨텍스트 정리 → 레지스트리에서 제거
    pub async fn uninstall(&self, id: &str) -> Result<()> {
        let snap = self.snapshot(id)?;
        reject_error_state(id, snap.state)?;

        if snap.state == PluginState::Active {
            self.deactivate(id).await?;
        }

        let state = self.snapshot(id)?.state;
        if !matches!(state, PluginState::Installed | PluginState::Inactive) {
            return Err(Error::invalid_state(
                id,
                format!(
                    "must be installed or inactive to uninstall (current state: {})",
                    state
                ),
            ));
        }

        snap.logger.info("Uninstalling");
        if let Err(e) = snap.plugin.on_uninstall(&snap.context).await {
            snap.logger.error(format!("Uninstall failed: {}", e));
            self.mark_failed(id, &e);
            return Err(e);
        }

        snap.context.cleanup();
        self.entries.write().remove(id);
        snap.logger.info("Uninstalled");
        Ok(())
    }

    /// 훅 호출 없이 제거. Active 상태면 거부한다.
    pub fn unregister(&self, id: &str) -> Result<()> {
        let entry = {
            let mut entries = self.entries.write();
            let state = entries
                .get(id)
                .map(|entry| entry.state)
                .ok_or_else(|| Error::PluginNotFound(id.to_string()))?;

            if state == PluginState::Active {
                return Err(Error::invalid_state(
                    id,
                    "must be deactivated before unregistering",
                ));
            }
            entries.remove(id)
        };

        if let Some(entry) = entry {
            entry.context.cleanup();
            entry.logger.info("Unregistered");
        }
        Ok(())
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn get_state(&self, id: &str) -> Option<PluginState> {
        self.entries.read().get(id).map(|entry| entry.state)
    }

    pub fn get_plugin(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        self.entries
            .read()
            .get(id)
            .map(|entry| Arc::clone(&entry.plugin))
    }

    /// 등록 순서대로 모든 플러그인 (복사본)
    pub fn get_all_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins_where(|_| true)
    }

    /// 등록 순서대로 Active 플러그인
    pub fn get_active_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins_where(|state| state == PluginState::Active)
    }

    pub fn has(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Uninstalled가 아닌 모든 상태 (Error 포함)
    pub fn is_installed(&self, id: &str) -> bool {
        self.get_state(id)
            .is_some_and(|state| state != PluginState::Uninstalled)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.get_state(id) == Some(PluginState::Active)
    }

    /// Error 상태 항목에 기록된 에러 메시지
    pub fn get_error(&self, id: &str) -> Option<String> {
        self.entries
            .read()
            .get(id)
            .and_then(|entry| entry.error.clone())
    }

    /// 플러그인 컨텍스트 (호스트 / 테스트용)
    pub fn context(&self, id: &str) -> Option<Arc<PluginContext>> {
        self.entries
            .read()
            .get(id)
            .map(|entry| Arc::clone(&entry.context))
    }

    /// 등록 순서대로 (ID, 상태)
    pub fn states(&self) -> Vec<(String, PluginState)> {
        self.ordered_entries(|entry| (entry.metadata.id.clone(), entry.state))
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn config(&self) -> &PluginManagerConfig {
        &self.config
    }

    /// 상태별 개수
    pub fn summary(&self) -> PluginSummary {
        let entries = self.entries.read();
        let mut summary = PluginSummary {
            total: entries.len(),
            ..Default::default()
        };

        for entry in entries.values() {
            match entry.state {
                PluginState::Uninstalled => summary.uninstalled += 1,
                PluginState::Installed => summary.installed += 1,
                PluginState::Active => summary.active += 1,
                PluginState::Inactive => summary.inactive += 1,
                PluginState::Error => summary.errored += 1,
            }
        }
        summary
    }

    // ========================================================================
    // 정리
    // ========================================================================

    /// 전체 정리 (best-effort)
    ///
    /// Active → deactivate, 남은 Installed/Inactive → uninstall. 개별 실패는 로깅만
    /// 하고 계속 진행한다. 나중에 등록된 것부터 처리한 뒤 레지스트리를 비운다.
    pub async fn cleanup(&self) {
        let active = self.ids_where(|state| state == PluginState::Active);
        for id in active.iter().rev() {
            if let Err(e) = self.deactivate(id).await {
                warn!("Failed to deactivate plugin {} during cleanup: {}", id, e);
            }
        }

        let installed = self.ids_where(|state| {
            matches!(state, PluginState::Installed | PluginState::Inactive)
        });
        for id in installed.iter().rev() {
            if let Err(e) = self.uninstall(id).await {
                warn!("Failed to uninstall plugin {} during cleanup: {}", id, e);
            }
        }

        let remaining: Vec<PluginEntry> = self.entries.write().drain().map(|(_, e)| e).collect();
        for entry in &remaining {
            entry.context.cleanup();
        }

        info!(
            "Plugin manager cleaned up ({} entries dropped without uninstall)",
            remaining.len()
        );
    }

    // ========================================================================
    // 내부
    // ========================================================================

    fn snapshot(&self, id: &str) -> Result<Snapshot> {
        let entries = self.entries.read();
        let entry = entries
            .get(id)
            .ok_or_else(|| Error::PluginNotFound(id.to_string()))?;

        Ok(Snapshot {
            plugin: Arc::clone(&entry.plugin),
            context: Arc::clone(&entry.context),
            logger: entry.logger.clone(),
            state: entry.state,
        })
    }

    /// 훅 결과 반영: 성공 → next, 실패 → Error + 재전파
    fn complete(
        &self,
        id: &str,
        logger: &Logger,
        result: Result<()>,
        next: PluginState,
    ) -> Result<()> {
        match result {
            Ok(()) => {
                if let Some(entry) = self.entries.write().get_mut(id) {
                    entry.state = next;
                }
                logger.info(format!("State changed to {}", next));
                Ok(())
            }
            Err(e) => {
                logger.error(format!("Transition to {} failed: {}", next, e));
                self.mark_failed(id, &e);
                Err(e)
            }
        }
    }

    fn mark_failed(&self, id: &str, error: &Error) {
        if let Some(entry) = self.entries.write().get_mut(id) {
            entry.state = PluginState::Error;
            entry.error = Some(error.to_string());
            debug!("Plugin {} moved to error state", id);
        }
    }

    fn ordered_entries<T>(&self, map: impl Fn(&PluginEntry) -> T) -> Vec<T> {
        let entries = self.entries.read();
        let mut ordered: Vec<&PluginEntry> = entries.values().collect();
        ordered.sort_by_key(|entry| entry.load_order);
        ordered.into_iter().map(map).collect()
    }

    fn plugins_where(&self, pred: impl Fn(PluginState) -> bool) -> Vec<Arc<dyn Plugin>> {
        self.ordered_entries(|entry| (entry.state, Arc::clone(&entry.plugin)))
            .into_iter()
            .filter(|(state, _)| pred(*state))
            .map(|(_, plugin)| plugin)
            .collect()
    }

    fn ids_where(&self, pred: impl Fn(PluginState) -> bool) -> Vec<String> {
        self.states()
            .into_iter()
            .filter(|(_, state)| pred(*state))
            .map(|(id, _)| id)
            .collect()
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new(PluginManagerConfig::default())
    }
}

/// Error는 종료 상태: 라이프사이클 연산은 모두 거부된다
fn reject_error_state(id: &str, state: PluginState) -> Result<()> {
    if state == PluginState::Error {
        return Err(Error::invalid_state(
            id,
            "is in error state; unregister and register it again",
        ));
    }
    Ok(())
}

/// 플러그인 시스템 요약
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    pub total: usize,
    pub uninstalled: usize,
    pub installed: usize,
    pub active: usize,
    pub inactive: usize,
    pub errored: usize,
}
