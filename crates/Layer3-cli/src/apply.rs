//! Theme pack 적용 / 검증

use crate::report::{Failure, Report};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tessera_core::{
    MemoryDocument, MemoryElementRegistry, Platform, PluginManager, PluginManagerConfig,
    RegisterOptions, Result, ThemePack, ThemePackPlugin,
};
use tracing::{info, warn};

/// apply 결과
pub struct ApplyOutcome {
    pub report: Report,
    pub failures: Vec<Failure>,
}

/// 주어진 순서대로 팩을 등록하고 document 상태를 캡처한 뒤 정리한다.
///
/// 실패한 팩이 있어도 나머지는 계속 등록한다 (그 팩에 의존하는 팩은 함께 실패).
pub async fn apply_packs(
    paths: &[PathBuf],
    config: PluginManagerConfig,
    no_activate: bool,
) -> ApplyOutcome {
    let document = Arc::new(MemoryDocument::new());
    let platform = Platform::new(Arc::new(MemoryElementRegistry::new()), document.clone());
    let manager = PluginManager::with_platform(config, platform);

    let options = if no_activate {
        RegisterOptions::new().auto_activate(false)
    } else {
        RegisterOptions::new()
    };

    let mut failures = Vec::new();
    for path in paths {
        match register_pack(&manager, path, options).await {
            Ok(id) => info!("Applied theme pack {} from {}", id, path.display()),
            Err(e) => {
                warn!("Failed to apply {}: {}", path.display(), e);
                failures.push(Failure {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let report = Report::capture(&manager, &document, &failures);
    manager.cleanup().await;

    ApplyOutcome { report, failures }
}

async fn register_pack(
    manager: &PluginManager,
    path: &Path,
    options: RegisterOptions,
) -> Result<String> {
    let pack = ThemePack::from_file(path)?;
    let id = pack.id().to_string();
    manager
        .register(Arc::new(ThemePackPlugin::new(pack)), options)
        .await?;
    Ok(id)
}

/// 팩 하나를 파싱/검증하고 한 줄 요약 반환
pub fn check_pack(path: &Path) -> Result<String> {
    let pack = ThemePack::from_file(path)?;
    let deps = if pack.metadata.dependencies.is_empty() {
        String::new()
    } else {
        format!(", depends on {}", pack.metadata.dependencies.join(", "))
    };

    Ok(format!(
        "{} {} ({} themes, {} tokens, {} global styles{})",
        pack.metadata.id,
        pack.metadata.version,
        pack.themes.len(),
        pack.tokens.len(),
        pack.global_styles.len(),
        deps
    ))
}
