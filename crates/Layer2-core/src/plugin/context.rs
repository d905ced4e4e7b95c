//! Plugin Context - 플러그인에 제공되는 capability 표면
//!
//! 플러그인이 공유 전역 상태(element registry, document root 스타일, 디자인 토큰)를
//! 건드릴 수 있는 유일한 통로다. 만든 것은 모두 추적해서 `cleanup()`으로 되돌린다.
//! 단, custom element 정의는 플랫폼에 해제 연산이 없어 영구적으로 남는다.

use super::events::{EventEmitter, EventHandler, ListenerId};
use super::logger::Logger;
use super::platform::{
    Document, ElementConstructor, ElementRegistry, Platform, StyleElement, StyleId,
};
use super::theme::{ThemeDefinition, TokenMap};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use tessera_foundation::Result;

/// 플러그인 컨텍스트 - 플러그인이 호스트와 상호작용하는 인터페이스
pub struct PluginContext {
    plugin_id: String,
    logger: Logger,
    platform: Platform,

    /// 이 컨텍스트가 정의한 컴포넌트 (tag → constructor)
    components: RwLock<BTreeMap<String, ElementConstructor>>,

    /// 등록한 테마
    themes: RwLock<BTreeMap<String, ThemeDefinition>>,

    /// 누적 확장 토큰
    tokens: RwLock<TokenMap>,

    /// 플러그인 전용 이벤트 버스
    events: EventEmitter,
}

impl PluginContext {
    /// 새 컨텍스트 생성
    pub fn new(plugin_id: impl Into<String>, logger: Logger, platform: Platform) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            events: EventEmitter::new(logger.clone()),
            logger,
            platform,
            components: RwLock::new(BTreeMap::new()),
            themes: RwLock::new(BTreeMap::new()),
            tokens: RwLock::new(TokenMap::new()),
        }
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    // ========================================================================
    // 컴포넌트 등록
    // ========================================================================

    /// custom element 정의
    ///
    /// 이미 정의된 tag는 경고만 남기고 건너뛴다 (에러 아님).
    pub fn register_component(&self, tag: &str, constructor: ElementConstructor) -> Result<()> {
        if self.components.read().contains_key(tag) {
            self.logger
                .warn(format!("Component {} is already registered", tag));
            return Ok(());
        }

        if self.platform.elements.is_registered(tag) {
            self.logger.warn(format!(
                "Custom element {} is already defined, skipping registration",
                tag
            ));
            return Ok(());
        }

        self.platform
            .elements
            .register(tag, constructor.clone())?;
        self.components.write().insert(tag.to_string(), constructor);
        self.logger.info(format!("Registered component: {}", tag));
        Ok(())
    }

    // ========================================================================
    // 테마 / 토큰
    // ========================================================================

    /// 테마 적용: 토큰 → root custom property, styles / dark → 태그된 `<style>`
    pub fn register_theme(&self, name: &str, theme: ThemeDefinition) {
        let document = &self.platform.document;

        for (token, value) in &theme.tokens {
            document.set_root_property(token, value);
        }

        if let Some(styles) = theme.styles.as_deref() {
            document.append_style(&self.plugin_id, styles);
        }

        if let Some(dark) = theme.dark_stylesheet() {
            document.append_style(&self.plugin_id, &dark);
        }

        self.logger.info(format!(
            "Registered theme: {} ({} tokens)",
            name,
            theme.tokens.len()
        ));
        self.themes.write().insert(name.to_string(), theme);
    }

    /// 디자인 토큰 확장 (기존 맵에 병합, 교체 아님)
    pub fn extend_tokens<I, K, V>(&self, tokens: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let document = &self.platform.document;
        let mut extended = self.tokens.write();
        let mut count = 0;

        for (name, value) in tokens {
            let (name, value) = (name.into(), value.into());
            document.set_root_property(&name, &value);
            extended.insert(name, value);
            count += 1;
        }

        self.logger.info(format!("Extended {} design tokens", count));
    }

    /// 전역 스타일 추가. 호출할 때마다 새 `<style>` 요소가 생긴다.
    pub fn add_global_styles(&self, css: &str) -> StyleId {
        let id = self.platform.document.append_style(&self.plugin_id, css);
        self.logger.info("Added global styles");
        id
    }

    // ========================================================================
    // 이벤트
    // ========================================================================

    pub fn on(&self, event: &str, handler: EventHandler) -> ListenerId {
        self.events.on(event, handler)
    }

    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.events.off(event, id)
    }

    /// 등록 순서대로 핸들러 호출. 핸들러 실패는 로깅만 한다.
    pub fn emit(&self, event: &str, args: &[Value]) -> usize {
        self.events.emit(event, args)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.events.listener_count(event)
    }

    // ========================================================================
    // 조회 (테스트 / introspection)
    // ========================================================================

    pub fn get_registered_components(&self) -> BTreeMap<String, ElementConstructor> {
        self.components.read().clone()
    }

    pub fn get_registered_themes(&self) -> BTreeMap<String, ThemeDefinition> {
        self.themes.read().clone()
    }

    pub fn get_extended_tokens(&self) -> TokenMap {
        self.tokens.read().clone()
    }

    /// document에 남아 있는 이 플러그인의 `<style>` 요소
    pub fn injected_styles(&self) -> Vec<StyleElement> {
        self.platform.document.styles_for(&self.plugin_id)
    }

    // ========================================================================
    // 정리
    // ========================================================================

    /// 태그된 `<style>` 요소 전부 제거 + 핸들러 맵 초기화
    ///
    /// root에 적용된 토큰과 정의된 custom element는 남는다.
    pub fn cleanup(&self) {
        let removed = self.platform.document.remove_styles_for(&self.plugin_id);
        self.events.clear();
        self.logger
            .info(format!("Cleaned up {} style elements", removed));
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("plugin_id", &self.plugin_id)
            .field("components", &self.components.read().keys().collect::<Vec<_>>())
            .field("themes", &self.themes.read().keys().collect::<Vec<_>>())
            .field("tokens", &self.tokens.read().len())
            .finish()
    }
}
