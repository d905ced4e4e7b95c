//! Platform - 플러그인이 쓰는 공유 전역 상태의 추상화
//!
//! 브라우저의 custom element registry와 document를 주입 가능한 trait으로 분리한다.
//! 실제 호스트는 자신의 구현을 넣고, 기본값은 프로세스 메모리 구현이다.
//!
//! ```text
//! PluginContext ──► Platform ──┬── ElementRegistry (tag → constructor, 해제 없음)
//!                              └── Document (root custom properties, <style> 목록)
//! ```

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tessera_foundation::{Error, Result};

// ============================================================================
// Components
// ============================================================================

/// 등록 가능한 UI 컴포넌트 인스턴스
pub trait CustomElement: Send + Sync {
    /// 속성을 받아 마크업 렌더링
    fn render(&self, attributes: &BTreeMap<String, String>) -> String;
}

/// 컴포넌트 생성자 (tag 하나에 하나)
pub type ElementConstructor = Arc<dyn Fn() -> Box<dyn CustomElement> + Send + Sync>;

/// custom element 이름 규칙: 소문자로 시작, 하이픈 포함, 대문자 없음
pub fn is_valid_custom_element_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    let starts_lower = matches!(chars.next(), Some(c) if c.is_ascii_lowercase());
    starts_lower
        && tag.contains('-')
        && !tag.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace())
}

// ============================================================================
// ElementRegistry
// ============================================================================

/// 전역 custom element registry
///
/// 등록 해제 연산은 없다. 한 번 정의된 tag는 프로세스가 끝날 때까지 유지된다.
pub trait ElementRegistry: Send + Sync {
    fn is_registered(&self, tag: &str) -> bool;

    fn register(&self, tag: &str, constructor: ElementConstructor) -> Result<()>;
}

/// 메모리 기반 ElementRegistry
#[derive(Default)]
pub struct MemoryElementRegistry {
    definitions: RwLock<HashMap<String, ElementConstructor>>,
}

impl MemoryElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 등록된 tag로 인스턴스 생성
    pub fn create(&self, tag: &str) -> Option<Box<dyn CustomElement>> {
        let definitions = self.definitions.read();
        definitions.get(tag).map(|constructor| constructor())
    }

    /// 등록된 tag 목록 (정렬)
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.definitions.read().keys().cloned().collect();
        tags.sort();
        tags
    }
}

impl ElementRegistry for MemoryElementRegistry {
    fn is_registered(&self, tag: &str) -> bool {
        self.definitions.read().contains_key(tag)
    }

    fn register(&self, tag: &str, constructor: ElementConstructor) -> Result<()> {
        if !is_valid_custom_element_name(tag) {
            return Err(Error::ElementRegistry(format!(
                "'{}' is not a valid custom element name",
                tag
            )));
        }

        let mut definitions = self.definitions.write();
        if definitions.contains_key(tag) {
            return Err(Error::ElementRegistry(format!(
                "'{}' has already been defined",
                tag
            )));
        }
        definitions.insert(tag.to_string(), constructor);
        Ok(())
    }
}

// ============================================================================
// Document
// ============================================================================

/// 주입된 `<style>` 요소 ID
pub type StyleId = u64;

/// 플러그인 ID로 태그된 `<style>` 요소
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleElement {
    pub id: StyleId,

    /// 소유 플러그인 (`data-plugin` 속성)
    pub plugin_id: String,

    pub css: String,
}

impl StyleElement {
    pub fn to_html(&self) -> String {
        format!("<style data-plugin=\"{}\">{}</style>", self.plugin_id, self.css)
    }
}

/// 공유 document (root 인라인 스타일 + style 요소)
pub trait Document: Send + Sync {
    /// root 요소에 custom property 설정
    fn set_root_property(&self, name: &str, value: &str);

    fn root_property(&self, name: &str) -> Option<String>;

    /// 태그된 `<style>` 요소 추가
    fn append_style(&self, plugin_id: &str, css: &str) -> StyleId;

    /// 문서 순서대로 모든 style 요소
    fn styles(&self) -> Vec<StyleElement>;

    /// 해당 플러그인으로 태그된 style 요소를 모두 제거, 제거 개수 반환
    fn remove_styles_for(&self, plugin_id: &str) -> usize;

    /// 해당 플러그인으로 태그된 style 요소
    fn styles_for(&self, plugin_id: &str) -> Vec<StyleElement> {
        self.styles()
            .into_iter()
            .filter(|s| s.plugin_id == plugin_id)
            .collect()
    }
}

/// 메모리 기반 Document
#[derive(Default)]
pub struct MemoryDocument {
    root_properties: RwLock<BTreeMap<String, String>>,
    styles: RwLock<Vec<StyleElement>>,
    next_style_id: AtomicU64,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// root custom property 전체 (이름순)
    pub fn root_properties(&self) -> BTreeMap<String, String> {
        self.root_properties.read().clone()
    }

    /// root 요소의 인라인 style 속성 문자열
    pub fn root_style(&self) -> String {
        self.root_properties
            .read()
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Document for MemoryDocument {
    fn set_root_property(&self, name: &str, value: &str) {
        self.root_properties
            .write()
            .insert(name.to_string(), value.to_string());
    }

    fn root_property(&self, name: &str) -> Option<String> {
        self.root_properties.read().get(name).cloned()
    }

    fn append_style(&self, plugin_id: &str, css: &str) -> StyleId {
        let id = self.next_style_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.styles.write().push(StyleElement {
            id,
            plugin_id: plugin_id.to_string(),
            css: css.to_string(),
        });
        id
    }

    fn styles(&self) -> Vec<StyleElement> {
        self.styles.read().clone()
    }

    fn remove_styles_for(&self, plugin_id: &str) -> usize {
        let mut styles = self.styles.write();
        let before = styles.len();
        styles.retain(|s| s.plugin_id != plugin_id);
        before - styles.len()
    }
}

// ============================================================================
// Platform
// ============================================================================

/// 매니저가 소유하고 모든 컨텍스트가 공유하는 플랫폼 핸들
#[derive(Clone)]
pub struct Platform {
    pub elements: Arc<dyn ElementRegistry>,
    pub document: Arc<dyn Document>,
}

impl Platform {
    pub fn new(elements: Arc<dyn ElementRegistry>, document: Arc<dyn Document>) -> Self {
        Self { elements, document }
    }

    /// 메모리 구현으로 생성
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryElementRegistry::new()),
            Arc::new(MemoryDocument::new()),
        )
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("styles", &self.document.styles().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Badge;

    impl CustomElement for Badge {
        fn render(&self, attributes: &BTreeMap<String, String>) -> String {
            let label = attributes.get("label").map(String::as_str).unwrap_or("");
            format!("<span class=\"badge\">{}</span>", label)
        }
    }

    fn badge() -> ElementConstructor {
        Arc::new(|| Box::new(Badge) as Box<dyn CustomElement>)
    }

    #[test]
    fn test_custom_element_names() {
        assert!(is_valid_custom_element_name("ds-badge"));
        assert!(is_valid_custom_element_name("x-a-b"));
        assert!(!is_valid_custom_element_name("badge"));
        assert!(!is_valid_custom_element_name("Ds-badge"));
        assert!(!is_valid_custom_element_name("-badge"));
        assert!(!is_valid_custom_element_name("ds-Badge"));
    }

    #[test]
    fn test_registry_define_once() {
        let registry = MemoryElementRegistry::new();
        registry.register("ds-badge", badge()).unwrap();

        assert!(registry.is_registered("ds-badge"));
        assert!(registry.register("ds-badge", badge()).is_err());
        assert!(registry.register("badge", badge()).is_err());
        assert_eq!(registry.tags(), vec!["ds-badge".to_string()]);

        let element = registry.create("ds-badge").unwrap();
        let mut attrs = BTreeMap::new();
        attrs.insert("label".to_string(), "new".to_string());
        assert_eq!(element.render(&attrs), "<span class=\"badge\">new</span>");
    }

    #[test]
    fn test_document_styles_by_plugin() {
        let document = MemoryDocument::new();
        let a = document.append_style("a", ".a{}");
        let b = document.append_style("b", ".b{}");
        document.append_style("a", ".a2{}");
        assert_ne!(a, b);

        assert_eq!(document.styles_for("a").len(), 2);
        assert_eq!(document.remove_styles_for("a"), 2);
        assert_eq!(document.styles().len(), 1);
        assert_eq!(
            document.styles()[0].to_html(),
            "<style data-plugin=\"b\">.b{}</style>"
        );
    }

    #[test]
    fn test_root_properties() {
        let document = MemoryDocument::new();
        document.set_root_property("--b", "2px");
        document.set_root_property("--a", "red");
        document.set_root_property("--a", "blue");

        assert_eq!(document.root_property("--a").as_deref(), Some("blue"));
        assert_eq!(document.root_style(), "--a: blue; --b: 2px;");
    }
}
