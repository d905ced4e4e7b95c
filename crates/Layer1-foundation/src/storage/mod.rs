//! Storage module for Tessera
//!
//! - `json`: JSON - 설정 파일 저장/로드 (런타임 상태는 저장하지 않음)

mod json;

pub use json::JsonStore;
