//! Plugin Logger - 플러그인 스코프 로거
//!
//! 모든 메시지는 `[Plugin:<id>]` 접두사와 함께 `tracing`으로 출력된다.
//! 최근 기록은 메모리에 보관되어 테스트/진단에서 조회할 수 있다.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 히스토리 최대 크기
const DEFAULT_HISTORY_SIZE: usize = 100;

/// 로그 레벨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// 출력된 로그 한 건
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,

    /// 접두사 포함 전체 메시지
    pub message: String,

    pub timestamp: DateTime<Utc>,
}

/// 플러그인 스코프 로거
///
/// Clone은 같은 상태(enabled, history)를 공유한다. 매니저와 컨텍스트가
/// 하나의 로거를 나눠 쓴다.
#[derive(Debug, Clone)]
pub struct Logger {
    prefix: Arc<str>,
    enabled: Arc<AtomicBool>,
    history: Arc<Mutex<VecDeque<LogRecord>>>,
    history_size: usize,
}

impl Logger {
    /// 새 로거 생성
    pub fn new(plugin_id: &str, enabled: bool) -> Self {
        Self {
            prefix: Arc::from(format!("[Plugin:{}]", plugin_id)),
            enabled: Arc::new(AtomicBool::new(enabled)),
            history: Arc::new(Mutex::new(VecDeque::with_capacity(DEFAULT_HISTORY_SIZE))),
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        if let Some(line) = self.record(LogLevel::Info, message.as_ref()) {
            info!("{}", line);
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        if let Some(line) = self.record(LogLevel::Warn, message.as_ref()) {
            warn!("{}", line);
        }
    }

    pub fn error(&self, message: impl AsRef<str>) {
        if let Some(line) = self.record(LogLevel::Error, message.as_ref()) {
            error!("{}", line);
        }
    }

    /// 최근 출력 기록 (오래된 순)
    pub fn records(&self) -> Vec<LogRecord> {
        self.history.lock().iter().cloned().collect()
    }

    /// 특정 레벨 기록만 조회
    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        self.history
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect()
    }

    fn record(&self, level: LogLevel, message: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let line = format!("{} {}", self.prefix, message);
        let mut history = self.history.lock();
        if history.len() >= self.history_size {
            history.pop_front();
        }
        history.push_back(LogRecord {
            level,
            message: line.clone(),
            timestamp: Utc::now(),
        });
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix() {
        let logger = Logger::new("charts", true);
        logger.info("installed");

        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "[Plugin:charts] installed");
        assert_eq!(records[0].level, LogLevel::Info);
    }

    #[test]
    fn test_disabled_logger_is_silent() {
        let logger = Logger::new("charts", false);
        logger.warn("ignored");
        assert!(logger.records().is_empty());

        logger.set_enabled(true);
        logger.error("kept");
        assert_eq!(logger.records_at(LogLevel::Error).len(), 1);
        assert!(logger.records_at(LogLevel::Warn).is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let logger = Logger::new("p", true);
        let clone = logger.clone();

        clone.info("from clone");
        assert_eq!(logger.records().len(), 1);

        logger.set_enabled(false);
        assert!(!clone.is_enabled());
    }

    #[test]
    fn test_history_is_bounded() {
        let logger = Logger::new("p", true);
        for i in 0..(DEFAULT_HISTORY_SIZE + 5) {
            logger.info(format!("msg {}", i));
        }

        let records = logger.records();
        assert_eq!(records.len(), DEFAULT_HISTORY_SIZE);
        assert_eq!(records[0].message, "[Plugin:p] msg 5");
    }
}
