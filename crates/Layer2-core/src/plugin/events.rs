//! Plugin Events - 플러그인 전용 이벤트 버스
//!
//! 컨텍스트마다 하나씩 존재한다. 다른 플러그인의 이벤트와 섞이지 않는다.

use super::logger::Logger;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tessera_foundation::Result;

/// 이벤트 핸들러. 인자는 emit에 전달된 값 그대로.
pub type EventHandler = Arc<dyn Fn(&[Value]) -> Result<()> + Send + Sync>;

/// `off`에 사용하는 리스너 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

// ============================================================================
// EventEmitter
// ============================================================================

/// 이벤트 이름 → 등록 순서대로의 핸들러 목록
pub struct EventEmitter {
    handlers: RwLock<HashMap<String, Vec<(ListenerId, EventHandler)>>>,
    next_id: AtomicU64,
    logger: Logger,
}

impl EventEmitter {
    pub fn new(logger: Logger) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            logger,
        }
    }

    /// 핸들러 등록 (같은 이벤트에 여러 개 가능)
    pub fn on(&self, event: &str, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.handlers
            .write()
            .entry(event.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    /// 특정 핸들러 제거
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut handlers = self.handlers.write();
        let Some(list) = handlers.get_mut(event) else {
            return false;
        };

        let before = list.len();
        list.retain(|(listener, _)| *listener != id);
        let removed = list.len() != before;
        if list.is_empty() {
            handlers.remove(event);
        }
        removed
    }

    /// 등록 순서대로 핸들러 호출, 성공한 핸들러 수 반환
    ///
    /// 실패(에러 반환 또는 panic)는 로깅만 하고 다음 핸들러를 계속 호출한다.
    pub fn emit(&self, event: &str, args: &[Value]) -> usize {
        // 핸들러 안에서 on/off를 호출할 수 있도록 스냅샷 후 락 해제
        let snapshot: Vec<(ListenerId, EventHandler)> = match self.handlers.read().get(event) {
            Some(list) => list.clone(),
            None => return 0,
        };

        let mut succeeded = 0;
        for (id, handler) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler(args))) {
                Ok(Ok(())) => succeeded += 1,
                Ok(Err(e)) => {
                    self.logger
                        .error(format!("Error in event handler for {} ({}): {}", event, id, e));
                }
                Err(payload) => {
                    self.logger.error(format!(
                        "Event handler for {} ({}) panicked: {}",
                        event,
                        id,
                        panic_message(payload.as_ref())
                    ));
                }
            }
        }
        succeeded
    }

    /// 이벤트별 핸들러 수
    pub fn listener_count(&self, event: &str) -> usize {
        self.handlers.read().get(event).map_or(0, Vec::len)
    }

    /// 등록된 이벤트 이름 (정렬)
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// 모든 핸들러 제거
    pub fn clear(&self) {
        self.handlers.write().clear();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::logger::LogLevel;
    use parking_lot::Mutex;
    use tessera_foundation::Error;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> EventHandler {
        let log = Arc::clone(log);
        Arc::new(move |args: &[Value]| -> Result<()> {
            log.lock().push(format!("{}:{}", tag, args.len()));
            Ok(())
        })
    }

    #[test]
    fn test_emit_in_registration_order() {
        let emitter = EventEmitter::new(Logger::new("p", true));
        let log = Arc::new(Mutex::new(Vec::new()));

        emitter.on("change", recorder(&log, "first"));
        emitter.on("change", recorder(&log, "second"));

        let ran = emitter.emit("change", &[Value::from(1), Value::from("x")]);
        assert_eq!(ran, 2);
        assert_eq!(*log.lock(), vec!["first:2", "second:2"]);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let emitter = EventEmitter::new(Logger::new("p", true));
        assert_eq!(emitter.emit("nothing", &[]), 0);
    }

    #[test]
    fn test_off_removes_single_handler() {
        let emitter = EventEmitter::new(Logger::new("p", true));
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = emitter.on("change", recorder(&log, "first"));
        emitter.on("change", recorder(&log, "second"));

        assert!(emitter.off("change", first));
        assert!(!emitter.off("change", first));
        assert_eq!(emitter.listener_count("change"), 1);

        emitter.emit("change", &[]);
        assert_eq!(*log.lock(), vec!["second:0"]);
    }

    #[test]
    fn test_failing_handlers_are_logged() {
        let logger = Logger::new("p", true);
        let emitter = EventEmitter::new(logger.clone());
        let log = Arc::new(Mutex::new(Vec::new()));

        emitter.on(
            "change",
            Arc::new(|_: &[Value]| -> Result<()> { Err(Error::from("bad handler")) }),
        );
        emitter.on(
            "change",
            Arc::new(|_: &[Value]| -> Result<()> { panic!("handler exploded") }),
        );
        emitter.on("change", recorder(&log, "last"));

        assert_eq!(emitter.emit("change", &[]), 1);
        assert_eq!(*log.lock(), vec!["last:0"]);

        let errors = logger.records_at(LogLevel::Error);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.starts_with("[Plugin:p] Error in event handler for change"));
        assert!(errors[1].message.contains("handler exploded"));
    }

    #[test]
    fn test_clear() {
        let emitter = EventEmitter::new(Logger::new("p", true));
        let log = Arc::new(Mutex::new(Vec::new()));
        emitter.on("a", recorder(&log, "a"));
        emitter.on("b", recorder(&log, "b"));
        assert_eq!(emitter.event_names(), vec!["a".to_string(), "b".to_string()]);

        emitter.clear();
        assert_eq!(emitter.emit("a", &[]), 0);
        assert!(log.lock().is_empty());
    }
}
