use crate::error::ADBResult;
use log::warn;
use std::time::{Duration, Instant};

/// 根据条件轮询等待，条件出错时记录日志并继续等待
pub fn wait_with_polling<F>(timeout_ms: u64, poll_interval_ms: u64, condition_fn: F) -> bool
where
    F: Fn() -> ADBResult<bool>,
{
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    let interval = Duration::from_millis(poll_interval_ms);

    loop {
        match condition_fn() {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => warn!("检查条件时出错: {}", e),
        }

        if start.elapsed() + interval > timeout {
            return false;
        }

        std::thread::sleep(interval);
    }
}

/// 检查字符串是否包含任何给定的关键字
pub fn contains_any(s: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| s.contains(keyword))
}

/// 把字节按 Latin-1 逐字节解码，任何输入都不会失败
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ADBError;
    use std::cell::Cell;

    #[test]
    fn polling_stops_once_condition_holds() {
        let calls = Cell::new(0);
        let done = wait_with_polling(1000, 1, || {
            calls.set(calls.get() + 1);
            Ok(calls.get() >= 3)
        });
        assert!(done);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn polling_gives_up_after_timeout() {
        let done = wait_with_polling(10, 5, || {
            Err(ADBError::ProcessError("offline".to_string()))
        });
        assert!(!done);
    }

    #[test]
    fn latin1_decoding_keeps_every_byte() {
        assert_eq!(decode_latin1(b"[a]: [b]"), "[a]: [b]");
        assert_eq!(decode_latin1(&[0xE9]), "é");
    }
}
