//! ADB 文本输出解析
//!
//! ADB 的输出没有固定协议，只有约定俗成的格式：`devices -l` 的列布局、
//! `getprop` 的 `[key]: [value]` 行、以及以 `Error` 开头的错误行。
//! 这里的函数都是纯函数，不会因为输入中的坏行而失败，坏行直接丢弃。

use crate::device::{DeviceEntry, DeviceStatus};
use crate::error::{ADBError, ADBResult};
use crate::utils::contains_any;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static PROPERTY_LINE: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^\[([^\]]*)\]:\s*\[(.*)\]$").expect("属性行正则无效")
});

/// 解析 `adb devices -l` 的输出，按出现顺序返回设备条目
///
/// 标题行与 ADB 守护进程的提示行（以 `*` 开头）会被跳过，
/// 少于两个字段的行同样跳过。
pub fn parse_device_list(output: &str) -> Vec<DeviceEntry> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('*'))
        .filter(|line| !line.starts_with("List of devices"))
        .filter_map(parse_device_line)
        .collect()
}

fn parse_device_line(line: &str) -> Option<DeviceEntry> {
    let mut tokens = line.split_whitespace();
    let id = tokens.next()?;
    let status = tokens.next()?;

    let mut entry = DeviceEntry::new(id, DeviceStatus::from(status));
    for token in tokens {
        if let Some(value) = token.strip_prefix("model:") {
            entry.model = Some(value.to_string());
        } else if let Some(value) = token.strip_prefix("product:") {
            entry.product = Some(value.to_string());
        } else if let Some(value) = token.strip_prefix("device:") {
            entry.device = Some(value.to_string());
        } else if let Some(value) = token.strip_prefix("transport_id:") {
            entry.transport_id = Some(value.to_string());
        }
    }

    Some(entry)
}

/// 解析 getprop 输出为属性 HashMap，不符合 `[key]: [value]` 格式的行被丢弃
pub fn parse_properties(output: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();

    for line in output.lines() {
        if let Some(caps) = PROPERTY_LINE.captures(line.trim()) {
            let key = caps[1].trim();
            if key.is_empty() {
                continue;
            }
            properties.insert(key.to_string(), caps[2].to_string());
        }
    }

    properties
}

/// 从属性转储中只取出一个属性
pub fn parse_property(output: &str, key: &str) -> Option<String> {
    parse_properties(output).remove(key)
}

/// 解析 `ro.product.cpu.abilist` 这类逗号分隔的值，保持原有顺序
pub fn parse_abi_list(output: &str) -> Vec<String> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    line.split(',')
        .map(str::trim)
        .filter(|abi| !abi.is_empty())
        .map(str::to_string)
        .collect()
}

/// 一类命令的错误标记
///
/// 命中 `prefixes` 的行（去掉行首空白后）从该行起的全部输出作为失败原因；
/// 否则命中 `phrases` 的那一行作为失败原因。未识别的错误措辞会被当作成功。
#[derive(Debug, Clone, Copy)]
pub struct ErrorMarkers {
    pub prefixes: &'static [&'static str],
    pub phrases: &'static [&'static str],
}

/// `am start` 系列命令（启动 Activity、打开应用）
pub const LAUNCH_ERRORS: ErrorMarkers = ErrorMarkers {
    prefixes: &["Error"],
    phrases: &[
        "unable to resolve Intent",
        "does not exist",
        "No activities found",
    ],
};

/// `emu avd name` 模拟器名称查询
pub const EMULATOR_NAME_ERRORS: ErrorMarkers = ErrorMarkers {
    prefixes: &["Error", "error:", "KO:"],
    phrases: &[
        "could not connect to TCP port",
        "Connection refused",
        "no emulator detected",
    ],
};

impl ErrorMarkers {
    /// 返回分类后的失败原因；未发现错误标记时返回 `None`
    pub fn classify(&self, output: &str) -> Option<String> {
        let mut offset = 0;
        for line in output.split_inclusive('\n') {
            let trimmed = line.trim_start();
            if self.prefixes.iter().any(|prefix| trimmed.starts_with(prefix)) {
                let start = offset + (line.len() - trimmed.len());
                return Some(output[start..].trim().to_string());
            }
            offset += line.len();
        }

        output
            .lines()
            .find(|line| contains_any(line, self.phrases))
            .map(|line| line.trim().to_string())
    }
}

/// 从 `emu avd name` 的输出中取出模拟器名称（第一行）
pub fn parse_emulator_name(output: &str) -> ADBResult<String> {
    if let Some(reason) = EMULATOR_NAME_ERRORS.classify(output) {
        return Err(ADBError::DeviceQueryError(reason));
    }

    let name = output.lines().next().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ADBError::DeviceQueryError(
            "模拟器名称查询没有返回内容".to_string(),
        ));
    }

    Ok(name.to_string())
}
