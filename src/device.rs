use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::bridge::{Bridge, ProcessBridge};
use crate::config::ADBConfig;

/// 模拟器序列号的前缀，例如 `emulator-5554`
const EMULATOR_PREFIX: &str = "emulator-";

/// ADB 设备状态枚举
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    Online,
    Offline,
    Unauthorized,
    Recovery,
    Sideload,
    Bootloader,
    Other(String),
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Online => write!(f, "device"),
            DeviceStatus::Offline => write!(f, "offline"),
            DeviceStatus::Unauthorized => write!(f, "unauthorized"),
            DeviceStatus::Recovery => write!(f, "recovery"),
            DeviceStatus::Sideload => write!(f, "sideload"),
            DeviceStatus::Bootloader => write!(f, "bootloader"),
            DeviceStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for DeviceStatus {
    fn from(s: &str) -> Self {
        match s {
            "device" => DeviceStatus::Online,
            "offline" => DeviceStatus::Offline,
            "unauthorized" => DeviceStatus::Unauthorized,
            "recovery" => DeviceStatus::Recovery,
            "sideload" => DeviceStatus::Sideload,
            "bootloader" => DeviceStatus::Bootloader,
            _ => DeviceStatus::Other(s.to_string()),
        }
    }
}

/// 设备类型：真机或模拟器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Device,
    Emulator,
}

impl DeviceKind {
    /// 由序列号推断设备类型
    pub fn from_id(id: &str) -> Self {
        if id.starts_with(EMULATOR_PREFIX) {
            DeviceKind::Emulator
        } else {
            DeviceKind::Device
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Device => write!(f, "device"),
            DeviceKind::Emulator => write!(f, "emulator"),
        }
    }
}

/// `adb devices -l` 中的一行，尚未补全显示名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    pub id: String,
    pub status: DeviceStatus,
    pub model: Option<String>,
    pub product: Option<String>,
    pub device: Option<String>,
    pub transport_id: Option<String>,
}

impl DeviceEntry {
    pub fn new(id: &str, status: DeviceStatus) -> Self {
        Self {
            id: id.to_string(),
            status,
            model: None,
            product: None,
            device: None,
            transport_id: None,
        }
    }

    /// 只有状态为 `device` 的设备完成了授权握手
    pub fn is_authorized(&self) -> bool {
        self.status == DeviceStatus::Online
    }

    pub fn kind(&self) -> DeviceKind {
        DeviceKind::from_id(&self.id)
    }
}

/// 已连接的真机或模拟器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub is_authorized: bool,
    pub is_booted: bool,
}

impl Device {
    /// 创建新设备实例，显示名称使用占位名
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: fallback_name(id),
            kind: DeviceKind::from_id(id),
            is_authorized: false,
            is_booted: false,
        }
    }

    /// 设置设备名称
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_authorized(mut self, authorized: bool) -> Self {
        self.is_authorized = authorized;
        self
    }

    pub fn with_booted(mut self, booted: bool) -> Self {
        self.is_booted = booted;
        self
    }

    pub fn is_emulator(&self) -> bool {
        self.kind == DeviceKind::Emulator
    }

    /// 序列号或显示名称与另一个设备描述相同
    pub fn matches(&self, other: &Device) -> bool {
        (!other.id.is_empty() && self.id == other.id)
            || (!other.name.is_empty() && self.name == other.name)
    }
}

/// 无法查询名称时使用的占位名
pub fn fallback_name(id: &str) -> String {
    format!("Device {}", id)
}

/// ADB 主结构体
///
/// 克隆出的实例共享同一个桥接通道，所有命令经由同一把锁串行执行。
#[derive(Clone)]
pub struct ADB {
    pub config: ADBConfig,
    bridge: Arc<Mutex<Box<dyn Bridge>>>,
}

impl ADB {
    /// 创建使用本地 adb 可执行文件的实例
    pub fn new(config: Option<ADBConfig>) -> Self {
        let config = config.unwrap_or_default();
        let bridge = ProcessBridge::new(config.clone());
        Self::with_bridge(config, bridge)
    }

    /// 使用自定义桥接实现（远程代理、测试替身等）
    pub fn with_bridge(config: ADBConfig, bridge: impl Bridge + 'static) -> Self {
        let bridge: Box<dyn Bridge> = Box::new(bridge);
        Self {
            config,
            bridge: Arc::new(Mutex::new(bridge)),
        }
    }

    /// 独占桥接通道；上一个持有者 panic 后通道依然可用
    pub(crate) fn channel(&self) -> MutexGuard<'_, Box<dyn Bridge>> {
        self.bridge.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for ADB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ADB")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_emulator_prefix() {
        assert_eq!(DeviceKind::from_id("emulator-5554"), DeviceKind::Emulator);
        assert_eq!(DeviceKind::from_id("FA8251A00720"), DeviceKind::Device);
        assert_eq!(DeviceKind::from_id("192.168.1.20:5555"), DeviceKind::Device);
    }

    #[test]
    fn only_device_status_is_authorized() {
        assert!(DeviceEntry::new("a", DeviceStatus::from("device")).is_authorized());
        for raw in ["unauthorized", "offline", "recovery", "no", "authorizing"] {
            assert!(!DeviceEntry::new("a", DeviceStatus::from(raw)).is_authorized());
        }
        assert_eq!(
            DeviceStatus::from("authorizing"),
            DeviceStatus::Other("authorizing".to_string())
        );
    }

    #[test]
    fn new_device_uses_fallback_name() {
        let device = Device::new("FA8251A00719");
        assert_eq!(device.name, "Device FA8251A00719");
        assert_eq!(device.kind, DeviceKind::Device);
        assert!(!device.is_authorized);
    }

    #[test]
    fn matches_by_id_or_name() {
        let listed = Device::new("emulator-5554").with_name("Pixel_4_XL_API_30");

        assert!(listed.matches(&Device::new("emulator-5554")));
        assert!(listed.matches(&Device::new("").with_name("Pixel_4_XL_API_30")));
        assert!(!listed.matches(&Device::new("").with_name("")));
        assert!(!listed.matches(&Device::new("emulator-5556")));
    }

    #[test]
    fn serializes_kind_as_type() {
        let device = Device::new("emulator-5554")
            .with_name("Pixel_4_XL_API_30")
            .with_authorized(true)
            .with_booted(true);
        let json = serde_json::to_value(&device).unwrap();

        assert_eq!(json["type"], "emulator");
        assert_eq!(json["name"], "Pixel_4_XL_API_30");
        assert_eq!(json["is_booted"], true);
    }
}
