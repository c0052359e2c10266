mod error;
mod config;
mod device;
mod cmd;

// 功能模块
pub mod app;
pub mod bridge;
pub mod parser;
pub mod utils;

// 导出主要类型
pub use bridge::{Bridge, ProcessBridge};
pub use cmd::{BOOT_ANIMATION_STOPPED, PROP_BOOT_ANIMATION_STATE, PROP_CPU_ABILIST};
pub use config::{adb_path_in_sdk, ADBConfig, ADBConfigBuilder};
pub use device::{fallback_name, Device, DeviceEntry, DeviceKind, DeviceStatus, ADB};
pub use error::{ADBError, ADBResult};

// 便利的预导出模块
pub mod prelude {
    pub use super::{ADB, ADBConfig, ADBConfigBuilder, ADBError, ADBResult, Bridge, Device, DeviceKind};
}
