use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// ADB 配置结构体
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ADBConfig {
    /// ADB 可执行文件路径
    pub path: PathBuf,
    /// 单条命令超时（毫秒），0 表示不限制
    pub timeout: u64,
    /// 每条命令前附加的全局参数（例如 `-H host`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_args: Option<Vec<String>>,
}

impl Default for ADBConfig {
    fn default() -> Self {
        ADBConfig {
            path: PathBuf::from("adb"),
            timeout: 30000, // 30秒超时
            additional_args: None,
        }
    }
}

impl ADBConfig {
    /// 根据 `ANDROID_HOME` / `ANDROID_SDK_ROOT` 定位 ADB，找不到时使用 PATH 中的 `adb`
    pub fn from_env() -> Self {
        let sdk_root = ["ANDROID_HOME", "ANDROID_SDK_ROOT"]
            .iter()
            .filter_map(|key| env::var_os(key))
            .find(|value| !value.is_empty());

        let path = match sdk_root {
            Some(root) => adb_path_in_sdk(PathBuf::from(root)),
            None => PathBuf::from("adb"),
        };

        ADBConfig {
            path,
            ..ADBConfig::default()
        }
    }
}

/// SDK 目录下 platform-tools 中的 adb 路径
pub fn adb_path_in_sdk(sdk_root: PathBuf) -> PathBuf {
    let exe = if cfg!(windows) { "adb.exe" } else { "adb" };
    sdk_root.join("platform-tools").join(exe)
}

/// ADB 配置构建器
#[derive(Default)]
pub struct ADBConfigBuilder {
    path: Option<PathBuf>,
    timeout: Option<u64>,
    additional_args: Option<Vec<String>>,
}

impl ADBConfigBuilder {
    /// 设置 ADB 可执行文件路径
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// 设置操作超时
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 添加额外命令行参数
    pub fn add_arg(mut self, arg: &str) -> Self {
        self.additional_args
            .get_or_insert_with(Vec::new)
            .push(arg.to_string());
        self
    }

    /// 构建 ADB 配置
    pub fn build(self) -> ADBConfig {
        let default = ADBConfig::default();

        ADBConfig {
            path: self.path.unwrap_or(default.path),
            timeout: self.timeout.unwrap_or(default.timeout),
            additional_args: self.additional_args,
        }
    }
}
