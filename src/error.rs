use thiserror::Error;
use std::time::Duration;

/// ADB 客户端错误类型
#[derive(Debug, Error)]
pub enum ADBError {
    /// ADB 进程无法执行，或以非零状态退出
    #[error("ADB 进程错误: {0}")]
    ProcessError(String),

    /// 设备查询失败（名称查询、属性读取等）
    #[error("设备查询错误: {0}")]
    DeviceQueryError(String),

    /// Activity 启动或应用打开失败，携带设备输出的原始错误文本
    #[error("启动失败: {0}")]
    LaunchError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 超时错误
    #[error("操作超时 ({duration:?}): {message}")]
    TimeoutError {
        message: String,
        duration: Duration,
    },
}

impl ADBError {
    /// 将任意失败归类为设备查询错误，保留原始描述
    pub(crate) fn into_query_error(self) -> Self {
        match self {
            ADBError::DeviceQueryError(msg) => ADBError::DeviceQueryError(msg),
            other => ADBError::DeviceQueryError(other.to_string()),
        }
    }
}

pub type ADBResult<T> = Result<T, ADBError>;
