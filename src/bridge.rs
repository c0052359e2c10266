use crate::config::ADBConfig;
use crate::error::{ADBError, ADBResult};
use crate::utils::decode_latin1;
use log::{debug, trace, warn};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// 等待子进程退出时的轮询间隔
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 与 ADB 服务进程通信的边界
///
/// 客户端只通过这两个操作访问设备。实现者负责进程的启动、超时与重连；
/// 客户端保证同一时刻只有一条命令在执行。
pub trait Bridge: Send {
    /// 执行一条 ADB 命令，返回标准输出与标准错误的合并文本
    fn run_command(&self, args: &[String]) -> ADBResult<String>;

    /// 执行一条读取类命令（属性快照、`cat` 文件等），输出按字节解码，
    /// 不会因为非 UTF-8 内容而失败
    fn read_output(&self, args: &[String]) -> ADBResult<String>;
}

/// 通过本地 adb 可执行文件执行命令的默认实现
///
/// 超时的命令会被终止并回收后才返回，因此返回时不会有残留的 adb 子进程。
#[derive(Debug, Clone)]
pub struct ProcessBridge {
    config: ADBConfig,
}

impl ProcessBridge {
    pub fn new(config: ADBConfig) -> Self {
        Self { config }
    }

    fn execute(&self, args: &[String]) -> ADBResult<Output> {
        if self.config.path.as_os_str().is_empty() {
            return Err(ADBError::ConfigError("未配置 ADB 可执行文件路径".to_string()));
        }

        let mut full_args = self.config.additional_args.clone().unwrap_or_default();
        full_args.extend(args.iter().cloned());

        debug!("执行 ADB 命令: {:?}", full_args);

        let mut child = Command::new(&self.config.path)
            .args(&full_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ADBError::ProcessError(format!(
                    "无法执行 ADB ({}): {}",
                    self.config.path.display(),
                    e
                ))
            })?;

        // 并行读取两个管道，避免输出填满管道缓冲区后子进程阻塞
        let stdout_reader = child.stdout.take().map(drain_pipe);
        let stderr_reader = child.stderr.take().map(drain_pipe);

        let status = self.wait_for_exit(&mut child, args)?;
        let output = Output {
            status,
            stdout: join_pipe(stdout_reader),
            stderr: join_pipe(stderr_reader),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let error_msg = if !stderr.trim().is_empty() {
                stderr.trim().to_string()
            } else {
                stdout.trim().to_string()
            };

            warn!("ADB 命令 {:?} 失败 ({}): {}", args, output.status, error_msg);
            return Err(ADBError::ProcessError(format!(
                "ADB 命令失败 ({}):\n{}",
                output.status, error_msg
            )));
        }

        Ok(output)
    }

    /// 等待子进程退出；超过配置的超时后终止并回收子进程
    fn wait_for_exit(&self, child: &mut Child, args: &[String]) -> ADBResult<ExitStatus> {
        if self.config.timeout == 0 {
            return child
                .wait()
                .map_err(|e| ADBError::ProcessError(format!("等待 ADB 进程失败: {}", e)));
        }

        let timeout = Duration::from_millis(self.config.timeout);
        let start = Instant::now();

        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if start.elapsed() >= timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!("ADB 命令 {:?} 超时，已终止", args);
                    return Err(ADBError::TimeoutError {
                        message: format!("ADB 命令 {:?} 未在规定时间内完成", args),
                        duration: timeout,
                    });
                }
                Ok(None) => thread::sleep(EXIT_POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ADBError::ProcessError(format!("等待 ADB 进程失败: {}", e)));
                }
            }
        }
    }
}

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

fn join_pipe(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

impl Default for ProcessBridge {
    fn default() -> Self {
        Self::new(ADBConfig::default())
    }
}

impl Bridge for ProcessBridge {
    fn run_command(&self, args: &[String]) -> ADBResult<String> {
        let output = self.execute(args)?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        trace!("ADB 命令 {:?} 输出: {}", args, text);
        Ok(text)
    }

    fn read_output(&self, args: &[String]) -> ADBResult<String> {
        let output = self.execute(args)?;
        let text = decode_latin1(&output.stdout);

        trace!("ADB 读取 {:?} 得到 {} 字节", args, output.stdout.len());
        Ok(text)
    }
}

/// 构建针对指定设备的参数列表；未指定设备时交由 ADB 选择默认设备
pub fn adb_args<I, S>(device_id: Option<&str>, args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut full = Vec::new();
    if let Some(id) = device_id.filter(|id| !id.is_empty()) {
        full.push("-s".to_string());
        full.push(id.to_string());
    }
    full.extend(args.into_iter().map(Into::into));
    full
}
