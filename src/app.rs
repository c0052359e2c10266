use crate::bridge::adb_args;
use crate::device::{Device, ADB};
use crate::error::{ADBError, ADBResult};
use crate::parser::{ErrorMarkers, LAUNCH_ERRORS};
use log::{debug, info};

impl ADB {
    /// 检查包是否已安装
    ///
    /// `pm list packages <name>` 对匹配的包输出 `package:<name>` 行，没有匹配时输出为空。
    pub fn is_package_installed(&self, device: &Device, package_name: &str) -> ADBResult<bool> {
        let output = self.run(adb_args(
            Some(&device.id),
            ["shell", "pm", "list", "packages", package_name],
        ))?;

        let installed = !output.trim().is_empty();
        debug!("包 {} 在设备 {} 上已安装: {}", package_name, device.id, installed);
        Ok(installed)
    }

    /// 启动指定的 Activity，例如 `dev.bacon.app/.MainActivity`
    pub fn launch_activity(&self, device: &Device, activity: &str) -> ADBResult<()> {
        let args = adb_args(
            Some(&device.id),
            [
                "shell",
                "am",
                "start",
                "-a",
                "android.intent.action.RUN",
                "-f",
                "0x20000000",
                "-n",
                activity,
            ],
        );

        self.run_launch(args, &LAUNCH_ERRORS)?;
        info!("已在设备 {} 上启动 {}", device.id, activity);
        Ok(())
    }

    /// 通过启动器入口打开应用
    pub fn open_app(&self, device: &Device, application_id: &str) -> ADBResult<()> {
        let args = adb_args(
            Some(&device.id),
            [
                "shell",
                "am",
                "start",
                "-a",
                "android.intent.action.MAIN",
                "-c",
                "android.intent.category.LAUNCHER",
                "-p",
                application_id,
            ],
        );

        self.run_launch(args, &LAUNCH_ERRORS)?;
        info!("已在设备 {} 上打开应用 {}", device.id, application_id);
        Ok(())
    }

    /// 执行启动类命令并按错误标记分类结果
    ///
    /// 进程以非零状态退出但输出带有错误标记时同样归为 `LaunchError`。
    fn run_launch(&self, args: Vec<String>, markers: &ErrorMarkers) -> ADBResult<()> {
        let output = match self.run(args) {
            Ok(output) => output,
            Err(ADBError::ProcessError(msg)) => match markers.classify(&msg) {
                Some(reason) => return Err(ADBError::LaunchError(reason)),
                None => return Err(ADBError::ProcessError(msg)),
            },
            Err(e) => return Err(e),
        };

        if let Some(reason) = markers.classify(&output) {
            debug!("启动命令失败: {}", output);
            return Err(ADBError::LaunchError(reason));
        }

        Ok(())
    }
}
