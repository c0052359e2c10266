use crate::bridge::adb_args;
use crate::device::{fallback_name, Device, DeviceEntry, DeviceKind, ADB};
use crate::error::{ADBError, ADBResult};
use crate::parser;
use log::{debug, info, trace, warn};
use std::collections::HashMap;

/// 开机动画状态属性
pub const PROP_BOOT_ANIMATION_STATE: &str = "init.svc.bootanim";
/// 开机动画结束后的状态值
pub const BOOT_ANIMATION_STOPPED: &str = "stopped";
/// 设备支持的 ABI 列表属性，按优先级排列
pub const PROP_CPU_ABILIST: &str = "ro.product.cpu.abilist";

impl ADB {
    /// 通过共享通道执行一条命令
    pub(crate) fn run(&self, args: Vec<String>) -> ADBResult<String> {
        let channel = self.channel();
        debug!("ADB 命令: {:?}", args);
        channel.run_command(&args)
    }

    /// 通过共享通道执行一条读取类命令
    pub(crate) fn read(&self, args: Vec<String>) -> ADBResult<String> {
        let channel = self.channel();
        debug!("ADB 读取: {:?}", args);
        channel.read_output(&args)
    }

    /// 列出已连接的设备，顺序与 `adb devices -l` 一致
    ///
    /// 已授权的模拟器会额外查询一次 AVD 名称，已授权的真机使用列表中的
    /// `model:` 字段，未授权设备只使用占位名。名称查询按列表顺序逐个执行。
    pub fn list_devices(&self) -> ADBResult<Vec<Device>> {
        let output = self.run(adb_args(None, ["devices", "-l"]))?;
        trace!("ADB devices 输出: {}", output);

        let entries = parser::parse_device_list(&output);
        let mut devices = Vec::with_capacity(entries.len());

        for entry in entries {
            debug!(
                "设备 {}: 状态 {}, 产品 {:?}, 型号 {:?}, 设备 {:?}, 传输 ID {:?}",
                entry.id, entry.status, entry.product, entry.model, entry.device, entry.transport_id
            );
            let name = self.resolve_display_name(&entry);
            devices.push(
                Device::new(&entry.id)
                    .with_name(&name)
                    .with_authorized(entry.is_authorized())
                    .with_booted(true),
            );
        }

        info!("发现 {} 个 ADB 设备", devices.len());
        Ok(devices)
    }

    fn resolve_display_name(&self, entry: &DeviceEntry) -> String {
        if !entry.is_authorized() {
            return fallback_name(&entry.id);
        }

        match entry.kind() {
            DeviceKind::Emulator => match self.query_emulator_name(&entry.id) {
                Ok(name) => name,
                Err(e) => {
                    warn!("无法获取模拟器 {} 的名称: {}", entry.id, e);
                    fallback_name(&entry.id)
                }
            },
            DeviceKind::Device => entry
                .model
                .clone()
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| fallback_name(&entry.id)),
        }
    }

    fn query_emulator_name(&self, device_id: &str) -> ADBResult<String> {
        let output = self
            .run(adb_args(Some(device_id), ["emu", "avd", "name"]))
            .map_err(ADBError::into_query_error)?;
        parser::parse_emulator_name(&output)
    }

    /// 查询模拟器的 AVD 名称，可用于之后重新启动该模拟器
    pub fn get_device_display_name(&self, device: &Device) -> ADBResult<String> {
        self.query_emulator_name(&device.id)
    }

    /// 在当前设备列表中查找序列号或名称匹配的设备，不存在时返回 `None`
    pub fn is_device_booted(&self, device: &Device) -> ADBResult<Option<Device>> {
        let found = self
            .list_devices()?
            .into_iter()
            .find(|listed| listed.matches(device));

        if found.is_none() {
            debug!("设备 {} ({}) 未连接或未启动", device.name, device.id);
        }
        Ok(found)
    }

    /// 返回列表中的第一个设备
    pub fn first_booted_device(&self) -> ADBResult<Option<Device>> {
        Ok(self.list_devices()?.into_iter().next())
    }

    /// 获取设备所有属性，读取失败时返回 `DeviceQueryError`
    pub fn get_properties(&self, device: &Device) -> ADBResult<HashMap<String, String>> {
        let output = self.read_property_dump(Some(device))?;
        Ok(parser::parse_properties(&output))
    }

    /// 获取单个设备属性的值（已去除首尾空白）
    pub fn get_property(&self, device: &Device, prop_name: &str) -> ADBResult<String> {
        let output = self
            .read(adb_args(Some(&device.id), ["shell", "getprop", prop_name]))
            .map_err(ADBError::into_query_error)?;
        Ok(output.trim().to_string())
    }

    fn read_property_dump(&self, device: Option<&Device>) -> ADBResult<String> {
        let device_id = device.map(|d| d.id.as_str());
        self.read(adb_args(device_id, ["shell", "getprop"]))
            .map_err(ADBError::into_query_error)
    }

    /// 开机动画是否已经结束
    ///
    /// 该检查用于轮询，读取失败、属性缺失或输出异常都返回 `false`，从不返回错误。
    pub fn is_boot_animation_complete(&self, device: Option<&Device>) -> bool {
        match self.boot_animation_state(device) {
            Ok(state) => state.as_deref() == Some(BOOT_ANIMATION_STOPPED),
            Err(e) => {
                debug!("读取开机动画状态失败，视为未完成: {}", e);
                false
            }
        }
    }

    fn boot_animation_state(&self, device: Option<&Device>) -> ADBResult<Option<String>> {
        let output = self.read_property_dump(device)?;
        Ok(parser::parse_property(&output, PROP_BOOT_ANIMATION_STATE))
    }

    /// 轮询直到开机动画结束或超时，返回是否已结束
    pub fn wait_for_boot_animation(
        &self,
        device: Option<&Device>,
        timeout_ms: u64,
        poll_interval_ms: u64,
    ) -> bool {
        let target = device.map_or("默认设备", |d| d.id.as_str());
        info!("等待 {} 开机完成...", target);

        let done = crate::utils::wait_with_polling(timeout_ms, poll_interval_ms, || {
            Ok(self.is_boot_animation_complete(device))
        });

        if done {
            info!("{} 已完成开机", target);
        } else {
            warn!("等待 {} 开机超时 ({}ms)", target, timeout_ms);
        }
        done
    }

    /// 获取设备支持的 ABI 列表，顺序即设备的偏好顺序；属性为空时返回空列表
    pub fn get_device_abis(&self, device: &Device) -> ADBResult<Vec<String>> {
        let output = self
            .read(adb_args(Some(&device.id), ["shell", "getprop", PROP_CPU_ABILIST]))
            .map_err(ADBError::into_query_error)?;
        Ok(parser::parse_abi_list(&output))
    }

    /// 读取设备上的小型文本文件
    pub fn read_remote_file(&self, path: &str, device: Option<&Device>) -> ADBResult<String> {
        let device_id = device.map(|d| d.id.as_str());
        self.read(adb_args(device_id, ["shell", "cat", path]))
            .map_err(ADBError::into_query_error)
    }
}
