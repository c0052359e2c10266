use adb_bridge_client::prelude::*;

fn main() -> ADBResult<()> {
    // 从 ANDROID_HOME / ANDROID_SDK_ROOT 定位 adb
    let adb = ADB::new(Some(ADBConfig::from_env()));

    let devices = adb.list_devices()?;
    println!("发现 {} 个设备:", devices.len());

    for device in &devices {
        println!(
            "  ID: {}, 名称: {}, 类型: {}, 已授权: {}",
            device.id, device.name, device.kind, device.is_authorized
        );

        if !device.is_authorized {
            println!("    设备未授权，跳过查询");
            continue;
        }

        let abis = adb.get_device_abis(device)?;
        println!("    ABI: {}", abis.join(", "));

        let props = adb.get_properties(device)?;
        if let Some(version) = props.get("ro.build.version.release") {
            println!("    Android 版本: {}", version);
        }

        let package = "com.android.settings";
        if adb.is_package_installed(device, package)? {
            match adb.open_app(device, package) {
                Ok(()) => println!("    已打开 {}", package),
                Err(ADBError::LaunchError(reason)) => println!("    打开失败: {}", reason),
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
