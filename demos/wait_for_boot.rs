use adb_bridge_client::prelude::*;

fn main() -> ADBResult<()> {
    let config = ADBConfigBuilder::default().timeout(10_000).build();
    let adb = ADB::new(Some(config));

    let Some(device) = adb.first_booted_device()? else {
        println!("没有已连接的设备");
        return Ok(());
    };

    println!("等待 {} ({}) 开机完成...", device.name, device.id);
    if adb.wait_for_boot_animation(Some(&device), 120_000, 1_000) {
        println!("开机完成");
        if device.is_emulator() {
            println!("AVD 名称: {}", adb.get_device_display_name(&device)?);
        }
    } else {
        println!("等待超时");
    }

    Ok(())
}
