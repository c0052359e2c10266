#![allow(dead_code)]

use adb_bridge_client::{ADBConfig, ADBError, ADBResult, Bridge, ADB};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 测试替身：按顺序返回预设输出，并记录收到的每一条命令
#[derive(Clone, Default)]
pub struct ScriptedBridge {
    inner: Arc<Mutex<Script>>,
}

#[derive(Default)]
struct Script {
    commands: VecDeque<ADBResult<String>>,
    reads: VecDeque<ADBResult<String>>,
    command_calls: Vec<Vec<String>>,
    read_calls: Vec<Vec<String>>,
}

impl ScriptedBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_command(&self, output: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .commands
            .push_back(Ok(output.to_string()));
        self
    }

    pub fn on_command_error(&self, error: ADBError) -> &Self {
        self.inner.lock().unwrap().commands.push_back(Err(error));
        self
    }

    pub fn on_read(&self, output: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .reads
            .push_back(Ok(output.to_string()));
        self
    }

    pub fn on_read_error(&self, error: ADBError) -> &Self {
        self.inner.lock().unwrap().reads.push_back(Err(error));
        self
    }

    pub fn command_calls(&self) -> Vec<Vec<String>> {
        self.inner.lock().unwrap().command_calls.clone()
    }

    pub fn read_calls(&self) -> Vec<Vec<String>> {
        self.inner.lock().unwrap().read_calls.clone()
    }

    pub fn client(&self) -> ADB {
        ADB::with_bridge(ADBConfig::default(), self.clone())
    }
}

impl Bridge for ScriptedBridge {
    fn run_command(&self, args: &[String]) -> ADBResult<String> {
        let mut script = self.inner.lock().unwrap();
        script.command_calls.push(args.to_vec());
        script.commands.pop_front().unwrap_or_else(|| Ok(String::new()))
    }

    fn read_output(&self, args: &[String]) -> ADBResult<String> {
        let mut script = self.inner.lock().unwrap();
        script.read_calls.push(args.to_vec());
        script.reads.pop_front().unwrap_or_else(|| Ok(String::new()))
    }
}

pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn lines(items: &[&str]) -> String {
    items.join("\n")
}
