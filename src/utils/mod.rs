pub mod cli;
pub mod output;
pub mod query;
pub mod tpch;

use std::thread::current;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn log_event(task: &str, action: &str) {
    let current_thread = current();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    log::debug!(
        "[logging] (type,event) (thread,{}) (task,{task}) (action,{action}) (timestamp,{timestamp})",
        current_thread.name().unwrap_or("main")
    );
}
