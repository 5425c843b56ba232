//! Clock Port - 可注入的时间源

use std::time::SystemTime;

/// 时间源
///
/// 清理任务通过它获取"当前时间"，测试中可替换为固定时间
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
