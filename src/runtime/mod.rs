//! 运行时：启动、关闭与日志初始化

pub mod lifetime;
pub mod logging;
