//! 配置管理
//!
//! 启动时从 `config.toml`、按环境区分的配置文件以及环境变量分层加载，全局只读。

mod r#impl;
mod structs;

pub use structs::*;
