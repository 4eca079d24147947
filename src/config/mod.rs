// ==========================================
// 冷水机组能效监测系统 - 配置层
// ==========================================
// 职责: 运行配置(数据库路径 / 运行环境 / 告警开关)
// ==========================================

pub mod settings;

pub use settings::{get_default_db_path, AppConfig, Environment};
