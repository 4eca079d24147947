// ==========================================
// 冷水机组能效监测系统 - 运行配置
// ==========================================
// 职责: 数据库路径解析、运行环境判定
// 约束: 告警评估只在生产环境执行(本地/开发环境跳过)
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ==========================================
// Environment - 运行环境
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Environment {
    Local,      // 本地
    Dev,        // 开发
    Production, // 生产
}

impl Environment {
    /// 从环境变量 CHILLER_EMS_ENV 读取,缺省按本地处理
    pub fn from_env() -> Self {
        match std::env::var("CHILLER_EMS_ENV").as_deref() {
            Ok("production") | Ok("PRODUCTION") => Environment::Production,
            Ok("dev") | Ok("DEV") => Environment::Dev,
            _ => Environment::Local,
        }
    }

    /// 告警评估是否启用(仅生产环境)
    pub fn alerts_enabled(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub environment: Environment,
}

impl AppConfig {
    /// 从环境变量装配配置
    pub fn from_env() -> Self {
        Self {
            db_path: get_default_db_path(),
            environment: Environment::from_env(),
        }
    }

    /// 测试/脚本用: 显式指定全部字段
    pub fn new(db_path: String, environment: Environment) -> Self {
        Self {
            db_path,
            environment,
        }
    }
}

/// 解析默认数据库路径
///
/// 优先级:
/// 1. 环境变量 CHILLER_EMS_DB_PATH(便于调试/测试/CI)
/// 2. 用户数据目录 chiller-ems/chiller_ems.db
/// 3. 当前目录回退值
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("CHILLER_EMS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./chiller_ems.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("chiller-ems");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("chiller_ems.db");
        }
    }

    path.to_string_lossy().to_string()
}
