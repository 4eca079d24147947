// ==========================================
// 冷水机组能效监测系统 - 服务层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 隔离不是错误,以结果形态区分;告警失败从不上抛
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 服务层错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 引用实体(用户/设备/组织/设施)不存在,未持久化任何记录
    #[error("引用实体未找到: {entity} id={id}")]
    Validation { entity: String, id: String },

    /// (设备, 规范时间戳) 已有非删除记录,未持久化任何记录
    #[error("重复读数: equipment_id={equipment_id} ts_utc={ts_utc}")]
    DuplicateReading {
        equipment_id: String,
        ts_utc: String,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// Result 类型别名
pub type ServiceResult<T> = Result<T, ServiceError>;
