// ==========================================
// 冷水机组能效监测系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 遥测摄取与能效核算核心(HTTP/鉴权/报表在外围服务)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 归一化 / 派生指标 / 校验清单
pub mod engine;

// 参考表层 - 制冷剂饱和曲线 / 海拔修正
pub mod reference;

// 服务层 - 摄取编排 / 告警评估
pub mod service;

// 导入层 - 表格批量导入
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/schema 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AlertSeverity, CompareOp, NotifyChannel, OilPressureMode, PressureClass, PurgeUnitMode,
    RoleScope, TimelineKind, UnitSystem, WiringMode,
};

// 领域实体
pub use domain::{
    AlertCondition, AlertDispatch, AlertRule, ComputedLog, DerivedMetrics, DesignConstants,
    EquipmentProfile, Facility, NormalizedReading, QuarantinedReading, RawReading, ReadingPatch,
    TimelineEvent, UserAccount,
};

// 引擎
pub use engine::{MetricsEngine, ReadingNormalizer, RunHourNeighbors, ValidityGate};

// 参考表
pub use reference::{AltitudeTable, BuiltinAltitudeTable, BuiltinRefrigerantTable, RefrigerantTable};

// 服务
pub use service::{
    AlertEvaluator, IngestOutcome, IngestRepositories, IngestService, NotificationTransport,
    ServiceError, TracingTransport,
};

// 导入器
pub use importer::{BulkImportSummary, BulkImporter};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "冷水机组能效监测系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
