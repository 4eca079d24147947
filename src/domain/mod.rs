// ==========================================
// 冷水机组能效监测系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、模式枚举、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod alert;
pub mod computed_log;
pub mod equipment;
pub mod quarantine;
pub mod reading;
pub mod timeline;
pub mod types;

// 重导出核心类型
pub use alert::{AlertCondition, AlertDispatch, AlertRule, UserAccount};
pub use computed_log::{ComputedLog, DerivedMetrics};
pub use equipment::{DesignConstants, EquipmentProfile, Facility};
pub use quarantine::QuarantinedReading;
pub use reading::{NormalizedReading, RawReading, ReadingPatch};
pub use timeline::TimelineEvent;
pub use types::{
    AlertSeverity, CompareOp, NotifyChannel, OilPressureMode, PressureClass, PurgeUnitMode,
    RoleScope, TimelineKind, UnitSystem, WiringMode,
};
