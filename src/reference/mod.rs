// ==========================================
// 冷水机组能效监测系统 - 参考表层
// ==========================================
// 职责: 只读参考数据(制冷剂饱和曲线 / 海拔修正),全摄取共享
// ==========================================

pub mod altitude;
pub mod refrigerant;

pub use altitude::{AltitudeTable, BuiltinAltitudeTable};
pub use refrigerant::{BuiltinRefrigerantTable, RefrigerantTable};
