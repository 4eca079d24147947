// ==========================================
// 冷水机组能效监测系统 - 引擎层
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 1~4. 归一化/公式管线/校验清单
// ==========================================
// 职责: 实现归一化、派生指标、校验清单的纯规则
// 红线: Engine 不拼 SQL、不做 I/O,全部为显式参数的纯函数
// ==========================================

pub mod metrics;
pub mod normalizer;
pub mod round;
pub mod validity;

pub use metrics::{MetricsEngine, RunHourNeighbors};
pub use normalizer::ReadingNormalizer;
pub use validity::{ValidityGate, ValidityReport};
