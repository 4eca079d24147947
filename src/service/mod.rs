// ==========================================
// 冷水机组能效监测系统 - 服务层
// ==========================================
// 职责: 摄取/更新编排、告警评估、外部传输接口
// 红线: 业务规则在引擎层,服务层只做编排与持久化衔接
// ==========================================

pub mod alert_evaluator;
pub mod error;
pub mod ingest;
pub mod notify;
pub mod repositories;

pub use alert_evaluator::AlertEvaluator;
pub use error::{ServiceError, ServiceResult};
pub use ingest::{IngestOutcome, IngestService};
pub use notify::{NotificationTransport, TracingTransport};
pub use repositories::IngestRepositories;
