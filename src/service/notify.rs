// ==========================================
// 冷水机组能效监测系统 - 通知传输接口
// ==========================================
// 职责: 分发请求 → 外部传输(邮件/应用内)
// 约束: 核心视角即发即弃;失败由调用方按规则捕获并跳过
// ==========================================

use crate::domain::alert::AlertDispatch;
use async_trait::async_trait;
use tracing::info;

// ==========================================
// NotificationTransport - 传输接口
// ==========================================
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// 发送一条分发请求
    async fn send(&self, dispatch: &AlertDispatch) -> anyhow::Result<()>;
}

// ==========================================
// TracingTransport - 日志兜底传输
// ==========================================
// 本地/开发环境缺省实现: 只落结构化日志,不外发
pub struct TracingTransport;

#[async_trait]
impl NotificationTransport for TracingTransport {
    async fn send(&self, dispatch: &AlertDispatch) -> anyhow::Result<()> {
        info!(
            user_id = %dispatch.user_id,
            channel = %dispatch.channel,
            severity = %dispatch.severity,
            metric = %dispatch.metric,
            value = dispatch.value,
            equipment_id = %dispatch.equipment_id,
            "告警分发(日志传输)"
        );
        Ok(())
    }
}
