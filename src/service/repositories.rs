// ==========================================
// 冷水机组能效监测系统 - 摄取服务仓储聚合
// ==========================================
// 职责: 聚合摄取管线所需的全部 Repository
// 目标: 减少 IngestService 的构造函数参数数量
// ==========================================

use std::sync::{Arc, Mutex};

use crate::repository::{
    AlertRuleRepository, ComputedLogRepository, EquipmentRepository, QuarantineRepository,
    TimelineRepository,
};
use rusqlite::Connection;

/// 摄取管线仓储集合
///
/// # 包含的仓储
/// - `log_repo`: 计算日志(去重/邻居/写入)
/// - `quarantine_repo`: 隔离读数
/// - `timeline_repo`: 时间线事件
/// - `equipment_repo`: 设备档案与设施
/// - `alert_rule_repo`: 用户与告警规则
#[derive(Clone)]
pub struct IngestRepositories {
    pub log_repo: Arc<ComputedLogRepository>,
    pub quarantine_repo: Arc<QuarantineRepository>,
    pub timeline_repo: Arc<TimelineRepository>,
    pub equipment_repo: Arc<EquipmentRepository>,
    pub alert_rule_repo: Arc<AlertRuleRepository>,
}

impl IngestRepositories {
    /// 创建新的仓储集合
    pub fn new(
        log_repo: Arc<ComputedLogRepository>,
        quarantine_repo: Arc<QuarantineRepository>,
        timeline_repo: Arc<TimelineRepository>,
        equipment_repo: Arc<EquipmentRepository>,
        alert_rule_repo: Arc<AlertRuleRepository>,
    ) -> Self {
        Self {
            log_repo,
            quarantine_repo,
            timeline_repo,
            equipment_repo,
            alert_rule_repo,
        }
    }

    /// 由单个共享连接装配全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            log_repo: Arc::new(ComputedLogRepository::from_connection(conn.clone())),
            quarantine_repo: Arc::new(QuarantineRepository::from_connection(conn.clone())),
            timeline_repo: Arc::new(TimelineRepository::from_connection(conn.clone())),
            equipment_repo: Arc::new(EquipmentRepository::from_connection(conn.clone())),
            alert_rule_repo: Arc::new(AlertRuleRepository::from_connection(conn)),
        }
    }
}
