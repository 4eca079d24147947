// ==========================================
// 冷水机组能效监测系统 - 时间线事件领域模型
// ==========================================
// 红线: 仅追加,每个摄取结果恰好一条事件
// ==========================================

use crate::domain::types::TimelineKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TimelineEvent - 时间线事件
// ==========================================
// 审计追踪: 新读数 / 编辑 / 坏读数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub event_id: String,
    pub equipment_id: String,
    pub kind: TimelineKind,
    pub description: String,
    pub actor_id: String,

    /// 事件所指读数的规范时间戳(隔离时可能缺失)
    pub reading_ts: Option<DateTime<Utc>>,

    /// 编辑事件: 原始创建时间
    pub original_created_at: Option<DateTime<Utc>>,
    /// 编辑事件: 编辑时间
    pub edited_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl TimelineEvent {
    /// 创建事件(新读数/坏读数)
    pub fn new(
        event_id: String,
        equipment_id: String,
        kind: TimelineKind,
        description: String,
        actor_id: String,
        reading_ts: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            equipment_id,
            kind,
            description,
            actor_id,
            reading_ts,
            original_created_at: None,
            edited_at: None,
            created_at: now,
        }
    }

    /// 附加编辑时间信息(EDITED_READING 事件专用)
    pub fn with_edit_times(
        mut self,
        original_created_at: DateTime<Utc>,
        edited_at: DateTime<Utc>,
    ) -> Self {
        self.original_created_at = Some(original_created_at);
        self.edited_at = Some(edited_at);
        self
    }
}
