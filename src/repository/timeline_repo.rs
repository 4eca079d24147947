// ==========================================
// 冷水机组能效监测系统 - 时间线事件仓储
// ==========================================
// 红线: 仅追加,不提供更新/删除
// ==========================================

use crate::domain::timeline::TimelineEvent;
use crate::domain::types::TimelineKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{opt_ts_from_str, opt_ts_to_str, ts_from_str, ts_to_str};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// TimelineRepository - 时间线事件仓储
// ==========================================
pub struct TimelineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimelineRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加时间线事件
    pub fn insert(&self, event: &TimelineEvent) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO timeline_event (
                event_id, equipment_id, kind, description, actor_id,
                reading_ts, original_created_at, edited_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                event.event_id,
                event.equipment_id,
                event.kind.as_str(),
                event.description,
                event.actor_id,
                opt_ts_to_str(&event.reading_ts),
                opt_ts_to_str(&event.original_created_at),
                opt_ts_to_str(&event.edited_at),
                ts_to_str(&event.created_at),
            ],
        )?;
        Ok(event.event_id.clone())
    }

    /// 按设备列出事件(创建时间降序)
    pub fn list_by_equipment(&self, equipment_id: &str) -> RepositoryResult<Vec<TimelineEvent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM timeline_event WHERE equipment_id = ?1 ORDER BY created_at DESC",
            Self::COLUMNS
        ))?;
        let events = stmt
            .query_map(params![equipment_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    const COLUMNS: &'static str = r#"
        event_id, equipment_id, kind, description, actor_id,
        reading_ts, original_created_at, edited_at, created_at
    "#;

    fn map_row(row: &Row<'_>) -> rusqlite::Result<TimelineEvent> {
        let kind_raw: String = row.get(2)?;
        let created_raw: String = row.get(8)?;
        Ok(TimelineEvent {
            event_id: row.get(0)?,
            equipment_id: row.get(1)?,
            kind: TimelineKind::parse(&kind_raw).unwrap_or(TimelineKind::NewReading),
            description: row.get(3)?,
            actor_id: row.get(4)?,
            reading_ts: opt_ts_from_str(row.get(5)?),
            original_created_at: opt_ts_from_str(row.get(6)?),
            edited_at: opt_ts_from_str(row.get(7)?),
            created_at: ts_from_str(&created_raw).unwrap_or_default(),
        })
    }
}
