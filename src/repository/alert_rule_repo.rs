// ==========================================
// 冷水机组能效监测系统 - 告警规则/用户仓储
// ==========================================
// 红线: Repository 不做业务逻辑,资格判定在服务层
// ==========================================

use crate::domain::alert::{AlertCondition, AlertRule, UserAccount};
use crate::domain::types::{CompareOp, NotifyChannel, RoleScope};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::json_column_err;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AlertRuleRepository - 告警规则仓储
// ==========================================
pub struct AlertRuleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AlertRuleRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 用户账号
    // ==========================================

    /// 插入用户账号
    pub fn insert_user(&self, user: &UserAccount) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO user_account (
                user_id, company_id, email, role_scope,
                facility_ids_json, equipment_ids_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                user.user_id,
                user.company_id,
                user.email,
                user.role_scope.as_str(),
                serde_json::to_string(&user.facility_ids)?,
                serde_json::to_string(&user.equipment_ids)?,
            ],
        )?;
        Ok(user.user_id.clone())
    }

    /// 按组织列出全部用户(告警评估的候选集)
    pub fn users_for_company(&self, company_id: &str) -> RepositoryResult<Vec<UserAccount>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT user_id, company_id, email, role_scope,
                   facility_ids_json, equipment_ids_json
            FROM user_account WHERE company_id = ?1
            "#,
        )?;
        let users = stmt
            .query_map(params![company_id], Self::map_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn map_user(row: &Row<'_>) -> rusqlite::Result<UserAccount> {
        let scope_raw: String = row.get(3)?;
        let facilities_raw: String = row.get(4)?;
        let equipment_raw: String = row.get(5)?;
        Ok(UserAccount {
            user_id: row.get(0)?,
            company_id: row.get(1)?,
            email: row.get(2)?,
            role_scope: RoleScope::parse(&scope_raw).unwrap_or(RoleScope::EquipmentScoped),
            facility_ids: serde_json::from_str(&facilities_raw).map_err(json_column_err)?,
            equipment_ids: serde_json::from_str(&equipment_raw).map_err(json_column_err)?,
        })
    }

    // ==========================================
    // 告警规则
    // ==========================================

    /// 插入告警规则
    pub fn insert_rule(&self, rule: &AlertRule) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO alert_rule (
                rule_id, user_id, metric,
                warning_op, warning_threshold, alert_op, alert_threshold, channel
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                rule.rule_id,
                rule.user_id,
                rule.metric,
                rule.warning.map(|c| c.op.as_str()),
                rule.warning.map(|c| c.threshold),
                rule.alert.map(|c| c.op.as_str()),
                rule.alert.map(|c| c.threshold),
                rule.channel.as_str(),
            ],
        )?;
        Ok(rule.rule_id.clone())
    }

    /// 按用户列出规则
    pub fn rules_for_user(&self, user_id: &str) -> RepositoryResult<Vec<AlertRule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT rule_id, user_id, metric,
                   warning_op, warning_threshold, alert_op, alert_threshold, channel
            FROM alert_rule WHERE user_id = ?1
            "#,
        )?;
        let rules = stmt
            .query_map(params![user_id], Self::map_rule)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rules)
    }

    fn map_rule(row: &Row<'_>) -> rusqlite::Result<AlertRule> {
        let warning_op: Option<String> = row.get(3)?;
        let warning_threshold: Option<f64> = row.get(4)?;
        let alert_op: Option<String> = row.get(5)?;
        let alert_threshold: Option<f64> = row.get(6)?;
        let channel_raw: String = row.get(7)?;

        let build = |op: Option<String>, threshold: Option<f64>| -> Option<AlertCondition> {
            let op = CompareOp::parse(&op?)?;
            Some(AlertCondition {
                op,
                threshold: threshold?,
            })
        };

        Ok(AlertRule {
            rule_id: row.get(0)?,
            user_id: row.get(1)?,
            metric: row.get(2)?,
            warning: build(warning_op, warning_threshold),
            alert: build(alert_op, alert_threshold),
            channel: NotifyChannel::parse(&channel_raw).unwrap_or(NotifyChannel::InApp),
        })
    }
}
