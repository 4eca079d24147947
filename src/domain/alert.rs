// ==========================================
// 冷水机组能效监测系统 - 告警规则领域模型
// ==========================================
// 依据: Alert_Rules_Spec_v0.9 - 阈值规则与分发
// 红线: 告警只针对已提交日志评估,从不针对隔离读数
// ==========================================

use crate::domain::types::{AlertSeverity, CompareOp, NotifyChannel, RoleScope};
use serde::{Deserialize, Serialize};

// ==========================================
// AlertCondition - 阈值条件
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlertCondition {
    pub op: CompareOp,  // 比较运算符
    pub threshold: f64, // 阈值
}

impl AlertCondition {
    /// 判定指标值是否触发本条件
    pub fn matches(&self, value: f64) -> bool {
        self.op.evaluate(value, self.threshold)
    }
}

// ==========================================
// AlertRule - 用户阈值规则
// ==========================================
// 每用户每指标一条;先评估告警条件,再评估警告条件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub rule_id: String,
    pub user_id: String,
    pub metric: String,                  // 指标键 (effLoss / loadFactor ...)
    pub warning: Option<AlertCondition>, // 警告条件
    pub alert: Option<AlertCondition>,   // 告警条件(优先)
    pub channel: NotifyChannel,          // 通知渠道
}

// ==========================================
// UserAccount - 用户账号(告警资格载体)
// ==========================================
// 组织级角色总是有资格;设施级/设备级按分配列表判定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: String,
    pub company_id: String,
    pub email: String,
    pub role_scope: RoleScope,
    pub facility_ids: Vec<String>,  // 设施级角色的分配设施
    pub equipment_ids: Vec<String>, // 设备级角色的分配设备
}

impl UserAccount {
    /// 判定用户对 (facility_id, equipment_id) 的日志是否有告警资格
    pub fn is_eligible(&self, facility_id: &str, equipment_id: &str) -> bool {
        match self.role_scope {
            RoleScope::OrgWide => true,
            RoleScope::FacilityScoped => {
                self.facility_ids.iter().any(|f| f == facility_id)
            }
            RoleScope::EquipmentScoped => {
                self.equipment_ids.iter().any(|e| e == equipment_id)
            }
        }
    }
}

// ==========================================
// AlertDispatch - 分发请求
// ==========================================
// 告警评估器的产出;本组件契约止于产出分发请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDispatch {
    pub user_id: String,
    pub email: String,
    pub channel: NotifyChannel,
    pub severity: AlertSeverity,
    pub metric: String,
    pub value: f64,
    pub equipment_id: String,
    pub facility_id: String,
    pub message: String, // (设备, 设施, 指标, 值) 组成的消息文本
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(scope: RoleScope) -> UserAccount {
        UserAccount {
            user_id: "U1".to_string(),
            company_id: "CO1".to_string(),
            email: "u1@example.com".to_string(),
            role_scope: scope,
            facility_ids: vec!["FAC1".to_string()],
            equipment_ids: vec!["EQ1".to_string()],
        }
    }

    #[test]
    fn test_eligibility_org_wide() {
        let u = user(RoleScope::OrgWide);
        assert!(u.is_eligible("FAC9", "EQ9"));
    }

    #[test]
    fn test_eligibility_facility_scoped() {
        let u = user(RoleScope::FacilityScoped);
        assert!(u.is_eligible("FAC1", "EQ9"));
        assert!(!u.is_eligible("FAC2", "EQ1"));
    }

    #[test]
    fn test_eligibility_equipment_scoped() {
        let u = user(RoleScope::EquipmentScoped);
        assert!(u.is_eligible("FAC9", "EQ1"));
        assert!(!u.is_eligible("FAC1", "EQ2"));
    }

    #[test]
    fn test_condition_matches() {
        let cond = AlertCondition {
            op: CompareOp::Gt,
            threshold: 20.0,
        };
        assert!(cond.matches(25.0));
        assert!(!cond.matches(20.0));
    }
}
