// ==========================================
// 冷水机组能效监测系统 - 告警评估器
// ==========================================
// 依据: Alert_Rules_Spec_v0.9 - 阈值规则评估与分发
// 判定顺序: 先告警条件,满足即 ALERT;否则警告条件,满足即 WARNING
// 红线: 尽力而为 —— 单用户/单规则错误只记日志并跳过,从不影响摄取
// ==========================================

use crate::domain::alert::{AlertDispatch, AlertRule};
use crate::domain::computed_log::ComputedLog;
use crate::domain::types::AlertSeverity;
use crate::repository::AlertRuleRepository;
use crate::service::notify::NotificationTransport;
use std::sync::Arc;
use tracing::{debug, warn};

// ==========================================
// AlertEvaluator - 告警评估器
// ==========================================
pub struct AlertEvaluator {
    rule_repo: Arc<AlertRuleRepository>,
    transport: Arc<dyn NotificationTransport>,
}

impl AlertEvaluator {
    pub fn new(
        rule_repo: Arc<AlertRuleRepository>,
        transport: Arc<dyn NotificationTransport>,
    ) -> Self {
        Self {
            rule_repo,
            transport,
        }
    }

    /// 对一条新提交日志评估其所属组织全部用户的规则
    ///
    /// # 流程
    /// 1. 取组织用户 → 按角色作用域过滤资格
    /// 2. 逐用户取规则,逐规则评估(告警优先于警告)
    /// 3. 组装 (设备, 设施, 指标, 值) 消息并路由到配置渠道
    ///
    /// # 返回
    /// 实际产出的分发请求(尽力而为,错误已就地记录并跳过)
    pub async fn evaluate(
        &self,
        log: &ComputedLog,
        equipment_name: &str,
        facility_name: &str,
    ) -> Vec<AlertDispatch> {
        let users = match self.rule_repo.users_for_company(&log.company_id) {
            Ok(users) => users,
            Err(e) => {
                warn!(company_id = %log.company_id, error = %e, "组织用户查询失败,跳过告警评估");
                return Vec::new();
            }
        };

        let mut dispatches = Vec::new();

        for user in users {
            // 资格判定: 组织级总是命中;设施级/设备级需在分配列表内
            if !user.is_eligible(&log.facility_id, &log.equipment_id) {
                continue;
            }

            let rules = match self.rule_repo.rules_for_user(&user.user_id) {
                Ok(rules) => rules,
                Err(e) => {
                    warn!(user_id = %user.user_id, error = %e, "用户规则查询失败,跳过该用户");
                    continue;
                }
            };

            for rule in rules {
                let Some((severity, value)) = Self::evaluate_rule(&rule, log) else {
                    continue;
                };

                let dispatch = AlertDispatch {
                    user_id: user.user_id.clone(),
                    email: user.email.clone(),
                    channel: rule.channel,
                    severity,
                    metric: rule.metric.clone(),
                    value,
                    equipment_id: log.equipment_id.clone(),
                    facility_id: log.facility_id.clone(),
                    message: Self::compose_message(
                        equipment_name,
                        facility_name,
                        &rule.metric,
                        value,
                        severity,
                    ),
                };

                if let Err(e) = self.transport.send(&dispatch).await {
                    // 尽力而为: 传输失败只记日志,继续后续规则
                    warn!(
                        user_id = %dispatch.user_id,
                        rule_id = %rule.rule_id,
                        error = %e,
                        "告警分发失败,已跳过"
                    );
                }
                dispatches.push(dispatch);
            }
        }

        debug!(
            log_id = %log.log_id,
            dispatched = dispatches.len(),
            "告警评估完成"
        );
        dispatches
    }

    /// 评估单条规则(纯函数)
    ///
    /// # 规则
    /// - 指标在该日志上不存在 → 跳过(None)
    /// - 先评估告警条件,满足 → ALERT
    /// - 否则评估警告条件,满足 → WARNING
    /// - 都不满足 → None
    pub fn evaluate_rule(rule: &AlertRule, log: &ComputedLog) -> Option<(AlertSeverity, f64)> {
        let value = log.metric_value(&rule.metric)?;

        if let Some(alert) = &rule.alert {
            if alert.matches(value) {
                return Some((AlertSeverity::Alert, value));
            }
        }
        if let Some(warning) = &rule.warning {
            if warning.matches(value) {
                return Some((AlertSeverity::Warning, value));
            }
        }
        None
    }

    /// 组装分发消息文本
    fn compose_message(
        equipment_name: &str,
        facility_name: &str,
        metric: &str,
        value: f64,
        severity: AlertSeverity,
    ) -> String {
        format!(
            "[{}] {} / {}: 指标 {} 当前值 {:.4}",
            severity, facility_name, equipment_name, metric, value
        )
    }
}
