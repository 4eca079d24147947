// ==========================================
// 冷水机组能效监测系统 - 领域类型定义
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 0. 机组模式体系
// 红线: 模式分支用枚举分发纯函数,不做类型继承
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 接线模式 (Wiring Mode)
// ==========================================
// 决定归一化时保留哪些相电流/相电压字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WiringMode {
    SinglePhase,      // 单相: 仅1相电流/电压
    ThreePhase,       // 三相: 3相电流/电压全保留
    PercentLoad,      // 百分比负载: 不记电流/电压,直接记负载百分比
    VoltageNotLogged, // 不记电压: 保留电流,电压归零
}

impl WiringMode {
    /// 转换为字符串（用于数据库存储）
    pub fn as_str(&self) -> &'static str {
        match self {
            WiringMode::SinglePhase => "SINGLE_PHASE",
            WiringMode::ThreePhase => "THREE_PHASE",
            WiringMode::PercentLoad => "PERCENT_LOAD",
            WiringMode::VoltageNotLogged => "VOLTAGE_NOT_LOGGED",
        }
    }

    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SINGLE_PHASE" => Some(WiringMode::SinglePhase),
            "THREE_PHASE" => Some(WiringMode::ThreePhase),
            "PERCENT_LOAD" => Some(WiringMode::PercentLoad),
            "VOLTAGE_NOT_LOGGED" => Some(WiringMode::VoltageNotLogged),
            _ => None,
        }
    }
}

impl fmt::Display for WiringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 油压记录模式 (Oil Pressure Mode)
// ==========================================
// 决定归一化时保留哪些油压字段,以及最终油压差的算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OilPressureMode {
    HighLow,          // 记高压+低压: 差值 = 高 - 低
    HighOnly,         // 仅记高压: 差值 = 高 - 蒸发器压力
    DifferentialOnly, // 仅记压差: 差值 = 直接读数
    NotLogged,        // 不记录: 全部归零
}

impl OilPressureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OilPressureMode::HighLow => "HIGH_LOW",
            OilPressureMode::HighOnly => "HIGH_ONLY",
            OilPressureMode::DifferentialOnly => "DIFFERENTIAL_ONLY",
            OilPressureMode::NotLogged => "NOT_LOGGED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HIGH_LOW" => Some(OilPressureMode::HighLow),
            "HIGH_ONLY" => Some(OilPressureMode::HighOnly),
            "DIFFERENTIAL_ONLY" => Some(OilPressureMode::DifferentialOnly),
            "NOT_LOGGED" => Some(OilPressureMode::NotLogged),
            _ => None,
        }
    }
}

impl fmt::Display for OilPressureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 抽气装置模式 (Purge Unit Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurgeUnitMode {
    MinutesOnly,  // 仅分钟表: 直接取分钟读数
    HoursMinutes, // 时+分表: 小时×60+分钟,非数值按0处理
}

impl PurgeUnitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurgeUnitMode::MinutesOnly => "MINUTES_ONLY",
            PurgeUnitMode::HoursMinutes => "HOURS_MINUTES",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MINUTES_ONLY" => Some(PurgeUnitMode::MinutesOnly),
            "HOURS_MINUTES" => Some(PurgeUnitMode::HoursMinutes),
            _ => None,
        }
    }
}

impl fmt::Display for PurgeUnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 计量单位制 (Unit System)
// ==========================================
// 影响海拔修正表的口径选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitSystem {
    Imperial, // 英制 (°F / psig / ft)
    Metric,   // 公制 (°C / kPa / m)
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "IMPERIAL",
            UnitSystem::Metric => "METRIC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IMPERIAL" => Some(UnitSystem::Imperial),
            "METRIC" => Some(UnitSystem::Metric),
            _ => None,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 制冷剂压力等级 (Refrigerant Pressure Class)
// ==========================================
// 高压机组额外产出冷凝器制冷剂计算温度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PressureClass {
    High, // 高压制冷剂 (R-134a / R-22 等)
    Low,  // 低压制冷剂 (R-123 / R-11 等)
}

impl PressureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PressureClass::High => "HIGH",
            PressureClass::Low => "LOW",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HIGH" => Some(PressureClass::High),
            "LOW" => Some(PressureClass::Low),
            _ => None,
        }
    }
}

impl fmt::Display for PressureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 告警严重度 (Alert Severity)
// ==========================================
// 判定顺序: 先评估告警条件,满足则不再评估警告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Warning, // 警告
    Alert,   // 告警
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "WARNING",
            AlertSeverity::Alert => "ALERT",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 通知渠道 (Notify Channel)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotifyChannel {
    Email, // 邮件
    InApp, // 应用内
    Both,  // 两者
}

impl NotifyChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyChannel::Email => "EMAIL",
            NotifyChannel::InApp => "IN_APP",
            NotifyChannel::Both => "BOTH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMAIL" => Some(NotifyChannel::Email),
            "IN_APP" => Some(NotifyChannel::InApp),
            "BOTH" => Some(NotifyChannel::Both),
            _ => None,
        }
    }

    /// 是否包含邮件渠道
    pub fn includes_email(&self) -> bool {
        matches!(self, NotifyChannel::Email | NotifyChannel::Both)
    }

    /// 是否包含应用内渠道
    pub fn includes_in_app(&self) -> bool {
        matches!(self, NotifyChannel::InApp | NotifyChannel::Both)
    }
}

impl fmt::Display for NotifyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 比较运算符 (Compare Op)
// ==========================================
// 阈值规则支持: > < >= <= =
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Gt, // >
    Lt, // <
    Ge, // >=
    Le, // <=
    Eq, // =
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Eq => "=",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Ge),
            "<=" => Some(CompareOp::Le),
            "=" => Some(CompareOp::Eq),
            _ => None,
        }
    }

    /// 评估 value op threshold
    ///
    /// 等值比较采用容差 1e-9,避免浮点直接相等
    pub fn evaluate(&self, value: f64, threshold: f64) -> bool {
        match self {
            CompareOp::Gt => value > threshold,
            CompareOp::Lt => value < threshold,
            CompareOp::Ge => value >= threshold,
            CompareOp::Le => value <= threshold,
            CompareOp::Eq => (value - threshold).abs() < 1e-9,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 时间线事件类型 (Timeline Kind)
// ==========================================
// 红线: 每次提交/隔离恰好产生一条时间线事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineKind {
    NewReading,    // 新读数提交
    EditedReading, // 读数被编辑
    BadReading,    // 坏读数(隔离)
}

impl TimelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineKind::NewReading => "NEW_READING",
            TimelineKind::EditedReading => "EDITED_READING",
            TimelineKind::BadReading => "BAD_READING",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW_READING" => Some(TimelineKind::NewReading),
            "EDITED_READING" => Some(TimelineKind::EditedReading),
            "BAD_READING" => Some(TimelineKind::BadReading),
            _ => None,
        }
    }
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 角色作用域 (Role Scope)
// ==========================================
// 告警资格判定: 组织级总是命中;设施级/设备级需在分配列表内
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleScope {
    OrgWide,         // 组织级
    FacilityScoped,  // 设施级
    EquipmentScoped, // 设备级
}

impl RoleScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleScope::OrgWide => "ORG_WIDE",
            RoleScope::FacilityScoped => "FACILITY_SCOPED",
            RoleScope::EquipmentScoped => "EQUIPMENT_SCOPED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ORG_WIDE" => Some(RoleScope::OrgWide),
            "FACILITY_SCOPED" => Some(RoleScope::FacilityScoped),
            "EQUIPMENT_SCOPED" => Some(RoleScope::EquipmentScoped),
            _ => None,
        }
    }
}

impl fmt::Display for RoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_op_evaluate() {
        assert!(CompareOp::Gt.evaluate(25.0, 20.0));
        assert!(!CompareOp::Gt.evaluate(20.0, 20.0));
        assert!(CompareOp::Ge.evaluate(20.0, 20.0));
        assert!(CompareOp::Lt.evaluate(5.0, 10.0));
        assert!(CompareOp::Le.evaluate(10.0, 10.0));
        assert!(CompareOp::Eq.evaluate(10.0, 10.0));
        assert!(!CompareOp::Eq.evaluate(10.001, 10.0));
    }

    #[test]
    fn test_compare_op_parse_roundtrip() {
        for op in [
            CompareOp::Gt,
            CompareOp::Lt,
            CompareOp::Ge,
            CompareOp::Le,
            CompareOp::Eq,
        ] {
            assert_eq!(CompareOp::parse(op.as_str()), Some(op));
        }
        assert_eq!(CompareOp::parse("!="), None);
    }

    #[test]
    fn test_mode_parse_roundtrip() {
        assert_eq!(
            WiringMode::parse(WiringMode::SinglePhase.as_str()),
            Some(WiringMode::SinglePhase)
        );
        assert_eq!(
            OilPressureMode::parse(OilPressureMode::DifferentialOnly.as_str()),
            Some(OilPressureMode::DifferentialOnly)
        );
        assert_eq!(
            PurgeUnitMode::parse(PurgeUnitMode::HoursMinutes.as_str()),
            Some(PurgeUnitMode::HoursMinutes)
        );
        assert_eq!(TimelineKind::parse("BAD_READING"), Some(TimelineKind::BadReading));
        assert_eq!(RoleScope::parse("ORG_WIDE"), Some(RoleScope::OrgWide));
    }

    #[test]
    fn test_notify_channel_includes() {
        assert!(NotifyChannel::Both.includes_email());
        assert!(NotifyChannel::Both.includes_in_app());
        assert!(NotifyChannel::Email.includes_email());
        assert!(!NotifyChannel::Email.includes_in_app());
        assert!(!NotifyChannel::InApp.includes_email());
    }
}
