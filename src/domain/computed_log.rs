// ==========================================
// 冷水机组能效监测系统 - 计算日志领域模型
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3. 派生指标清单
// 红线: (equipment_id, ts_utc) 非删除记录至多一条
// ==========================================

use crate::domain::reading::NormalizedReading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DerivedMetrics - 派生指标
// ==========================================
// 指标引擎的输出;中间量一律先四舍五入到4位小数再复用
// 展示用综合损失(eff_loss)单独保留2位小数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DerivedMetrics {
    // ===== 步骤1: 趋近温度 =====
    pub cond_approach: Option<f64>,          // 冷凝器趋近温度
    pub evap_approach: Option<f64>,          // 蒸发器趋近温度
    pub cond_approach_variance: Option<f64>, // 趋近温度与设计值偏差(冷凝)
    pub evap_approach_variance: Option<f64>, // 趋近温度与设计值偏差(蒸发)

    // ===== 步骤2: 负载率 =====
    pub load_factor: f64,          // 负载率 (%)
    pub load_factor_display: String, // 负载率固定4位小数展示串

    // ===== 步骤3: 损失族 (%) =====
    pub inlet_temp_loss: f64,    // 进水温度损失
    pub cond_approach_loss: f64, // 冷凝器趋近损失
    pub evap_temp_loss: f64,     // 蒸发器温度损失
    pub evap_approach_loss: f64, // 蒸发器趋近损失
    pub non_cond_loss: f64,      // 不凝气损失
    pub delta_t_loss: f64,       // 温差损失
    pub total_loss: f64,         // 总损失 = 六项之和
    pub other_loss: f64,         // 其它损失 = 进水 + 蒸发温度 + 温差
    pub eff_loss: f64,           // 展示用综合损失(2位小数)

    // ===== 步骤4: 成本 =====
    pub target_cost: f64,           // 年目标电费
    pub target_cost_per_hour: f64,  // 目标电费/小时
    pub inlet_loss_cost: f64,       // 进水温度损失成本
    pub cond_approach_loss_cost: f64, // 冷凝趋近损失成本
    pub evap_temp_loss_cost: f64,   // 蒸发温度损失成本
    pub evap_approach_loss_cost: f64, // 蒸发趋近损失成本
    pub non_cond_loss_cost: f64,    // 不凝气损失成本
    pub delta_t_loss_cost: f64,     // 温差损失成本
    pub loss_cost: f64,             // 损失成本合计
    pub actual_cost: f64,           // 实际成本 = 目标×(1+总损失×0.01)

    // ===== 步骤5: 流量估算 =====
    pub cond_flow_est: f64, // 冷凝器流量估算
    pub evap_flow_est: f64, // 蒸发器流量估算

    // ===== 步骤6: 制冷剂表推算温度 =====
    pub evap_refrig_temp_est: Option<f64>,  // 蒸发器制冷剂温度估算
    pub calc_cond_refrig_temp: Option<f64>, // 冷凝器制冷剂计算温度(高压机组)

    // ===== 步骤7: 电气不平衡 =====
    pub amps_imbalance: f64,  // 相电流不平衡 (%)
    pub volts_imbalance: f64, // 相电压不平衡 (%)

    // ===== 步骤8: 油压差 =====
    pub final_oil_diff: f64, // 最终油压差(按油压模式分支)

    // ===== 步骤9: 不凝气 =====
    pub non_condensables: f64, // 不凝气估算 (psi)

    // ===== 步骤10: 运行小时连续性 =====
    pub run_hours_valid: bool, // 与邻居日志比较得出的有效标志

    // ===== 步骤11: 能量当量损失 =====
    pub kwh_loss: f64, // 年损失电量 (kWh)
    pub btu_loss: f64, // 年损失热量 (BTU)
    pub co2_loss: f64, // 年损失排放 (kgCO2)

    // ===== 步骤12: 海拔修正 =====
    pub altitude_factor: f64, // 海拔修正系数

    // ===== 步骤13: 满载当量损失族 =====
    pub fle_inlet_temp_loss: f64,
    pub fle_cond_approach_loss: f64,
    pub fle_evap_temp_loss: f64,
    pub fle_evap_approach_loss: f64,
    pub fle_non_cond_loss: f64,
    pub fle_delta_t_loss: f64,
}

// ==========================================
// ComputedLog - 计算日志(已提交读数)
// ==========================================
// 归一化输入字段 + 全部派生指标;软删除,可经更新路径变更
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedLog {
    // ===== 标识 =====
    pub log_id: String,
    pub equipment_id: String,
    pub facility_id: String, // 冗余自设备档案,告警作用域判定用
    pub company_id: String,  // 冗余自设备档案
    pub actor_id: String,    // 录入人

    // ===== 时间 =====
    pub local_date: String,
    pub local_time: String,
    pub utc_offset: String,
    pub ts_utc: DateTime<Utc>, // 规范 UTC 时间戳(去重键)

    // ===== 归一化输入(已过校验清单,均为确定值) =====
    pub cond_inlet_temp: f64,
    pub cond_outlet_temp: f64,
    pub evap_inlet_temp: f64,
    pub evap_outlet_temp: f64,
    pub outside_air_temp: f64,
    pub bearing_temp: f64,
    pub cond_refrig_temp: Option<f64>, // 直读温度可缺(由表推算补位)
    pub evap_refrig_temp: Option<f64>,
    pub cond_pressure: f64,
    pub evap_pressure: f64,
    pub amps_phase1: f64,
    pub amps_phase2: f64,
    pub amps_phase3: f64,
    pub volts_phase1: f64,
    pub volts_phase2: f64,
    pub volts_phase3: f64,
    pub percent_load: Option<f64>,
    pub oil_pressure_high: f64,
    pub oil_pressure_low: f64,
    pub oil_pressure_diff: f64,
    pub run_hours: f64,
    pub purge_minutes: f64,
    pub notes: String,

    // ===== 运行小时连续性(邻居日志快照) =====
    pub last_run_hours: Option<f64>,          // 前一条日志运行小时
    pub last_run_hours_ts: Option<DateTime<Utc>>, // 前一条日志时间
    pub next_run_hours: Option<f64>,          // 后一条日志运行小时
    pub next_run_hours_ts: Option<DateTime<Utc>>, // 后一条日志时间

    // ===== 派生指标 =====
    pub metrics: DerivedMetrics,

    // ===== 生命周期 =====
    pub deleted: bool, // 软删除标志,从不物理删除
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComputedLog {
    /// 由归一化读数装配日志骨架(派生指标与邻居快照由摄取服务填充)
    ///
    /// # 前置条件
    /// - 读数已通过校验清单,必填字段均有确定值
    pub fn from_normalized(
        log_id: String,
        normalized: &NormalizedReading,
        facility_id: String,
        company_id: String,
        actor_id: String,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        Some(Self {
            log_id,
            equipment_id: normalized.equipment_id.clone(),
            facility_id,
            company_id,
            actor_id,
            local_date: normalized.local_date.clone(),
            local_time: normalized.local_time.clone(),
            utc_offset: normalized.utc_offset.clone(),
            ts_utc: normalized.ts_utc?,
            cond_inlet_temp: normalized.cond_inlet_temp?,
            cond_outlet_temp: normalized.cond_outlet_temp?,
            evap_inlet_temp: normalized.evap_inlet_temp?,
            evap_outlet_temp: normalized.evap_outlet_temp?,
            outside_air_temp: normalized.outside_air_temp?,
            bearing_temp: normalized.bearing_temp.unwrap_or(0.0),
            cond_refrig_temp: normalized.cond_refrig_temp,
            evap_refrig_temp: normalized.evap_refrig_temp,
            cond_pressure: normalized.cond_pressure?,
            evap_pressure: normalized.evap_pressure?,
            amps_phase1: normalized.amps_phase1?,
            amps_phase2: normalized.amps_phase2?,
            amps_phase3: normalized.amps_phase3?,
            volts_phase1: normalized.volts_phase1?,
            volts_phase2: normalized.volts_phase2?,
            volts_phase3: normalized.volts_phase3?,
            percent_load: normalized.percent_load,
            oil_pressure_high: normalized.oil_pressure_high?,
            oil_pressure_low: normalized.oil_pressure_low?,
            oil_pressure_diff: normalized.oil_pressure_diff?,
            run_hours: normalized.run_hours?,
            purge_minutes: normalized.purge_minutes?,
            notes: normalized.notes.clone()?,
            last_run_hours: None,
            last_run_hours_ts: None,
            next_run_hours: None,
            next_run_hours_ts: None,
            metrics: DerivedMetrics::default(),
            deleted: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// 按指标键读取指标值(告警规则求值入口)
    ///
    /// # 返回
    /// - Some(value): 指标存在
    /// - None: 指标键未知或该日志上无此指标,规则跳过
    pub fn metric_value(&self, key: &str) -> Option<f64> {
        let m = &self.metrics;
        match key {
            // 损失族
            "effLoss" => Some(m.eff_loss),
            "totalLoss" => Some(m.total_loss),
            "otherLoss" => Some(m.other_loss),
            "inletTempLoss" => Some(m.inlet_temp_loss),
            "condApproachLoss" => Some(m.cond_approach_loss),
            "evapTempLoss" => Some(m.evap_temp_loss),
            "evapApproachLoss" => Some(m.evap_approach_loss),
            "nonCondLoss" => Some(m.non_cond_loss),
            "deltaTLoss" => Some(m.delta_t_loss),
            // 趋近温度
            "condApproach" => m.cond_approach,
            "evapApproach" => m.evap_approach,
            "condApproachVariance" => m.cond_approach_variance,
            "evapApproachVariance" => m.evap_approach_variance,
            // 负载与电气
            "loadFactor" => Some(m.load_factor),
            "ampsImbalance" => Some(m.amps_imbalance),
            "voltsImbalance" => Some(m.volts_imbalance),
            // 成本
            "targetCost" => Some(m.target_cost),
            "actualCost" => Some(m.actual_cost),
            "lossCost" => Some(m.loss_cost),
            // 能量当量
            "kwhLoss" => Some(m.kwh_loss),
            "btuLoss" => Some(m.btu_loss),
            "co2Loss" => Some(m.co2_loss),
            // 流量与油气
            "condFlowEst" => Some(m.cond_flow_est),
            "evapFlowEst" => Some(m.evap_flow_est),
            "finalOilDiff" => Some(m.final_oil_diff),
            "nonCondensables" => Some(m.non_condensables),
            "altitudeFactor" => Some(m.altitude_factor),
            // 原始量
            "runHours" => Some(self.run_hours),
            "purgeMinutes" => Some(self.purge_minutes),
            "outsideAirTemp" => Some(self.outside_air_temp),
            "condPressure" => Some(self.cond_pressure),
            "evapPressure" => Some(self.evap_pressure),
            "bearingTemp" => Some(self.bearing_temp),
            _ => None,
        }
    }

    /// 还原为原始读数形态(更新路径: 合并补丁后重走归一化)
    pub fn to_raw_reading(&self) -> crate::domain::reading::RawReading {
        crate::domain::reading::RawReading {
            equipment_id: self.equipment_id.clone(),
            local_date: self.local_date.clone(),
            local_time: self.local_time.clone(),
            utc_offset: self.utc_offset.clone(),
            cond_inlet_temp: Some(self.cond_inlet_temp),
            cond_outlet_temp: Some(self.cond_outlet_temp),
            evap_inlet_temp: Some(self.evap_inlet_temp),
            evap_outlet_temp: Some(self.evap_outlet_temp),
            outside_air_temp: Some(self.outside_air_temp),
            bearing_temp: Some(self.bearing_temp),
            cond_refrig_temp: self.cond_refrig_temp,
            evap_refrig_temp: self.evap_refrig_temp,
            cond_pressure: Some(self.cond_pressure),
            evap_pressure: Some(self.evap_pressure),
            amps_phase1: Some(self.amps_phase1),
            amps_phase2: Some(self.amps_phase2),
            amps_phase3: Some(self.amps_phase3),
            volts_phase1: Some(self.volts_phase1),
            volts_phase2: Some(self.volts_phase2),
            volts_phase3: Some(self.volts_phase3),
            percent_load: self.percent_load,
            oil_pressure_high: Some(self.oil_pressure_high),
            oil_pressure_low: Some(self.oil_pressure_low),
            oil_pressure_diff: Some(self.oil_pressure_diff),
            run_hours: Some(self.run_hours),
            purge_minutes: Some(self.purge_minutes),
            purge_hours_part: None,
            purge_minutes_part: None,
            notes: Some(self.notes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> ComputedLog {
        let normalized = NormalizedReading {
            equipment_id: "EQ001".to_string(),
            local_date: "2026-03-01".to_string(),
            local_time: "08:00".to_string(),
            utc_offset: "+08:00".to_string(),
            ts_utc: Some(Utc::now()),
            cond_inlet_temp: Some(85.0),
            cond_outlet_temp: Some(95.0),
            evap_inlet_temp: Some(54.0),
            evap_outlet_temp: Some(44.0),
            outside_air_temp: Some(90.0),
            bearing_temp: Some(0.0),
            cond_refrig_temp: Some(97.0),
            evap_refrig_temp: Some(40.0),
            cond_pressure: Some(120.0),
            evap_pressure: Some(35.0),
            amps_phase1: Some(100.0),
            amps_phase2: Some(0.0),
            amps_phase3: Some(0.0),
            volts_phase1: Some(460.0),
            volts_phase2: Some(0.0),
            volts_phase3: Some(0.0),
            percent_load: None,
            oil_pressure_high: Some(0.0),
            oil_pressure_low: Some(0.0),
            oil_pressure_diff: Some(18.0),
            run_hours: Some(1200.0),
            purge_minutes: Some(5.0),
            notes: Some("正常".to_string()),
        };
        ComputedLog::from_normalized(
            "LOG001".to_string(),
            &normalized,
            "FAC001".to_string(),
            "CO001".to_string(),
            "USER001".to_string(),
            Utc::now(),
        )
        .expect("样例读数字段齐全")
    }

    #[test]
    fn test_metric_value_known_keys() {
        let mut log = sample_log();
        log.metrics.eff_loss = 25.0;
        log.metrics.load_factor = 83.3333;

        assert_eq!(log.metric_value("effLoss"), Some(25.0));
        assert_eq!(log.metric_value("loadFactor"), Some(83.3333));
        assert_eq!(log.metric_value("runHours"), Some(1200.0));
    }

    #[test]
    fn test_metric_value_unknown_key() {
        let log = sample_log();
        assert_eq!(log.metric_value("noSuchMetric"), None);
    }

    #[test]
    fn test_metric_value_absent_optional_metric() {
        let log = sample_log();
        // 未经引擎填充的可选指标返回 None,规则评估按跳过处理
        assert_eq!(log.metric_value("condApproach"), None);
    }

    #[test]
    fn test_to_raw_reading_preserves_inputs() {
        let log = sample_log();
        let raw = log.to_raw_reading();
        assert_eq!(raw.equipment_id, "EQ001");
        assert_eq!(raw.cond_inlet_temp, Some(85.0));
        assert_eq!(raw.notes.as_deref(), Some("正常"));
    }

    #[test]
    fn test_from_normalized_rejects_missing_required() {
        let normalized = NormalizedReading {
            equipment_id: "EQ001".to_string(),
            local_date: "2026-03-01".to_string(),
            local_time: "08:00".to_string(),
            utc_offset: "+08:00".to_string(),
            ts_utc: Some(Utc::now()),
            cond_inlet_temp: None, // 缺必填字段
            cond_outlet_temp: Some(95.0),
            evap_inlet_temp: Some(54.0),
            evap_outlet_temp: Some(44.0),
            outside_air_temp: Some(90.0),
            bearing_temp: Some(0.0),
            cond_refrig_temp: None,
            evap_refrig_temp: None,
            cond_pressure: Some(120.0),
            evap_pressure: Some(35.0),
            amps_phase1: Some(100.0),
            amps_phase2: Some(0.0),
            amps_phase3: Some(0.0),
            volts_phase1: Some(460.0),
            volts_phase2: Some(0.0),
            volts_phase3: Some(0.0),
            percent_load: None,
            oil_pressure_high: Some(0.0),
            oil_pressure_low: Some(0.0),
            oil_pressure_diff: Some(18.0),
            run_hours: Some(1200.0),
            purge_minutes: Some(5.0),
            notes: Some(String::new()),
        };
        assert!(ComputedLog::from_normalized(
            "LOG001".to_string(),
            &normalized,
            "FAC001".to_string(),
            "CO001".to_string(),
            "USER001".to_string(),
            Utc::now(),
        )
        .is_none());
    }
}
