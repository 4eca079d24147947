// ==========================================
// 冷水机组能效监测系统 - 派生指标引擎
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3. 公式管线(13步)
// 职责: (归一化读数, 设备档案, 参考表, 邻居日志) → 派生指标
// 红线: 无状态、无副作用、无 I/O;算术步骤之间不挂起
// 红线: 中间结果一律先舍入到4位小数再复用
// ==========================================

pub mod approach;
pub mod costs;
pub mod electrical;
pub mod energy;
pub mod flows;
pub mod losses;
pub mod oil;

use crate::domain::computed_log::DerivedMetrics;
use crate::domain::equipment::EquipmentProfile;
use crate::domain::reading::NormalizedReading;
use crate::domain::types::PressureClass;
use crate::engine::round::{fmt4, round2, round4};
use crate::reference::altitude::AltitudeTable;
use crate::reference::refrigerant::RefrigerantTable;
use chrono::{DateTime, Utc};

use costs::LossCosts;
use losses::LossFamily;

// ==========================================
// RunHourNeighbors - 运行小时邻居快照
// ==========================================
// 连续性追踪器产出: 时间上最近的前/后一条可用日志
#[derive(Debug, Clone, Default)]
pub struct RunHourNeighbors {
    pub last_run_hours: Option<f64>,
    pub last_ts: Option<DateTime<Utc>>,
    pub next_run_hours: Option<f64>,
    pub next_ts: Option<DateTime<Utc>>,
}

// ==========================================
// MetricsEngine - 指标引擎
// ==========================================
pub struct MetricsEngine;

impl MetricsEngine {
    /// 执行完整公式管线
    ///
    /// 闸门前执行: 输入可能含缺失字段,缺失一律按 0 降级参与计算;
    /// 若读数随后被隔离,这些派生值不会入库
    pub fn compute(
        normalized: &NormalizedReading,
        profile: &EquipmentProfile,
        refrigerant_table: &dyn RefrigerantTable,
        altitude_table: &dyn AltitudeTable,
        facility_altitude: f64,
        neighbors: &RunHourNeighbors,
    ) -> DerivedMetrics {
        let d = &profile.design;

        let cond_inlet = Self::num(normalized.cond_inlet_temp);
        let cond_outlet = Self::num(normalized.cond_outlet_temp);
        let evap_inlet = Self::num(normalized.evap_inlet_temp);
        let evap_outlet = Self::num(normalized.evap_outlet_temp);
        let cond_pressure = Self::num(normalized.cond_pressure);
        let evap_pressure = Self::num(normalized.evap_pressure);
        let amps = [
            Self::num(normalized.amps_phase1),
            Self::num(normalized.amps_phase2),
            Self::num(normalized.amps_phase3),
        ];
        let volts = [
            Self::num(normalized.volts_phase1),
            Self::num(normalized.volts_phase2),
            Self::num(normalized.volts_phase3),
        ];

        // === 步骤 6(前置解析): 制冷剂表推算温度 ===
        // 与步骤 1 存在数据回馈,先解析有效制冷剂温度
        let evap_refrig_temp_est = normalized
            .evap_pressure
            .and_then(|p| refrigerant_table.sat_temp(&profile.refrigerant, p))
            .map(round4);
        let calc_cond_refrig_temp = match profile.pressure_class {
            PressureClass::High => normalized
                .cond_pressure
                .and_then(|p| refrigerant_table.sat_temp(&profile.refrigerant, p))
                .map(round4),
            PressureClass::Low => None,
        };
        let evap_refrig_eff = Self::finite(normalized.evap_refrig_temp).or(evap_refrig_temp_est);
        let cond_refrig_eff = Self::finite(normalized.cond_refrig_temp).or(calc_cond_refrig_temp);

        // === 步骤 1: 趋近温度与设计偏差 ===
        let cond_approach = approach::cond_approach(cond_refrig_eff, cond_outlet);
        let evap_approach = approach::evap_approach(evap_outlet, evap_refrig_eff);
        let cond_approach_variance =
            approach::approach_variance(cond_approach, d.design_cond_approach);
        let evap_approach_variance =
            approach::approach_variance(evap_approach, d.design_evap_approach);

        // === 步骤 2: 负载率 ===
        let load_factor = electrical::load_factor(
            Self::finite(normalized.percent_load),
            amps,
            d.full_load_amps,
        );
        let load_factor_display = fmt4(load_factor);

        // === 步骤 9(前置): 不凝气估算(步骤 3 不凝气损失的输入) ===
        let cond_sat_pressure = cond_refrig_eff
            .and_then(|t| refrigerant_table.sat_pressure(&profile.refrigerant, t))
            .map(round4);
        let non_condensables = oil::non_condensables(cond_pressure, cond_sat_pressure);

        // === 步骤 3: 损失族 ===
        let family = LossFamily {
            inlet_temp_loss: losses::inlet_temp_loss(
                cond_inlet,
                d.design_cond_inlet_temp,
                d.cond_loss_coeff,
            ),
            cond_approach_loss: losses::cond_approach_loss(
                cond_approach,
                d.design_cond_approach,
                d.cond_loss_coeff,
            ),
            evap_temp_loss: losses::evap_temp_loss(
                d.design_evap_outlet_temp,
                evap_outlet,
                d.evap_loss_coeff,
            ),
            evap_approach_loss: losses::evap_approach_loss(
                evap_approach,
                d.design_evap_approach,
                d.evap_loss_coeff,
            ),
            non_cond_loss: losses::non_cond_loss(non_condensables, d.non_cond_loss_coeff),
            delta_t_loss: losses::delta_t_loss(
                evap_inlet,
                evap_outlet,
                d.design_evap_delta_t,
                load_factor,
                d.evap_loss_coeff,
            ),
        };
        let total_loss = family.total();
        let other_loss = family.other();
        let eff_loss = round2(total_loss);

        // === 步骤 4: 成本 ===
        let target_cost = costs::target_cost(
            d.design_input_kw,
            d.annual_run_hours,
            d.energy_cost_per_kwh,
        );
        let target_cost_per_hour =
            costs::target_cost_per_hour(d.design_input_kw, d.energy_cost_per_kwh);
        let loss_costs = LossCosts::from_family(&family, target_cost, target_cost_per_hour);
        let loss_cost = loss_costs.total();
        let actual_cost = costs::actual_cost(target_cost, total_loss);

        // === 步骤 5: 流量估算 ===
        let cond_delta_t = round4(cond_outlet - cond_inlet);
        let evap_delta_t = round4(evap_inlet - evap_outlet);
        let cond_flow_est = flows::cond_flow_est(d.design_tons, load_factor, cond_delta_t);
        let evap_flow_est = flows::evap_flow_est(d.design_tons, load_factor, evap_delta_t);

        // === 步骤 7: 相不平衡 ===
        let amps_imbalance = electrical::phase_imbalance(amps);
        let volts_imbalance = electrical::phase_imbalance(volts);

        // === 步骤 8: 最终油压差 ===
        let final_oil_diff = oil::final_oil_diff(
            profile.oil_pressure_mode,
            Self::num(normalized.oil_pressure_high),
            Self::num(normalized.oil_pressure_low),
            Self::num(normalized.oil_pressure_diff),
            evap_pressure,
        );

        // === 步骤 10: 运行小时有效性 ===
        let run_hours_valid =
            Self::run_hours_valid(Self::num(normalized.run_hours), neighbors);

        // === 步骤 11: 能量当量损失 ===
        let kwh_loss = energy::kwh_loss(total_loss, d.design_input_kw, d.annual_run_hours);
        let btu_loss = energy::btu_loss(kwh_loss);
        let co2_loss = energy::co2_loss(kwh_loss, d.emission_factor);

        // === 步骤 12: 海拔修正系数 ===
        // 查表失败按不修正(1.0)处理
        let altitude_factor = altitude_table
            .correction_factor(facility_altitude, profile.unit_system)
            .unwrap_or(1.0);

        // === 步骤 13: 满载当量损失族 ===
        let fle_inlet_temp_loss = energy::full_load_equivalent(family.inlet_temp_loss, load_factor);
        let fle_cond_approach_loss =
            energy::full_load_equivalent(family.cond_approach_loss, load_factor);
        let fle_evap_temp_loss = energy::full_load_equivalent(family.evap_temp_loss, load_factor);
        let fle_evap_approach_loss =
            energy::full_load_equivalent(family.evap_approach_loss, load_factor);
        let fle_non_cond_loss = energy::full_load_equivalent(family.non_cond_loss, load_factor);
        let fle_delta_t_loss = energy::full_load_equivalent(family.delta_t_loss, load_factor);

        DerivedMetrics {
            cond_approach,
            evap_approach,
            cond_approach_variance,
            evap_approach_variance,
            load_factor,
            load_factor_display,
            inlet_temp_loss: family.inlet_temp_loss,
            cond_approach_loss: family.cond_approach_loss,
            evap_temp_loss: family.evap_temp_loss,
            evap_approach_loss: family.evap_approach_loss,
            non_cond_loss: family.non_cond_loss,
            delta_t_loss: family.delta_t_loss,
            total_loss,
            other_loss,
            eff_loss,
            target_cost,
            target_cost_per_hour,
            inlet_loss_cost: loss_costs.inlet_loss_cost,
            cond_approach_loss_cost: loss_costs.cond_approach_loss_cost,
            evap_temp_loss_cost: loss_costs.evap_temp_loss_cost,
            evap_approach_loss_cost: loss_costs.evap_approach_loss_cost,
            non_cond_loss_cost: loss_costs.non_cond_loss_cost,
            delta_t_loss_cost: loss_costs.delta_t_loss_cost,
            loss_cost,
            actual_cost,
            cond_flow_est,
            evap_flow_est,
            evap_refrig_temp_est,
            calc_cond_refrig_temp,
            amps_imbalance,
            volts_imbalance,
            final_oil_diff,
            non_condensables,
            run_hours_valid,
            kwh_loss,
            btu_loss,
            co2_loss,
            altitude_factor,
            fle_inlet_temp_loss,
            fle_cond_approach_loss,
            fle_evap_temp_loss,
            fle_evap_approach_loss,
            fle_non_cond_loss,
            fle_delta_t_loss,
        }
    }

    /// 运行小时有效性: 前邻 ≤ 本次 ≤ 后邻(缺邻居按空真)
    fn run_hours_valid(run_hours: f64, neighbors: &RunHourNeighbors) -> bool {
        if let Some(last) = neighbors.last_run_hours {
            if run_hours < last {
                return false;
            }
        }
        if let Some(next) = neighbors.next_run_hours {
            if run_hours > next {
                return false;
            }
        }
        true
    }

    /// 缺失/NaN 按 0 降级
    fn num(value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }

    /// 过滤出有限值
    fn finite(value: Option<f64>) -> Option<f64> {
        value.filter(|v| v.is_finite())
    }
}
