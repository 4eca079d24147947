// ==========================================
// 冷水机组能效监测系统 - 成本指标计算
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3.4 成本
// 口径: 年目标电费为基准;温度类损失按小时电费折算
// ==========================================

use crate::engine::metrics::losses::LossFamily;
use crate::engine::round::round4;

/// 年目标电费 = 设计输入功率 × 年运行小时 × 电价
pub fn target_cost(design_input_kw: f64, annual_run_hours: f64, energy_cost_per_kwh: f64) -> f64 {
    round4(design_input_kw * annual_run_hours * energy_cost_per_kwh)
}

/// 目标电费/小时 = 设计输入功率 × 电价
pub fn target_cost_per_hour(design_input_kw: f64, energy_cost_per_kwh: f64) -> f64 {
    round4(design_input_kw * energy_cost_per_kwh)
}

/// 压力类损失成本 = 损失% × 年目标电费 × 0.01
pub fn pressure_loss_cost(loss_pct: f64, target_cost: f64) -> f64 {
    round4(loss_pct * target_cost * 0.01)
}

/// 温度类损失成本 = 损失% × 目标电费/小时
pub fn temp_loss_cost(loss_pct: f64, target_cost_per_hour: f64) -> f64 {
    round4(loss_pct * target_cost_per_hour)
}

/// 实际成本 = 年目标电费 × (1 + 总损失 × 0.01)
pub fn actual_cost(target_cost: f64, total_loss: f64) -> f64 {
    round4(target_cost * (1.0 + total_loss * 0.01))
}

/// 损失成本族汇总
///
/// 温度类三项(进水/蒸发温度/温差)按小时电费;
/// 其余三项(冷凝趋近/蒸发趋近/不凝气)按年电费×0.01
#[derive(Debug, Clone, Copy, Default)]
pub struct LossCosts {
    pub inlet_loss_cost: f64,
    pub cond_approach_loss_cost: f64,
    pub evap_temp_loss_cost: f64,
    pub evap_approach_loss_cost: f64,
    pub non_cond_loss_cost: f64,
    pub delta_t_loss_cost: f64,
}

impl LossCosts {
    pub fn from_family(family: &LossFamily, target: f64, per_hour: f64) -> Self {
        Self {
            inlet_loss_cost: temp_loss_cost(family.inlet_temp_loss, per_hour),
            cond_approach_loss_cost: pressure_loss_cost(family.cond_approach_loss, target),
            evap_temp_loss_cost: temp_loss_cost(family.evap_temp_loss, per_hour),
            evap_approach_loss_cost: pressure_loss_cost(family.evap_approach_loss, target),
            non_cond_loss_cost: pressure_loss_cost(family.non_cond_loss, target),
            delta_t_loss_cost: temp_loss_cost(family.delta_t_loss, per_hour),
        }
    }

    /// 损失成本合计
    pub fn total(&self) -> f64 {
        round4(
            self.inlet_loss_cost
                + self.cond_approach_loss_cost
                + self.evap_temp_loss_cost
                + self.evap_approach_loss_cost
                + self.non_cond_loss_cost
                + self.delta_t_loss_cost,
        )
    }
}
