// ==========================================
// 冷水机组能效监测系统 - 效率损失族计算
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3.3 损失族
// 口径: 各分项均为百分比;系数来自设备档案设计常数
// ==========================================

use crate::engine::round::round4;

/// 进水温度损失 = (冷凝器进水温度 - 设计进水温度) × 冷凝侧系数
///
/// 进水低于设计值时为负(增益),保留符号
pub fn inlet_temp_loss(cond_inlet_temp: f64, design_cond_inlet_temp: f64, coeff: f64) -> f64 {
    round4((cond_inlet_temp - design_cond_inlet_temp) * coeff)
}

/// 冷凝器趋近损失 = max(0, 趋近 - 设计趋近) × 冷凝侧系数
///
/// 趋近温度不可得(制冷剂温度缺失且查表失败)时按 0 降级
pub fn cond_approach_loss(cond_approach: Option<f64>, design_approach: f64, coeff: f64) -> f64 {
    match cond_approach {
        Some(a) => round4((a - design_approach).max(0.0) * coeff),
        None => 0.0,
    }
}

/// 蒸发器温度损失 = (设计出水温度 - 实际出水温度) × 蒸发侧系数
pub fn evap_temp_loss(design_evap_outlet_temp: f64, evap_outlet_temp: f64, coeff: f64) -> f64 {
    round4((design_evap_outlet_temp - evap_outlet_temp) * coeff)
}

/// 蒸发器趋近损失 = max(0, 趋近 - 设计趋近) × 蒸发侧系数
pub fn evap_approach_loss(evap_approach: Option<f64>, design_approach: f64, coeff: f64) -> f64 {
    match evap_approach {
        Some(a) => round4((a - design_approach).max(0.0) * coeff),
        None => 0.0,
    }
}

/// 不凝气损失 = 不凝气估算值 × 不凝气系数
pub fn non_cond_loss(non_condensables: f64, coeff: f64) -> f64 {
    round4(non_condensables * coeff)
}

/// 温差损失 = max(0, 负载期望温差 - 实际温差) × 蒸发侧系数
///
/// 负载期望温差 = 设计温差 × 负载率/100
pub fn delta_t_loss(
    evap_inlet_temp: f64,
    evap_outlet_temp: f64,
    design_evap_delta_t: f64,
    load_factor: f64,
    coeff: f64,
) -> f64 {
    let expected = round4(design_evap_delta_t * load_factor / 100.0);
    let actual = round4(evap_inlet_temp - evap_outlet_temp);
    round4((expected - actual).max(0.0) * coeff)
}

/// 损失族汇总
#[derive(Debug, Clone, Copy, Default)]
pub struct LossFamily {
    pub inlet_temp_loss: f64,
    pub cond_approach_loss: f64,
    pub evap_temp_loss: f64,
    pub evap_approach_loss: f64,
    pub non_cond_loss: f64,
    pub delta_t_loss: f64,
}

impl LossFamily {
    /// 总损失 = 全族六项之和
    pub fn total(&self) -> f64 {
        round4(
            self.inlet_temp_loss
                + self.cond_approach_loss
                + self.evap_temp_loss
                + self.evap_approach_loss
                + self.non_cond_loss
                + self.delta_t_loss,
        )
    }

    /// 其它损失 = 进水 + 蒸发温度 + 温差(温度类三项)
    pub fn other(&self) -> f64 {
        round4(self.inlet_temp_loss + self.evap_temp_loss + self.delta_t_loss)
    }
}
