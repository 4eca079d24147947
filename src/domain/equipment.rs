// ==========================================
// 冷水机组能效监测系统 - 设备档案领域模型
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 0. 机组模式体系 / 附录A 设计常数
// 红线: 设计常数由档案提供,引擎不内置物理常数
// ==========================================

use crate::domain::types::{OilPressureMode, PressureClass, PurgeUnitMode, UnitSystem, WiringMode};
use serde::{Deserialize, Serialize};

// ==========================================
// EquipmentProfile - 设备档案
// ==========================================
// 每台机组的静态配置: 模式开关 + 设计常数
// 指标引擎是 (归一化读数, 档案, 参考表, 邻居日志) 的纯函数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentProfile {
    // ===== 标识 =====
    pub equipment_id: String,  // 设备ID
    pub serial_no: String,     // 出厂序列号(批量导入自然键)
    pub equipment_no: String,  // 设备编号(批量导入自然键)
    pub name: String,          // 设备名称
    pub facility_id: String,   // 所属设施
    pub company_id: String,    // 所属组织

    // ===== 模式开关 =====
    pub wiring_mode: WiringMode,           // 接线模式
    pub oil_pressure_mode: OilPressureMode, // 油压记录模式
    pub purge_unit_mode: PurgeUnitMode,    // 抽气装置模式
    pub has_bearing_temp: bool,            // 是否有轴承温度传感器
    pub unit_system: UnitSystem,           // 计量单位制
    pub refrigerant: String,               // 制冷剂名称 (R-134A / R-123 ...)
    pub pressure_class: PressureClass,     // 制冷剂压力等级
    pub run_hours_logged: bool,            // 是否记录运行小时
    pub compressor_count: i32,             // 压缩机台数

    // ===== 设计常数 =====
    pub design: DesignConstants,
}

// ==========================================
// DesignConstants - 设计常数
// ==========================================
// 全部来自机组铭牌/选型单,引擎视为黑盒输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignConstants {
    pub full_load_amps: f64,        // 满载电流 (A)
    pub design_tons: f64,           // 设计冷量 (冷吨)
    pub design_input_kw: f64,       // 设计输入功率 (kW)
    pub design_cond_approach: f64,  // 冷凝器设计趋近温度
    pub design_evap_approach: f64,  // 蒸发器设计趋近温度
    pub design_cond_inlet_temp: f64, // 冷凝器设计进水温度
    pub design_evap_outlet_temp: f64, // 蒸发器设计出水温度
    pub design_cond_delta_t: f64,   // 冷凝器设计温差
    pub design_evap_delta_t: f64,   // 蒸发器设计温差
    pub design_cond_flow: f64,      // 冷凝器设计流量
    pub design_evap_flow: f64,      // 蒸发器设计流量
    pub annual_run_hours: f64,      // 年运行小时
    pub energy_cost_per_kwh: f64,   // 电价 ($/kWh)
    pub emission_factor: f64,       // 排放因子 (kgCO2/kWh)
    pub cond_loss_coeff: f64,       // 冷凝侧损失系数 (%/度)
    pub evap_loss_coeff: f64,       // 蒸发侧损失系数 (%/度)
    pub non_cond_loss_coeff: f64,   // 不凝气损失系数 (%/psi)
}

// ==========================================
// Facility - 设施
// ==========================================
// 告警资格(设施级角色)与海拔修正的查询对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub facility_id: String,
    pub company_id: String,
    pub name: String,
    pub altitude: f64, // 海拔(英制 ft / 公制 m,与机组单位制一致)
}
