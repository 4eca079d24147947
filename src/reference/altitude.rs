// ==========================================
// 冷水机组能效监测系统 - 海拔修正参考表
// ==========================================
// 职责: 设施海拔 + 单位制 → 修正系数(分段阶梯表)
// ==========================================

use crate::domain::types::UnitSystem;

// ==========================================
// AltitudeTable - 参考表接口
// ==========================================
pub trait AltitudeTable: Send + Sync {
    /// 按海拔与单位制查修正系数
    ///
    /// # 返回
    /// - Some(factor): 阶梯表命中(取不超过海拔的最大档位)
    /// - None: 海拔非法(NaN)
    fn correction_factor(&self, altitude: f64, unit_system: UnitSystem) -> Option<f64>;
}

// ==========================================
// BuiltinAltitudeTable - 内置阶梯表
// ==========================================
// 档位: (海拔下限, 系数),海平面为 1.0,每档递减
pub struct BuiltinAltitudeTable {
    imperial: Vec<(f64, f64)>, // 英尺档
    metric: Vec<(f64, f64)>,   // 米档
}

impl BuiltinAltitudeTable {
    pub fn new() -> Self {
        Self {
            imperial: vec![
                (0.0, 1.0),
                (1000.0, 0.98),
                (2000.0, 0.96),
                (3000.0, 0.94),
                (4000.0, 0.92),
                (5000.0, 0.90),
                (6000.0, 0.88),
                (7000.0, 0.86),
                (8000.0, 0.84),
            ],
            metric: vec![
                (0.0, 1.0),
                (300.0, 0.98),
                (600.0, 0.96),
                (900.0, 0.94),
                (1200.0, 0.92),
                (1500.0, 0.90),
                (1800.0, 0.88),
                (2100.0, 0.86),
                (2400.0, 0.84),
            ],
        }
    }

    fn lookup(buckets: &[(f64, f64)], altitude: f64) -> f64 {
        let mut factor = buckets[0].1;
        for &(floor, f) in buckets {
            if altitude >= floor {
                factor = f;
            } else {
                break;
            }
        }
        factor
    }
}

impl Default for BuiltinAltitudeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AltitudeTable for BuiltinAltitudeTable {
    fn correction_factor(&self, altitude: f64, unit_system: UnitSystem) -> Option<f64> {
        if altitude.is_nan() {
            return None;
        }
        let buckets = match unit_system {
            UnitSystem::Imperial => &self.imperial,
            UnitSystem::Metric => &self.metric,
        };
        Some(Self::lookup(buckets, altitude))
    }
}
