// ==========================================
// 冷水机组能效监测系统 - 数值舍入策略
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 2.1 数值策略
// 红线: 所有中间结果先舍入到4位小数再复用;展示损失单独2位
// ==========================================

/// 四舍五入到4位小数(指标管线统一口径)
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// 四舍五入到2位小数(展示用综合损失)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 固定4位小数格式化(负载率展示串)
pub fn fmt4(value: f64) -> String {
    format!("{:.4}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round4() {
        assert_eq!(round4(83.333_333), 83.3333);
        assert_eq!(round4(0.000_05), 0.0001);
        assert_eq!(round4(-1.234_56), -1.2346);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(25.456), 25.46);
        assert_eq!(round2(25.454), 25.45);
    }

    #[test]
    fn test_fmt4() {
        assert_eq!(fmt4(83.3333), "83.3333");
        assert_eq!(fmt4(100.0), "100.0000");
    }
}
