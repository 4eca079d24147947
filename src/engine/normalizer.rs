// ==========================================
// 冷水机组能效监测系统 - 读数归一化器
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 1. 读数归一化
// 职责: 按机组模式归零无关字段,计算规范 UTC 时间戳
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::equipment::EquipmentProfile;
use crate::domain::reading::{NormalizedReading, RawReading};
use crate::domain::types::{OilPressureMode, PurgeUnitMode, WiringMode};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

// ==========================================
// ReadingNormalizer - 纯函数工具类
// ==========================================
pub struct ReadingNormalizer;

impl ReadingNormalizer {
    /// 归一化一条原始读数
    ///
    /// 输出字段集与无关的调用方输入完全无关:
    /// 未用到的相电流/电压、油压、轴承温度一律归零
    pub fn normalize(raw: &RawReading, profile: &EquipmentProfile) -> NormalizedReading {
        let (amps, volts, percent_load) = Self::normalize_electrical(
            profile.wiring_mode,
            [raw.amps_phase1, raw.amps_phase2, raw.amps_phase3],
            [raw.volts_phase1, raw.volts_phase2, raw.volts_phase3],
            raw.percent_load,
        );

        let (oil_high, oil_low, oil_diff) = Self::normalize_oil(
            profile.oil_pressure_mode,
            raw.oil_pressure_high,
            raw.oil_pressure_low,
            raw.oil_pressure_diff,
        );

        let bearing_temp = Self::normalize_bearing(profile.has_bearing_temp, raw.bearing_temp);

        let purge_minutes = Self::purge_minutes(
            profile.purge_unit_mode,
            raw.purge_minutes,
            raw.purge_hours_part,
            raw.purge_minutes_part,
        );

        let ts_utc = Self::canonical_utc(&raw.local_date, &raw.local_time, &raw.utc_offset);

        NormalizedReading {
            equipment_id: raw.equipment_id.clone(),
            local_date: raw.local_date.clone(),
            local_time: raw.local_time.clone(),
            utc_offset: raw.utc_offset.clone(),
            ts_utc,
            cond_inlet_temp: raw.cond_inlet_temp,
            cond_outlet_temp: raw.cond_outlet_temp,
            evap_inlet_temp: raw.evap_inlet_temp,
            evap_outlet_temp: raw.evap_outlet_temp,
            outside_air_temp: raw.outside_air_temp,
            bearing_temp,
            cond_refrig_temp: raw.cond_refrig_temp,
            evap_refrig_temp: raw.evap_refrig_temp,
            cond_pressure: raw.cond_pressure,
            evap_pressure: raw.evap_pressure,
            amps_phase1: amps[0],
            amps_phase2: amps[1],
            amps_phase3: amps[2],
            volts_phase1: volts[0],
            volts_phase2: volts[1],
            volts_phase3: volts[2],
            percent_load,
            oil_pressure_high: oil_high,
            oil_pressure_low: oil_low,
            oil_pressure_diff: oil_diff,
            run_hours: raw.run_hours,
            purge_minutes,
            notes: raw.notes.clone(),
        }
    }

    /// 按接线模式归一化电气字段
    ///
    /// # 规则
    /// - SINGLE_PHASE: 保留1相,2/3相归零,负载百分比清空
    /// - THREE_PHASE: 3相全保留,负载百分比清空
    /// - PERCENT_LOAD: 电流/电压全归零,保留负载百分比
    /// - VOLTAGE_NOT_LOGGED: 保留电流,电压归零,负载百分比清空
    #[allow(clippy::type_complexity)]
    pub fn normalize_electrical(
        mode: WiringMode,
        amps: [Option<f64>; 3],
        volts: [Option<f64>; 3],
        percent_load: Option<f64>,
    ) -> ([Option<f64>; 3], [Option<f64>; 3], Option<f64>) {
        let zero = Some(0.0);
        match mode {
            WiringMode::SinglePhase => (
                [amps[0], zero, zero],
                [volts[0], zero, zero],
                None,
            ),
            WiringMode::ThreePhase => (amps, volts, None),
            WiringMode::PercentLoad => (
                [zero, zero, zero],
                [zero, zero, zero],
                percent_load,
            ),
            WiringMode::VoltageNotLogged => (amps, [zero, zero, zero], None),
        }
    }

    /// 按油压模式归一化油压字段
    ///
    /// # 规则
    /// - HIGH_LOW: 保留高+低,压差归零
    /// - HIGH_ONLY: 保留高,低与压差归零
    /// - DIFFERENTIAL_ONLY: 保留压差,高低归零
    /// - NOT_LOGGED: 全部归零
    pub fn normalize_oil(
        mode: OilPressureMode,
        high: Option<f64>,
        low: Option<f64>,
        diff: Option<f64>,
    ) -> (Option<f64>, Option<f64>, Option<f64>) {
        let zero = Some(0.0);
        match mode {
            OilPressureMode::HighLow => (high, low, zero),
            OilPressureMode::HighOnly => (high, zero, zero),
            OilPressureMode::DifferentialOnly => (zero, zero, diff),
            OilPressureMode::NotLogged => (zero, zero, zero),
        }
    }

    /// 轴承温度: 无传感器的机组归零
    pub fn normalize_bearing(has_sensor: bool, bearing: Option<f64>) -> Option<f64> {
        if has_sensor {
            bearing
        } else {
            Some(0.0)
        }
    }

    /// 计算抽气分钟数
    ///
    /// # 规则
    /// - MINUTES_ONLY: 直接取分钟读数(缺失/NaN 交由校验清单拦截)
    /// - HOURS_MINUTES: 小时×60 + 分钟,非数值输入按 0 处理
    pub fn purge_minutes(
        mode: PurgeUnitMode,
        minutes: Option<f64>,
        hours_part: Option<f64>,
        minutes_part: Option<f64>,
    ) -> Option<f64> {
        match mode {
            PurgeUnitMode::MinutesOnly => minutes,
            PurgeUnitMode::HoursMinutes => {
                let h = Self::numeric_or_zero(hours_part);
                let m = Self::numeric_or_zero(minutes_part);
                Some(h * 60.0 + m)
            }
        }
    }

    /// 非数值(缺失/NaN)按 0 处理
    fn numeric_or_zero(value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }

    /// 本地日期+时间+UTC偏移 → 规范 UTC 时间戳(去重键)
    ///
    /// # 支持格式
    /// - 日期: `%Y-%m-%d`
    /// - 时间: `%H:%M` 或 `%H:%M:%S`
    /// - 偏移: `+08:00` / `-05:00` / `Z`
    pub fn canonical_utc(
        local_date: &str,
        local_time: &str,
        utc_offset: &str,
    ) -> Option<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(local_date.trim(), "%Y-%m-%d").ok()?;
        let time_str = local_time.trim();
        let time = NaiveTime::parse_from_str(time_str, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time_str, "%H:%M:%S"))
            .ok()?;
        let offset = Self::parse_offset(utc_offset)?;
        let local = date.and_time(time);
        let dt = local.and_local_timezone(offset).single()?;
        Some(dt.with_timezone(&Utc))
    }

    /// 解析 UTC 偏移串
    fn parse_offset(raw: &str) -> Option<FixedOffset> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if s == "Z" || s == "z" {
            return FixedOffset::east_opt(0);
        }
        let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
            (1i32, rest)
        } else if let Some(rest) = s.strip_prefix('-') {
            (-1i32, rest)
        } else {
            return None;
        };
        let (hh, mm) = rest.split_once(':')?;
        let hours: i32 = hh.parse().ok()?;
        let minutes: i32 = mm.parse().ok()?;
        if hours > 14 || minutes > 59 {
            return None;
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // ==========================================
    // 测试 1: 电气字段归一化
    // ==========================================

    #[test]
    fn test_normalize_electrical_single_phase() {
        let (amps, volts, pct) = ReadingNormalizer::normalize_electrical(
            WiringMode::SinglePhase,
            [Some(100.0), Some(99.0), Some(98.0)],
            [Some(460.0), Some(459.0), Some(458.0)],
            Some(80.0),
        );
        assert_eq!(amps, [Some(100.0), Some(0.0), Some(0.0)]);
        assert_eq!(volts, [Some(460.0), Some(0.0), Some(0.0)]);
        assert_eq!(pct, None); // 无关输入不外泄
    }

    #[test]
    fn test_normalize_electrical_three_phase_passthrough() {
        let (amps, volts, _) = ReadingNormalizer::normalize_electrical(
            WiringMode::ThreePhase,
            [Some(100.0), Some(99.0), Some(98.0)],
            [Some(460.0), Some(459.0), Some(458.0)],
            None,
        );
        assert_eq!(amps[1], Some(99.0));
        assert_eq!(volts[2], Some(458.0));
    }

    #[test]
    fn test_normalize_electrical_percent_load() {
        let (amps, volts, pct) = ReadingNormalizer::normalize_electrical(
            WiringMode::PercentLoad,
            [Some(100.0), None, None],
            [Some(460.0), None, None],
            Some(75.0),
        );
        assert_eq!(amps, [Some(0.0), Some(0.0), Some(0.0)]);
        assert_eq!(volts, [Some(0.0), Some(0.0), Some(0.0)]);
        assert_eq!(pct, Some(75.0));
    }

    #[test]
    fn test_normalize_electrical_voltage_not_logged() {
        let (amps, volts, _) = ReadingNormalizer::normalize_electrical(
            WiringMode::VoltageNotLogged,
            [Some(100.0), Some(99.0), Some(98.0)],
            [None, None, None],
            None,
        );
        assert_eq!(amps[0], Some(100.0));
        assert_eq!(volts, [Some(0.0), Some(0.0), Some(0.0)]);
    }

    // ==========================================
    // 测试 2: 油压字段归一化
    // ==========================================

    #[test]
    fn test_normalize_oil_high_low() {
        let (h, l, d) = ReadingNormalizer::normalize_oil(
            OilPressureMode::HighLow,
            Some(45.0),
            Some(27.0),
            Some(99.0),
        );
        assert_eq!((h, l, d), (Some(45.0), Some(27.0), Some(0.0)));
    }

    #[test]
    fn test_normalize_oil_differential_only() {
        let (h, l, d) = ReadingNormalizer::normalize_oil(
            OilPressureMode::DifferentialOnly,
            Some(45.0),
            Some(27.0),
            Some(18.0),
        );
        assert_eq!((h, l, d), (Some(0.0), Some(0.0), Some(18.0)));
    }

    #[test]
    fn test_normalize_oil_not_logged() {
        let (h, l, d) =
            ReadingNormalizer::normalize_oil(OilPressureMode::NotLogged, None, None, None);
        assert_eq!((h, l, d), (Some(0.0), Some(0.0), Some(0.0)));
    }

    // ==========================================
    // 测试 3: 抽气分钟数
    // ==========================================

    #[test]
    fn test_purge_minutes_only_direct() {
        let m = ReadingNormalizer::purge_minutes(
            PurgeUnitMode::MinutesOnly,
            Some(12.0),
            Some(99.0),
            Some(99.0),
        );
        assert_eq!(m, Some(12.0));
    }

    #[test]
    fn test_purge_minutes_only_missing_stays_missing() {
        let m = ReadingNormalizer::purge_minutes(PurgeUnitMode::MinutesOnly, None, None, None);
        assert_eq!(m, None); // 交由校验清单拦截
    }

    #[test]
    fn test_purge_hours_minutes_combined() {
        let m = ReadingNormalizer::purge_minutes(
            PurgeUnitMode::HoursMinutes,
            None,
            Some(2.0),
            Some(15.0),
        );
        assert_eq!(m, Some(135.0));
    }

    #[test]
    fn test_purge_hours_minutes_non_numeric_as_zero() {
        let m = ReadingNormalizer::purge_minutes(
            PurgeUnitMode::HoursMinutes,
            None,
            Some(f64::NAN),
            None,
        );
        assert_eq!(m, Some(0.0));
    }

    // ==========================================
    // 测试 4: 规范 UTC 时间戳
    // ==========================================

    #[test]
    fn test_canonical_utc_east_offset() {
        let ts = ReadingNormalizer::canonical_utc("2026-03-01", "08:00", "+08:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_canonical_utc_west_offset() {
        let ts = ReadingNormalizer::canonical_utc("2026-03-01", "20:30", "-05:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 2, 1, 30, 0).unwrap());
    }

    #[test]
    fn test_canonical_utc_zulu() {
        let ts = ReadingNormalizer::canonical_utc("2026-03-01", "08:00:30", "Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 30).unwrap());
    }

    #[test]
    fn test_canonical_utc_invalid_inputs() {
        assert!(ReadingNormalizer::canonical_utc("2026-13-01", "08:00", "+08:00").is_none());
        assert!(ReadingNormalizer::canonical_utc("2026-03-01", "25:00", "+08:00").is_none());
        assert!(ReadingNormalizer::canonical_utc("2026-03-01", "08:00", "+99:00").is_none());
        assert!(ReadingNormalizer::canonical_utc("", "08:00", "+08:00").is_none());
    }
}
