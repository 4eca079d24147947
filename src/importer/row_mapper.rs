// ==========================================
// 冷水机组能效监测系统 - 行映射器
// ==========================================
// 职责: 表头行记录 → 批量读数行;数值解析与自然键构造
// 口径: 空单元格 → 缺失;非数值文本 → NaN(交校验清单判定)
// ==========================================

use crate::domain::reading::RawReading;
use std::collections::HashMap;

// ==========================================
// BulkReadingRow - 批量读数行
// ==========================================
// 设备以 (序列号, 设备编号) 自然键标识,入管线前再解析
#[derive(Debug, Clone)]
pub struct BulkReadingRow {
    pub row_number: usize,
    pub serial_no: String,
    pub equipment_no: String,

    pub local_date: String,
    pub local_time: String,
    pub utc_offset: String,

    pub cond_inlet_temp: Option<f64>,
    pub cond_outlet_temp: Option<f64>,
    pub evap_inlet_temp: Option<f64>,
    pub evap_outlet_temp: Option<f64>,
    pub outside_air_temp: Option<f64>,
    pub bearing_temp: Option<f64>,
    pub cond_refrig_temp: Option<f64>,
    pub evap_refrig_temp: Option<f64>,
    pub cond_pressure: Option<f64>,
    pub evap_pressure: Option<f64>,
    pub amps_phase1: Option<f64>,
    pub amps_phase2: Option<f64>,
    pub amps_phase3: Option<f64>,
    pub volts_phase1: Option<f64>,
    pub volts_phase2: Option<f64>,
    pub volts_phase3: Option<f64>,
    pub percent_load: Option<f64>,
    pub oil_pressure_high: Option<f64>,
    pub oil_pressure_low: Option<f64>,
    pub oil_pressure_diff: Option<f64>,
    pub run_hours: Option<f64>,
    pub purge_minutes: Option<f64>,
    pub purge_hours_part: Option<f64>,
    pub purge_minutes_part: Option<f64>,
    pub notes: Option<String>,
}

impl BulkReadingRow {
    /// 批内预去重自然键: (序列号, 设备编号, 日期, 时间, 时区)
    pub fn natural_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.serial_no, self.equipment_no, self.local_date, self.local_time, self.utc_offset
        )
    }

    /// 装配为原始读数(设备解析完成后)
    pub fn into_raw_reading(self, equipment_id: String) -> RawReading {
        RawReading {
            equipment_id,
            local_date: self.local_date,
            local_time: self.local_time,
            utc_offset: self.utc_offset,
            cond_inlet_temp: self.cond_inlet_temp,
            cond_outlet_temp: self.cond_outlet_temp,
            evap_inlet_temp: self.evap_inlet_temp,
            evap_outlet_temp: self.evap_outlet_temp,
            outside_air_temp: self.outside_air_temp,
            bearing_temp: self.bearing_temp,
            cond_refrig_temp: self.cond_refrig_temp,
            evap_refrig_temp: self.evap_refrig_temp,
            cond_pressure: self.cond_pressure,
            evap_pressure: self.evap_pressure,
            amps_phase1: self.amps_phase1,
            amps_phase2: self.amps_phase2,
            amps_phase3: self.amps_phase3,
            volts_phase1: self.volts_phase1,
            volts_phase2: self.volts_phase2,
            volts_phase3: self.volts_phase3,
            percent_load: self.percent_load,
            oil_pressure_high: self.oil_pressure_high,
            oil_pressure_low: self.oil_pressure_low,
            oil_pressure_diff: self.oil_pressure_diff,
            run_hours: self.run_hours,
            purge_minutes: self.purge_minutes,
            purge_hours_part: self.purge_hours_part,
            purge_minutes_part: self.purge_minutes_part,
            notes: self.notes,
        }
    }
}

// ==========================================
// RowMapper - 行映射器
// ==========================================
pub struct RowMapper;

impl RowMapper {
    /// 映射单行记录
    ///
    /// 标识字段(序列号/设备编号/日期)缺失时仍产出行,
    /// 由批量导入器按"设备不可解析"路由隔离
    pub fn map_row(row: &HashMap<String, String>, row_number: usize) -> BulkReadingRow {
        BulkReadingRow {
            row_number,
            serial_no: Self::text(row, "序列号"),
            equipment_no: Self::text(row, "设备编号"),
            local_date: Self::text(row, "日期"),
            local_time: Self::text(row, "时间"),
            utc_offset: Self::text(row, "时区"),
            cond_inlet_temp: Self::number(row, "冷凝器进水温度"),
            cond_outlet_temp: Self::number(row, "冷凝器出水温度"),
            evap_inlet_temp: Self::number(row, "蒸发器进水温度"),
            evap_outlet_temp: Self::number(row, "蒸发器出水温度"),
            outside_air_temp: Self::number(row, "室外温度"),
            bearing_temp: Self::number(row, "轴承温度"),
            cond_refrig_temp: Self::number(row, "冷凝器制冷剂温度"),
            evap_refrig_temp: Self::number(row, "蒸发器制冷剂温度"),
            cond_pressure: Self::number(row, "冷凝器压力"),
            evap_pressure: Self::number(row, "蒸发器压力"),
            amps_phase1: Self::number(row, "1相电流"),
            amps_phase2: Self::number(row, "2相电流"),
            amps_phase3: Self::number(row, "3相电流"),
            volts_phase1: Self::number(row, "1相电压"),
            volts_phase2: Self::number(row, "2相电压"),
            volts_phase3: Self::number(row, "3相电压"),
            percent_load: Self::number(row, "负载百分比"),
            oil_pressure_high: Self::number(row, "油压高端"),
            oil_pressure_low: Self::number(row, "油压低端"),
            oil_pressure_diff: Self::number(row, "油压差"),
            run_hours: Self::number(row, "运行小时"),
            purge_minutes: Self::number(row, "抽气分钟"),
            purge_hours_part: Self::number(row, "抽气小时部分"),
            purge_minutes_part: Self::number(row, "抽气分钟部分"),
            notes: row.get("备注").map(|v| v.trim().to_string()),
        }
    }

    /// 文本字段: 缺列/空串均为空文本
    fn text(row: &HashMap<String, String>, key: &str) -> String {
        row.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
    }

    /// 数值字段: 空 → 缺失;解析失败 → NaN(清单按无效判定)
    fn number(row: &HashMap<String, String>, key: &str) -> Option<f64> {
        let raw = row.get(key)?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(raw.parse::<f64>().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_row_basic() {
        let mapped = RowMapper::map_row(
            &row(&[
                ("序列号", "SN-1"),
                ("设备编号", "CH-1"),
                ("日期", "2026-03-01"),
                ("时间", "08:00"),
                ("时区", "+08:00"),
                ("冷凝器进水温度", "85.0"),
                ("备注", "正常"),
            ]),
            1,
        );
        assert_eq!(mapped.serial_no, "SN-1");
        assert_eq!(mapped.cond_inlet_temp, Some(85.0));
        assert_eq!(mapped.notes.as_deref(), Some("正常"));
    }

    #[test]
    fn test_empty_cell_is_missing() {
        let mapped = RowMapper::map_row(&row(&[("冷凝器进水温度", "")]), 1);
        assert_eq!(mapped.cond_inlet_temp, None);
    }

    #[test]
    fn test_non_numeric_cell_is_nan() {
        let mapped = RowMapper::map_row(&row(&[("运行小时", "abc")]), 1);
        assert!(mapped.run_hours.unwrap().is_nan());
    }

    #[test]
    fn test_missing_notes_column() {
        let mapped = RowMapper::map_row(&row(&[("序列号", "SN-1")]), 1);
        assert_eq!(mapped.notes, None);
    }

    #[test]
    fn test_natural_key_composition() {
        let mapped = RowMapper::map_row(
            &row(&[
                ("序列号", "SN-1"),
                ("设备编号", "CH-1"),
                ("日期", "2026-03-01"),
                ("时间", "08:00"),
                ("时区", "+08:00"),
            ]),
            1,
        );
        assert_eq!(mapped.natural_key(), "SN-1|CH-1|2026-03-01|08:00|+08:00");
    }
}
