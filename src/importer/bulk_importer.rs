// ==========================================
// 冷水机组能效监测系统 - 批量读数导入器
// ==========================================
// 流程: 解析 → 行映射 → 批内自然键预去重 → 逐行解析设备 → 摄取管线
// 约束: 行按顺序串行进入管线;设备不可解析的行直接路由隔离
// ==========================================

use crate::domain::quarantine::QuarantinedReading;
use crate::domain::timeline::TimelineEvent;
use crate::domain::types::TimelineKind;
use crate::engine::normalizer::ReadingNormalizer;
use crate::importer::error::ImportError;
use crate::importer::file_parser::{FileParser, UniversalFileParser};
use crate::importer::row_mapper::{BulkReadingRow, RowMapper};
use crate::repository::{EquipmentRepository, QuarantineRepository, TimelineRepository};
use crate::service::error::ServiceError;
use crate::service::ingest::{IngestOutcome, IngestService};
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// BulkImportSummary - 导入结果汇总
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BulkImportSummary {
    pub total_rows: usize,       // 文件总行数
    pub committed: usize,        // 提交成功
    pub quarantined: usize,      // 隔离(含设备不可解析)
    pub intra_file_dups: usize,  // 批内自然键重复,跳过
    pub duplicate_readings: usize, // 与存量记录去重键冲突
    pub failed: usize,           // 其它错误
}

// ==========================================
// BulkImporter - 批量导入器
// ==========================================
pub struct BulkImporter {
    ingest: Arc<IngestService>,
    file_parser: Box<dyn FileParser>,
    equipment_repo: Arc<EquipmentRepository>,
    quarantine_repo: Arc<QuarantineRepository>,
    timeline_repo: Arc<TimelineRepository>,
}

impl BulkImporter {
    pub fn new(
        ingest: Arc<IngestService>,
        equipment_repo: Arc<EquipmentRepository>,
        quarantine_repo: Arc<QuarantineRepository>,
        timeline_repo: Arc<TimelineRepository>,
    ) -> Self {
        Self {
            ingest,
            file_parser: Box::new(UniversalFileParser),
            equipment_repo,
            quarantine_repo,
            timeline_repo,
        }
    }

    /// 从表格文件批量导入读数
    ///
    /// # 流程
    /// 1. 解析文件(CSV/Excel)
    /// 2. 行映射
    /// 3. 批内按自然键(序列号, 设备编号, 日期, 时间, 时区)预去重
    /// 4. 逐行: 解析设备 → 进入与手工录入相同的创建管线
    #[instrument(skip(self, file_path))]
    pub async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        actor_id: &str,
    ) -> Result<BulkImportSummary, ImportError> {
        let path_str = file_path.as_ref().display().to_string();
        info!(file = %path_str, "开始批量导入读数");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let raw_rows = self.file_parser.parse_to_raw_records(file_path.as_ref())?;
        let mut summary = BulkImportSummary {
            total_rows: raw_rows.len(),
            ..Default::default()
        };
        info!(total_rows = summary.total_rows, "文件解析完成");

        // === 步骤 2: 行映射 ===
        debug!("步骤 2: 行映射");
        let rows: Vec<BulkReadingRow> = raw_rows
            .iter()
            .enumerate()
            .map(|(idx, row)| RowMapper::map_row(row, idx + 1))
            .collect();

        // === 步骤 3: 批内自然键预去重 ===
        debug!("步骤 3: 批内预去重");
        let mut seen_keys = HashSet::new();
        let mut surviving = Vec::new();
        for row in rows {
            if !seen_keys.insert(row.natural_key()) {
                warn!(row_number = row.row_number, key = %row.natural_key(), "批内重复行,跳过");
                summary.intra_file_dups += 1;
                continue;
            }
            surviving.push(row);
        }

        // === 步骤 4: 逐行进入管线(串行) ===
        debug!(rows = surviving.len(), "步骤 4: 逐行摄取");
        for row in surviving {
            self.import_row(row, actor_id, &mut summary).await;
        }

        info!(
            total = summary.total_rows,
            committed = summary.committed,
            quarantined = summary.quarantined,
            intra_file_dups = summary.intra_file_dups,
            duplicate_readings = summary.duplicate_readings,
            failed = summary.failed,
            "批量导入完成"
        );
        Ok(summary)
    }

    /// 处理单行: 设备解析 + 摄取
    async fn import_row(
        &self,
        row: BulkReadingRow,
        actor_id: &str,
        summary: &mut BulkImportSummary,
    ) {
        let row_number = row.row_number;

        // 设备解析: (序列号, 设备编号) 自然键
        let profile = match self
            .equipment_repo
            .find_by_natural_key(&row.serial_no, &row.equipment_no)
        {
            Ok(profile) => profile,
            Err(e) => {
                warn!(row_number, error = %e, "设备解析查询失败");
                summary.failed += 1;
                return;
            }
        };

        let Some(profile) = profile else {
            // 设备不可解析: 直接路由隔离
            if let Err(e) = self.quarantine_unresolved(&row, actor_id) {
                warn!(row_number, error = %e, "不可解析行隔离写入失败");
                summary.failed += 1;
                return;
            }
            summary.quarantined += 1;
            return;
        };

        let raw = row.into_raw_reading(profile.equipment_id.clone());
        match self.ingest.ingest_reading(raw, actor_id).await {
            Ok(IngestOutcome::Committed(_)) => summary.committed += 1,
            Ok(IngestOutcome::Quarantined(_)) => summary.quarantined += 1,
            Err(ServiceError::DuplicateReading { .. }) => {
                debug!(row_number, "与存量记录重复,跳过");
                summary.duplicate_readings += 1;
            }
            Err(e) => {
                warn!(row_number, error = %e, "行摄取失败");
                summary.failed += 1;
            }
        }
    }

    /// 设备不可解析的行: 以自然键伪标识写入隔离 + BAD_READING 事件
    fn quarantine_unresolved(
        &self,
        row: &BulkReadingRow,
        actor_id: &str,
    ) -> Result<(), ImportError> {
        let now = Utc::now();
        let pseudo_id = format!("{}/{}", row.serial_no, row.equipment_no);
        let ts_utc =
            ReadingNormalizer::canonical_utc(&row.local_date, &row.local_time, &row.utc_offset);

        let reading = QuarantinedReading {
            quarantine_id: Uuid::new_v4().to_string(),
            equipment_id: pseudo_id.clone(),
            actor_id: actor_id.to_string(),
            local_date: row.local_date.clone(),
            local_time: row.local_time.clone(),
            utc_offset: row.utc_offset.clone(),
            ts_utc,
            cond_inlet_temp: row.cond_inlet_temp,
            cond_outlet_temp: row.cond_outlet_temp,
            evap_inlet_temp: row.evap_inlet_temp,
            evap_outlet_temp: row.evap_outlet_temp,
            outside_air_temp: row.outside_air_temp,
            cond_pressure: row.cond_pressure,
            evap_pressure: row.evap_pressure,
            amps_phase1: row.amps_phase1,
            amps_phase2: row.amps_phase2,
            amps_phase3: row.amps_phase3,
            volts_phase1: row.volts_phase1,
            volts_phase2: row.volts_phase2,
            volts_phase3: row.volts_phase3,
            oil_pressure_high: row.oil_pressure_high,
            oil_pressure_low: row.oil_pressure_low,
            oil_pressure_diff: row.oil_pressure_diff,
            run_hours: row.run_hours,
            purge_minutes: row.purge_minutes,
            notes: row.notes.clone(),
            invalid_fields: vec!["equipment".to_string()],
            created_at: now,
        };
        self.quarantine_repo
            .insert(&reading)
            .map_err(|e| ImportError::InternalError(e.to_string()))?;

        self.timeline_repo
            .insert(&TimelineEvent::new(
                Uuid::new_v4().to_string(),
                pseudo_id,
                TimelineKind::BadReading,
                format!(
                    "坏读数(设备不可解析): 行{} 序列号={} 设备编号={}",
                    row.row_number, row.serial_no, row.equipment_no
                ),
                actor_id.to_string(),
                ts_utc,
                now,
            ))
            .map_err(|e| ImportError::InternalError(e.to_string()))?;

        warn!(
            row_number = row.row_number,
            serial_no = %row.serial_no,
            equipment_no = %row.equipment_no,
            "行设备不可解析,已隔离"
        );
        Ok(())
    }
}
