// ==========================================
// 冷水机组能效监测系统 - 读数摄取服务
// ==========================================
// 流程: 归一化 → 去重检查 → 连续性 → 指标引擎 → 校验闸门
//       → (提交 + 时间线 + 告警) 或 (隔离 + 时间线)
// 红线: 记录先在内存完整装配,单次写入,绝无半截记录
// 红线: 去重检查在任何指标计算之前短路
// ==========================================

use crate::config::AppConfig;
use crate::domain::computed_log::ComputedLog;
use crate::domain::equipment::{EquipmentProfile, Facility};
use crate::domain::quarantine::QuarantinedReading;
use crate::domain::reading::{NormalizedReading, RawReading, ReadingPatch};
use crate::domain::timeline::TimelineEvent;
use crate::domain::types::{PurgeUnitMode, TimelineKind};
use crate::engine::metrics::{MetricsEngine, RunHourNeighbors};
use crate::engine::normalizer::ReadingNormalizer;
use crate::engine::validity::ValidityGate;
use crate::reference::altitude::AltitudeTable;
use crate::reference::refrigerant::RefrigerantTable;
use crate::repository::error::RepositoryError;
use crate::repository::util::ts_to_str;
use crate::service::alert_evaluator::AlertEvaluator;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::repositories::IngestRepositories;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// IngestOutcome - 摄取结果
// ==========================================
// 隔离不是错误: 调用方按结果形态区分
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    Committed(ComputedLog),
    Quarantined(QuarantinedReading),
}

// ==========================================
// IngestService - 摄取服务
// ==========================================
pub struct IngestService {
    repos: IngestRepositories,
    refrigerant_table: Arc<dyn RefrigerantTable>,
    altitude_table: Arc<dyn AltitudeTable>,
    alert_evaluator: AlertEvaluator,
    config: AppConfig,
}

impl IngestService {
    pub fn new(
        repos: IngestRepositories,
        refrigerant_table: Arc<dyn RefrigerantTable>,
        altitude_table: Arc<dyn AltitudeTable>,
        alert_evaluator: AlertEvaluator,
        config: AppConfig,
    ) -> Self {
        Self {
            repos,
            refrigerant_table,
            altitude_table,
            alert_evaluator,
            config,
        }
    }

    /// 摄取一条读数(手工录入或批量导入行共用)
    ///
    /// # 返回
    /// - Ok(Committed): 读数通过清单,已提交并评估告警
    /// - Ok(Quarantined): 读数未通过清单,已隔离(成功的替代结果)
    /// - Err(Validation): 引用设备/设施不存在,未持久化
    /// - Err(DuplicateReading): 去重键冲突,未持久化
    #[instrument(skip(self, raw), fields(equipment_id = %raw.equipment_id))]
    pub async fn ingest_reading(
        &self,
        raw: RawReading,
        actor_id: &str,
    ) -> ServiceResult<IngestOutcome> {
        let now = Utc::now();

        // === 步骤 1: 档案解析 ===
        debug!("步骤 1: 档案解析");
        let (profile, facility) = self.resolve_profile(&raw.equipment_id)?;

        // === 步骤 2: 归一化 ===
        debug!("步骤 2: 归一化");
        let normalized = ReadingNormalizer::normalize(&raw, &profile);

        // === 步骤 3: 去重检查(任何指标计算之前短路) ===
        debug!("步骤 3: 去重检查");
        if let Some(ts) = normalized.ts_utc {
            if self
                .repos
                .log_repo
                .find_duplicate(&normalized.equipment_id, &ts, None)?
                .is_some()
            {
                return Err(ServiceError::DuplicateReading {
                    equipment_id: normalized.equipment_id.clone(),
                    ts_utc: ts_to_str(&ts),
                });
            }
        }

        // === 步骤 4: 运行小时连续性 ===
        debug!("步骤 4: 运行小时连续性");
        let neighbors = self.load_neighbors(&normalized, None)?;

        // === 步骤 5: 指标引擎 ===
        debug!("步骤 5: 指标引擎");
        let metrics = MetricsEngine::compute(
            &normalized,
            &profile,
            self.refrigerant_table.as_ref(),
            self.altitude_table.as_ref(),
            facility.altitude,
            &neighbors,
        );

        // === 步骤 6: 校验闸门 ===
        debug!("步骤 6: 校验闸门");
        let report = ValidityGate::check(&normalized);
        if !report.is_valid() {
            return Ok(IngestOutcome::Quarantined(self.quarantine(
                &normalized,
                actor_id,
                report.invalid_fields,
                now,
            )?));
        }

        // === 步骤 7: 装配并提交 ===
        debug!("步骤 7: 装配并提交");
        let mut log = ComputedLog::from_normalized(
            Uuid::new_v4().to_string(),
            &normalized,
            profile.facility_id.clone(),
            profile.company_id.clone(),
            actor_id.to_string(),
            now,
        )
        .ok_or_else(|| {
            ServiceError::Internal("通过清单的读数装配失败,字段集不一致".to_string())
        })?;
        log.last_run_hours = neighbors.last_run_hours;
        log.last_run_hours_ts = neighbors.last_ts;
        log.next_run_hours = neighbors.next_run_hours;
        log.next_run_hours_ts = neighbors.next_ts;
        log.metrics = metrics;

        self.repos
            .log_repo
            .insert(&log)
            .map_err(|e| Self::map_duplicate(e, &log))?;

        // === 步骤 8: 时间线事件 ===
        self.repos.timeline_repo.insert(&TimelineEvent::new(
            Uuid::new_v4().to_string(),
            log.equipment_id.clone(),
            TimelineKind::NewReading,
            format!("新读数: {} {} ({})", log.local_date, log.local_time, log.utc_offset),
            actor_id.to_string(),
            Some(log.ts_utc),
            now,
        ))?;

        info!(log_id = %log.log_id, eff_loss = log.metrics.eff_loss, "读数已提交");

        // === 步骤 9: 告警评估(仅生产环境,尽力而为) ===
        if self.config.environment.alerts_enabled() {
            self.alert_evaluator
                .evaluate(&log, &profile.name, &facility.name)
                .await;
        }

        Ok(IngestOutcome::Committed(log))
    }

    /// 更新一条已提交读数
    ///
    /// 合并补丁 → 重走归一化/连续性/引擎 → 单次写入 → EDITED 事件。
    /// 去重检查排除记录自身;校验闸门不再执行(编辑按提交处理)
    #[instrument(skip(self, patch))]
    pub async fn update_reading(
        &self,
        log_id: &str,
        patch: ReadingPatch,
        actor_id: &str,
    ) -> ServiceResult<ComputedLog> {
        let now = Utc::now();

        // === 步骤 1: 取存量记录 ===
        let stored = self
            .repos
            .log_repo
            .find_by_id(log_id)?
            .filter(|log| !log.deleted)
            .ok_or_else(|| ServiceError::Validation {
                entity: "ComputedLog".to_string(),
                id: log_id.to_string(),
            })?;

        let (profile, facility) = self.resolve_profile(&stored.equipment_id)?;

        // === 步骤 2: 合并补丁并重新归一化 ===
        let merged = Self::merge_patch(&stored, &patch);
        let mut normalized = ReadingNormalizer::normalize(&merged, &profile);
        Self::restore_purge_total(&mut normalized, &stored, &patch, &profile);

        // 编辑后时间戳必须仍可规范化(去重键不能悬空)
        let ts = normalized.ts_utc.ok_or_else(|| ServiceError::Validation {
            entity: "CanonicalTimestamp".to_string(),
            id: format!("{} {}", normalized.local_date, normalized.local_time),
        })?;

        // === 步骤 3: 去重检查(排除自身) ===
        if self
            .repos
            .log_repo
            .find_duplicate(&normalized.equipment_id, &ts, Some(log_id))?
            .is_some()
        {
            return Err(ServiceError::DuplicateReading {
                equipment_id: normalized.equipment_id.clone(),
                ts_utc: ts_to_str(&ts),
            });
        }

        // === 步骤 4: 连续性(按更新后时间戳,排除自身) ===
        let neighbors = self.load_neighbors(&normalized, Some(log_id))?;

        // === 步骤 5: 指标引擎 ===
        let metrics = MetricsEngine::compute(
            &normalized,
            &profile,
            self.refrigerant_table.as_ref(),
            self.altitude_table.as_ref(),
            facility.altitude,
            &neighbors,
        );

        // === 步骤 6: 装配合并结果并单次写入 ===
        let mut updated = Self::apply_normalized(&stored, &normalized, ts);
        updated.last_run_hours = neighbors.last_run_hours;
        updated.last_run_hours_ts = neighbors.last_ts;
        updated.next_run_hours = neighbors.next_run_hours;
        updated.next_run_hours_ts = neighbors.next_ts;
        updated.metrics = metrics;
        updated.updated_at = now;

        self.repos
            .log_repo
            .update(&updated)
            .map_err(|e| Self::map_duplicate(e, &updated))?;

        // === 步骤 7: EDITED 事件(携带原始创建时间与编辑时间) ===
        self.repos.timeline_repo.insert(
            &TimelineEvent::new(
                Uuid::new_v4().to_string(),
                updated.equipment_id.clone(),
                TimelineKind::EditedReading,
                format!(
                    "读数被编辑: {} {} ({})",
                    updated.local_date, updated.local_time, updated.utc_offset
                ),
                actor_id.to_string(),
                Some(updated.ts_utc),
                now,
            )
            .with_edit_times(stored.created_at, now),
        )?;

        info!(log_id = %updated.log_id, "读数已更新");
        Ok(updated)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 解析设备档案与所属设施
    fn resolve_profile(
        &self,
        equipment_id: &str,
    ) -> ServiceResult<(EquipmentProfile, Facility)> {
        let profile = self
            .repos
            .equipment_repo
            .find_by_id(equipment_id)?
            .ok_or_else(|| ServiceError::Validation {
                entity: "EquipmentProfile".to_string(),
                id: equipment_id.to_string(),
            })?;
        let facility = self
            .repos
            .equipment_repo
            .find_facility(&profile.facility_id)?
            .ok_or_else(|| ServiceError::Validation {
                entity: "Facility".to_string(),
                id: profile.facility_id.clone(),
            })?;
        Ok((profile, facility))
    }

    /// 取运行小时邻居(时间戳缺失时为空快照)
    fn load_neighbors(
        &self,
        normalized: &NormalizedReading,
        exclude_id: Option<&str>,
    ) -> ServiceResult<RunHourNeighbors> {
        let Some(ts) = normalized.ts_utc else {
            return Ok(RunHourNeighbors::default());
        };
        let prior = self.repos.log_repo.find_nearest_prior(
            &normalized.equipment_id,
            &ts,
            exclude_id,
        )?;
        let next = self.repos.log_repo.find_nearest_next(
            &normalized.equipment_id,
            &ts,
            exclude_id,
        )?;
        Ok(RunHourNeighbors {
            last_run_hours: prior.as_ref().map(|n| n.run_hours),
            last_ts: prior.map(|n| n.ts_utc),
            next_run_hours: next.as_ref().map(|n| n.run_hours),
            next_ts: next.map(|n| n.ts_utc),
        })
    }

    /// 写入隔离记录 + BAD_READING 事件
    fn quarantine(
        &self,
        normalized: &NormalizedReading,
        actor_id: &str,
        invalid_fields: Vec<String>,
        now: DateTime<Utc>,
    ) -> ServiceResult<QuarantinedReading> {
        let reading = QuarantinedReading::from_normalized(
            Uuid::new_v4().to_string(),
            normalized,
            actor_id.to_string(),
            invalid_fields,
            now,
        );
        self.repos.quarantine_repo.insert(&reading)?;

        self.repos.timeline_repo.insert(&TimelineEvent::new(
            Uuid::new_v4().to_string(),
            reading.equipment_id.clone(),
            TimelineKind::BadReading,
            format!(
                "坏读数: {} {} ({}),无效字段: {}",
                reading.local_date,
                reading.local_time,
                reading.utc_offset,
                reading.invalid_fields.join(", ")
            ),
            actor_id.to_string(),
            reading.ts_utc,
            now,
        ))?;

        warn!(
            equipment_id = %reading.equipment_id,
            invalid_fields = ?reading.invalid_fields,
            "读数已隔离"
        );
        Ok(reading)
    }

    /// 合并补丁: Some 覆盖,None 沿用存量
    fn merge_patch(stored: &ComputedLog, patch: &ReadingPatch) -> RawReading {
        let mut raw = stored.to_raw_reading();
        if let Some(v) = &patch.local_date {
            raw.local_date = v.clone();
        }
        if let Some(v) = &patch.local_time {
            raw.local_time = v.clone();
        }
        if let Some(v) = &patch.utc_offset {
            raw.utc_offset = v.clone();
        }
        if patch.cond_inlet_temp.is_some() {
            raw.cond_inlet_temp = patch.cond_inlet_temp;
        }
        if patch.cond_outlet_temp.is_some() {
            raw.cond_outlet_temp = patch.cond_outlet_temp;
        }
        if patch.evap_inlet_temp.is_some() {
            raw.evap_inlet_temp = patch.evap_inlet_temp;
        }
        if patch.evap_outlet_temp.is_some() {
            raw.evap_outlet_temp = patch.evap_outlet_temp;
        }
        if patch.outside_air_temp.is_some() {
            raw.outside_air_temp = patch.outside_air_temp;
        }
        if patch.bearing_temp.is_some() {
            raw.bearing_temp = patch.bearing_temp;
        }
        if patch.cond_refrig_temp.is_some() {
            raw.cond_refrig_temp = patch.cond_refrig_temp;
        }
        if patch.evap_refrig_temp.is_some() {
            raw.evap_refrig_temp = patch.evap_refrig_temp;
        }
        if patch.cond_pressure.is_some() {
            raw.cond_pressure = patch.cond_pressure;
        }
        if patch.evap_pressure.is_some() {
            raw.evap_pressure = patch.evap_pressure;
        }
        if patch.amps_phase1.is_some() {
            raw.amps_phase1 = patch.amps_phase1;
        }
        if patch.amps_phase2.is_some() {
            raw.amps_phase2 = patch.amps_phase2;
        }
        if patch.amps_phase3.is_some() {
            raw.amps_phase3 = patch.amps_phase3;
        }
        if patch.volts_phase1.is_some() {
            raw.volts_phase1 = patch.volts_phase1;
        }
        if patch.volts_phase2.is_some() {
            raw.volts_phase2 = patch.volts_phase2;
        }
        if patch.volts_phase3.is_some() {
            raw.volts_phase3 = patch.volts_phase3;
        }
        if patch.percent_load.is_some() {
            raw.percent_load = patch.percent_load;
        }
        if patch.oil_pressure_high.is_some() {
            raw.oil_pressure_high = patch.oil_pressure_high;
        }
        if patch.oil_pressure_low.is_some() {
            raw.oil_pressure_low = patch.oil_pressure_low;
        }
        if patch.oil_pressure_diff.is_some() {
            raw.oil_pressure_diff = patch.oil_pressure_diff;
        }
        if patch.run_hours.is_some() {
            raw.run_hours = patch.run_hours;
        }
        if patch.purge_minutes.is_some() {
            raw.purge_minutes = patch.purge_minutes;
        }
        if patch.purge_hours_part.is_some() {
            raw.purge_hours_part = patch.purge_hours_part;
        }
        if patch.purge_minutes_part.is_some() {
            raw.purge_minutes_part = patch.purge_minutes_part;
        }
        if let Some(v) = &patch.notes {
            raw.notes = Some(v.clone());
        }
        raw
    }

    /// 时+分表机组的编辑兜底: 补丁未提供时/分部分时沿用存量合计分钟
    ///
    /// 存量日志只保留合计分钟;不兜底会被归一化器按 0+0 重算清零
    fn restore_purge_total(
        normalized: &mut NormalizedReading,
        stored: &ComputedLog,
        patch: &ReadingPatch,
        profile: &EquipmentProfile,
    ) {
        if profile.purge_unit_mode != PurgeUnitMode::HoursMinutes {
            return;
        }
        if patch.purge_hours_part.is_some() || patch.purge_minutes_part.is_some() {
            return;
        }
        normalized.purge_minutes = patch.purge_minutes.or(Some(stored.purge_minutes));
    }

    /// 把归一化结果套回存量日志(保留 log_id / 创建信息 / 录入人)
    ///
    /// 闸门不再执行: 编辑导致的缺失/非数值字段按存量值兜底,
    /// 记录保持提交态(SQLite 亦无法落 NaN)
    fn apply_normalized(
        stored: &ComputedLog,
        normalized: &NormalizedReading,
        ts: DateTime<Utc>,
    ) -> ComputedLog {
        let keep = |merged: Option<f64>, prior: f64| -> f64 {
            merged.filter(|v| v.is_finite()).unwrap_or(prior)
        };
        let mut updated = stored.clone();
        updated.local_date = normalized.local_date.clone();
        updated.local_time = normalized.local_time.clone();
        updated.utc_offset = normalized.utc_offset.clone();
        updated.ts_utc = ts;
        updated.cond_inlet_temp = keep(normalized.cond_inlet_temp, stored.cond_inlet_temp);
        updated.cond_outlet_temp = keep(normalized.cond_outlet_temp, stored.cond_outlet_temp);
        updated.evap_inlet_temp = keep(normalized.evap_inlet_temp, stored.evap_inlet_temp);
        updated.evap_outlet_temp = keep(normalized.evap_outlet_temp, stored.evap_outlet_temp);
        updated.outside_air_temp = keep(normalized.outside_air_temp, stored.outside_air_temp);
        updated.bearing_temp = keep(normalized.bearing_temp, stored.bearing_temp);
        updated.cond_refrig_temp = normalized.cond_refrig_temp.filter(|v| v.is_finite());
        updated.evap_refrig_temp = normalized.evap_refrig_temp.filter(|v| v.is_finite());
        updated.cond_pressure = keep(normalized.cond_pressure, stored.cond_pressure);
        updated.evap_pressure = keep(normalized.evap_pressure, stored.evap_pressure);
        updated.amps_phase1 = keep(normalized.amps_phase1, stored.amps_phase1);
        updated.amps_phase2 = keep(normalized.amps_phase2, stored.amps_phase2);
        updated.amps_phase3 = keep(normalized.amps_phase3, stored.amps_phase3);
        updated.volts_phase1 = keep(normalized.volts_phase1, stored.volts_phase1);
        updated.volts_phase2 = keep(normalized.volts_phase2, stored.volts_phase2);
        updated.volts_phase3 = keep(normalized.volts_phase3, stored.volts_phase3);
        updated.percent_load = normalized.percent_load.filter(|v| v.is_finite());
        updated.oil_pressure_high = keep(normalized.oil_pressure_high, stored.oil_pressure_high);
        updated.oil_pressure_low = keep(normalized.oil_pressure_low, stored.oil_pressure_low);
        updated.oil_pressure_diff = keep(normalized.oil_pressure_diff, stored.oil_pressure_diff);
        updated.run_hours = keep(normalized.run_hours, stored.run_hours);
        updated.purge_minutes = keep(normalized.purge_minutes, stored.purge_minutes);
        if let Some(notes) = &normalized.notes {
            updated.notes = notes.clone();
        }
        updated
    }

    /// UNIQUE 冲突 → 重复读数错误(竞态兜底,见并发模型)
    fn map_duplicate(err: RepositoryError, log: &ComputedLog) -> ServiceError {
        match err {
            RepositoryError::UniqueConstraintViolation(_) => ServiceError::DuplicateReading {
                equipment_id: log.equipment_id.clone(),
                ts_utc: ts_to_str(&log.ts_utc),
            },
            other => ServiceError::Repository(other),
        }
    }
}
