// ==========================================
// 冷水机组能效监测系统 - 仓储层公共工具
// ==========================================
// 职责: 时间戳与 JSON 的统一存取口径
// ==========================================

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC 时间戳 → 存储串(RFC3339 定宽纳秒精度,字典序与时间序一致,往返无损)
pub(crate) fn ts_to_str(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// 可选时间戳 → 存储串
pub(crate) fn opt_ts_to_str(ts: &Option<DateTime<Utc>>) -> Option<String> {
    ts.as_ref().map(ts_to_str)
}

/// 存储串 → UTC 时间戳
pub(crate) fn ts_from_str(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 可选存储串 → 可选时间戳
pub(crate) fn opt_ts_from_str(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref().and_then(ts_from_str)
}

/// JSON 解析失败 → rusqlite 转换错误(供行映射闭包使用)
pub(crate) fn json_column_err(err: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(err),
    )
}
