use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 报表时间范围，半开区间 `[from, to)`
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct ReportRangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
