//! 출결 모델.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 출결 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// 출석
    Present,
    /// 결석
    Absent,
    /// 지각
    Late,
    /// 공결 (인정 결석)
    Excused,
}

/// 출결 기록 — 학생·날짜당 1건
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// 학번
    pub admission_no: String,
    /// 날짜
    pub date: NaiveDate,
    /// 출결 상태
    pub status: AttendanceStatus,
    /// 비고
    pub note: Option<String>,
}

impl AttendanceRecord {
    /// 출석 기록 생성
    pub fn present(admission_no: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            admission_no: admission_no.into(),
            date,
            status: AttendanceStatus::Present,
            note: None,
        }
    }
}
