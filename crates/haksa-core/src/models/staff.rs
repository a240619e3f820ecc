//! 교직원 모델.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 교사 직급
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeacherRank {
    /// 교장
    Principal,
    /// 교감
    VicePrincipal,
    /// 부장 교사
    Head,
    /// 담임 교사
    Classroom,
    /// 보조 교사
    Assistant,
}

/// 교사
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// 교직원 번호 (자연키, 예: "T-2023-014")
    pub staff_no: String,
    /// 성명
    pub name: String,
    /// 직급
    pub rank: TeacherRank,
    /// 급여 계좌 (v4 스키마에서 추가)
    pub bank_account: Option<String>,
    /// 임용일
    pub hired_at: Option<NaiveDate>,
}

impl Teacher {
    /// 새 교사 등록 정보 생성
    pub fn new(staff_no: impl Into<String>, name: impl Into<String>, rank: TeacherRank) -> Self {
        Self {
            staff_no: staff_no.into(),
            name: name.into(),
            rank,
            bank_account: None,
            hired_at: None,
        }
    }
}
