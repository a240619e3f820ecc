//! 급식비 모델.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 학급별 급식 단가
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealFeeStructure {
    /// 학급 (예: "3-2")
    pub class_level: String,
    /// 일일 급식비 (원)
    pub daily_fee: i64,
    /// 적용 시작일
    pub effective_from: NaiveDate,
}

/// 일일 급식비 납부 기록 — 학생·날짜당 1건
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealDailyPayment {
    /// 학번
    pub admission_no: String,
    /// 납부일
    pub date: NaiveDate,
    /// 납부액 (원)
    pub amount: i64,
    /// 수납 담당 교직원 번호
    pub collected_by: Option<String>,
}
