//! 수당 계산 및 복지 지급 모델.
//!
//! 계산식 자체는 단순 산술이며, 영속화는 `PaymentStorage` 포트가 담당한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 교사 월별 수당 계산 결과 — 교사·기간당 1건
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceCalculation {
    /// 교직원 번호
    pub staff_no: String,
    /// 계산 기간 ("YYYY-MM")
    pub period: String,
    /// 기본 수당 (원)
    pub base_amount: i64,
    /// 출근일당 수당 단가 (원)
    pub daily_rate: i64,
    /// 해당 기간 출근일 수
    pub days_present: u32,
    /// 합계 (원)
    pub total_amount: i64,
}

impl AllowanceCalculation {
    /// 수당 계산 — 합계 = 기본 수당 + 단가 × 출근일
    pub fn new(
        staff_no: impl Into<String>,
        period: impl Into<String>,
        base_amount: i64,
        daily_rate: i64,
        days_present: u32,
    ) -> Self {
        Self {
            staff_no: staff_no.into(),
            period: period.into(),
            base_amount,
            daily_rate,
            days_present,
            total_amount: base_amount + daily_rate * i64::from(days_present),
        }
    }
}

/// 복지 수당 지급 내역
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelfarePayment {
    /// 지급 건 식별자 (영수 추적용)
    pub payment_id: Uuid,
    /// 교직원 번호
    pub staff_no: String,
    /// 지급 기간 ("YYYY-MM")
    pub period: String,
    /// 지급액 (원)
    pub amount: i64,
    /// 실지급 시각 (None이면 미지급)
    pub paid_at: Option<DateTime<Utc>>,
}

impl WelfarePayment {
    /// 새 지급 건 생성 (미지급 상태)
    pub fn new(staff_no: impl Into<String>, period: impl Into<String>, amount: i64) -> Self {
        Self {
            payment_id: Uuid::new_v4(),
            staff_no: staff_no.into(),
            period: period.into(),
            amount,
            paid_at: None,
        }
    }
}
