//! 수당 계산/복지 지급 저장소 (PaymentStorage 포트 일부).
//!
//! 급식비 구현은 `meals` 모듈 참조.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use haksa_core::error::CoreError;
use haksa_core::models::allowance::{AllowanceCalculation, WelfarePayment};
use haksa_core::models::meal::{MealDailyPayment, MealFeeStructure};
use haksa_core::ports::storage::PaymentStorage;
use rusqlite::OptionalExtension;
use tracing::debug;
use uuid::Uuid;

use super::SqliteStorage;

impl SqliteStorage {
    pub(super) fn save_allowance_calculation_sync(
        &self,
        calc: &AllowanceCalculation,
    ) -> Result<i64, CoreError> {
        let conn = self.lock()?;
        let teacher_id = Self::teacher_row_id(&conn, &calc.staff_no)?;

        conn.execute(
            "INSERT INTO allowance_calculations
                 (teacher_id, period, base_amount, daily_rate, days_present, total_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(teacher_id, period) DO UPDATE SET
                 base_amount = excluded.base_amount,
                 daily_rate = excluded.daily_rate,
                 days_present = excluded.days_present,
                 total_amount = excluded.total_amount,
                 calculated_at = datetime('now')",
            rusqlite::params![
                teacher_id,
                calc.period,
                calc.base_amount,
                calc.daily_rate,
                calc.days_present,
                calc.total_amount,
            ],
        )
        .map_err(|e| CoreError::Internal(format!("수당 계산 저장 실패: {e}")))?;

        debug!("수당 계산 저장: {} {}", calc.staff_no, calc.period);

        conn.query_row(
            "SELECT id FROM allowance_calculations WHERE teacher_id = ?1 AND period = ?2",
            rusqlite::params![teacher_id, calc.period],
            |row| row.get(0),
        )
        .map_err(|e| CoreError::Internal(format!("수당 계산 조회 실패: {e}")))
    }

    pub(super) fn get_allowance_calculation_sync(
        &self,
        staff_no: &str,
        period: &str,
    ) -> Result<Option<AllowanceCalculation>, CoreError> {
        let conn = self.lock()?;

        conn.query_row(
            "SELECT t.staff_no, c.period, c.base_amount, c.daily_rate, c.days_present,
                    c.total_amount
             FROM allowance_calculations c
             JOIN teachers t ON t.id = c.teacher_id
             WHERE t.staff_no = ?1 AND c.period = ?2",
            rusqlite::params![staff_no, period],
            |row| {
                Ok(AllowanceCalculation {
                    staff_no: row.get(0)?,
                    period: row.get(1)?,
                    base_amount: row.get(2)?,
                    daily_rate: row.get(3)?,
                    days_present: row.get(4)?,
                    total_amount: row.get(5)?,
                })
            },
        )
        .optional()
        .map_err(|e| CoreError::Internal(format!("수당 계산 조회 실패: {e}")))
    }

    pub(super) fn record_welfare_payment_sync(
        &self,
        payment: &WelfarePayment,
    ) -> Result<i64, CoreError> {
        let conn = self.lock()?;
        let teacher_id = Self::teacher_row_id(&conn, &payment.staff_no)?;

        // payment_id 기준 멱등 — 같은 지급 건 재기록은 무시됨
        conn.execute(
            "INSERT OR IGNORE INTO welfare_payments
                 (payment_id, teacher_id, period, amount, paid_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                payment.payment_id.to_string(),
                teacher_id,
                payment.period,
                payment.amount,
                payment.paid_at.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(|e| CoreError::Internal(format!("복지 지급 기록 실패: {e}")))?;

        debug!("복지 지급 기록: {}", payment.payment_id);

        conn.query_row(
            "SELECT id FROM welfare_payments WHERE payment_id = ?1",
            [payment.payment_id.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| CoreError::Internal(format!("복지 지급 조회 실패: {e}")))
    }

    pub(super) fn list_welfare_payments_sync(
        &self,
        staff_no: &str,
    ) -> Result<Vec<WelfarePayment>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT w.payment_id, t.staff_no, w.period, w.amount, w.paid_at
                 FROM welfare_payments w
                 JOIN teachers t ON t.id = w.teacher_id
                 WHERE t.staff_no = ?1
                 ORDER BY w.period, w.id",
            )
            .map_err(|e| CoreError::Internal(format!("쿼리 준비 실패: {e}")))?;

        let rows = stmt
            .query_map([staff_no], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })
            .map_err(|e| CoreError::Internal(format!("쿼리 실행 실패: {e}")))?;

        let mut payments = Vec::new();
        for row in rows {
            let (payment_id, staff_no, period, amount, paid_at) =
                row.map_err(|e| CoreError::Internal(format!("행 읽기 실패: {e}")))?;
            payments.push(WelfarePayment {
                payment_id: Self::parse_payment_id(&payment_id)?,
                staff_no,
                period,
                amount,
                paid_at: paid_at.as_deref().map(Self::parse_timestamp).transpose()?,
            });
        }
        Ok(payments)
    }

    fn parse_payment_id(s: &str) -> Result<Uuid, CoreError> {
        s.parse()
            .map_err(|e| CoreError::Internal(format!("지급 건 식별자 파싱 실패 ({s}): {e}")))
    }

    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, CoreError> {
        DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| CoreError::Internal(format!("시각 파싱 실패 ({s}): {e}")))
    }
}

#[async_trait]
impl PaymentStorage for SqliteStorage {
    async fn save_allowance_calculation(
        &self,
        calc: &AllowanceCalculation,
    ) -> Result<i64, CoreError> {
        self.save_allowance_calculation_sync(calc)
    }

    async fn get_allowance_calculation(
        &self,
        staff_no: &str,
        period: &str,
    ) -> Result<Option<AllowanceCalculation>, CoreError> {
        self.get_allowance_calculation_sync(staff_no, period)
    }

    async fn record_welfare_payment(&self, payment: &WelfarePayment) -> Result<i64, CoreError> {
        self.record_welfare_payment_sync(payment)
    }

    async fn list_welfare_payments(&self, staff_no: &str) -> Result<Vec<WelfarePayment>, CoreError> {
        self.list_welfare_payments_sync(staff_no)
    }

    async fn upsert_meal_fee(&self, fee: &MealFeeStructure) -> Result<(), CoreError> {
        self.upsert_meal_fee_sync(fee)
    }

    async fn get_meal_fee(&self, class_level: &str) -> Result<Option<MealFeeStructure>, CoreError> {
        self.get_meal_fee_sync(class_level)
    }

    async fn record_meal_payment(&self, payment: &MealDailyPayment) -> Result<i64, CoreError> {
        self.record_meal_payment_sync(payment)
    }

    async fn list_meal_payments(
        &self,
        admission_no: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MealDailyPayment>, CoreError> {
        self.list_meal_payments_sync(admission_no, from, to)
    }

    async fn meal_payments_total(&self, date: NaiveDate) -> Result<i64, CoreError> {
        self.meal_payments_total_sync(date)
    }
}
