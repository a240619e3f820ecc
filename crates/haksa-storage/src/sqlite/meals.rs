//! 급식비 저장소 (PaymentStorage 포트 일부).

use chrono::NaiveDate;
use haksa_core::error::CoreError;
use haksa_core::models::meal::{MealDailyPayment, MealFeeStructure};
use rusqlite::OptionalExtension;
use tracing::debug;

use super::SqliteStorage;

impl SqliteStorage {
    pub(super) fn upsert_meal_fee_sync(&self, fee: &MealFeeStructure) -> Result<(), CoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO meal_fee_structures (class_level, daily_fee, effective_from)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(class_level) DO UPDATE SET
                 daily_fee = excluded.daily_fee,
                 effective_from = excluded.effective_from",
            rusqlite::params![
                fee.class_level,
                fee.daily_fee,
                fee.effective_from.to_string(),
            ],
        )
        .map_err(|e| CoreError::Internal(format!("급식 단가 저장 실패: {e}")))?;

        debug!("급식 단가 저장: {} {}원", fee.class_level, fee.daily_fee);
        Ok(())
    }

    pub(super) fn get_meal_fee_sync(
        &self,
        class_level: &str,
    ) -> Result<Option<MealFeeStructure>, CoreError> {
        let conn = self.lock()?;

        let row: Option<(String, i64, String)> = conn
            .query_row(
                "SELECT class_level, daily_fee, effective_from
                 FROM meal_fee_structures WHERE class_level = ?1",
                [class_level],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| CoreError::Internal(format!("급식 단가 조회 실패: {e}")))?;

        row.map(|(class_level, daily_fee, effective_from)| {
            Ok(MealFeeStructure {
                class_level,
                daily_fee,
                effective_from: Self::parse_date(&effective_from)?,
            })
        })
        .transpose()
    }

    pub(super) fn record_meal_payment_sync(
        &self,
        payment: &MealDailyPayment,
    ) -> Result<i64, CoreError> {
        let conn = self.lock()?;
        let student_id = Self::student_row_id(&conn, &payment.admission_no)?;

        conn.execute(
            "INSERT INTO meal_daily_payments (student_id, date, amount, collected_by)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(student_id, date) DO UPDATE SET
                 amount = excluded.amount,
                 collected_by = excluded.collected_by",
            rusqlite::params![
                student_id,
                payment.date.to_string(),
                payment.amount,
                payment.collected_by,
            ],
        )
        .map_err(|e| CoreError::Internal(format!("급식비 납부 기록 실패: {e}")))?;

        debug!("급식비 납부 기록: {} {}", payment.admission_no, payment.date);

        conn.query_row(
            "SELECT id FROM meal_daily_payments WHERE student_id = ?1 AND date = ?2",
            rusqlite::params![student_id, payment.date.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| CoreError::Internal(format!("급식비 납부 조회 실패: {e}")))
    }

    pub(super) fn list_meal_payments_sync(
        &self,
        admission_no: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MealDailyPayment>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT s.admission_no, m.date, m.amount, m.collected_by
                 FROM meal_daily_payments m
                 JOIN students s ON s.id = m.student_id
                 WHERE s.admission_no = ?1 AND m.date >= ?2 AND m.date <= ?3
                 ORDER BY m.date",
            )
            .map_err(|e| CoreError::Internal(format!("쿼리 준비 실패: {e}")))?;

        let rows = stmt
            .query_map(
                rusqlite::params![admission_no, from.to_string(), to.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .map_err(|e| CoreError::Internal(format!("쿼리 실행 실패: {e}")))?;

        let mut payments = Vec::new();
        for row in rows {
            let (admission_no, date, amount, collected_by) =
                row.map_err(|e| CoreError::Internal(format!("행 읽기 실패: {e}")))?;
            payments.push(MealDailyPayment {
                admission_no,
                date: Self::parse_date(&date)?,
                amount,
                collected_by,
            });
        }
        Ok(payments)
    }

    pub(super) fn meal_payments_total_sync(&self, date: NaiveDate) -> Result<i64, CoreError> {
        let conn = self.lock()?;

        conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM meal_daily_payments WHERE date = ?1",
            [date.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| CoreError::Internal(format!("수납 합계 집계 실패: {e}")))
    }
}
