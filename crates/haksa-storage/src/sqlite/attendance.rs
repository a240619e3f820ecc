//! 출결 저장소 (AttendanceStorage 포트 구현).

use async_trait::async_trait;
use chrono::NaiveDate;
use haksa_core::error::CoreError;
use haksa_core::models::attendance::AttendanceRecord;
use haksa_core::ports::storage::AttendanceStorage;
use tracing::debug;

use super::SqliteStorage;

#[async_trait]
impl AttendanceStorage for SqliteStorage {
    async fn record_attendance(&self, record: &AttendanceRecord) -> Result<(), CoreError> {
        let conn = self.lock()?;
        let student_id = Self::student_row_id(&conn, &record.admission_no)?;

        conn.execute(
            "INSERT INTO attendance (student_id, date, status, note)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(student_id, date) DO UPDATE SET
                 status = excluded.status,
                 note = excluded.note",
            rusqlite::params![
                student_id,
                record.date.to_string(),
                Self::status_to_db(record.status),
                record.note,
            ],
        )
        .map_err(|e| CoreError::Internal(format!("출결 기록 실패: {e}")))?;

        debug!("출결 기록: {} {}", record.admission_no, record.date);
        Ok(())
    }

    async fn get_attendance(
        &self,
        admission_no: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT s.admission_no, a.date, a.status, a.note
                 FROM attendance a
                 JOIN students s ON s.id = a.student_id
                 WHERE s.admission_no = ?1 AND a.date >= ?2 AND a.date <= ?3
                 ORDER BY a.date",
            )
            .map_err(|e| CoreError::Internal(format!("쿼리 준비 실패: {e}")))?;

        let rows = stmt
            .query_map(
                rusqlite::params![admission_no, from.to_string(), to.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .map_err(|e| CoreError::Internal(format!("쿼리 실행 실패: {e}")))?;

        let mut records = Vec::new();
        for row in rows {
            let (admission_no, date, status, note) =
                row.map_err(|e| CoreError::Internal(format!("행 읽기 실패: {e}")))?;
            records.push(AttendanceRecord {
                admission_no,
                date: Self::parse_date(&date)?,
                status: Self::parse_status(&status)?,
                note,
            });
        }
        Ok(records)
    }

    async fn count_present_days(
        &self,
        admission_no: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<u32, CoreError> {
        let conn = self.lock()?;

        conn.query_row(
            "SELECT COUNT(*)
             FROM attendance a
             JOIN students s ON s.id = a.student_id
             WHERE s.admission_no = ?1
               AND a.date >= ?2 AND a.date <= ?3
               AND a.status = 'Present'",
            rusqlite::params![admission_no, from.to_string(), to.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| CoreError::Internal(format!("출석일 집계 실패: {e}")))
    }
}
