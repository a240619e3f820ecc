//! SQLite 저장소 어댑터.
//!
//! `RegistryStorage` + `AttendanceStorage` + `PaymentStorage` 포트 구현.
//! 핸들은 반드시 [`crate::gate::StorageGate`]를 거쳐 얻는다 — 생성 시점에
//! 마이그레이션이 완료되므로, 이 타입의 메서드는 항상 목표 버전 스키마를
//! 전제로 동작한다.
//!
//! # 모듈 구조
//! - `registry`: 교사/학생 명부
//! - `attendance`: 출결 기록
//! - `payments`: 수당 계산, 복지 지급
//! - `meals`: 급식비 단가/납부
//! - `maintenance`: 무결성 점검, 테이블 통계

mod attendance;
mod maintenance;
mod meals;
mod payments;
mod registry;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use haksa_core::error::CoreError;
use haksa_core::models::attendance::AttendanceStatus;
use haksa_core::models::staff::TeacherRank;
use rusqlite::Connection;
use tracing::info;

use crate::migration;

/// SQLite 저장소 — 도메인 포트 구현
#[derive(Debug)]
pub struct SqliteStorage {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// 파일 기반 SQLite 저장소 생성 — 열기 직후 마이그레이션을 실행한다
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::StoreUnavailable(format!("SQLite 열기 실패: {e}")))?;

        // 성능/무결성 PRAGMA 설정
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA cache_size=8000;
            PRAGMA temp_store=MEMORY;
            PRAGMA foreign_keys=ON;
            ",
        )
        .map_err(|e| CoreError::StoreUnavailable(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::StoreUnavailable(format!("인메모리 SQLite 생성 실패: {e}")))?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| CoreError::StoreUnavailable(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 연결 잠금 획득
    pub(super) fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }

    /// 현재 스키마 버전 (상태 출력용)
    pub fn schema_version(&self) -> Result<u32, CoreError> {
        let conn = self.lock()?;
        migration::schema_version(&conn)
    }

    // ============================================================
    // DB 문자열 ↔ 도메인 타입 변환
    // ============================================================

    pub(super) fn rank_to_db(rank: TeacherRank) -> String {
        format!("{rank:?}")
    }

    pub(super) fn parse_rank(s: &str) -> TeacherRank {
        match s {
            "Principal" => TeacherRank::Principal,
            "VicePrincipal" => TeacherRank::VicePrincipal,
            "Head" => TeacherRank::Head,
            "Assistant" => TeacherRank::Assistant,
            _ => TeacherRank::Classroom,
        }
    }

    pub(super) fn status_to_db(status: AttendanceStatus) -> String {
        format!("{status:?}")
    }

    pub(super) fn parse_status(s: &str) -> Result<AttendanceStatus, CoreError> {
        match s {
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            "Late" => Ok(AttendanceStatus::Late),
            "Excused" => Ok(AttendanceStatus::Excused),
            other => Err(CoreError::Internal(format!("알 수 없는 출결 상태: {other}"))),
        }
    }

    pub(super) fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
        s.parse()
            .map_err(|e| CoreError::Internal(format!("날짜 파싱 실패 ({s}): {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use haksa_core::models::allowance::{AllowanceCalculation, WelfarePayment};
    use haksa_core::models::attendance::{AttendanceRecord, AttendanceStatus};
    use haksa_core::models::meal::{MealDailyPayment, MealFeeStructure};
    use haksa_core::models::staff::{Teacher, TeacherRank};
    use haksa_core::models::student::Student;
    use haksa_core::ports::storage::{AttendanceStorage, PaymentStorage, RegistryStorage};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_teacher() -> Teacher {
        let mut teacher = Teacher::new("T-2023-014", "김은지", TeacherRank::Classroom);
        teacher.bank_account = Some("110-234-567890".to_string());
        teacher.hired_at = Some(date(2023, 3, 1));
        teacher
    }

    fn make_student() -> Student {
        let mut student = Student::new("S-0412", "박준호", "3-2");
        student.guardian_phone = Some("010-1234-5678".to_string());
        student.enrolled_at = Some(date(2024, 3, 2));
        student
    }

    #[test]
    fn migrated_schema_has_no_legacy_allowance_rate_column() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let conn = storage.lock().unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('teachers') WHERE name='allowance_rate'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }

    // ============================================================
    // 명부 테스트
    // ============================================================

    #[tokio::test]
    async fn save_and_get_teacher() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let id = storage.save_teacher(&make_teacher()).await.unwrap();
        assert!(id > 0);

        let loaded = storage.get_teacher("T-2023-014").await.unwrap().unwrap();
        assert_eq!(loaded.name, "김은지");
        assert_eq!(loaded.rank, TeacherRank::Classroom);
        assert_eq!(loaded.hired_at, Some(date(2023, 3, 1)));
    }

    #[tokio::test]
    async fn save_teacher_is_upsert() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let first = storage.save_teacher(&make_teacher()).await.unwrap();

        let mut updated = make_teacher();
        updated.name = "김은지 (개명)".to_string();
        updated.rank = TeacherRank::Head;
        let second = storage.save_teacher(&updated).await.unwrap();

        // 같은 행을 갱신
        assert_eq!(first, second);
        let loaded = storage.get_teacher("T-2023-014").await.unwrap().unwrap();
        assert_eq!(loaded.rank, TeacherRank::Head);
        assert_eq!(storage.list_teachers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_missing_teacher_returns_none() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.get_teacher("T-9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_list_students_by_class() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        storage.save_student(&make_student()).await.unwrap();
        storage
            .save_student(&Student::new("S-0413", "이서연", "3-2"))
            .await
            .unwrap();
        storage
            .save_student(&Student::new("S-0501", "최민재", "4-1"))
            .await
            .unwrap();

        let all = storage.list_students(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let class = storage.list_students(Some("3-2")).await.unwrap();
        assert_eq!(class.len(), 2);

        let loaded = storage.get_student("S-0412").await.unwrap().unwrap();
        assert_eq!(loaded.guardian_phone.as_deref(), Some("010-1234-5678"));
    }

    // ============================================================
    // 출결 테스트
    // ============================================================

    #[tokio::test]
    async fn attendance_lifecycle() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.save_student(&make_student()).await.unwrap();

        storage
            .record_attendance(&AttendanceRecord::present("S-0412", date(2026, 5, 11)))
            .await
            .unwrap();
        storage
            .record_attendance(&AttendanceRecord {
                admission_no: "S-0412".to_string(),
                date: date(2026, 5, 12),
                status: AttendanceStatus::Late,
                note: Some("교통 지연".to_string()),
            })
            .await
            .unwrap();

        let records = storage
            .get_attendance("S-0412", date(2026, 5, 1), date(2026, 5, 31))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].status, AttendanceStatus::Late);

        let present = storage
            .count_present_days("S-0412", date(2026, 5, 1), date(2026, 5, 31))
            .await
            .unwrap();
        assert_eq!(present, 1);
    }

    #[tokio::test]
    async fn attendance_same_day_is_upsert() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.save_student(&make_student()).await.unwrap();

        let day = date(2026, 5, 11);
        storage
            .record_attendance(&AttendanceRecord::present("S-0412", day))
            .await
            .unwrap();
        // 같은 날 재기록 → 상태 갱신, 행 추가 없음
        storage
            .record_attendance(&AttendanceRecord {
                admission_no: "S-0412".to_string(),
                date: day,
                status: AttendanceStatus::Excused,
                note: None,
            })
            .await
            .unwrap();

        let records = storage.get_attendance("S-0412", day, day).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Excused);
    }

    #[tokio::test]
    async fn attendance_for_unknown_student_fails() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let result = storage
            .record_attendance(&AttendanceRecord::present("S-없음", date(2026, 5, 11)))
            .await;
        assert!(matches!(
            result,
            Err(haksa_core::error::CoreError::NotFound { .. })
        ));
    }

    // ============================================================
    // 수당/복지 테스트
    // ============================================================

    #[tokio::test]
    async fn allowance_calculation_upsert_and_get() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.save_teacher(&make_teacher()).await.unwrap();

        let calc = AllowanceCalculation::new("T-2023-014", "2026-05", 180_000, 3_500, 21);
        storage.save_allowance_calculation(&calc).await.unwrap();

        // 재계산 → 같은 교사·기간 덮어쓰기
        let recalc = AllowanceCalculation::new("T-2023-014", "2026-05", 180_000, 3_500, 22);
        storage.save_allowance_calculation(&recalc).await.unwrap();

        let loaded = storage
            .get_allowance_calculation("T-2023-014", "2026-05")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.days_present, 22);
        assert_eq!(loaded.total_amount, 180_000 + 3_500 * 22);
    }

    #[tokio::test]
    async fn welfare_payment_is_idempotent_by_payment_id() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.save_teacher(&make_teacher()).await.unwrap();

        let payment = WelfarePayment::new("T-2023-014", "2026-05", 50_000);
        let first = storage.record_welfare_payment(&payment).await.unwrap();
        // 동일 payment_id 재기록 → 무시, 같은 행 id
        let second = storage.record_welfare_payment(&payment).await.unwrap();
        assert_eq!(first, second);

        let listed = storage.list_welfare_payments("T-2023-014").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, 50_000);
    }

    #[tokio::test]
    async fn allowance_for_unknown_teacher_fails() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let calc = AllowanceCalculation::new("T-없음", "2026-05", 100_000, 0, 0);
        let result = storage.save_allowance_calculation(&calc).await;
        assert!(matches!(
            result,
            Err(haksa_core::error::CoreError::NotFound { .. })
        ));
    }

    // ============================================================
    // 급식비 테스트
    // ============================================================

    #[tokio::test]
    async fn meal_fee_and_daily_payments() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.save_student(&make_student()).await.unwrap();
        storage.save_teacher(&make_teacher()).await.unwrap();

        storage
            .upsert_meal_fee(&MealFeeStructure {
                class_level: "3-2".to_string(),
                daily_fee: 4_500,
                effective_from: date(2026, 3, 1),
            })
            .await
            .unwrap();

        // 단가 개정 → 덮어쓰기
        storage
            .upsert_meal_fee(&MealFeeStructure {
                class_level: "3-2".to_string(),
                daily_fee: 4_800,
                effective_from: date(2026, 9, 1),
            })
            .await
            .unwrap();

        let fee = storage.get_meal_fee("3-2").await.unwrap().unwrap();
        assert_eq!(fee.daily_fee, 4_800);

        storage
            .record_meal_payment(&MealDailyPayment {
                admission_no: "S-0412".to_string(),
                date: date(2026, 5, 11),
                amount: 4_800,
                collected_by: Some("T-2023-014".to_string()),
            })
            .await
            .unwrap();

        let listed = storage
            .list_meal_payments("S-0412", date(2026, 5, 1), date(2026, 5, 31))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].collected_by.as_deref(), Some("T-2023-014"));

        let total = storage.meal_payments_total(date(2026, 5, 11)).await.unwrap();
        assert_eq!(total, 4_800);
        let empty_day = storage.meal_payments_total(date(2026, 5, 12)).await.unwrap();
        assert_eq!(empty_day, 0);
    }

    // ============================================================
    // 유지보수 테스트
    // ============================================================

    #[test]
    fn integrity_check_on_fresh_store() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.integrity_check().unwrap());
    }

    #[test]
    fn table_counts_cover_domain_tables() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let counts = storage.table_counts().unwrap();
        assert_eq!(counts.len(), 7);
        assert!(counts.iter().all(|(_, n)| *n == 0));
    }
}
