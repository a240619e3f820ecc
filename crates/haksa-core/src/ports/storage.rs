//! 로컬 저장소 포트.
//!
//! 구현: `haksa-storage` crate (rusqlite).
//! 모든 구현체는 마이그레이션이 완료된 저장소 핸들(게이트 경유)로만 동작하며,
//! 스키마 버전 마커나 마이그레이션 단계 테이블을 직접 건드리지 않는다.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CoreError;
use crate::models::allowance::{AllowanceCalculation, WelfarePayment};
use crate::models::attendance::AttendanceRecord;
use crate::models::meal::{MealDailyPayment, MealFeeStructure};
use crate::models::staff::Teacher;
use crate::models::student::Student;

/// 학적부 저장소 — 교사/학생 명부
#[async_trait]
pub trait RegistryStorage: Send + Sync {
    /// 교사 저장 (교직원 번호 기준 upsert), 행 id 반환
    async fn save_teacher(&self, teacher: &Teacher) -> Result<i64, CoreError>;

    /// 교직원 번호로 교사 조회
    async fn get_teacher(&self, staff_no: &str) -> Result<Option<Teacher>, CoreError>;

    /// 전체 교사 목록
    async fn list_teachers(&self) -> Result<Vec<Teacher>, CoreError>;

    /// 학생 저장 (학번 기준 upsert), 행 id 반환
    async fn save_student(&self, student: &Student) -> Result<i64, CoreError>;

    /// 학번으로 학생 조회
    async fn get_student(&self, admission_no: &str) -> Result<Option<Student>, CoreError>;

    /// 학생 목록 (학급 필터는 선택)
    async fn list_students(&self, class_level: Option<&str>) -> Result<Vec<Student>, CoreError>;
}

/// 출결 저장소
#[async_trait]
pub trait AttendanceStorage: Send + Sync {
    /// 출결 기록 (학생·날짜 기준 upsert)
    async fn record_attendance(&self, record: &AttendanceRecord) -> Result<(), CoreError>;

    /// 기간별 학생 출결 조회
    async fn get_attendance(
        &self,
        admission_no: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, CoreError>;

    /// 기간 내 출석일 수 (수당 계산 입력)
    async fn count_present_days(
        &self,
        admission_no: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<u32, CoreError>;
}

/// 수당/급식비 저장소
#[async_trait]
pub trait PaymentStorage: Send + Sync {
    // ============================================================
    // 수당 계산
    // ============================================================

    /// 수당 계산 결과 저장 (교사·기간 기준 upsert), 행 id 반환
    async fn save_allowance_calculation(
        &self,
        calc: &AllowanceCalculation,
    ) -> Result<i64, CoreError>;

    /// 교사·기간으로 수당 계산 결과 조회
    async fn get_allowance_calculation(
        &self,
        staff_no: &str,
        period: &str,
    ) -> Result<Option<AllowanceCalculation>, CoreError>;

    /// 복지 수당 지급 기록 (payment_id 기준 멱등), 행 id 반환
    async fn record_welfare_payment(&self, payment: &WelfarePayment) -> Result<i64, CoreError>;

    /// 교사별 복지 수당 지급 내역
    async fn list_welfare_payments(&self, staff_no: &str) -> Result<Vec<WelfarePayment>, CoreError>;

    // ============================================================
    // 급식비
    // ============================================================

    /// 학급별 급식 단가 저장 (학급 기준 upsert)
    async fn upsert_meal_fee(&self, fee: &MealFeeStructure) -> Result<(), CoreError>;

    /// 학급별 급식 단가 조회
    async fn get_meal_fee(&self, class_level: &str) -> Result<Option<MealFeeStructure>, CoreError>;

    /// 일일 급식비 납부 기록 (학생·날짜 기준 upsert), 행 id 반환
    async fn record_meal_payment(&self, payment: &MealDailyPayment) -> Result<i64, CoreError>;

    /// 기간별 학생 납부 내역
    async fn list_meal_payments(
        &self,
        admission_no: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MealDailyPayment>, CoreError>;

    /// 일자별 수납 합계 (원)
    async fn meal_payments_total(&self, date: NaiveDate) -> Result<i64, CoreError>;
}
