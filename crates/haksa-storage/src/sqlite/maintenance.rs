//! 저장소 유지보수.
//!
//! 무결성 점검과 테이블 통계 — 백업/내보내기 도구는 게이트가 열린 뒤
//! 이 헬퍼들로 완결된(마이그레이션 완료) 테이블만 읽는다.

use haksa_core::error::CoreError;
use tracing::info;

use super::SqliteStorage;

/// 도메인 테이블 목록 (통계/내보내기 대상)
const DOMAIN_TABLES: &[&str] = &[
    "teachers",
    "students",
    "attendance",
    "allowance_calculations",
    "welfare_payments",
    "meal_fee_structures",
    "meal_daily_payments",
];

impl SqliteStorage {
    /// DB 파일 무결성 점검 — `PRAGMA integrity_check` 결과가 "ok"인지 확인
    pub fn integrity_check(&self) -> Result<bool, CoreError> {
        let conn = self.lock()?;

        let result: String = conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))
            .map_err(|e| CoreError::StoreUnavailable(format!("무결성 점검 실패: {e}")))?;

        Ok(result == "ok")
    }

    /// 도메인 테이블별 행 수
    pub fn table_counts(&self) -> Result<Vec<(String, i64)>, CoreError> {
        let conn = self.lock()?;

        let mut counts = Vec::with_capacity(DOMAIN_TABLES.len());
        for table in DOMAIN_TABLES {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
                .map_err(|e| CoreError::Internal(format!("{table} 행 수 조회 실패: {e}")))?;
            counts.push((table.to_string(), count));
        }
        Ok(counts)
    }

    /// 공간 회수 (보존 정리 후 수동 호출)
    pub fn vacuum(&self) -> Result<(), CoreError> {
        let conn = self.lock()?;

        conn.execute_batch("VACUUM")
            .map_err(|e| CoreError::Internal(format!("VACUUM 실패: {e}")))?;

        info!("VACUUM 완료");
        Ok(())
    }
}
