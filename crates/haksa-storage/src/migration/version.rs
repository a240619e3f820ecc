//! 스키마 버전 오라클.
//!
//! SQLite 엔진 자체의 `PRAGMA user_version` 카운터를 단일 버전 마커로 사용한다.
//! 별도 테이블이 아니므로 절반만 기록된 버전 값은 존재할 수 없고,
//! "DDL 커밋 후 버전 기록 전" 구간만이 유일한 불일치 창이다.

use haksa_core::error::CoreError;
use rusqlite::Connection;

/// 저장된 스키마 버전 읽기 (새 저장소는 0)
pub(crate) fn read_version(conn: &Connection) -> Result<u32, CoreError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| CoreError::StoreUnavailable(format!("스키마 버전 읽기 실패: {e}")))
}

/// 스키마 버전 기록 — 해당 버전까지의 모든 단계가 커밋된 뒤에만 호출된다
pub(crate) fn write_version(conn: &Connection, version: u32) -> Result<(), CoreError> {
    conn.pragma_update(None, "user_version", version)
        .map_err(|e| CoreError::StoreUnavailable(format!("스키마 버전 기록 실패: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_is_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_version(&conn).unwrap(), 0);
    }

    #[test]
    fn write_then_read() {
        let conn = Connection::open_in_memory().unwrap();
        write_version(&conn, 5).unwrap();
        assert_eq!(read_version(&conn).unwrap(), 5);
    }

    #[test]
    fn version_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.db");

        {
            let conn = Connection::open(&path).unwrap();
            write_version(&conn, 3).unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        assert_eq!(read_version(&conn).unwrap(), 3);
    }
}
