//! # haksa-core
//!
//! HAKSA 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::allowance::AllowanceCalculation;
    use crate::models::attendance::{AttendanceRecord, AttendanceStatus};

    #[test]
    fn allowance_serde_roundtrip() {
        let calc = AllowanceCalculation::new("T-2023-014", "2026-05", 180_000, 3_500, 21);

        let json = serde_json::to_string(&calc).unwrap();
        let deserialized: AllowanceCalculation = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.staff_no, "T-2023-014");
        assert_eq!(deserialized.total_amount, 180_000 + 3_500 * 21);
    }

    #[test]
    fn attendance_serde_roundtrip() {
        let record = AttendanceRecord {
            admission_no: "S-0412".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 5, 11).unwrap(),
            status: AttendanceStatus::Late,
            note: Some("교통 지연".to_string()),
        };

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: AttendanceRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.status, AttendanceStatus::Late);
        assert_eq!(deserialized.admission_no, "S-0412");
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.storage.db_filename, "haksa.db");
        assert!(config.storage.data_dir.is_none());
    }
}
