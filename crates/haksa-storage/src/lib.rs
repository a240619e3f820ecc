//! # haksa-storage
//!
//! 로컬 저장소 어댑터.
//! SQLite 스키마 수명주기 관리(버전 오라클 + 순방향 마이그레이션 러너),
//! 초기화 완료 전 접근을 차단하는 게이트, 도메인 포트 구현을 제공한다.
//!
//! ## 모듈
//! - `migration`: 스키마 버전 오라클, 단계 테이블, 마이그레이션 러너
//! - `gate`: 저장소 접근 게이트 (단일 비행 초기화)
//! - `sqlite`: 도메인 저장소 (RegistryStorage / AttendanceStorage / PaymentStorage 구현)

pub mod gate;
pub mod migration;
pub mod sqlite;
