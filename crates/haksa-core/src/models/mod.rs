//! HAKSA 도메인 모델.
//!
//! 학적/출결/수당/급식 도메인의 핵심 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod allowance;
pub mod attendance;
pub mod meal;
pub mod staff;
pub mod student;
