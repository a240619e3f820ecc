//! HAKSA 핵심 에러 타입.
//!
//! 어댑터 crate는 자체 에러를 정의하지 않고 `CoreError`의 변형으로 매핑한다.
//! 스키마 수명주기 관련 변형(`StoreUnavailable`, `SchemaUnknownVersion`,
//! `SchemaDowngrade`, `MigrationStep`)은 모두 프로세스 내에서 복구 불가능하며,
//! 재시도 없이 호출자에게 그대로 전파되어야 한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 유효성 검증, 저장소 수명주기 등 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Teacher", "Student")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================
    // 저장소 수명주기 에러 — 전부 기동 단계 치명 에러
    // ============================================================
    /// 저장소 파일 자체를 열거나 읽을 수 없음 (손상, 미지원 포맷)
    #[error("저장소 사용 불가: {0}")]
    StoreUnavailable(String),

    /// 저장된 스키마 버전이 알려진 마이그레이션 단계와 일치하지 않음
    #[error("알 수 없는 스키마 버전: 현재 {found}, 목표 {target}")]
    SchemaUnknownVersion {
        /// 저장소에 기록된 버전
        found: u32,
        /// 실행 중인 코드가 기대하는 버전
        target: u32,
    },

    /// 저장된 스키마 버전이 목표 버전보다 높음 (신규 빌드의 DB를 구버전이 열었음)
    #[error("스키마 다운그레이드 감지: 현재 {found} > 목표 {target}")]
    SchemaDowngrade {
        /// 저장소에 기록된 버전
        found: u32,
        /// 실행 중인 코드가 기대하는 버전
        target: u32,
    },

    /// 마이그레이션 단계 실행 실패 — 버전 마커는 마지막 성공 단계에 머무름
    #[error("마이그레이션 단계 실패 (v{from_version} 적용 중): {message}")]
    MigrationStep {
        /// 실패한 단계의 시작 버전
        from_version: u32,
        /// 실패 사유
        message: String,
    },

    /// 초기화(마이그레이션) 완료 전에 저장소 핸들 요청
    #[error("저장소 미초기화 — initialize() 완료 전 접근")]
    StorageNotInitialized,

    /// 초기화가 이미 실패로 종결됨 (프로세스 재시작 필요)
    #[error("저장소 초기화 실패 (재시작 필요): {0}")]
    StorageInitFailed(String),
}
