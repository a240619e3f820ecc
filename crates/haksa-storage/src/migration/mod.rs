//! 스키마 수명주기 관리.
//!
//! 저장소를 현재 버전에서 코드가 기대하는 버전까지 끌어올리는 순방향 마이그레이션
//! 러너. 프로세스 기동 시 게이트가 열리기 전에 정확히 한 번 실행된다.
//!
//! 동작 규칙:
//! - 단계는 `from_version` 오름차순으로만 실행되며, 마커가 이미 지나간 단계는
//!   절대 다시 실행되지 않는다.
//! - 각 단계의 연산은 한 트랜잭션으로 커밋되고, 커밋 후에 버전 마커를 올린다.
//!   크래시 시 마커는 마지막 성공 단계에 머무르며 다음 기동에서 이어서 실행된다.
//! - 마커가 목표보다 높으면(다운그레이드) 또는 대응 단계가 없으면(알 수 없는
//!   상태) 추측하지 않고 즉시 치명 에러로 중단한다.

mod steps;
mod version;

pub use steps::TARGET_VERSION;

use haksa_core::error::CoreError;
use rusqlite::Connection;
use tracing::{debug, info};

use steps::{MigrationStep, CREATE_STUDENTS, CREATE_TEACHERS, STEPS};

/// 마이그레이션 실행.
///
/// 적용된 단계들의 `from_version` 목록을 반환한다 (이미 최신이면 빈 목록).
pub fn run_migrations(conn: &Connection) -> Result<Vec<u32>, CoreError> {
    ensure_baseline(conn)?;
    apply_steps(conn, STEPS, TARGET_VERSION)
}

/// 현재 스키마 버전 조회 (상태 출력용)
pub fn schema_version(conn: &Connection) -> Result<u32, CoreError> {
    version::read_version(conn)
}

/// 기반 테이블 보장 — 버전 마커가 전혀 없는 저장소(신규 설치)도
/// 가장 오래된 테이블만큼은 일관된 출발점을 갖도록 방어적으로 생성한다
fn ensure_baseline(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(&format!("{CREATE_TEACHERS};\n{CREATE_STUDENTS};"))
        .map_err(|e| CoreError::StoreUnavailable(format!("기반 테이블 생성 실패: {e}")))
}

/// 적용 대상 단계들을 버전 오름차순으로 실행
fn apply_steps(
    conn: &Connection,
    steps: &[MigrationStep],
    target: u32,
) -> Result<Vec<u32>, CoreError> {
    let mut current = version::read_version(conn)?;

    if current > target {
        return Err(CoreError::SchemaDowngrade {
            found: current,
            target,
        });
    }

    info!("스키마 버전: 현재 {current}, 목표 {target}");

    let mut applied = Vec::new();
    while current < target {
        let step = steps
            .iter()
            .find(|s| s.from_version == current)
            .ok_or(CoreError::SchemaUnknownVersion {
                found: current,
                target,
            })?;

        debug!(
            "마이그레이션 단계 실행: v{} → v{} ({})",
            step.from_version,
            step.from_version + 1,
            step.label
        );
        apply_step(conn, step)?;

        current = step.from_version + 1;
        version::write_version(conn, current)?;
        applied.push(step.from_version);
    }

    if applied.is_empty() {
        debug!("적용할 마이그레이션 단계 없음");
    } else {
        info!("마이그레이션 완료: {}단계 적용, 버전 {current}", applied.len());
    }
    Ok(applied)
}

/// 한 단계의 연산들을 단일 트랜잭션으로 커밋
fn apply_step(conn: &Connection, step: &MigrationStep) -> Result<(), CoreError> {
    let step_err = |e: rusqlite::Error| CoreError::MigrationStep {
        from_version: step.from_version,
        message: e.to_string(),
    };

    let tx = conn.unchecked_transaction().map_err(step_err)?;
    for op in step.ops {
        op.apply(&tx).map_err(step_err)?;
    }
    tx.commit().map_err(step_err)?;
    Ok(())
}
