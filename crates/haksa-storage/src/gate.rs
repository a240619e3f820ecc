//! 저장소 접근 게이트.
//!
//! 마이그레이션이 끝나기 전에는 어떤 호출자도 저장소 핸들을 얻을 수 없다.
//! 초기화는 단일 비행(single-flight)으로 실행된다 — 기동 초기에 여러 태스크가
//! 동시에 `initialize()`를 호출해도 `run_migrations`는 정확히 한 번 실행되고,
//! 나머지 호출자는 같은 결과를 기다린다.
//!
//! 상태 전이: `Uninitialized → Migrating → Ready | Failed`.
//! `Ready`와 `Failed`는 프로세스 수명 동안 종결 상태다 — 실패한 게이트는
//! 자가 복구하지 않으며 프로세스 재시작으로만 재시도한다.

use std::path::PathBuf;
use std::sync::Arc;

use haksa_core::error::CoreError;
use parking_lot::RwLock;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::sqlite::SqliteStorage;

/// 저장소 위치
#[derive(Debug, Clone)]
pub enum StoreLocation {
    /// 파일 기반 저장소
    File(PathBuf),
    /// 인메모리 저장소 (테스트용)
    InMemory,
}

/// 게이트 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// 초기화 시작 전
    Uninitialized,
    /// 마이그레이션 진행 중 — 저장소 접근 불가
    Migrating,
    /// 초기화 완료 — 핸들 사용 가능 (종결 상태)
    Ready,
    /// 초기화 실패 (종결 상태, 프로세스 재시작 필요)
    Failed,
}

/// 저장소 접근 게이트.
///
/// 전역 가변 핸들 대신 소유된 값으로 생성해 협력자들에게 주입한다.
pub struct StorageGate {
    location: StoreLocation,
    cell: OnceCell<Result<Arc<SqliteStorage>, Arc<CoreError>>>,
    state: RwLock<GateState>,
}

impl StorageGate {
    /// 게이트 생성 — 저장소는 아직 열리지 않는다
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            cell: OnceCell::new(),
            state: RwLock::new(GateState::Uninitialized),
        }
    }

    /// 저장소 초기화 (열기 + 마이그레이션).
    ///
    /// 여러 태스크가 동시에 호출해도 초기화는 한 번만 수행되며, 결과는
    /// 프로세스 수명 동안 고정된다. 실패 이후의 호출은 원래 실패 사유를
    /// 담은 [`CoreError::StorageInitFailed`]를 반환한다.
    pub async fn initialize(&self) -> Result<Arc<SqliteStorage>, CoreError> {
        let outcome = self
            .cell
            .get_or_init(|| async {
                *self.state.write() = GateState::Migrating;
                info!("저장소 초기화 시작");

                let opened = match &self.location {
                    StoreLocation::File(path) => SqliteStorage::open(path),
                    StoreLocation::InMemory => SqliteStorage::open_in_memory(),
                };

                match opened {
                    Ok(storage) => {
                        *self.state.write() = GateState::Ready;
                        info!("저장소 초기화 완료 — 게이트 개방");
                        Ok(Arc::new(storage))
                    }
                    Err(e) => {
                        *self.state.write() = GateState::Failed;
                        error!("저장소 초기화 실패 (종결): {e}");
                        Err(Arc::new(e))
                    }
                }
            })
            .await;

        match outcome {
            Ok(storage) => Ok(storage.clone()),
            Err(e) => Err(CoreError::StorageInitFailed(e.to_string())),
        }
    }

    /// 초기화 완료된 저장소 핸들 반환.
    ///
    /// `initialize()`가 성공적으로 끝나기 전에는 [`CoreError::StorageNotInitialized`],
    /// 실패로 종결된 뒤에는 [`CoreError::StorageInitFailed`]를 반환한다.
    pub fn store(&self) -> Result<Arc<SqliteStorage>, CoreError> {
        match self.cell.get() {
            None => Err(CoreError::StorageNotInitialized),
            Some(Ok(storage)) => Ok(storage.clone()),
            Some(Err(e)) => Err(CoreError::StorageInitFailed(e.to_string())),
        }
    }

    /// 현재 게이트 상태
    pub fn state(&self) -> GateState {
        *self.state.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn store_before_initialize_fails() {
        let gate = StorageGate::new(StoreLocation::InMemory);
        assert_matches!(gate.store(), Err(CoreError::StorageNotInitialized));
        assert_eq!(gate.state(), GateState::Uninitialized);
    }

    #[tokio::test]
    async fn initialize_opens_gate() {
        let gate = StorageGate::new(StoreLocation::InMemory);
        let storage = gate.initialize().await.unwrap();

        assert_eq!(gate.state(), GateState::Ready);
        assert!(Arc::ptr_eq(&storage, &gate.store().unwrap()));
    }

    #[tokio::test]
    async fn concurrent_initialize_is_single_flight() {
        let dir = tempfile::tempdir().unwrap();
        let gate = Arc::new(StorageGate::new(StoreLocation::File(
            dir.path().join("haksa.db"),
        )));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                tokio::spawn(async move { gate.initialize().await.unwrap() })
            })
            .collect();

        let mut stores = Vec::new();
        for handle in handles {
            stores.push(handle.await.unwrap());
        }

        // 전원이 같은 핸들을 공유
        for store in &stores[1..] {
            assert!(Arc::ptr_eq(&stores[0], store));
        }
        assert_eq!(gate.state(), GateState::Ready);
    }

    #[tokio::test]
    async fn racing_store_calls_never_observe_partial_state() {
        let gate = Arc::new(StorageGate::new(StoreLocation::InMemory));

        // 초기화와 동시에 store()를 두드리는 태스크들
        let readers: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                tokio::spawn(async move {
                    // "준비 안 됨" 또는 "준비 완료"만 관찰되어야 함
                    match gate.store() {
                        Ok(_) => true,
                        Err(CoreError::StorageNotInitialized) => false,
                        Err(e) => panic!("예상 밖 에러: {e}"),
                    }
                })
            })
            .collect();

        gate.initialize().await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        assert!(gate.store().is_ok());
    }

    #[tokio::test]
    async fn failed_initialize_is_terminal() {
        // 디렉터리 경로를 DB 파일로 지정 → 열기 실패
        let dir = tempfile::tempdir().unwrap();
        let gate = StorageGate::new(StoreLocation::File(dir.path().to_path_buf()));

        let err = gate.initialize().await.unwrap_err();
        assert_matches!(err, CoreError::StorageInitFailed(_));
        assert_eq!(gate.state(), GateState::Failed);

        // 재호출해도 재시도 없이 같은 실패가 반환됨
        let err = gate.initialize().await.unwrap_err();
        assert_matches!(err, CoreError::StorageInitFailed(_));
        assert_matches!(gate.store(), Err(CoreError::StorageInitFailed(_)));
    }
}
