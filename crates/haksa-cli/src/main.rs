//! # haksa-cli
//!
//! HAKSA 클라이언트 바이너리 진입점.
//! 설정을 로드하고 저장소 게이트를 초기화한다 — 게이트가 열리기 전에는
//! 어떤 화면/도구도 저장소를 읽거나 쓰지 않으며, 초기화 실패는
//! 부분 기동 없이 프로세스 종료로 이어진다 (fail-closed).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use haksa_core::config::AppConfig;
use haksa_storage::gate::{StorageGate, StoreLocation};
use haksa_storage::migration::TARGET_VERSION;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// HAKSA 학사 행정 클라이언트
///
/// 수당 계산, 출결, 학적, 급식비 관리
#[derive(Parser, Debug)]
#[command(name = "haksa")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 없음, 기본값 + 환경변수만 사용)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 데이터 저장 경로 (기본: 플랫폼 데이터 디렉터리)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 인메모리 저장소로 실행 (점검용, 종료 시 데이터 소멸)
    #[arg(long)]
    in_memory: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "haksa={},haksa_core={},haksa_storage={},haksa_cli={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("HAKSA 클라이언트 시작");

    // 설정 로드
    let mut config = AppConfig::load(args.config.as_deref())
        .map_err(|e| anyhow!("설정 로드 실패: {e}"))?;

    // CLI 인자로 설정 오버라이드
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = Some(data_dir);
    }

    // 저장소 위치 결정
    let location = if args.in_memory {
        StoreLocation::InMemory
    } else {
        let db_path = config
            .database_path()
            .map_err(|e| anyhow!("DB 경로 결정 실패: {e}"))?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| anyhow!("데이터 디렉터리 생성 실패 ({}): {e}", parent.display()))?;
        }
        info!("DB 경로: {}", db_path.display());
        StoreLocation::File(db_path)
    };

    // 게이트 초기화 — 마이그레이션 완료 전에는 어떤 저장소 접근도 허용되지 않음
    let gate = Arc::new(StorageGate::new(location));
    let storage = match gate.initialize().await {
        Ok(storage) => storage,
        Err(e) => {
            // 기동 단계 치명 에러 — 부분 기동 없이 종료
            error!("저장소 초기화 실패, 기동 중단: {e}");
            return Err(anyhow!("{e}"));
        }
    };

    let version = storage.schema_version().map_err(|e| anyhow!("{e}"))?;
    info!("스키마 버전: {version} (목표 {TARGET_VERSION})");

    if !storage.integrity_check().map_err(|e| anyhow!("{e}"))? {
        return Err(anyhow!("DB 무결성 점검 실패 — 파일 손상 의심"));
    }

    println!("HAKSA 저장소 준비 완료 (스키마 v{version})");
    for (table, count) in storage.table_counts().map_err(|e| anyhow!("{e}"))? {
        println!("  {table}: {count}행");
    }

    Ok(())
}
