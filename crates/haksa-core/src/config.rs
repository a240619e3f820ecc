//! 애플리케이션 설정 구조체.
//!
//! 학교 정보와 로컬 저장소 경로 등 런타임 설정을 정의한다.
//! `config` crate를 통해 파일/환경변수(`HAKSA_*`)에서 로드.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 학교 정보
    #[serde(default)]
    pub school: SchoolConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

/// 학교 정보 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolConfig {
    /// 학교명 (보고서 머리글 등에 사용)
    #[serde(default)]
    pub name: String,
    /// 학년도 (예: "2026")
    #[serde(default)]
    pub academic_year: String,
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 데이터 디렉터리 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// DB 파일명
    #[serde(default = "default_db_filename")]
    pub db_filename: String,
}

fn default_db_filename() -> String {
    "haksa.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_filename: default_db_filename(),
        }
    }
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            school: SchoolConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// 설정 로드 — 파일(있으면) → 환경변수(`HAKSA_STORAGE__DB_FILENAME` 형식) 순으로 병합
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(config::Environment::with_prefix("HAKSA").separator("__"));

        let loaded = builder
            .build()
            .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))?;

        loaded
            .try_deserialize()
            .map_err(|e| CoreError::Config(format!("설정 역직렬화 실패: {e}")))
    }

    /// DB 파일 경로 결정 (data_dir 오버라이드 또는 플랫폼 기본 경로)
    pub fn database_path(&self) -> Result<PathBuf, CoreError> {
        if let Some(ref dir) = self.storage.data_dir {
            return Ok(dir.join(&self.storage.db_filename));
        }

        let dirs = ProjectDirs::from("", "", "haksa")
            .ok_or_else(|| CoreError::Config("플랫폼 데이터 디렉터리를 결정할 수 없음".to_string()))?;
        Ok(dirs.data_dir().join(&self.storage.db_filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_uses_data_dir_override() {
        let mut config = AppConfig::default_config();
        config.storage.data_dir = Some(PathBuf::from("/tmp/haksa-test"));

        let path = config.database_path().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/haksa-test/haksa.db"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("haksa.toml");
        std::fs::write(
            &config_path,
            "[school]\nname = \"한빛초등학교\"\nacademic_year = \"2026\"\n\n[storage]\ndb_filename = \"test.db\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.school.name, "한빛초등학교");
        assert_eq!(config.storage.db_filename, "test.db");
    }

    #[test]
    fn load_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/haksa.toml"))).unwrap();
        assert_eq!(config.storage.db_filename, "haksa.db");
    }
}
