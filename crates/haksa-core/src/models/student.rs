//! 학생(학적) 모델.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 학생
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// 학번 (자연키, 예: "S-0412")
    pub admission_no: String,
    /// 성명
    pub name: String,
    /// 학급 (예: "3-2")
    pub class_level: String,
    /// 보호자 연락처 (v4 스키마에서 추가)
    pub guardian_phone: Option<String>,
    /// 입학일
    pub enrolled_at: Option<NaiveDate>,
}

impl Student {
    /// 새 학생 등록 정보 생성
    pub fn new(
        admission_no: impl Into<String>,
        name: impl Into<String>,
        class_level: impl Into<String>,
    ) -> Self {
        Self {
            admission_no: admission_no.into(),
            name: name.into(),
            class_level: class_level.into(),
            guardian_phone: None,
            enrolled_at: None,
        }
    }
}
