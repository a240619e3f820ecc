//! 명부 저장소 (RegistryStorage 포트 구현).
//!
//! 교사/학생 등록, 조회, 목록.

use async_trait::async_trait;
use haksa_core::error::CoreError;
use haksa_core::models::staff::Teacher;
use haksa_core::models::student::Student;
use haksa_core::ports::storage::RegistryStorage;
use rusqlite::OptionalExtension;
use tracing::debug;

use super::SqliteStorage;

/// 교사 행의 원시 컬럼 값
type TeacherRow = (String, String, String, Option<String>, Option<String>);
/// 학생 행의 원시 컬럼 값
type StudentRow = (String, String, String, Option<String>, Option<String>);

impl SqliteStorage {
    fn teacher_from_row(row: TeacherRow) -> Result<Teacher, CoreError> {
        let (staff_no, name, rank, bank_account, hired_at) = row;
        Ok(Teacher {
            staff_no,
            name,
            rank: Self::parse_rank(&rank),
            bank_account,
            hired_at: hired_at.as_deref().map(Self::parse_date).transpose()?,
        })
    }

    fn student_from_row(row: StudentRow) -> Result<Student, CoreError> {
        let (admission_no, name, class_level, guardian_phone, enrolled_at) = row;
        Ok(Student {
            admission_no,
            name,
            class_level,
            guardian_phone,
            enrolled_at: enrolled_at.as_deref().map(Self::parse_date).transpose()?,
        })
    }

    /// 교직원 번호 → 행 id (미등록이면 NotFound)
    pub(super) fn teacher_row_id(
        conn: &rusqlite::Connection,
        staff_no: &str,
    ) -> Result<i64, CoreError> {
        conn.query_row(
            "SELECT id FROM teachers WHERE staff_no = ?1",
            [staff_no],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| CoreError::Internal(format!("교사 조회 실패: {e}")))?
        .ok_or_else(|| CoreError::NotFound {
            resource_type: "Teacher".to_string(),
            id: staff_no.to_string(),
        })
    }

    /// 학번 → 행 id (미등록이면 NotFound)
    pub(super) fn student_row_id(
        conn: &rusqlite::Connection,
        admission_no: &str,
    ) -> Result<i64, CoreError> {
        conn.query_row(
            "SELECT id FROM students WHERE admission_no = ?1",
            [admission_no],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| CoreError::Internal(format!("학생 조회 실패: {e}")))?
        .ok_or_else(|| CoreError::NotFound {
            resource_type: "Student".to_string(),
            id: admission_no.to_string(),
        })
    }
}

#[async_trait]
impl RegistryStorage for SqliteStorage {
    async fn save_teacher(&self, teacher: &Teacher) -> Result<i64, CoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO teachers (staff_no, name, rank, bank_account, hired_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(staff_no) DO UPDATE SET
                 name = excluded.name,
                 rank = excluded.rank,
                 bank_account = excluded.bank_account,
                 hired_at = excluded.hired_at",
            rusqlite::params![
                teacher.staff_no,
                teacher.name,
                Self::rank_to_db(teacher.rank),
                teacher.bank_account,
                teacher.hired_at.map(|d| d.to_string()),
            ],
        )
        .map_err(|e| CoreError::Internal(format!("교사 저장 실패: {e}")))?;

        debug!("교사 저장: {}", teacher.staff_no);
        Self::teacher_row_id(&conn, &teacher.staff_no)
    }

    async fn get_teacher(&self, staff_no: &str) -> Result<Option<Teacher>, CoreError> {
        let conn = self.lock()?;

        let row: Option<TeacherRow> = conn
            .query_row(
                "SELECT staff_no, name, rank, bank_account, hired_at
                 FROM teachers WHERE staff_no = ?1",
                [staff_no],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| CoreError::Internal(format!("교사 조회 실패: {e}")))?;

        row.map(Self::teacher_from_row).transpose()
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT staff_no, name, rank, bank_account, hired_at
                 FROM teachers ORDER BY staff_no",
            )
            .map_err(|e| CoreError::Internal(format!("쿼리 준비 실패: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })
            .map_err(|e| CoreError::Internal(format!("쿼리 실행 실패: {e}")))?;

        let mut teachers = Vec::new();
        for row in rows {
            let row = row.map_err(|e| CoreError::Internal(format!("행 읽기 실패: {e}")))?;
            teachers.push(Self::teacher_from_row(row)?);
        }
        Ok(teachers)
    }

    async fn save_student(&self, student: &Student) -> Result<i64, CoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO students (admission_no, name, class_level, guardian_phone, enrolled_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(admission_no) DO UPDATE SET
                 name = excluded.name,
                 class_level = excluded.class_level,
                 guardian_phone = excluded.guardian_phone,
                 enrolled_at = excluded.enrolled_at",
            rusqlite::params![
                student.admission_no,
                student.name,
                student.class_level,
                student.guardian_phone,
                student.enrolled_at.map(|d| d.to_string()),
            ],
        )
        .map_err(|e| CoreError::Internal(format!("학생 저장 실패: {e}")))?;

        debug!("학생 저장: {}", student.admission_no);
        Self::student_row_id(&conn, &student.admission_no)
    }

    async fn get_student(&self, admission_no: &str) -> Result<Option<Student>, CoreError> {
        let conn = self.lock()?;

        let row: Option<StudentRow> = conn
            .query_row(
                "SELECT admission_no, name, class_level, guardian_phone, enrolled_at
                 FROM students WHERE admission_no = ?1",
                [admission_no],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| CoreError::Internal(format!("학생 조회 실패: {e}")))?;

        row.map(Self::student_from_row).transpose()
    }

    async fn list_students(&self, class_level: Option<&str>) -> Result<Vec<Student>, CoreError> {
        let conn = self.lock()?;

        // 학급 필터는 선택 — NULL이면 전체 목록
        let mut stmt = conn
            .prepare(
                "SELECT admission_no, name, class_level, guardian_phone, enrolled_at
                 FROM students
                 WHERE ?1 IS NULL OR class_level = ?1
                 ORDER BY admission_no",
            )
            .map_err(|e| CoreError::Internal(format!("쿼리 준비 실패: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![class_level], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })
            .map_err(|e| CoreError::Internal(format!("쿼리 실행 실패: {e}")))?;

        let mut students = Vec::new();
        for row in rows {
            let row = row.map_err(|e| CoreError::Internal(format!("행 읽기 실패: {e}")))?;
            students.push(Self::student_from_row(row)?);
        }
        Ok(students)
    }
}
