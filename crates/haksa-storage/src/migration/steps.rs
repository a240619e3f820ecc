//! 마이그레이션 단계 테이블.
//!
//! 각 단계는 `from_version`(적용 대상 버전)으로 식별되며, 한 번 배포된 단계는
//! 수정하지 않는다 — 스키마 변경은 항상 새 버전 번호의 단계를 뒤에 추가한다.
//! 각 연산은 개별적으로 멱등(IF NOT EXISTS / OR IGNORE / pragma 가드)하게
//! 작성되어, 이전 실행이 DDL 커밋 후 버전 기록 전에 중단된 저장소에도
//! 안전하게 재적용된다.

use rusqlite::Connection;

/// 실행 중인 코드가 기대하는 스키마 버전
pub const TARGET_VERSION: u32 = 7;

/// 개별 스키마 연산 — 각각이 독립적으로 재시도 가능해야 한다
#[derive(Debug)]
pub(crate) enum SchemaOp {
    /// 자체 멱등 형태의 단일 SQL 문 (CREATE ... IF NOT EXISTS 등)
    Sql(&'static str),
    /// 컬럼이 없을 때만 ALTER TABLE ADD COLUMN 수행
    AddColumn {
        table: &'static str,
        column: &'static str,
        decl: &'static str,
    },
    /// 컬럼이 있을 때만 ALTER TABLE DROP COLUMN 수행
    /// (컨테이너 재구성만 하며 행 데이터는 삭제하지 않음)
    DropColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl SchemaOp {
    /// 연산 적용
    pub(crate) fn apply(&self, conn: &Connection) -> Result<(), rusqlite::Error> {
        match self {
            SchemaOp::Sql(sql) => conn.execute_batch(sql),
            SchemaOp::AddColumn { table, column, decl } => {
                if column_exists(conn, table, column)? {
                    return Ok(());
                }
                conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"))
            }
            SchemaOp::DropColumn { table, column } => {
                if !column_exists(conn, table, column)? {
                    return Ok(());
                }
                conn.execute_batch(&format!("ALTER TABLE {table} DROP COLUMN {column}"))
            }
        }
    }
}

/// 컬럼 존재 여부 확인 (ADD/DROP COLUMN 가드)
fn column_exists(
    conn: &Connection,
    table: &str,
    column: &str,
) -> Result<bool, rusqlite::Error> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        rusqlite::params![table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// 순방향 마이그레이션 단계 — `from_version` 버전의 저장소를 `from_version + 1`로 올린다
#[derive(Debug)]
pub(crate) struct MigrationStep {
    /// 적용 대상 버전 (이 버전의 저장소에만 실행됨)
    pub(crate) from_version: u32,
    /// 변경 내용 요약 (로그용)
    pub(crate) label: &'static str,
    /// 구조 변경 연산 목록
    pub(crate) ops: &'static [SchemaOp],
}

// ============================================================
// 기반 테이블 DDL — v1 단계와 기반 보장(ensure_baseline)이 공유
// ============================================================

pub(crate) const CREATE_TEACHERS: &str = "CREATE TABLE IF NOT EXISTS teachers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_no TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    rank TEXT NOT NULL DEFAULT 'Classroom',
    allowance_rate REAL NOT NULL DEFAULT 0.0,
    hired_at TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

pub(crate) const CREATE_STUDENTS: &str = "CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    admission_no TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    class_level TEXT NOT NULL,
    enrolled_at TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// 전체 마이그레이션 이력.
///
/// `from_version`은 고유하고 오름차순이며 빈틈이 없다 — 과거에 배포된 어떤
/// 버전의 저장소도 자기 버전에 해당하는 단계를 찾을 수 있다.
pub(crate) static STEPS: &[MigrationStep] = &[
    MigrationStep {
        from_version: 0,
        label: "교사/학생 명부 테이블",
        ops: &[
            SchemaOp::Sql(CREATE_TEACHERS),
            SchemaOp::Sql("CREATE INDEX IF NOT EXISTS idx_teachers_staff_no ON teachers(staff_no)"),
            SchemaOp::Sql(CREATE_STUDENTS),
            SchemaOp::Sql(
                "CREATE INDEX IF NOT EXISTS idx_students_admission_no ON students(admission_no)",
            ),
            SchemaOp::Sql(
                "CREATE INDEX IF NOT EXISTS idx_students_class_level ON students(class_level)",
            ),
        ],
    },
    MigrationStep {
        from_version: 1,
        label: "출결 테이블",
        ops: &[
            SchemaOp::Sql(
                "CREATE TABLE IF NOT EXISTS attendance (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    student_id INTEGER NOT NULL,
                    date TEXT NOT NULL,
                    status TEXT NOT NULL,
                    note TEXT,
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    UNIQUE (student_id, date),
                    FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE
                )",
            ),
            SchemaOp::Sql("CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date)"),
            SchemaOp::Sql(
                "CREATE INDEX IF NOT EXISTS idx_attendance_student ON attendance(student_id)",
            ),
        ],
    },
    MigrationStep {
        from_version: 2,
        label: "수당 계산 + 복지 지급 테이블",
        ops: &[
            SchemaOp::Sql(
                "CREATE TABLE IF NOT EXISTS allowance_calculations (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    teacher_id INTEGER NOT NULL,
                    period TEXT NOT NULL,
                    base_amount INTEGER NOT NULL,
                    daily_rate INTEGER NOT NULL DEFAULT 0,
                    days_present INTEGER NOT NULL DEFAULT 0,
                    total_amount INTEGER NOT NULL,
                    calculated_at TEXT NOT NULL DEFAULT (datetime('now')),
                    UNIQUE (teacher_id, period),
                    FOREIGN KEY (teacher_id) REFERENCES teachers(id) ON DELETE CASCADE
                )",
            ),
            SchemaOp::Sql(
                "CREATE INDEX IF NOT EXISTS idx_allowance_period ON allowance_calculations(period)",
            ),
            SchemaOp::Sql(
                "CREATE TABLE IF NOT EXISTS welfare_payments (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    payment_id TEXT NOT NULL UNIQUE,
                    teacher_id INTEGER NOT NULL,
                    period TEXT NOT NULL,
                    amount INTEGER NOT NULL,
                    paid_at TEXT,
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    FOREIGN KEY (teacher_id) REFERENCES teachers(id) ON DELETE CASCADE
                )",
            ),
            SchemaOp::Sql(
                "CREATE INDEX IF NOT EXISTS idx_welfare_teacher ON welfare_payments(teacher_id)",
            ),
        ],
    },
    MigrationStep {
        from_version: 3,
        label: "보호자 연락처 + 급여 계좌 컬럼",
        ops: &[
            SchemaOp::AddColumn {
                table: "students",
                column: "guardian_phone",
                decl: "TEXT",
            },
            SchemaOp::AddColumn {
                table: "teachers",
                column: "bank_account",
                decl: "TEXT",
            },
        ],
    },
    // v5는 배포 당시 구조 변경 없이 번호만 예약됨 — 간격 유지를 위해 빈 단계로 보존
    MigrationStep {
        from_version: 4,
        label: "예약 버전 (변경 없음)",
        ops: &[],
    },
    MigrationStep {
        from_version: 5,
        label: "급식비 단가 + 일일 납부 테이블",
        ops: &[
            SchemaOp::Sql(
                "CREATE TABLE IF NOT EXISTS meal_fee_structures (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    class_level TEXT NOT NULL UNIQUE,
                    daily_fee INTEGER NOT NULL,
                    effective_from TEXT NOT NULL,
                    created_at TEXT NOT NULL DEFAULT (datetime('now'))
                )",
            ),
            SchemaOp::Sql(
                "CREATE TABLE IF NOT EXISTS meal_daily_payments (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    student_id INTEGER NOT NULL,
                    date TEXT NOT NULL,
                    amount INTEGER NOT NULL,
                    collected_by TEXT,
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    UNIQUE (student_id, date),
                    FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE
                )",
            ),
            SchemaOp::Sql(
                "CREATE INDEX IF NOT EXISTS idx_meal_payments_date ON meal_daily_payments(date)",
            ),
        ],
    },
    MigrationStep {
        from_version: 6,
        label: "수당 단가 컬럼 제거 (allowance_calculations로 이관) + 복합 인덱스",
        ops: &[
            SchemaOp::DropColumn {
                table: "teachers",
                column: "allowance_rate",
            },
            SchemaOp::Sql(
                "CREATE INDEX IF NOT EXISTS idx_attendance_student_date
                    ON attendance(student_id, date)",
            ),
            SchemaOp::Sql(
                "CREATE INDEX IF NOT EXISTS idx_meal_payments_student_date
                    ON meal_daily_payments(student_id, date)",
            ),
        ],
    },
];
