// src/models/timetable.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Estruturas que espelham as Tabelas da DB ---

#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct TimetableVersion {
    pub id: i64,
    pub code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub source: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimetableEntry {
    pub id: i64,
    pub timetable_version_id: i64,
    pub weekday: i64, // 0 = segunda ... 6 = domingo
    pub slot: String,
    pub group_code: String,          // bruto, como veio do CSV
    pub class_code: Option<String>,  // turma limpa, ex: 1.18.1I
    pub course_name: Option<String>, // derivado do class_code
    pub subject_code: String,
    pub subject_name: Option<String>,
    pub teacher_username: Option<String>,
    pub teacher_name: Option<String>,
    pub room_code: Option<String>,
    pub room_name: Option<String>,
}

// --- Payload de importação ---

/// Valor "solto" das planilhas: o mesmo campo pode chegar como número, texto,
/// booleano ou outra coisa qualquer. Nunca falha a desserialização; quem usa
/// decide se o valor serve.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LooseValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

impl LooseValue {
    pub fn to_text(&self) -> String {
        match self {
            LooseValue::Int(n) => n.to_string(),
            LooseValue::Float(f) => f.to_string(),
            LooseValue::Bool(b) => b.to_string(),
            LooseValue::Text(s) => s.clone(),
            LooseValue::Other(v) => v.to_string(),
        }
    }
}

impl From<&str> for LooseValue {
    fn from(text: &str) -> Self {
        LooseValue::Text(text.to_string())
    }
}

impl From<String> for LooseValue {
    fn from(text: String) -> Self {
        LooseValue::Text(text)
    }
}

/// Uma linha de POST /timetable/import. Tudo opcional e tolerante ao tipo:
/// linhas incompletas ou estranhas são saltadas pelo serviço, não rejeitam o lote.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimetableRow {
    #[serde(default)]
    pub timetable_code: Option<LooseValue>,
    #[serde(default)]
    pub weekday: Option<LooseValue>,
    #[serde(default)]
    pub slot: Option<LooseValue>,
    #[serde(default)]
    pub group_code: Option<LooseValue>,
    #[serde(default)]
    pub subject_code: Option<LooseValue>,
    #[serde(default)]
    pub subject_name: Option<LooseValue>,
    #[serde(default)]
    pub teacher_username: Option<LooseValue>,
    #[serde(default)]
    pub teacher_name: Option<LooseValue>,
    #[serde(default)]
    pub room_code: Option<LooseValue>,
    #[serde(default)]
    pub room: Option<LooseValue>,
}

/// Query string de POST /timetable/import. As datas só são obrigatórias
/// quando a versão ainda não existe.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportBounds {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub source: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ImportSummary {
    pub ok: bool,
    pub timetable_code: String,
    pub entries_inserted: usize,
    pub rows_skipped: usize,
}

// --- Consultas ---

/// Filtros de GET /timetable/{code}; todos combinam com AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimetableFilter {
    pub group: Option<String>,   // turma (class_code), igualdade
    pub course: Option<String>,  // curso, igualdade
    pub teacher: Option<String>, // professor, "contém" sem maiúsculas
    pub room: Option<String>,    // local, "contém" sem maiúsculas
    pub weekday: Option<String>, // 0..=6, validado depois do 404
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AppliedFilters {
    pub group: Option<String>,
    pub course: Option<String>,
    pub teacher: Option<String>,
    pub room: Option<String>,
    pub weekday: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub weekday: i64,
    pub slot: String,
    pub class_code: Option<String>,
    pub course_name: Option<String>,
    pub subject_name: Option<String>,
    pub teacher_name: Option<String>,
    pub room_name: Option<String>,
    pub group_code_raw: String,
}

impl From<TimetableEntry> for EntryView {
    fn from(e: TimetableEntry) -> Self {
        Self {
            weekday: e.weekday,
            slot: e.slot,
            class_code: e.class_code,
            course_name: e.course_name,
            subject_name: e.subject_name,
            teacher_name: e.teacher_name,
            room_name: e.room_name,
            group_code_raw: e.group_code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimetableView {
    pub timetable_code: String,
    pub filters: AppliedFilters,
    pub count: usize,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TimetableFilters {
    pub timetable_code: String,
    pub class_codes: Vec<String>,
    pub courses: Vec<String>,
    pub teachers: Vec<String>,
    pub rooms: Vec<String>,
    pub weekdays: Vec<u8>,
}
