// src/models/calendar.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Valor de `kind` quando a planilha não diz nada.
pub const DEFAULT_KIND: &str = "AULA_NORMAL";

// Uma linha da tabela 'calendar_days'. Exemplos de kind:
// "FERIADO", "FACULTATIVO", "SABADO_LETIVO", "RECESSO", "AULA_NORMAL"
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct CalendarDay {
    pub id: i64,
    pub day: NaiveDate,
    pub is_school_day: bool,
    pub kind: String,
    pub note: Option<String>,
}

// Um dia vindo de POST /calendar/import
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarDayIn {
    pub day: NaiveDate,
    pub is_school_day: bool,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

/// Intervalo opcional (inclusivo) para GET /calendar.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
