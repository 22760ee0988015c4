// src/services/timetable_service.rs
use crate::{
    error::{AppError, AppResult},
    models::timetable::{
        AppliedFilters, EntryView, ImportBounds, ImportSummary, LooseValue, TimetableEntry,
        TimetableFilter, TimetableFilters, TimetableRow, TimetableVersion, TimetableView,
    },
    services::normalizer::{
        course_from_class_code, extract_class_code, normalize_slot, parse_weekday, slugify,
    },
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Domínio fixo de dias devolvido em /filters (0 = segunda).
pub const WEEKDAYS: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];

// 12 colunas por linha; mantém cada INSERT bem abaixo do limite de parâmetros do SQLite
const INSERT_CHUNK: usize = 500;

/// Entrada pronta a gravar (já normalizada), ainda sem versão.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub weekday: i64,
    pub slot: String,
    pub group_code: String,
    pub class_code: Option<String>,
    pub course_name: Option<String>,
    pub subject_code: String,
    pub subject_name: Option<String>,
    pub teacher_username: Option<String>,
    pub teacher_name: Option<String>,
    pub room_code: Option<String>,
    pub room_name: Option<String>,
}

// --- VERSÕES ---

pub async fn find_version(db_pool: &SqlitePool, code: &str) -> AppResult<Option<TimetableVersion>> {
    let version = sqlx::query_as::<_, TimetableVersion>(
        "SELECT id, code, start_date, end_date, source, note FROM timetable_versions WHERE code = ?1",
    )
    .bind(code)
    .fetch_optional(db_pool)
    .await?;
    Ok(version)
}

/// Como `find_version`, mas código desconhecido é 404.
pub async fn require_version(db_pool: &SqlitePool, code: &str) -> AppResult<TimetableVersion> {
    find_version(db_pool, code).await?.ok_or_else(|| {
        tracing::debug!("Versão de horário '{}' não existe.", code);
        AppError::NotFound("timetable not found".into())
    })
}

/// Todas as versões, a mais recente (maior id) primeiro.
pub async fn list_versions(db_pool: &SqlitePool) -> AppResult<Vec<TimetableVersion>> {
    let versions = sqlx::query_as::<_, TimetableVersion>(
        "SELECT id, code, start_date, end_date, source, note FROM timetable_versions ORDER BY id DESC",
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontradas {} versões de horário.", versions.len());
    Ok(versions)
}

// --- IMPORTAÇÃO ---

/// Substitui TODAS as entradas da versão indicada na primeira linha.
///
/// Versão nova precisa de `start_date`/`end_date` explícitos; versão existente
/// só tem as datas atualizadas se vierem. Linhas sem weekday/slot/group_code
/// são saltadas e contadas em `rows_skipped`. Tudo corre numa transação, por
/// isso ninguém lê a versão vazia a meio da troca.
pub async fn import_timetable(
    db_pool: &SqlitePool,
    rows: &[TimetableRow],
    bounds: &ImportBounds,
) -> AppResult<ImportSummary> {
    let first = rows
        .first()
        .ok_or_else(|| AppError::Validation("empty payload".into()))?;
    let code = loose_text(&first.timetable_code)
        .ok_or_else(|| AppError::Validation("timetable_code missing".into()))?;

    tracing::info!("Importando horário '{}' ({} linhas)...", code, rows.len());

    // Datas validadas antes de abrir a transação
    let dates = match (bounds.start_date, bounds.end_date) {
        (Some(start), Some(end)) if start > end => {
            return Err(AppError::Validation("start_date must not be after end_date".into()));
        }
        (Some(start), Some(end)) => Some((start, end)),
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "start_date and end_date must be given together".into(),
            ))
        }
    };

    let mut tx = db_pool.begin().await?;

    // 1. Versão. A primeira instrução da transação é sempre uma escrita: o lock
    // de escrita é pedido logo (sujeito ao busy_timeout), nunca promovido a partir
    // de uma leitura.
    let version_id: i64 = match dates {
        Some((start, end)) => {
            sqlx::query_scalar(
                r#"
                INSERT INTO timetable_versions (code, start_date, end_date, source, note)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(code) DO UPDATE SET
                    start_date = excluded.start_date,
                    end_date = excluded.end_date,
                    source = COALESCE(excluded.source, timetable_versions.source),
                    note = COALESCE(excluded.note, timetable_versions.note)
                RETURNING id
                "#,
            )
            .bind(&code)
            .bind(start)
            .bind(end)
            .bind(&bounds.source)
            .bind(&bounds.note)
            .fetch_one(&mut *tx)
            .await?
        }
        None => {
            // UPDATE sem efeito: só serve para abrir a transação como escritora
            let existing: Option<i64> = sqlx::query_scalar(
                "UPDATE timetable_versions SET code = code WHERE code = ?1 RETURNING id",
            )
            .bind(&code)
            .fetch_optional(&mut *tx)
            .await?;
            existing.ok_or_else(|| {
                tracing::warn!("Versão '{}' não existe e não vieram datas para a criar.", code);
                AppError::Validation(format!(
                    "timetable '{}' does not exist yet: start_date and end_date are required",
                    code
                ))
            })?
        }
    };

    // 2. Substituição total: apaga o que havia desta versão
    let removed = sqlx::query("DELETE FROM timetable_entries WHERE timetable_version_id = ?1")
        .bind(version_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tracing::debug!("Removidas {} entradas antigas de '{}'.", removed, code);

    // 3. Normaliza linha a linha; as inválidas ficam de fora
    let entries: Vec<NewEntry> = rows.iter().filter_map(prepare_entry).collect();
    let rows_skipped = rows.len() - entries.len();
    if rows_skipped > 0 {
        tracing::warn!("{} linhas saltadas (weekday/slot/group_code em falta).", rows_skipped);
    }

    // 4. Inserção em bloco
    for chunk in entries.chunks(INSERT_CHUNK) {
        let mut insert: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO timetable_entries (timetable_version_id, weekday, slot, group_code, \
             class_code, course_name, subject_code, subject_name, teacher_username, \
             teacher_name, room_code, room_name) ",
        );
        insert.push_values(chunk, |mut b, e| {
            b.push_bind(version_id)
                .push_bind(e.weekday)
                .push_bind(&e.slot)
                .push_bind(&e.group_code)
                .push_bind(&e.class_code)
                .push_bind(&e.course_name)
                .push_bind(&e.subject_code)
                .push_bind(&e.subject_name)
                .push_bind(&e.teacher_username)
                .push_bind(&e.teacher_name)
                .push_bind(&e.room_code)
                .push_bind(&e.room_name);
        });
        insert.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    tracing::info!("✅ Horário '{}' importado: {} entradas.", code, entries.len());
    Ok(ImportSummary {
        ok: true,
        timetable_code: code,
        entries_inserted: entries.len(),
        rows_skipped,
    })
}

/// Normaliza uma linha da planilha. `None` quando falta weekday, slot ou group_code.
pub fn prepare_entry(row: &TimetableRow) -> Option<NewEntry> {
    let weekday = row.weekday.as_ref().and_then(resolve_weekday)?;
    let slot = row
        .slot
        .as_ref()
        .map(|s| normalize_slot(&s.to_text()))
        .filter(|s| !s.is_empty())?;
    let group_code = row
        .group_code
        .as_ref()
        .map(LooseValue::to_text)
        .filter(|g| !g.trim().is_empty())?;

    let class_code = extract_class_code(&group_code);
    let course_name = class_code
        .as_deref()
        .and_then(course_from_class_code)
        .map(str::to_string);

    let subject_name = loose_text(&row.subject_name);
    let teacher_name = loose_text(&row.teacher_name);
    let room_name = loose_text(&row.room);

    // Códigos: usa o que veio; senão, slug do nome correspondente
    let subject_code = loose_text(&row.subject_code)
        .unwrap_or_else(|| slugify(subject_name.as_deref().unwrap_or_default()));
    let teacher_username = loose_text(&row.teacher_username)
        .or_else(|| teacher_name.as_deref().map(slugify));
    let room_code = loose_text(&row.room_code).or_else(|| room_name.as_deref().map(slugify));

    Some(NewEntry {
        weekday,
        slot,
        group_code,
        class_code,
        course_name,
        subject_code,
        subject_name,
        teacher_username,
        teacher_name,
        room_code,
        room_name,
    })
}

// Número 0..=6, texto numérico, ou nome do dia ("Quarta-feira"). Resto: None.
fn resolve_weekday(value: &LooseValue) -> Option<i64> {
    let n = match value {
        LooseValue::Int(n) => *n,
        LooseValue::Float(f) if f.fract() == 0.0 => *f as i64,
        LooseValue::Text(s) => match s.trim().parse::<i64>() {
            Ok(n) => n,
            Err(_) => return parse_weekday(s).map(i64::from),
        },
        LooseValue::Float(_) | LooseValue::Bool(_) | LooseValue::Other(_) => return None,
    };
    (0..=6).contains(&n).then_some(n)
}

// Texto com trim, None se vazio. Números viram texto ("101")
fn loose_text(value: &Option<LooseValue>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.to_text().trim().to_string())
        .filter(|v| !v.is_empty())
}

// --- CONSULTAS ---

/// Valores distintos (trim, não vazios, ordenados) para montar os filtros do frontend.
pub async fn get_filters(db_pool: &SqlitePool, code: &str) -> AppResult<TimetableFilters> {
    let version = require_version(db_pool, code).await?;

    Ok(TimetableFilters {
        class_codes: distinct_values(db_pool, version.id, "class_code").await?,
        courses: distinct_values(db_pool, version.id, "course_name").await?,
        teachers: distinct_values(db_pool, version.id, "teacher_name").await?,
        rooms: distinct_values(db_pool, version.id, "room_name").await?,
        weekdays: WEEKDAYS.to_vec(),
        timetable_code: version.code,
    })
}

// `column` vem sempre de uma constante acima, nunca do pedido
async fn distinct_values(db_pool: &SqlitePool, version_id: i64, column: &str) -> AppResult<Vec<String>> {
    let sql = format!(
        "SELECT DISTINCT TRIM({col}) AS v FROM timetable_entries \
         WHERE timetable_version_id = ?1 AND {col} IS NOT NULL AND TRIM({col}) <> '' \
         ORDER BY v ASC",
        col = column
    );
    let values = sqlx::query_scalar::<_, String>(&sql)
        .bind(version_id)
        .fetch_all(db_pool)
        .await?;
    Ok(values)
}

/// Horário de uma versão com filtros combináveis (AND), ordenado por dia, horário e turma.
pub async fn get_timetable(
    db_pool: &SqlitePool,
    code: &str,
    filter: &TimetableFilter,
) -> AppResult<TimetableView> {
    // 404 primeiro, independentemente dos filtros
    let version = require_version(db_pool, code).await?;

    let weekday = parse_weekday_filter(filter.weekday.as_deref())?;

    let applied = AppliedFilters {
        group: present(&filter.group).map(|g| g.to_uppercase()),
        course: present(&filter.course),
        teacher: present(&filter.teacher),
        room: present(&filter.room),
        weekday,
    };
    tracing::debug!("Consulta ao horário '{}' com filtros {:?}", code, applied);

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, timetable_version_id, weekday, slot, group_code, class_code, course_name, \
         subject_code, subject_name, teacher_username, teacher_name, room_code, room_name \
         FROM timetable_entries WHERE timetable_version_id = ",
    );
    query.push_bind(version.id);
    if let Some(group) = &applied.group {
        query.push(" AND class_code = ").push_bind(group.clone());
    }
    if let Some(course) = &applied.course {
        query.push(" AND course_name = ").push_bind(course.clone());
    }
    if let Some(weekday) = applied.weekday {
        query.push(" AND weekday = ").push_bind(weekday);
    }
    query.push(" ORDER BY weekday ASC, slot ASC, class_code ASC");

    let mut entries = query
        .build_query_as::<TimetableEntry>()
        .fetch_all(db_pool)
        .await?;

    // "Contém" sem distinguir maiúsculas; feito aqui porque o LIKE do SQLite só dobra ASCII
    if let Some(teacher) = &applied.teacher {
        let needle = teacher.to_lowercase();
        entries.retain(|e| contains_folded(&e.teacher_name, &needle));
    }
    if let Some(room) = &applied.room {
        let needle = room.to_lowercase();
        entries.retain(|e| contains_folded(&e.room_name, &needle));
    }

    Ok(TimetableView {
        timetable_code: version.code,
        filters: applied,
        count: entries.len(),
        entries: entries.into_iter().map(EntryView::from).collect(),
    })
}

// Vazio conta como ausente; qualquer outra coisa tem de ser um inteiro 0..=6
fn parse_weekday_filter(raw: Option<&str>) -> AppResult<Option<i64>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(n) if (0..=6).contains(&n) => Ok(Some(n)),
        _ => Err(AppError::Validation("weekday must be an integer between 0 and 6".into())),
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn contains_folded(haystack: &Option<String>, needle_lower: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|h| h.to_lowercase().contains(needle_lower))
}
