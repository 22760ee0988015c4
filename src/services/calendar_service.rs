// src/services/calendar_service.rs
use crate::{
    error::AppResult,
    models::calendar::{CalendarDay, CalendarDayIn, CalendarRange},
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Importa dias do calendário. Dia já existente é atualizado no lugar
/// (mantém o id); dia novo é inserido. Um único commit para o lote todo.
pub async fn import_days(db_pool: &SqlitePool, days: &[CalendarDayIn]) -> AppResult<Vec<CalendarDay>> {
    tracing::info!("Importando {} dias do calendário...", days.len());

    let mut tx = db_pool.begin().await?;
    let mut stored = Vec::with_capacity(days.len());

    for item in days {
        let row = sqlx::query_as::<_, CalendarDay>(
            r#"
            INSERT INTO calendar_days (day, is_school_day, kind, note)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(day) DO UPDATE SET
                is_school_day = excluded.is_school_day,
                kind = excluded.kind,
                note = excluded.note
            RETURNING id, day, is_school_day, kind, note
            "#,
        )
        .bind(item.day)
        .bind(item.is_school_day)
        .bind(&item.kind)
        .bind(&item.note)
        .fetch_one(&mut *tx)
        .await?;

        stored.push(row);
    }

    tx.commit().await?;
    tracing::info!("✅ Calendário importado: {} dias gravados.", stored.len());
    Ok(stored)
}

/// Dias do calendário por ordem de data, opcionalmente limitados a [from, to].
pub async fn list_days(db_pool: &SqlitePool, range: &CalendarRange) -> AppResult<Vec<CalendarDay>> {
    tracing::debug!("Listando calendário (from={:?}, to={:?})", range.from, range.to);

    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, day, is_school_day, kind, note FROM calendar_days WHERE 1 = 1");
    if let Some(from) = range.from {
        query.push(" AND day >= ").push_bind(from);
    }
    if let Some(to) = range.to {
        query.push(" AND day <= ").push_bind(to);
    }
    query.push(" ORDER BY day ASC");

    let days = query.build_query_as::<CalendarDay>().fetch_all(db_pool).await?;
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(d: NaiveDate, is_school_day: bool, kind: &str) -> CalendarDayIn {
        CalendarDayIn { day: d, is_school_day, kind: kind.to_string(), note: None }
    }

    #[tokio::test]
    async fn reimport_updates_in_place() {
        let pool = test_pool().await;
        let first = import_days(&pool, &[day(date(2026, 4, 21), true, "AULA_NORMAL")])
            .await
            .unwrap();

        let mut holiday = day(date(2026, 4, 21), false, "FERIADO");
        holiday.note = Some("Tiradentes".into());
        let second = import_days(&pool, &[holiday]).await.unwrap();

        assert_eq!(first[0].id, second[0].id);
        let all = list_days(&pool, &CalendarRange::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_school_day);
        assert_eq!(all[0].kind, "FERIADO");
        assert_eq!(all[0].note.as_deref(), Some("Tiradentes"));
    }

    #[tokio::test]
    async fn list_is_sorted_and_range_filtered() {
        let pool = test_pool().await;
        import_days(
            &pool,
            &[
                day(date(2026, 3, 2), true, "AULA_NORMAL"),
                day(date(2026, 1, 1), false, "FERIADO"),
                day(date(2026, 2, 16), false, "RECESSO"),
            ],
        )
        .await
        .unwrap();

        let all = list_days(&pool, &CalendarRange::default()).await.unwrap();
        let dates: Vec<NaiveDate> = all.iter().map(|d| d.day).collect();
        assert_eq!(dates, vec![date(2026, 1, 1), date(2026, 2, 16), date(2026, 3, 2)]);

        let range = CalendarRange { from: Some(date(2026, 2, 1)), to: Some(date(2026, 2, 28)) };
        let february = list_days(&pool, &range).await.unwrap();
        assert_eq!(february.len(), 1);
        assert_eq!(february[0].kind, "RECESSO");
    }

    #[tokio::test]
    async fn empty_import_is_a_no_op() {
        let pool = test_pool().await;
        assert!(import_days(&pool, &[]).await.unwrap().is_empty());
    }
}
