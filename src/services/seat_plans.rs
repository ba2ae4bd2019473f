//! Хранилище схем залов и сценариев (PostgreSQL).
//!
//! Схема зала читается тремя запросами (секции, ряды, места) и
//! собирается в памяти. Сценарий хранит схему и цены JSON-документами.

use sqlx::{types::Json, FromRow, PgPool};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::models::{
    PricePoint, Row, Scenario, ScenarioDraft, ScenarioSummary, Seat, SeatPlan, SeatStatus, Section,
    Theater,
};

#[derive(Debug, Clone, FromRow)]
pub struct SectionRecord {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub category_key: Option<i64>,
    pub color: Option<String>,
    pub parent_section: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RowRecord {
    pub id: i64,
    pub section_id: i64,
    pub label: String,
    pub display_label: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SeatRecord {
    pub id: i64,
    pub row_id: i64,
    pub seat_number: String,
    pub display_number: Option<String>,
    pub price: Option<f64>,
    pub status: Option<String>,
    pub accessible: Option<bool>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Сценарий как он лежит в базе: документа схемы может не быть.
#[derive(Debug, Clone, FromRow)]
pub struct StoredScenario {
    pub id: i64,
    pub production_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub theater_id: i64,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    pub seatmap: Option<Json<SeatPlan>>,
    pub pricing: Option<Json<Vec<PricePoint>>>,
}

impl StoredScenario {
    /// Собрать сценарий; `fallback` подставляется, если схема не сохранена.
    pub fn into_scenario(self, fallback: impl FnOnce() -> Option<SeatPlan>) -> Option<Scenario> {
        let seatmap = match self.seatmap {
            Some(Json(plan)) => plan,
            None => fallback()?,
        };
        Some(Scenario {
            id: self.id,
            production_id: self.production_id,
            name: self.name,
            description: self.description,
            theater_id: self.theater_id,
            seatmap,
            pricing: self.pricing.map(|Json(p)| p).unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Результат обновления сценария с проверкой версии.
#[derive(Debug)]
pub enum ScenarioUpdate {
    Updated(Scenario),
    NotFound,
    /// Сценарий изменился после чтения
    Conflict,
}

impl ScenarioUpdate {
    /// Итог, когда UPDATE не затронул ни одной строки.
    fn missing(guarded: bool, exists: bool) -> Self {
        if guarded && exists {
            ScenarioUpdate::Conflict
        } else {
            ScenarioUpdate::NotFound
        }
    }
}

#[derive(Debug, FromRow)]
struct ScenarioHeader {
    id: i64,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

/// Собирает дерево секция → ряд → место из плоских записей.
/// Записи, у которых нет родителя в наборе, отбрасываются.
pub fn assemble_seat_plan(
    theater: Theater,
    sections: Vec<SectionRecord>,
    rows: Vec<RowRecord>,
    seats: Vec<SeatRecord>,
) -> SeatPlan {
    let mut seats_by_row: HashMap<i64, Vec<Seat>> = HashMap::new();
    for record in seats {
        let status: Option<SeatStatus> = record.status.as_deref().and_then(|s| match s.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                warn!("Seat {} has unknown status {:?}", record.id, s);
                None
            }
        });
        seats_by_row.entry(record.row_id).or_default().push(Seat {
            id: record.id,
            seat_number: record.seat_number,
            display_number: record.display_number,
            price: record.price,
            status,
            accessible: record.accessible,
            x: record.x,
            y: record.y,
            attributes: None,
        });
    }

    let mut rows_by_section: HashMap<i64, Vec<Row>> = HashMap::new();
    for record in rows {
        rows_by_section.entry(record.section_id).or_default().push(Row {
            id: record.id,
            label: record.label,
            display_label: record.display_label,
            section_id: record.section_id,
            seats: seats_by_row.remove(&record.id).unwrap_or_default(),
        });
    }

    let sections = sections
        .into_iter()
        .map(|record| Section {
            rows: rows_by_section.remove(&record.id).unwrap_or_default(),
            id: record.id,
            name: record.name,
            label: record.label,
            category_key: record.category_key,
            color: record.color,
            parent_section: record.parent_section,
        })
        .collect();

    SeatPlan { theater, sections }
}

#[derive(Clone)]
pub struct SeatPlanRepository {
    pool: PgPool,
}

impl SeatPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_theaters(&self) -> Result<Vec<Theater>, sqlx::Error> {
        sqlx::query_as::<_, Theater>("SELECT id, name, venue_slug FROM theaters ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    /// Сырая (ненормализованная) схема зала.
    pub async fn get_seat_plan(&self, theater_id: i64) -> Result<Option<SeatPlan>, sqlx::Error> {
        let theater = sqlx::query_as::<_, Theater>(
            "SELECT id, name, venue_slug FROM theaters WHERE id = $1"
        )
        .bind(theater_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(theater) = theater else {
            return Ok(None);
        };

        let sections = sqlx::query_as::<_, SectionRecord>(
            "SELECT id, name, label, category_key, color, parent_section
             FROM theater_sections
             WHERE theater_id = $1
             ORDER BY name"
        )
        .bind(theater_id)
        .fetch_all(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, RowRecord>(
            "SELECT r.id, r.section_id, r.label, r.display_label
             FROM theater_rows r
             JOIN theater_sections s ON s.id = r.section_id
             WHERE s.theater_id = $1
             ORDER BY r.label"
        )
        .bind(theater_id)
        .fetch_all(&self.pool)
        .await?;

        let seats = sqlx::query_as::<_, SeatRecord>(
            "SELECT st.id, st.row_id, st.seat_number, st.display_number, st.price,
                    st.status, st.accessible, st.x, st.y
             FROM theater_seats st
             JOIN theater_rows r ON r.id = st.row_id
             JOIN theater_sections s ON s.id = r.section_id
             WHERE s.theater_id = $1
             ORDER BY st.seat_number"
        )
        .bind(theater_id)
        .fetch_all(&self.pool)
        .await?;

        info!(
            "Loaded seat plan for theater {}: {} sections, {} rows, {} seats",
            theater_id, sections.len(), rows.len(), seats.len()
        );
        Ok(Some(assemble_seat_plan(theater, sections, rows, seats)))
    }

    pub async fn list_scenarios(&self, production_id: i64) -> Result<Vec<ScenarioSummary>, sqlx::Error> {
        sqlx::query_as::<_, ScenarioSummary>(
            "SELECT sc.id, sc.name, sc.description, sc.theater_id, t.name AS theater_name, sc.updated_at
             FROM scenarios sc
             LEFT JOIN theaters t ON t.id = sc.theater_id
             WHERE sc.production_id = $1
             ORDER BY sc.updated_at DESC"
        )
        .bind(production_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_scenario(&self, scenario_id: i64) -> Result<Option<StoredScenario>, sqlx::Error> {
        sqlx::query_as::<_, StoredScenario>(
            "SELECT sc.id, sc.production_id, sc.name, sc.description, sc.theater_id,
                    sc.created_at, sc.updated_at, sm.seatmap, sp.pricing
             FROM scenarios sc
             LEFT JOIN scenario_seatmaps sm ON sm.scenario_id = sc.id
             LEFT JOIN scenario_seatmap_pricing sp ON sp.scenario_seatmap_id = sm.id
             WHERE sc.id = $1
             ORDER BY sm.id DESC
             LIMIT 1"
        )
        .bind(scenario_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Создать сценарий вместе со схемой и ценами в одной транзакции.
    pub async fn save_scenario(&self, draft: ScenarioDraft) -> Result<Scenario, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let header = sqlx::query_as::<_, ScenarioHeader>(
            "INSERT INTO scenarios (production_id, name, description, theater_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, created_at, updated_at"
        )
        .bind(draft.production_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.theater_id)
        .fetch_one(&mut *tx)
        .await?;

        let seatmap_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO scenario_seatmaps (scenario_id, seatmap) VALUES ($1, $2) RETURNING id"
        )
        .bind(header.id)
        .bind(Json(&draft.seatmap))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO scenario_seatmap_pricing (scenario_seatmap_id, pricing) VALUES ($1, $2)")
            .bind(seatmap_id)
            .bind(Json(&draft.pricing))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Scenario {} created for production {}", header.id, draft.production_id);

        Ok(Scenario {
            id: header.id,
            production_id: draft.production_id,
            name: draft.name,
            description: draft.description,
            theater_id: draft.theater_id,
            seatmap: draft.seatmap,
            pricing: draft.pricing,
            created_at: header.created_at,
            updated_at: header.updated_at,
        })
    }

    /// Обновить сценарий; `None`, если такого сценария нет.
    pub async fn update_scenario(&self, scenario_id: i64, draft: ScenarioDraft) -> Result<Option<Scenario>, sqlx::Error> {
        match self.write_scenario(scenario_id, draft, None).await? {
            ScenarioUpdate::Updated(scenario) => Ok(Some(scenario)),
            ScenarioUpdate::NotFound | ScenarioUpdate::Conflict => Ok(None),
        }
    }

    /// Обновить сценарий, только если он не менялся с момента чтения.
    ///
    /// `expected_updated_at` - значение `updated_at`, с которым сценарий
    /// был прочитан. Параллельный запрос ждет блокировку строки и затем
    /// видит новую версию, поэтому второй писатель получает `Conflict`.
    pub async fn update_scenario_if_unchanged(
        &self,
        scenario_id: i64,
        draft: ScenarioDraft,
        expected_updated_at: chrono::NaiveDateTime,
    ) -> Result<ScenarioUpdate, sqlx::Error> {
        self.write_scenario(scenario_id, draft, Some(expected_updated_at)).await
    }

    async fn write_scenario(
        &self,
        scenario_id: i64,
        draft: ScenarioDraft,
        expected_updated_at: Option<chrono::NaiveDateTime>,
    ) -> Result<ScenarioUpdate, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let header = sqlx::query_as::<_, ScenarioHeader>(
            "UPDATE scenarios
             SET production_id = $2, name = $3, description = $4, theater_id = $5, updated_at = NOW()
             WHERE id = $1 AND ($6::timestamp IS NULL OR updated_at = $6)
             RETURNING id, created_at, updated_at"
        )
        .bind(scenario_id)
        .bind(draft.production_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.theater_id)
        .bind(expected_updated_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(header) = header else {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM scenarios WHERE id = $1)"
            )
            .bind(scenario_id)
            .fetch_one(&mut *tx)
            .await?;
            tx.rollback().await?;

            let outcome = ScenarioUpdate::missing(expected_updated_at.is_some(), exists);
            if matches!(outcome, ScenarioUpdate::Conflict) {
                warn!("Scenario {} changed since it was read, update rejected", scenario_id);
            }
            return Ok(outcome);
        };

        let existing = sqlx::query_scalar::<_, i64>(
            "UPDATE scenario_seatmaps SET seatmap = $2, updated_at = NOW()
             WHERE scenario_id = $1
             RETURNING id"
        )
        .bind(scenario_id)
        .bind(Json(&draft.seatmap))
        .fetch_optional(&mut *tx)
        .await?;

        let seatmap_id = match existing {
            Some(id) => id,
            None => {
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO scenario_seatmaps (scenario_id, seatmap) VALUES ($1, $2) RETURNING id"
                )
                .bind(scenario_id)
                .bind(Json(&draft.seatmap))
                .fetch_one(&mut *tx)
                .await?
            }
        };

        let updated = sqlx::query(
            "UPDATE scenario_seatmap_pricing SET pricing = $2, updated_at = NOW()
             WHERE scenario_seatmap_id = $1"
        )
        .bind(seatmap_id)
        .bind(Json(&draft.pricing))
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            sqlx::query("INSERT INTO scenario_seatmap_pricing (scenario_seatmap_id, pricing) VALUES ($1, $2)")
                .bind(seatmap_id)
                .bind(Json(&draft.pricing))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Scenario {} updated", scenario_id);

        Ok(ScenarioUpdate::Updated(Scenario {
            id: header.id,
            production_id: draft.production_id,
            name: draft.name,
            description: draft.description,
            theater_id: draft.theater_id,
            seatmap: draft.seatmap,
            pricing: draft.pricing,
            created_at: header.created_at,
            updated_at: header.updated_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theater() -> Theater {
        Theater { id: 7, name: "Lyric Theatre".into(), venue_slug: Some("lyric".into()) }
    }

    fn section(id: i64, name: &str, parent: Option<&str>) -> SectionRecord {
        SectionRecord {
            id,
            name: name.into(),
            label: name.into(),
            category_key: None,
            color: None,
            parent_section: parent.map(str::to_string),
        }
    }

    fn seat(id: i64, row_id: i64, status: Option<&str>) -> SeatRecord {
        SeatRecord {
            id,
            row_id,
            seat_number: id.to_string(),
            display_number: None,
            price: None,
            status: status.map(str::to_string),
            accessible: Some(false),
            x: Some(id as f64),
            y: Some(0.0),
        }
    }

    #[test]
    fn assembles_nested_plan() {
        let plan = assemble_seat_plan(
            theater(),
            vec![section(1, "MEZZANINE LEFT", Some("MEZZANINE")), section(2, "ORCHESTRA", None)],
            vec![
                RowRecord { id: 10, section_id: 1, label: "A".into(), display_label: None },
                RowRecord { id: 20, section_id: 2, label: "A".into(), display_label: None },
                RowRecord { id: 21, section_id: 2, label: "B".into(), display_label: Some("BB".into()) },
            ],
            vec![seat(100, 10, Some("available")), seat(200, 20, None), seat(201, 21, Some("sold")), seat(999, 77, None)],
        );

        assert_eq!(plan.sections.len(), 2);
        assert_eq!(plan.sections[1].rows.len(), 2);
        // место без ряда отброшено
        assert_eq!(plan.seat_count(), 3);
        assert_eq!(plan.sections[0].rows[0].seats[0].status, Some(SeatStatus::Available));
        // неизвестный статус не ломает загрузку
        assert_eq!(plan.sections[1].rows[1].seats[0].status, None);
    }

    #[test]
    fn untouched_row_is_conflict_only_when_guarded_and_present() {
        assert!(matches!(ScenarioUpdate::missing(true, true), ScenarioUpdate::Conflict));
        assert!(matches!(ScenarioUpdate::missing(true, false), ScenarioUpdate::NotFound));
        // без проверки версии пропажа строки всегда означает "нет сценария"
        assert!(matches!(ScenarioUpdate::missing(false, true), ScenarioUpdate::NotFound));
        assert!(matches!(ScenarioUpdate::missing(false, false), ScenarioUpdate::NotFound));
    }

    #[test]
    fn stored_scenario_falls_back_when_seatmap_missing() {
        let stored = StoredScenario {
            id: 1,
            production_id: 2,
            name: "Preview".into(),
            description: None,
            theater_id: 7,
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
            seatmap: None,
            pricing: None,
        };

        assert!(stored.clone().into_scenario(|| None).is_none());

        let scenario = stored
            .into_scenario(|| Some(SeatPlan { theater: theater(), sections: vec![] }))
            .unwrap();
        assert_eq!(scenario.seatmap.theater.id, 7);
        assert!(scenario.pricing.is_empty());
    }
}
