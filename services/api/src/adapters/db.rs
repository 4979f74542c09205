//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `PageRepository` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Structured fields (page metadata and SEO, section and component settings,
//! component content) live in JSONB columns. Sibling order is stored in a
//! `position` column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use page_builder_core::domain::{
    AutoFix, Component, ComponentContent, ComponentMetadata, ComponentSettings, Page,
    PageMetadata, Recommendation, Section, SectionSettings, SeoSettings, StoredRecommendation,
};
use page_builder_core::ports::{PageRepository, PortError, PortResult};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `PageRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps a driver error to a port error. Unique violations become conflicts.
fn db_error(e: sqlx::Error) -> PortError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PortError::Conflict(conflict_message(db.constraint()).to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("pages_tenant_path_unique") => "A page with this path already exists",
        _ => "The order was changed by another request; reload and try again",
    }
}

fn lookup_error(what: &'static str, id: Uuid) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("{} with ID {} not found", what, id)),
        other => db_error(other),
    }
}

/// Fails with `NotFound` when an UPDATE or DELETE touched no row.
fn ensure_affected(rows: u64, what: &str, id: Uuid) -> PortResult<()> {
    if rows == 0 {
        return Err(PortError::NotFound(format!("{} with ID {} not found", what, id)));
    }
    Ok(())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const PAGE_COLUMNS: &str = "id, tenant_id, path, title, description, page_type, metadata, seo, \
     is_published, published_at, created_by, created_at, updated_at";

#[derive(FromRow)]
struct PageRecord {
    id: Uuid,
    tenant_id: Uuid,
    path: String,
    title: String,
    description: Option<String>,
    page_type: String,
    metadata: Json<PageMetadata>,
    seo: Json<SeoSettings>,
    is_published: bool,
    published_at: Option<DateTime<Utc>>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl PageRecord {
    fn to_domain(self) -> Page {
        Page {
            id: self.id,
            tenant_id: self.tenant_id,
            path: self.path,
            title: self.title,
            description: self.description,
            page_type: self.page_type,
            metadata: self.metadata.0,
            seo: self.seo.0,
            is_published: self.is_published,
            published_at: self.published_at,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SECTION_COLUMNS: &str = "id, page_id, name, position, settings";

#[derive(FromRow)]
struct SectionRecord {
    id: Uuid,
    page_id: Uuid,
    name: String,
    position: i32,
    settings: Json<SectionSettings>,
}
impl SectionRecord {
    fn to_domain(self) -> Section {
        Section {
            id: self.id,
            page_id: self.page_id,
            name: self.name,
            order: self.position,
            settings: self.settings.0,
        }
    }
}

const COMPONENT_COLUMNS: &str =
    "c.id, c.section_id, c.component_type, c.content, c.position, c.settings, c.metadata";

#[derive(FromRow)]
struct ComponentRecord {
    id: Uuid,
    section_id: Uuid,
    component_type: String,
    content: Json<Value>,
    position: i32,
    settings: Json<ComponentSettings>,
    metadata: Json<ComponentMetadata>,
}
impl ComponentRecord {
    fn to_domain(self) -> Component {
        Component {
            id: self.id,
            section_id: self.section_id,
            order: self.position,
            content: ComponentContent::from_parts(&self.component_type, self.content.0),
            settings: self.settings.0,
            metadata: self.metadata.0,
        }
    }
}

const RECOMMENDATION_COLUMNS: &str = "id, page_id, kind, severity, message, details, improvement, \
     auto_fix, affected_components, dismissed, applied, created_at";

#[derive(FromRow)]
struct RecommendationRecord {
    id: Uuid,
    page_id: Uuid,
    kind: String,
    severity: String,
    message: String,
    details: Option<String>,
    improvement: Option<String>,
    auto_fix: Option<Json<AutoFix>>,
    affected_components: Vec<Uuid>,
    dismissed: bool,
    applied: bool,
    created_at: DateTime<Utc>,
}
impl RecommendationRecord {
    fn to_domain(self) -> PortResult<StoredRecommendation> {
        let auto_fix = self.auto_fix.map(|fix| fix.0);
        Ok(StoredRecommendation {
            id: self.id,
            page_id: self.page_id,
            recommendation: Recommendation {
                kind: self.kind.parse().map_err(PortError::Unexpected)?,
                severity: self.severity.parse().map_err(PortError::Unexpected)?,
                message: self.message,
                details: self.details,
                improvement: self.improvement,
                auto_fix_available: auto_fix.is_some(),
                auto_fix,
                affected_components: self.affected_components,
            },
            dismissed: self.dismissed,
            applied: self.applied,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `PageRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl PageRepository for DbAdapter {
    // --- Pages ---

    async fn list_pages(&self, tenant_id: Uuid) -> PortResult<Vec<Page>> {
        let records = sqlx::query_as::<_, PageRecord>(&format!(
            "SELECT {} FROM pages WHERE tenant_id = $1 ORDER BY updated_at DESC",
            PAGE_COLUMNS
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_page(&self, tenant_id: Uuid, page_id: Uuid) -> PortResult<Page> {
        let record = sqlx::query_as::<_, PageRecord>(&format!(
            "SELECT {} FROM pages WHERE id = $1 AND tenant_id = $2",
            PAGE_COLUMNS
        ))
        .bind(page_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(lookup_error("Page", page_id))?;
        Ok(record.to_domain())
    }

    async fn path_exists(
        &self,
        tenant_id: Uuid,
        path: &str,
        excluding: Option<Uuid>,
    ) -> PortResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM pages WHERE tenant_id = $1 AND path = $2 AND ($3::uuid IS NULL OR id <> $3))",
        )
        .bind(tenant_id)
        .bind(path)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(exists)
    }

    async fn insert_page(&self, page: &Page) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO pages (id, tenant_id, path, title, description, page_type, metadata, seo, \
             is_published, published_at, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(page.id)
        .bind(page.tenant_id)
        .bind(&page.path)
        .bind(&page.title)
        .bind(&page.description)
        .bind(&page.page_type)
        .bind(Json(&page.metadata))
        .bind(Json(&page.seo))
        .bind(page.is_published)
        .bind(page.published_at)
        .bind(page.created_by)
        .bind(page.created_at)
        .bind(page.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update_page(&self, page: &Page) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE pages SET path = $2, title = $3, description = $4, page_type = $5, \
             metadata = $6, seo = $7, is_published = $8, published_at = $9, updated_at = $10 \
             WHERE id = $1",
        )
        .bind(page.id)
        .bind(&page.path)
        .bind(&page.title)
        .bind(&page.description)
        .bind(&page.page_type)
        .bind(Json(&page.metadata))
        .bind(Json(&page.seo))
        .bind(page.is_published)
        .bind(page.published_at)
        .bind(page.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Page", page.id)
    }

    async fn delete_page(&self, page_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(page_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Page", page_id)
    }

    // --- Sections ---

    async fn list_sections(&self, page_id: Uuid) -> PortResult<Vec<Section>> {
        let records = sqlx::query_as::<_, SectionRecord>(&format!(
            "SELECT {} FROM sections WHERE page_id = $1 ORDER BY position ASC",
            SECTION_COLUMNS
        ))
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_section(&self, section_id: Uuid) -> PortResult<Section> {
        let record = sqlx::query_as::<_, SectionRecord>(&format!(
            "SELECT {} FROM sections WHERE id = $1",
            SECTION_COLUMNS
        ))
        .bind(section_id)
        .fetch_one(&self.pool)
        .await
        .map_err(lookup_error("Section", section_id))?;
        Ok(record.to_domain())
    }

    async fn append_section(&self, section: &Section) -> PortResult<i32> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        // Appends to one page serialize on the parent row.
        sqlx::query("SELECT id FROM pages WHERE id = $1 FOR UPDATE")
            .bind(section.page_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(lookup_error("Page", section.page_id))?;
        let position: i32 = sqlx::query_scalar(
            "INSERT INTO sections (id, page_id, name, position, settings) \
             SELECT $1, $2, $3, COALESCE(MAX(position) + 1, 0), $4 FROM sections WHERE page_id = $2 \
             RETURNING position",
        )
        .bind(section.id)
        .bind(section.page_id)
        .bind(&section.name)
        .bind(Json(&section.settings))
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;
        tx.commit().await.map_err(db_error)?;
        Ok(position)
    }

    async fn update_section(&self, section: &Section) -> PortResult<()> {
        let result = sqlx::query("UPDATE sections SET name = $2, settings = $3 WHERE id = $1")
            .bind(section.id)
            .bind(&section.name)
            .bind(Json(&section.settings))
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Section", section.id)
    }

    async fn delete_section(&self, section_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(section_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Section", section_id)
    }

    async fn save_section_order(&self, sections: &[Section]) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        for section in sections {
            sqlx::query("UPDATE sections SET position = $2 WHERE id = $1")
                .bind(section.id)
                .bind(section.order)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }
        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    // --- Components ---

    async fn list_components(&self, section_id: Uuid) -> PortResult<Vec<Component>> {
        let records = sqlx::query_as::<_, ComponentRecord>(&format!(
            "SELECT {} FROM components c WHERE c.section_id = $1 ORDER BY c.position ASC",
            COMPONENT_COLUMNS
        ))
        .bind(section_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_page_components(&self, page_id: Uuid) -> PortResult<Vec<Component>> {
        let records = sqlx::query_as::<_, ComponentRecord>(&format!(
            "SELECT {} FROM components c JOIN sections s ON s.id = c.section_id \
             WHERE s.page_id = $1 ORDER BY s.position ASC, c.position ASC",
            COMPONENT_COLUMNS
        ))
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_component(&self, component_id: Uuid) -> PortResult<Component> {
        let record = sqlx::query_as::<_, ComponentRecord>(&format!(
            "SELECT {} FROM components c WHERE c.id = $1",
            COMPONENT_COLUMNS
        ))
        .bind(component_id)
        .fetch_one(&self.pool)
        .await
        .map_err(lookup_error("Component", component_id))?;
        Ok(record.to_domain())
    }

    async fn append_component(&self, component: &Component) -> PortResult<i32> {
        let (kind, content) = component.content.clone().into_parts();
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        sqlx::query("SELECT id FROM sections WHERE id = $1 FOR UPDATE")
            .bind(component.section_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(lookup_error("Section", component.section_id))?;
        let position: i32 = sqlx::query_scalar(
            "INSERT INTO components (id, section_id, component_type, content, position, settings, metadata) \
             SELECT $1, $2, $3, $4, COALESCE(MAX(position) + 1, 0), $5, $6 FROM components WHERE section_id = $2 \
             RETURNING position",
        )
        .bind(component.id)
        .bind(component.section_id)
        .bind(kind)
        .bind(Json(content))
        .bind(Json(&component.settings))
        .bind(Json(&component.metadata))
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;
        tx.commit().await.map_err(db_error)?;
        Ok(position)
    }

    async fn update_component(&self, component: &Component) -> PortResult<()> {
        let (kind, content) = component.content.clone().into_parts();
        let result = sqlx::query(
            "UPDATE components SET component_type = $2, content = $3, settings = $4, metadata = $5 \
             WHERE id = $1",
        )
        .bind(component.id)
        .bind(kind)
        .bind(Json(content))
        .bind(Json(&component.settings))
        .bind(Json(&component.metadata))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Component", component.id)
    }

    async fn delete_component(&self, component_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM components WHERE id = $1")
            .bind(component_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Component", component_id)
    }

    async fn save_component_order(&self, components: &[Component]) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        for component in components {
            sqlx::query("UPDATE components SET position = $2 WHERE id = $1")
                .bind(component.id)
                .bind(component.order)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }
        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    // --- Recommendations ---

    async fn replace_recommendations(
        &self,
        page_id: Uuid,
        recommendations: &[StoredRecommendation],
    ) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        sqlx::query("DELETE FROM recommendations WHERE page_id = $1")
            .bind(page_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        for stored in recommendations {
            let rec = &stored.recommendation;
            sqlx::query(
                "INSERT INTO recommendations (id, page_id, kind, severity, message, details, improvement, \
                 auto_fix, affected_components, dismissed, applied, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            )
            .bind(stored.id)
            .bind(page_id)
            .bind(rec.kind.as_str())
            .bind(rec.severity.as_str())
            .bind(&rec.message)
            .bind(&rec.details)
            .bind(&rec.improvement)
            .bind(rec.auto_fix.as_ref().map(Json))
            .bind(&rec.affected_components)
            .bind(stored.dismissed)
            .bind(stored.applied)
            .bind(stored.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }
        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn list_recommendations(&self, page_id: Uuid) -> PortResult<Vec<StoredRecommendation>> {
        let records = sqlx::query_as::<_, RecommendationRecord>(&format!(
            "SELECT {} FROM recommendations WHERE page_id = $1 ORDER BY created_at ASC, id ASC",
            RECOMMENDATION_COLUMNS
        ))
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_recommendation(
        &self,
        recommendation_id: Uuid,
    ) -> PortResult<StoredRecommendation> {
        let record = sqlx::query_as::<_, RecommendationRecord>(&format!(
            "SELECT {} FROM recommendations WHERE id = $1",
            RECOMMENDATION_COLUMNS
        ))
        .bind(recommendation_id)
        .fetch_one(&self.pool)
        .await
        .map_err(lookup_error("Recommendation", recommendation_id))?;
        record.to_domain()
    }

    async fn update_recommendation(
        &self,
        recommendation: &StoredRecommendation,
    ) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE recommendations SET dismissed = $2, applied = $3 WHERE id = $1",
        )
        .bind(recommendation.id)
        .bind(recommendation.dismissed)
        .bind(recommendation.applied)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Recommendation", recommendation.id)
    }
}
