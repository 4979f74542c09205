//! crates/page_builder_core/src/ports.rs
//!
//! Defines the storage contract for the page builder. Adapters (Postgres, the
//! in-memory store) implement it; the service depends only on the trait.

use crate::domain::{Component, Page, Section, StoredRecommendation};
use crate::ordering::OrderingError;
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port and service operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid request: {0}")]
    Invalid(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<OrderingError> for PortError {
    fn from(err: OrderingError) -> Self {
        PortError::Invalid(err.to_string())
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Repository Port
//=========================================================================================

/// Persistence for pages and everything hanging off them.
///
/// Page lookups are tenant-scoped. Section, component and recommendation
/// lookups are by id only; the service checks ownership by walking up to the
/// page.
#[async_trait]
pub trait PageRepository: Send + Sync {
    // --- Pages ---
    async fn list_pages(&self, tenant_id: Uuid) -> PortResult<Vec<Page>>;

    async fn get_page(&self, tenant_id: Uuid, page_id: Uuid) -> PortResult<Page>;

    /// Whether another page of the tenant already uses `path`.
    async fn path_exists(
        &self,
        tenant_id: Uuid,
        path: &str,
        excluding: Option<Uuid>,
    ) -> PortResult<bool>;

    async fn insert_page(&self, page: &Page) -> PortResult<()>;

    async fn update_page(&self, page: &Page) -> PortResult<()>;

    /// Deletes the page together with its sections, components and recommendations.
    async fn delete_page(&self, page_id: Uuid) -> PortResult<()>;

    // --- Sections ---
    async fn list_sections(&self, page_id: Uuid) -> PortResult<Vec<Section>>;

    async fn get_section(&self, section_id: Uuid) -> PortResult<Section>;

    /// Stores the section after its last sibling and returns the order it was
    /// given. `section.order` is ignored; the position is assigned atomically
    /// so concurrent appends to one page never share an order.
    async fn append_section(&self, section: &Section) -> PortResult<i32>;

    /// Writes name and settings. Order only changes through `save_section_order`.
    async fn update_section(&self, section: &Section) -> PortResult<()>;

    /// Deletes the section together with its components.
    async fn delete_section(&self, section_id: Uuid) -> PortResult<()>;

    /// Writes the `order` of every given section in one step.
    async fn save_section_order(&self, sections: &[Section]) -> PortResult<()>;

    // --- Components ---
    async fn list_components(&self, section_id: Uuid) -> PortResult<Vec<Component>>;

    /// Every component of every section of the page.
    async fn list_page_components(&self, page_id: Uuid) -> PortResult<Vec<Component>>;

    async fn get_component(&self, component_id: Uuid) -> PortResult<Component>;

    /// Stores the component after its last sibling and returns its order, with
    /// the same atomicity as `append_section`.
    async fn append_component(&self, component: &Component) -> PortResult<i32>;

    /// Writes content, settings and metadata; `order` is left untouched.
    async fn update_component(&self, component: &Component) -> PortResult<()>;

    async fn delete_component(&self, component_id: Uuid) -> PortResult<()>;

    async fn save_component_order(&self, components: &[Component]) -> PortResult<()>;

    // --- Recommendations ---
    /// Drops every stored recommendation of the page and stores `recommendations`.
    async fn replace_recommendations(
        &self,
        page_id: Uuid,
        recommendations: &[StoredRecommendation],
    ) -> PortResult<()>;

    async fn list_recommendations(&self, page_id: Uuid) -> PortResult<Vec<StoredRecommendation>>;

    async fn get_recommendation(&self, recommendation_id: Uuid)
        -> PortResult<StoredRecommendation>;

    async fn update_recommendation(&self, recommendation: &StoredRecommendation)
        -> PortResult<()>;
}
