//! crates/page_builder_core/src/service.rs
//!
//! Tenant-scoped page builder operations. Every mutation of a page's content
//! tree ends by recomputing the page's SEO performance from the stored tree.

use crate::domain::{
    assemble_tree, AutoFix, Component, ComponentContent, ComponentMetadata, ComponentSettings,
    Page, PageMetadata, PageTree, Section, SectionSettings, SeoGoal, SeoPerformance, SeoSettings,
    StoredRecommendation, TenantContext,
};
use crate::ordering::{apply_order, renumber, reorder};
use crate::ports::{PageRepository, PortError, PortResult};
use crate::seo;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_PAGE_TYPE: &str = "landing";

//=========================================================================================
// Inputs
//=========================================================================================

/// Client-editable SEO fields. Performance is never accepted from a client.
#[derive(Debug, Clone, Default)]
pub struct SeoSettingsInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub primary_keyword: Option<String>,
    pub seo_goal: Option<SeoGoal>,
    pub canonical: Option<String>,
    pub og_image: Option<String>,
}

impl SeoSettingsInput {
    /// Settings for a new page. A blank SEO title or description falls back
    /// to the page's own.
    pub fn into_settings(self, page_title: &str, page_description: Option<&str>) -> SeoSettings {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| page_title.to_string());
        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .or_else(|| page_description.map(str::to_string))
            .unwrap_or_default();
        SeoSettings {
            title,
            description,
            keywords: self.keywords.unwrap_or_default(),
            primary_keyword: self.primary_keyword,
            seo_goal: self.seo_goal,
            canonical: self.canonical,
            og_image: self.og_image,
            performance: SeoPerformance::default(),
        }
    }

    /// Overwrites only the fields present in the input.
    pub fn apply_to(self, seo: &mut SeoSettings) {
        if let Some(title) = self.title {
            seo.title = title;
        }
        if let Some(description) = self.description {
            seo.description = description;
        }
        if let Some(keywords) = self.keywords {
            seo.keywords = keywords;
        }
        if self.primary_keyword.is_some() {
            seo.primary_keyword = self.primary_keyword;
        }
        if self.seo_goal.is_some() {
            seo.seo_goal = self.seo_goal;
        }
        if self.canonical.is_some() {
            seo.canonical = self.canonical;
        }
        if self.og_image.is_some() {
            seo.og_image = self.og_image;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewPage {
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub page_type: Option<String>,
    pub metadata: PageMetadata,
    pub seo: SeoSettingsInput,
}

#[derive(Debug, Clone, Default)]
pub struct PageChanges {
    pub path: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub page_type: Option<String>,
    pub metadata: Option<PageMetadata>,
    pub seo: Option<SeoSettingsInput>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSection {
    pub name: String,
    pub settings: SectionSettings,
}

#[derive(Debug, Clone, Default)]
pub struct SectionChanges {
    pub name: Option<String>,
    pub settings: Option<SectionSettings>,
}

#[derive(Debug, Clone)]
pub struct NewComponent {
    pub kind: String,
    pub content: Value,
    pub settings: ComponentSettings,
    pub metadata: ComponentMetadata,
}

#[derive(Debug, Clone, Default)]
pub struct ComponentChanges {
    pub kind: Option<String>,
    pub content: Option<Value>,
    pub settings: Option<ComponentSettings>,
    pub metadata: Option<ComponentMetadata>,
}

/// A requested sibling ordering: either a full id permutation or a single move.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    Ids(Vec<Uuid>),
    Move { from: usize, to: usize },
}

fn required(value: &str, field: &str) -> PortResult<()> {
    if value.trim().is_empty() {
        return Err(PortError::Invalid(format!("{} is required", field)));
    }
    Ok(())
}

fn duplicate_path() -> PortError {
    PortError::Conflict("A page with this path already exists".to_string())
}

//=========================================================================================
// Service
//=========================================================================================

#[derive(Clone)]
pub struct PageBuilderService {
    repo: Arc<dyn PageRepository>,
}

impl PageBuilderService {
    pub fn new(repo: Arc<dyn PageRepository>) -> Self {
        Self { repo }
    }

    // --- Ownership helpers ---

    async fn owned_section(&self, ctx: &TenantContext, section_id: Uuid) -> PortResult<(Page, Section)> {
        let section = self.repo.get_section(section_id).await?;
        let page = self
            .repo
            .get_page(ctx.tenant_id, section.page_id)
            .await
            .map_err(|e| match e {
                PortError::NotFound(_) => {
                    PortError::NotFound(format!("Section with ID {} not found", section_id))
                }
                other => other,
            })?;
        Ok((page, section))
    }

    async fn owned_component(
        &self,
        ctx: &TenantContext,
        component_id: Uuid,
    ) -> PortResult<(Page, Component)> {
        let component = self.repo.get_component(component_id).await?;
        let (page, _) = self
            .owned_section(ctx, component.section_id)
            .await
            .map_err(|e| match e {
                PortError::NotFound(_) => {
                    PortError::NotFound(format!("Component with ID {} not found", component_id))
                }
                other => other,
            })?;
        Ok((page, component))
    }

    async fn owned_recommendation(
        &self,
        ctx: &TenantContext,
        recommendation_id: Uuid,
    ) -> PortResult<(Page, StoredRecommendation)> {
        let recommendation = self.repo.get_recommendation(recommendation_id).await?;
        let page = self
            .repo
            .get_page(ctx.tenant_id, recommendation.page_id)
            .await
            .map_err(|e| match e {
                PortError::NotFound(_) => PortError::NotFound(format!(
                    "Recommendation with ID {} not found",
                    recommendation_id
                )),
                other => other,
            })?;
        Ok((page, recommendation))
    }

    async fn load_tree(&self, page_id: Uuid) -> PortResult<(Vec<Section>, Vec<Component>)> {
        let sections = self.repo.list_sections(page_id).await?;
        let components = self.repo.list_page_components(page_id).await?;
        Ok((sections, components))
    }

    /// Recomputes `seo.performance` from the stored tree and persists the page.
    async fn recompute(&self, mut page: Page) -> PortResult<Page> {
        let (sections, components) = self.load_tree(page.id).await?;
        let tree = assemble_tree(sections, components);
        page.seo.performance = seo::analyze(&page.seo, &tree);
        page.updated_at = Utc::now();
        self.repo.update_page(&page).await?;
        debug!(page_id = %page.id, score = page.seo.performance.score, "Recomputed SEO performance");
        Ok(page)
    }

    //=====================================================================================
    // Pages
    //=====================================================================================

    pub async fn list_pages(&self, ctx: &TenantContext) -> PortResult<Vec<Page>> {
        self.repo.list_pages(ctx.tenant_id).await
    }

    /// The page with its sections and their components, in order.
    pub async fn get_page(&self, ctx: &TenantContext, page_id: Uuid) -> PortResult<PageTree> {
        let page = self.repo.get_page(ctx.tenant_id, page_id).await?;
        let (sections, components) = self.load_tree(page.id).await?;
        Ok(PageTree {
            page,
            sections: assemble_tree(sections, components),
        })
    }

    /// Creates an empty page scored with the initial rubric (base 50, metadata
    /// only). The first section or component mutation switches the page to the
    /// full `analyze` score, whose base is 40, so the score can drop then even
    /// though the content grew.
    pub async fn create_page(&self, ctx: &TenantContext, input: NewPage) -> PortResult<Page> {
        if input.title.trim().is_empty() || input.path.trim().is_empty() {
            return Err(PortError::Invalid("Title and path are required".to_string()));
        }
        if self.repo.path_exists(ctx.tenant_id, &input.path, None).await? {
            return Err(duplicate_path());
        }

        let mut seo = input
            .seo
            .into_settings(&input.title, input.description.as_deref());
        seo.performance = seo::initial_performance(&seo);

        let now = Utc::now();
        let page = Page {
            id: Uuid::new_v4(),
            tenant_id: ctx.tenant_id,
            path: input.path,
            title: input.title,
            description: input.description,
            page_type: input
                .page_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_PAGE_TYPE.to_string()),
            metadata: input.metadata,
            seo,
            is_published: false,
            published_at: None,
            created_by: ctx.user_id,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_page(&page).await?;
        info!(page_id = %page.id, tenant_id = %ctx.tenant_id, path = %page.path, "Created page");
        Ok(page)
    }

    pub async fn update_page(
        &self,
        ctx: &TenantContext,
        page_id: Uuid,
        changes: PageChanges,
    ) -> PortResult<Page> {
        let mut page = self.repo.get_page(ctx.tenant_id, page_id).await?;

        if let Some(path) = changes.path {
            required(&path, "Path")?;
            if path != page.path
                && self
                    .repo
                    .path_exists(ctx.tenant_id, &path, Some(page.id))
                    .await?
            {
                return Err(duplicate_path());
            }
            page.path = path;
        }
        if let Some(title) = changes.title {
            required(&title, "Title")?;
            page.title = title;
        }
        if let Some(description) = changes.description {
            page.description = Some(description);
        }
        if let Some(page_type) = changes.page_type {
            page.page_type = page_type;
        }
        if let Some(metadata) = changes.metadata {
            page.metadata = metadata;
        }
        if let Some(seo_input) = changes.seo {
            seo_input.apply_to(&mut page.seo);
        }

        let page = self.recompute(page).await?;
        info!(page_id = %page.id, "Updated page");
        Ok(page)
    }

    pub async fn delete_page(&self, ctx: &TenantContext, page_id: Uuid) -> PortResult<()> {
        let page = self.repo.get_page(ctx.tenant_id, page_id).await?;
        self.repo.delete_page(page.id).await?;
        info!(page_id = %page_id, "Deleted page and its content");
        Ok(())
    }

    /// Flips the published flag. `published_at` records the latest publish and
    /// survives unpublishing.
    pub async fn toggle_publish(&self, ctx: &TenantContext, page_id: Uuid) -> PortResult<Page> {
        let mut page = self.repo.get_page(ctx.tenant_id, page_id).await?;
        let now = Utc::now();
        page.is_published = !page.is_published;
        if page.is_published {
            page.published_at = Some(now);
        }
        page.updated_at = now;
        self.repo.update_page(&page).await?;
        info!(page_id = %page.id, published = page.is_published, "Toggled publish status");
        Ok(page)
    }

    //=====================================================================================
    // Sections
    //=====================================================================================

    pub async fn add_section(
        &self,
        ctx: &TenantContext,
        page_id: Uuid,
        input: NewSection,
    ) -> PortResult<Section> {
        required(&input.name, "Section name")?;
        let page = self.repo.get_page(ctx.tenant_id, page_id).await?;

        let mut section = Section {
            id: Uuid::new_v4(),
            page_id: page.id,
            name: input.name,
            order: 0,
            settings: input.settings,
        };
        section.order = self.repo.append_section(&section).await?;
        self.recompute(page).await?;
        info!(section_id = %section.id, page_id = %page_id, order = section.order, "Added section");
        Ok(section)
    }

    pub async fn update_section(
        &self,
        ctx: &TenantContext,
        section_id: Uuid,
        changes: SectionChanges,
    ) -> PortResult<Section> {
        let (page, mut section) = self.owned_section(ctx, section_id).await?;
        if let Some(name) = changes.name {
            required(&name, "Section name")?;
            section.name = name;
        }
        if let Some(settings) = changes.settings {
            section.settings = settings;
        }
        self.repo.update_section(&section).await?;
        self.recompute(page).await?;
        info!(section_id = %section.id, "Updated section");
        Ok(section)
    }

    pub async fn delete_section(&self, ctx: &TenantContext, section_id: Uuid) -> PortResult<()> {
        let (page, section) = self.owned_section(ctx, section_id).await?;
        self.repo.delete_section(section.id).await?;

        let remaining = renumber(self.repo.list_sections(page.id).await?);
        self.repo.save_section_order(&remaining).await?;
        self.recompute(page).await?;
        info!(section_id = %section_id, remaining = remaining.len(), "Deleted section");
        Ok(())
    }

    pub async fn reorder_sections(
        &self,
        ctx: &TenantContext,
        page_id: Uuid,
        change: OrderChange,
    ) -> PortResult<Vec<Section>> {
        let page = self.repo.get_page(ctx.tenant_id, page_id).await?;
        let sections = self.repo.list_sections(page.id).await?;
        let sections = match change {
            OrderChange::Ids(ids) => apply_order(sections, &ids)?,
            OrderChange::Move { from, to } => reorder(sections, from, to)?,
        };
        self.repo.save_section_order(&sections).await?;
        self.recompute(page).await?;
        info!(page_id = %page_id, "Reordered sections");
        Ok(sections)
    }

    //=====================================================================================
    // Components
    //=====================================================================================

    pub async fn add_component(
        &self,
        ctx: &TenantContext,
        section_id: Uuid,
        input: NewComponent,
    ) -> PortResult<Component> {
        required(&input.kind, "Component type")?;
        let (page, section) = self.owned_section(ctx, section_id).await?;

        let mut component = Component {
            id: Uuid::new_v4(),
            section_id: section.id,
            order: 0,
            content: ComponentContent::from_parts(&input.kind, input.content),
            settings: input.settings,
            metadata: input.metadata,
        };
        if let ComponentContent::Other { kind, .. } = &component.content {
            debug!(component_id = %component.id, kind = %kind, "Storing component with untyped content");
        }
        component.order = self.repo.append_component(&component).await?;
        self.recompute(page).await?;
        info!(component_id = %component.id, section_id = %section_id, kind = component.kind(), "Added component");
        Ok(component)
    }

    pub async fn update_component(
        &self,
        ctx: &TenantContext,
        component_id: Uuid,
        changes: ComponentChanges,
    ) -> PortResult<Component> {
        let (page, mut component) = self.owned_component(ctx, component_id).await?;

        if changes.kind.is_some() || changes.content.is_some() {
            let (kind, raw) = component.content.into_parts();
            let kind = changes.kind.unwrap_or(kind);
            required(&kind, "Component type")?;
            component.content = ComponentContent::from_parts(&kind, changes.content.unwrap_or(raw));
        }
        if let Some(settings) = changes.settings {
            component.settings = settings;
        }
        if let Some(metadata) = changes.metadata {
            component.metadata = metadata;
        }

        self.repo.update_component(&component).await?;
        self.recompute(page).await?;
        info!(component_id = %component.id, "Updated component");
        Ok(component)
    }

    pub async fn delete_component(&self, ctx: &TenantContext, component_id: Uuid) -> PortResult<()> {
        let (page, component) = self.owned_component(ctx, component_id).await?;
        self.repo.delete_component(component.id).await?;

        let remaining = renumber(self.repo.list_components(component.section_id).await?);
        self.repo.save_component_order(&remaining).await?;
        self.recompute(page).await?;
        info!(component_id = %component_id, remaining = remaining.len(), "Deleted component");
        Ok(())
    }

    pub async fn reorder_components(
        &self,
        ctx: &TenantContext,
        section_id: Uuid,
        change: OrderChange,
    ) -> PortResult<Vec<Component>> {
        let (page, section) = self.owned_section(ctx, section_id).await?;
        let components = self.repo.list_components(section.id).await?;
        let components = match change {
            OrderChange::Ids(ids) => apply_order(components, &ids)?,
            OrderChange::Move { from, to } => reorder(components, from, to)?,
        };
        self.repo.save_component_order(&components).await?;
        self.recompute(page).await?;
        info!(section_id = %section_id, "Reordered components");
        Ok(components)
    }

    //=====================================================================================
    // SEO
    //=====================================================================================

    /// Recomputes and persists the page's performance block.
    pub async fn refresh_performance(
        &self,
        ctx: &TenantContext,
        page_id: Uuid,
    ) -> PortResult<SeoPerformance> {
        let page = self.repo.get_page(ctx.tenant_id, page_id).await?;
        let page = self.recompute(page).await?;
        info!(page_id = %page_id, score = page.seo.performance.score, "Refreshed SEO score");
        Ok(page.seo.performance)
    }

    /// Generates a fresh set of recommendations and stores it in place of the
    /// previous set, dismissed entries included.
    pub async fn generate_recommendations(
        &self,
        ctx: &TenantContext,
        page_id: Uuid,
    ) -> PortResult<Vec<StoredRecommendation>> {
        let page = self.repo.get_page(ctx.tenant_id, page_id).await?;
        let (sections, components) = self.load_tree(page.id).await?;

        let now = Utc::now();
        let stored: Vec<StoredRecommendation> =
            seo::generate_page_recommendations(&page, &sections, &components)
                .into_iter()
                .map(|recommendation| StoredRecommendation {
                    id: Uuid::new_v4(),
                    page_id: page.id,
                    recommendation,
                    dismissed: false,
                    applied: false,
                    created_at: now,
                })
                .collect();

        self.repo.replace_recommendations(page.id, &stored).await?;
        info!(page_id = %page_id, count = stored.len(), "Generated recommendations");
        Ok(stored)
    }

    /// Stored recommendations that have not been dismissed.
    pub async fn list_recommendations(
        &self,
        ctx: &TenantContext,
        page_id: Uuid,
    ) -> PortResult<Vec<StoredRecommendation>> {
        let page = self.repo.get_page(ctx.tenant_id, page_id).await?;
        let mut recommendations = self.repo.list_recommendations(page.id).await?;
        recommendations.retain(|r| !r.dismissed);
        Ok(recommendations)
    }

    pub async fn dismiss_recommendation(
        &self,
        ctx: &TenantContext,
        recommendation_id: Uuid,
    ) -> PortResult<StoredRecommendation> {
        let (_, mut recommendation) = self.owned_recommendation(ctx, recommendation_id).await?;
        recommendation.dismissed = true;
        self.repo.update_recommendation(&recommendation).await?;
        info!(recommendation_id = %recommendation_id, "Dismissed recommendation");
        Ok(recommendation)
    }

    /// Applies the recommendation's automatic fix to the page and marks it applied.
    pub async fn apply_recommendation(
        &self,
        ctx: &TenantContext,
        recommendation_id: Uuid,
    ) -> PortResult<Page> {
        let (mut page, mut recommendation) =
            self.owned_recommendation(ctx, recommendation_id).await?;

        let fix = recommendation.recommendation.auto_fix.clone().ok_or_else(|| {
            PortError::Invalid("This recommendation cannot be applied automatically".to_string())
        })?;
        if recommendation.applied {
            warn!(recommendation_id = %recommendation_id, "Re-applying an applied recommendation");
        }

        match fix {
            AutoFix::SeoTitle(title) => page.seo.title = title,
            AutoFix::SeoDescription(description) => page.seo.description = description,
        }
        let page = self.recompute(page).await?;

        recommendation.applied = true;
        self.repo.update_recommendation(&recommendation).await?;
        info!(recommendation_id = %recommendation_id, page_id = %page.id, "Applied recommendation");
        Ok(page)
    }
}
