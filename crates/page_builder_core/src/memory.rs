//! crates/page_builder_core/src/memory.rs
//!
//! A process-local `PageRepository` backed by hash maps. Used by the tests and
//! by the api service when no database is configured.

use crate::domain::{Component, Page, Section, StoredRecommendation};
use crate::ports::{PageRepository, PortError, PortResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    pages: HashMap<Uuid, Page>,
    sections: HashMap<Uuid, Section>,
    components: HashMap<Uuid, Component>,
    recommendations: HashMap<Uuid, Vec<StoredRecommendation>>,
}

impl Tables {
    fn section_ids_of(&self, page_id: Uuid) -> Vec<Uuid> {
        self.sections
            .values()
            .filter(|s| s.page_id == page_id)
            .map(|s| s.id)
            .collect()
    }

    fn remove_section(&mut self, section_id: Uuid) {
        self.sections.remove(&section_id);
        self.components.retain(|_, c| c.section_id != section_id);
    }
}

#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PortResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| PortError::Unexpected("In-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> PortResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| PortError::Unexpected("In-memory store lock poisoned".to_string()))
    }
}

fn not_found(what: &str, id: Uuid) -> PortError {
    PortError::NotFound(format!("{} with ID {} not found", what, id))
}

#[async_trait]
impl PageRepository for InMemoryRepository {
    async fn list_pages(&self, tenant_id: Uuid) -> PortResult<Vec<Page>> {
        let tables = self.read()?;
        let mut pages: Vec<Page> = tables
            .pages
            .values()
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .collect();
        pages.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(pages)
    }

    async fn get_page(&self, tenant_id: Uuid, page_id: Uuid) -> PortResult<Page> {
        self.read()?
            .pages
            .get(&page_id)
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .ok_or_else(|| not_found("Page", page_id))
    }

    async fn path_exists(
        &self,
        tenant_id: Uuid,
        path: &str,
        excluding: Option<Uuid>,
    ) -> PortResult<bool> {
        Ok(self.read()?.pages.values().any(|p| {
            p.tenant_id == tenant_id && p.path == path && Some(p.id) != excluding
        }))
    }

    async fn insert_page(&self, page: &Page) -> PortResult<()> {
        let mut tables = self.write()?;
        if tables.pages.contains_key(&page.id) {
            return Err(PortError::Conflict(format!("Page {} already exists", page.id)));
        }
        tables.pages.insert(page.id, page.clone());
        Ok(())
    }

    async fn update_page(&self, page: &Page) -> PortResult<()> {
        let mut tables = self.write()?;
        match tables.pages.get_mut(&page.id) {
            Some(stored) => {
                *stored = page.clone();
                Ok(())
            }
            None => Err(not_found("Page", page.id)),
        }
    }

    async fn delete_page(&self, page_id: Uuid) -> PortResult<()> {
        let mut tables = self.write()?;
        if tables.pages.remove(&page_id).is_none() {
            return Err(not_found("Page", page_id));
        }
        for section_id in tables.section_ids_of(page_id) {
            tables.remove_section(section_id);
        }
        tables.recommendations.remove(&page_id);
        Ok(())
    }

    async fn list_sections(&self, page_id: Uuid) -> PortResult<Vec<Section>> {
        let tables = self.read()?;
        let mut sections: Vec<Section> = tables
            .sections
            .values()
            .filter(|s| s.page_id == page_id)
            .cloned()
            .collect();
        sections.sort_by_key(|s| s.order);
        Ok(sections)
    }

    async fn get_section(&self, section_id: Uuid) -> PortResult<Section> {
        self.read()?
            .sections
            .get(&section_id)
            .cloned()
            .ok_or_else(|| not_found("Section", section_id))
    }

    async fn append_section(&self, section: &Section) -> PortResult<i32> {
        let mut tables = self.write()?;
        if !tables.pages.contains_key(&section.page_id) {
            return Err(not_found("Page", section.page_id));
        }
        let order = tables
            .sections
            .values()
            .filter(|s| s.page_id == section.page_id)
            .map(|s| s.order + 1)
            .max()
            .unwrap_or(0);
        tables.sections.insert(
            section.id,
            Section {
                order,
                ..section.clone()
            },
        );
        Ok(order)
    }

    async fn update_section(&self, section: &Section) -> PortResult<()> {
        let mut tables = self.write()?;
        match tables.sections.get_mut(&section.id) {
            Some(stored) => {
                stored.name = section.name.clone();
                stored.settings = section.settings.clone();
                Ok(())
            }
            None => Err(not_found("Section", section.id)),
        }
    }

    async fn delete_section(&self, section_id: Uuid) -> PortResult<()> {
        let mut tables = self.write()?;
        if !tables.sections.contains_key(&section_id) {
            return Err(not_found("Section", section_id));
        }
        tables.remove_section(section_id);
        Ok(())
    }

    async fn save_section_order(&self, sections: &[Section]) -> PortResult<()> {
        let mut tables = self.write()?;
        for section in sections {
            if let Some(stored) = tables.sections.get_mut(&section.id) {
                stored.order = section.order;
            }
        }
        Ok(())
    }

    async fn list_components(&self, section_id: Uuid) -> PortResult<Vec<Component>> {
        let tables = self.read()?;
        let mut components: Vec<Component> = tables
            .components
            .values()
            .filter(|c| c.section_id == section_id)
            .cloned()
            .collect();
        components.sort_by_key(|c| c.order);
        Ok(components)
    }

    async fn list_page_components(&self, page_id: Uuid) -> PortResult<Vec<Component>> {
        let tables = self.read()?;
        let section_ids = tables.section_ids_of(page_id);
        let mut components: Vec<Component> = tables
            .components
            .values()
            .filter(|c| section_ids.contains(&c.section_id))
            .cloned()
            .collect();
        components.sort_by_key(|c| c.order);
        Ok(components)
    }

    async fn get_component(&self, component_id: Uuid) -> PortResult<Component> {
        self.read()?
            .components
            .get(&component_id)
            .cloned()
            .ok_or_else(|| not_found("Component", component_id))
    }

    async fn append_component(&self, component: &Component) -> PortResult<i32> {
        let mut tables = self.write()?;
        if !tables.sections.contains_key(&component.section_id) {
            return Err(not_found("Section", component.section_id));
        }
        let order = tables
            .components
            .values()
            .filter(|c| c.section_id == component.section_id)
            .map(|c| c.order + 1)
            .max()
            .unwrap_or(0);
        tables.components.insert(
            component.id,
            Component {
                order,
                ..component.clone()
            },
        );
        Ok(order)
    }

    async fn update_component(&self, component: &Component) -> PortResult<()> {
        let mut tables = self.write()?;
        match tables.components.get_mut(&component.id) {
            Some(stored) => {
                *stored = Component {
                    order: stored.order,
                    ..component.clone()
                };
                Ok(())
            }
            None => Err(not_found("Component", component.id)),
        }
    }

    async fn delete_component(&self, component_id: Uuid) -> PortResult<()> {
        self.write()?
            .components
            .remove(&component_id)
            .map(|_| ())
            .ok_or_else(|| not_found("Component", component_id))
    }

    async fn save_component_order(&self, components: &[Component]) -> PortResult<()> {
        let mut tables = self.write()?;
        for component in components {
            if let Some(stored) = tables.components.get_mut(&component.id) {
                stored.order = component.order;
            }
        }
        Ok(())
    }

    async fn replace_recommendations(
        &self,
        page_id: Uuid,
        recommendations: &[StoredRecommendation],
    ) -> PortResult<()> {
        self.write()?
            .recommendations
            .insert(page_id, recommendations.to_vec());
        Ok(())
    }

    async fn list_recommendations(&self, page_id: Uuid) -> PortResult<Vec<StoredRecommendation>> {
        Ok(self
            .read()?
            .recommendations
            .get(&page_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_recommendation(
        &self,
        recommendation_id: Uuid,
    ) -> PortResult<StoredRecommendation> {
        self.read()?
            .recommendations
            .values()
            .flatten()
            .find(|r| r.id == recommendation_id)
            .cloned()
            .ok_or_else(|| not_found("Recommendation", recommendation_id))
    }

    async fn update_recommendation(
        &self,
        recommendation: &StoredRecommendation,
    ) -> PortResult<()> {
        let mut tables = self.write()?;
        let stored = tables
            .recommendations
            .get_mut(&recommendation.page_id)
            .and_then(|recs| recs.iter_mut().find(|r| r.id == recommendation.id))
            .ok_or_else(|| not_found("Recommendation", recommendation.id))?;
        *stored = recommendation.clone();
        Ok(())
    }
}
