pub mod domain;
pub mod memory;
pub mod ordering;
pub mod ports;
pub mod seo;
pub mod service;

pub use domain::{
    Component, ComponentContent, Page, PageTree, Recommendation, Section, SectionWithComponents,
    SeoPerformance, SeoSettings, StoredRecommendation, TenantContext,
};
pub use memory::InMemoryRepository;
pub use ordering::OrderingError;
pub use ports::{PageRepository, PortError, PortResult};
pub use service::{
    ComponentChanges, NewComponent, NewPage, NewSection, OrderChange, PageBuilderService,
    PageChanges, SectionChanges, SeoSettingsInput,
};
