pub mod cache;
pub mod factory;
pub mod fragments;
pub mod homepage;
pub mod keys;
pub mod language;
pub mod ports;
pub mod queries;
pub mod sanity;
pub mod service;


pub use cache::{CacheEntry, CacheStats, Clock, ManualClock, QueryCache, SystemClock};
pub use factory::{ContentServiceFactory, RequestContext, PREVIEW_COOKIE};
pub use language::{
    detect_language, format_event_date, localized_path, resolve_field, resolve_slug,
    transform_document, Language, Slug,
};
pub use ports::{CmsClient, ContentError, Perspective, QueryOptions, QueryOverrides};
pub use queries::{DocumentType, QueryDefinition};
pub use sanity::SanityClient;
pub use service::ContentService;

#[cfg(any(test, feature = "test-mocks"))]
pub use ports::MockCmsClient;
