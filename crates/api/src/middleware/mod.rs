// API Middleware
//
// Request processing that runs before the content route handlers.

pub mod content;

pub use content::{content_middleware, ContentRequest, ContentState};
