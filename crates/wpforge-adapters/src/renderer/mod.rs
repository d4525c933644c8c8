//! Template renderers.

mod mustache;

pub use mustache::{MustacheRenderer, RenderError};
