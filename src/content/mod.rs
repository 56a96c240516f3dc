//! Content module - post sources, front-matter, markdown and lookups

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::{ContentError, ResolveError};
pub use frontmatter::FrontMatter;
pub use loader::{collect_posts, resolve_post, PostLoader};
pub use markdown::MarkdownRenderer;
pub use post::{sort_newest_first, Post, PostMetadata};
