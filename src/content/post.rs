//! Post models

use serde::{Deserialize, Serialize};

/// Metadata of a post, as written in its front-matter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Post title
    pub title: String,

    /// One-line summary shown on the index
    pub description: String,

    /// Publication date, epoch seconds
    pub date: i64,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// URL-friendly name, always the source file stem
    pub slug: String,

    /// Only published posts are listed and built
    pub published: bool,
}

/// A resolved post: metadata plus rendered body
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Rendered HTML content
    pub content: String,

    pub meta: PostMetadata,
}

/// Sort posts newest first, ties broken by slug
pub fn sort_newest_first(posts: &mut [PostMetadata]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}
