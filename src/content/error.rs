//! Content error types

use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading and parsing post sources
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No front-matter block in {0:?}")]
    MissingFrontMatter(PathBuf),

    #[error("Front-matter block is never closed in {0:?}")]
    UnterminatedFrontMatter(PathBuf),

    #[error("Invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("File name of {0:?} is not a usable slug")]
    InvalidSlug(PathBuf),

    #[error("Failed to render {path:?}: {message}")]
    Render { path: PathBuf, message: String },
}

impl ContentError {
    /// Attach a source path to an error raised before the path was known
    pub(crate) fn at(self, path: &std::path::Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ContentError::Io { source, .. } => ContentError::Io { path, source },
            ContentError::MissingFrontMatter(_) => ContentError::MissingFrontMatter(path),
            ContentError::UnterminatedFrontMatter(_) => ContentError::UnterminatedFrontMatter(path),
            ContentError::InvalidSlug(_) => ContentError::InvalidSlug(path),
            ContentError::FrontMatter { source, .. } => ContentError::FrontMatter { path, source },
            ContentError::Render { message, .. } => ContentError::Render { path, message },
        }
    }
}

/// The single failure a slug lookup can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Post not found")]
    NotFound { slug: String },
}

impl ResolveError {
    /// HTTP status equivalent of this error
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_and_status() {
        let err = ResolveError::NotFound {
            slug: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Post not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.status().as_u16(), 404);
    }

    #[test]
    fn test_at_replaces_path() {
        let err = ContentError::MissingFrontMatter(PathBuf::new()).at(std::path::Path::new("a.md"));
        assert!(err.to_string().contains("a.md"));
    }
}
