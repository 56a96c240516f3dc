//! Content loader - collects post metadata and resolves posts by slug

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, FrontMatter, MarkdownRenderer, Post, PostMetadata, ResolveError};

lazy_static! {
    /// A slug is one non-empty path segment that does not start with a dot
    static ref SLUG_RE: Regex = Regex::new(r"^[^./\\\x00][^/\\\x00]*$").unwrap();
}

const EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Loads posts from one directory of markdown files
pub struct PostLoader {
    posts_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl PostLoader {
    /// Create a new loader over `posts_dir`
    pub fn new<P: AsRef<Path>>(posts_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            renderer,
        }
    }

    /// Metadata of every published post
    pub fn collect(&self) -> Result<Vec<PostMetadata>, ContentError> {
        collect_posts(&self.posts_dir)
    }

    /// Metadata of every post, published or not
    pub fn collect_all(&self) -> Result<Vec<PostMetadata>, ContentError> {
        scan_posts(&self.posts_dir)
    }

    /// Load and render the post named by `slug`
    pub fn resolve(&self, slug: &str) -> Result<Post, ResolveError> {
        resolve_post(&self.posts_dir, slug, &self.renderer)
    }
}

/// Collect the metadata of all published posts in `posts_dir`.
///
/// Files are visited in file name order. Any unreadable or malformed file
/// fails the whole collection.
pub fn collect_posts(posts_dir: &Path) -> Result<Vec<PostMetadata>, ContentError> {
    let posts: Vec<PostMetadata> = scan_posts(posts_dir)?
        .into_iter()
        .filter(|meta| meta.published)
        .collect();

    tracing::debug!("Collected {} published posts from {:?}", posts.len(), posts_dir);
    Ok(posts)
}

fn scan_posts(posts_dir: &Path) -> Result<Vec<PostMetadata>, ContentError> {
    if !posts_dir.exists() {
        tracing::debug!("Posts directory {:?} does not exist", posts_dir);
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();

    for entry in WalkDir::new(posts_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ContentError::Io {
            path: e.path().unwrap_or(posts_dir).to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        if is_hidden(path) {
            continue;
        }
        if path.is_file() && is_markdown_file(path) {
            let (meta, _) = load_source(path)?;
            posts.push(meta);
        }
    }

    Ok(posts)
}

/// Resolve a slug to its rendered post.
///
/// Every failure, from a malformed slug to a broken code block, is reported
/// as `ResolveError::NotFound`.
pub fn resolve_post(
    posts_dir: &Path,
    slug: &str,
    renderer: &MarkdownRenderer,
) -> Result<Post, ResolveError> {
    let not_found = || ResolveError::NotFound {
        slug: slug.to_string(),
    };

    if !is_valid_slug(slug) {
        tracing::debug!("Rejected slug {:?}", slug);
        return Err(not_found());
    }

    let path = EXTENSIONS
        .iter()
        .map(|ext| posts_dir.join(format!("{}.{}", slug, ext)))
        .find(|p| p.is_file())
        .ok_or_else(|| {
            tracing::debug!("No source file for slug {:?} in {:?}", slug, posts_dir);
            not_found()
        })?;

    let load = || -> Result<Post, ContentError> {
        let (meta, body) = load_source(&path)?;
        let content = renderer.render(&body).map_err(|e| e.at(&path))?;
        Ok(Post { content, meta })
    };

    load().map_err(|e| {
        tracing::debug!("Failed to resolve {:?}: {}", slug, e);
        not_found()
    })
}

/// Read one source file into its metadata and markdown body
fn load_source(path: &Path) -> Result<(PostMetadata, String), ContentError> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (fm, body) = FrontMatter::parse(&content).map_err(|e| e.at(path))?;

    // Every collected post must be reachable through resolve_post
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| is_valid_slug(s))
        .ok_or_else(|| ContentError::InvalidSlug(path.to_path_buf()))?;

    Ok((fm.into_metadata(stem), body.to_string()))
}

/// Check if a string can name a post
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Dotfiles such as editor swap files are not posts
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.as_encoded_bytes().starts_with(b"."))
        .unwrap_or(false)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, title: &str, date: i64, published: bool) {
        let content = format!(
            "---\ntitle: {}\ndescription: About {}\ndate: {}\ntags: [rust, notes]\npublished: {}\n---\n\n# {}\n\nBody of {}.\n",
            title, title, date, published, title, title
        );
        fs::write(dir.join(name), content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "first.md", "First", 1704412800, true);
        write_post(dir.path(), "second.markdown", "Second", 1704499200, true);
        write_post(dir.path(), "draft.md", "Draft", 1704585600, false);
        fs::write(dir.path().join("notes.txt"), "not a post").unwrap();
        dir
    }

    #[test]
    fn test_collect_only_published() {
        let dir = fixture();
        let posts = collect_posts(dir.path()).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second"]);
        assert!(posts.iter().all(|p| p.published));
        assert_eq!(posts[0].tags, vec!["rust", "notes"]);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let dir = fixture();
        let a: HashSet<_> = collect_posts(dir.path()).unwrap().into_iter().map(|p| p.slug).collect();
        let b: HashSet<_> = collect_posts(dir.path()).unwrap().into_iter().map(|p| p.slug).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_collect_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let posts = collect_posts(&dir.path().join("nope")).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_collect_ignores_subdirectories() {
        let dir = fixture();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write_post(&nested, "deep.md", "Deep", 1, true);
        let posts = collect_posts(dir.path()).unwrap();
        assert!(posts.iter().all(|p| p.slug != "deep"));
    }

    #[test]
    fn test_collect_fails_on_malformed_file() {
        let dir = fixture();
        fs::write(dir.path().join("broken.md"), "---\ntitle: [unclosed\n---\n").unwrap();
        let err = collect_posts(dir.path()).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn test_collect_all_includes_drafts() {
        let dir = fixture();
        let loader = PostLoader::new(dir.path(), MarkdownRenderer::new());
        assert_eq!(loader.collect_all().unwrap().len(), 3);
        assert_eq!(loader.collect().unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_existing_post() {
        let dir = fixture();
        let loader = PostLoader::new(dir.path(), MarkdownRenderer::new());
        let post = loader.resolve("first").unwrap();
        assert_eq!(post.meta.slug, "first");
        assert_eq!(post.meta.title, "First");
        assert!(post.content.contains("<h1>First</h1>"));
        assert!(post.content.contains("<p>Body of First.</p>"));
    }

    #[test]
    fn test_resolve_markdown_extension() {
        let dir = fixture();
        let loader = PostLoader::new(dir.path(), MarkdownRenderer::new());
        assert_eq!(loader.resolve("second").unwrap().meta.slug, "second");
    }

    #[test]
    fn test_resolve_unpublished_post() {
        let dir = fixture();
        let loader = PostLoader::new(dir.path(), MarkdownRenderer::new());
        let post = loader.resolve("draft").unwrap();
        assert!(!post.meta.published);
    }

    #[test]
    fn test_resolve_missing_post() {
        let dir = fixture();
        let loader = PostLoader::new(dir.path(), MarkdownRenderer::new());
        let err = loader.resolve("nope").unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotFound {
                slug: "nope".to_string()
            }
        );
        assert_eq!(err.to_string(), "Post not found");
        assert_eq!(err.status().as_u16(), 404);
    }

    #[test]
    fn test_resolve_malformed_post_is_not_found() {
        let dir = fixture();
        fs::write(dir.path().join("broken.md"), "no front-matter here").unwrap();
        let loader = PostLoader::new(dir.path(), MarkdownRenderer::new());
        let err = loader.resolve("broken").unwrap_err();
        assert_eq!(err.to_string(), "Post not found");
    }

    #[test]
    fn test_resolve_rejects_paths() {
        let dir = fixture();
        let loader = PostLoader::new(dir.path().join("inner"), MarkdownRenderer::new());
        fs::create_dir(dir.path().join("inner")).unwrap();
        for slug in ["../first", "", ".hidden", "a/b", "first.md/.."] {
            assert!(loader.resolve(slug).is_err(), "{:?} resolved", slug);
        }
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world_2"));
        assert!(is_valid_slug("v1.2-notes"));
        assert!(is_valid_slug("café"));
        assert!(is_valid_slug("my post"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("."));
        assert!(!is_valid_slug(".."));
        assert!(!is_valid_slug(".hidden"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("a\\b"));
        assert!(!is_valid_slug("a\0b"));
    }

    #[test]
    fn test_every_collected_slug_resolves() {
        let dir = fixture();
        write_post(dir.path(), "café.md", "Café", 1704672000, true);
        write_post(dir.path(), "my post.md", "My Post", 1704758400, true);
        write_post(dir.path(), "v1.2-notes.md", "Notes", 1704844800, true);
        write_post(dir.path(), "日本語.markdown", "Nihongo", 1704931200, true);

        let loader = PostLoader::new(dir.path(), MarkdownRenderer::new());
        let posts = loader.collect().unwrap();
        assert_eq!(posts.len(), 6);
        for meta in &posts {
            let post = loader
                .resolve(&meta.slug)
                .unwrap_or_else(|e| panic!("{:?}: {}", meta.slug, e));
            assert_eq!(post.meta.slug, meta.slug);
        }
    }

    #[test]
    fn test_collect_skips_hidden_files() {
        let dir = fixture();
        write_post(dir.path(), ".scratch.md", "Scratch", 1, true);
        let posts = collect_posts(dir.path()).unwrap();
        assert!(posts.iter().all(|p| p.title != "Scratch"));
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_rejects_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = fixture();
        let name = OsStr::from_bytes(b"bad\xff.md");
        let content = "---\ntitle: Bad\ndate: 1\npublished: true\n---\n";
        // Some file systems refuse non-UTF-8 names outright
        if fs::write(dir.path().join(name), content).is_err() {
            return;
        }
        let err = collect_posts(dir.path()).unwrap_err();
        assert!(matches!(err, ContentError::InvalidSlug(_)));
    }
}
