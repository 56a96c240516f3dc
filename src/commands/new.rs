//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Blog;

/// Scaffold an unpublished post named after its title
pub fn create_post(blog: &Blog, title: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&blog.posts_dir)?;

    let file_path = blog.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let front_matter = FrontMatter {
        title: title.to_string(),
        description: String::new(),
        date: chrono::Utc::now().timestamp(),
        tags: Vec::new(),
        slug: Some(slug),
        published: false,
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&front_matter)?);

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_post() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let path = create_post(&blog, "Hello: World!").unwrap();
        assert_eq!(path, blog.posts_dir.join("hello-world.md"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, body) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title, "Hello: World!");
        assert_eq!(fm.slug.as_deref(), Some("hello-world"));
        assert!(!fm.published);
        assert!(fm.date > 0);
        assert!(body.is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        create_post(&blog, "Twice").unwrap();
        assert!(create_post(&blog, "Twice").is_err());
    }

    #[test]
    fn test_new_post_is_a_draft() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        create_post(&blog, "Draft").unwrap();

        let loader = blog.loader();
        assert!(loader.collect().unwrap().is_empty());
        assert_eq!(loader.resolve("draft").unwrap().meta.title, "Draft");
    }
}
