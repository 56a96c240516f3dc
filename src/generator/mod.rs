//! Generator module - writes the static site using the built-in templates

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{sort_newest_first, PostLoader, PostMetadata, ResolveError};
use crate::templates::{PostData, SiteData, TemplateRenderer, DEFAULT_STYLESHEET};
use crate::Blog;

/// Static site generator
pub struct Generator {
    blog: Blog,
    loader: PostLoader,
    renderer: TemplateRenderer,
    site: SiteData,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new(blog.config.tz())?;

        Ok(Self {
            blog: blog.clone(),
            loader: blog.loader(),
            renderer,
            site: SiteData::from_config(&blog.config),
        })
    }

    /// Generate the entire site, returning the number of posts built
    pub fn generate(&self) -> Result<usize> {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create dir {:?}", public_dir))?;

        // Any invalid source halts the build
        let mut posts = self.loader.collect()?;
        sort_newest_first(&mut posts);
        tracing::info!("Collected {} published posts", posts.len());

        let listed: Vec<PostData> = posts
            .iter()
            .map(|meta| PostData::new(&self.blog.config, meta))
            .collect();

        self.generate_index(&listed)?;
        self.generate_post_pages(&listed)?;
        self.generate_not_found()?;
        self.generate_posts_json(&posts)?;
        self.write_file(&public_dir.join("style.css"), DEFAULT_STYLESHEET)?;
        self.copy_static_assets()?;

        Ok(posts.len())
    }

    /// Generate the post listing
    fn generate_index(&self, posts: &[PostData]) -> Result<()> {
        let html = self.renderer.render_index(&self.site, posts)?;
        self.write_file(&self.blog.public_dir.join("index.html"), &html)?;
        tracing::debug!("Generated index with {} posts", posts.len());
        Ok(())
    }

    /// Generate one page per published post under posts/<slug>/
    fn generate_post_pages(&self, posts: &[PostData]) -> Result<()> {
        let posts_out = self.blog.public_dir.join("posts");
        // Pages of removed or unpublished posts must not linger
        if posts_out.exists() {
            fs::remove_dir_all(&posts_out)
                .with_context(|| format!("Failed to remove {:?}", posts_out))?;
        }

        for (i, listed) in posts.iter().enumerate() {
            let slug = &listed.meta.slug;
            let post = self
                .loader
                .resolve(slug)
                .with_context(|| format!("Failed to build post {:?}", slug))?;

            let newer = i.checked_sub(1).and_then(|j| posts.get(j));
            let older = posts.get(i + 1);

            let html = self.renderer.render_post(&self.site, &post, newer, older)?;
            let output_path = posts_out.join(slug).join("index.html");
            self.write_file(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate the page served for unknown posts
    fn generate_not_found(&self) -> Result<()> {
        let err = ResolveError::NotFound {
            slug: String::new(),
        };
        let html = self.renderer.render_not_found(&self.site, &err)?;
        self.write_file(&self.blog.public_dir.join("404.html"), &html)
    }

    /// Generate posts.json, the published metadata in listing order
    fn generate_posts_json(&self, posts: &[PostMetadata]) -> Result<()> {
        let json = serde_json::to_string_pretty(posts)?;
        self.write_file(&self.blog.public_dir.join("posts.json"), &json)
    }

    /// Copy the static directory tree into the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                let dest = self.blog.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)
                    .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
                copied += 1;
            }
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
    }
}
