//! Built-in templates using the Tera template engine
//!
//! The default template set is embedded in the binary, so a site only
//! needs a posts directory to build.

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Post, PostMetadata, ResolveError};
use crate::helpers::{date_xml, format_date_in, post_path, url_for};

/// Stylesheet referenced by the default layout
pub const DEFAULT_STYLESHEET: &str = include_str!("default/style.css");

/// Template renderer with the embedded default templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer; dates are shown in `tz`
    pub fn new(tz: Tz) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("index.html", include_str!("default/index.html")),
            ("post.html", include_str!("default/post.html")),
            ("404.html", include_str!("default/404.html")),
        ])?;

        tera.register_filter("format_date", DateFilter { tz, iso: false });
        tera.register_filter("date_iso", DateFilter { tz, iso: true });

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the post listing
    pub fn render_index(&self, site: &SiteData, posts: &[PostData]) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("posts", posts);
        self.render("index.html", &context)
    }

    /// Render a single post with links to its neighbours in the listing
    pub fn render_post(
        &self,
        site: &SiteData,
        post: &Post,
        newer: Option<&PostData>,
        older: Option<&PostData>,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("post", post);
        if let Some(newer) = newer {
            context.insert("newer", newer);
        }
        if let Some(older) = older {
            context.insert("older", older);
        }
        self.render("post.html", &context)
    }

    /// Render the page shown for a failed lookup
    pub fn render_not_found(&self, site: &SiteData, err: &ResolveError) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("status", &err.status().as_u16());
        context.insert("message", &err.to_string());
        self.render("404.html", &context)
    }
}

/// Tera filter: epoch seconds to a display or ISO 8601 date
struct DateFilter {
    tz: Tz,
    iso: bool,
}

impl tera::Filter for DateFilter {
    fn filter(
        &self,
        value: &tera::Value,
        _args: &HashMap<String, tera::Value>,
    ) -> tera::Result<tera::Value> {
        let timestamp = tera::try_get_value!("format_date", "value", i64, value);
        let formatted = if self.iso {
            date_xml(timestamp, &self.tz)
        } else {
            format_date_in(timestamp, &self.tz)
        };
        Ok(tera::Value::String(formatted))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
            root: url_for(config, ""),
        }
    }
}

/// A listed post: its metadata plus the link to its page
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    #[serde(flatten)]
    pub meta: PostMetadata,
    pub path: String,
}

impl PostData {
    pub fn new(config: &SiteConfig, meta: &PostMetadata) -> Self {
        Self {
            meta: meta.clone(),
            path: url_for(config, &post_path(&meta.slug)),
        }
    }
}
