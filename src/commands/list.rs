//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::{sort_newest_first, PostMetadata};
use crate::helpers::format_date_in;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    for line in lines(blog, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// Build the listing printed by `run`
pub fn lines(blog: &Blog, content_type: &str) -> Result<Vec<String>> {
    let loader = blog.loader();
    let tz = blog.config.tz();

    let describe = |posts: &[PostMetadata], heading: &str| {
        let mut out = vec![format!("{} ({}):", heading, posts.len())];
        for post in posts {
            out.push(format!(
                "  {} - {} [{}]",
                format_date_in(post.date, &tz),
                post.title,
                post.slug
            ));
        }
        out
    };

    let out = match content_type {
        "post" | "posts" => {
            let mut posts = loader.collect()?;
            sort_newest_first(&mut posts);
            describe(&posts, "Posts")
        }
        "draft" | "drafts" => {
            let mut drafts: Vec<_> = loader
                .collect_all()?
                .into_iter()
                .filter(|p| !p.published)
                .collect();
            sort_newest_first(&mut drafts);
            describe(&drafts, "Drafts")
        }
        "tag" | "tags" => {
            let posts = loader.collect()?;
            let mut tags: HashMap<&str, usize> = HashMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *tags.entry(tag.as_str()).or_insert(0) += 1;
                }
            }
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

            let mut out = vec![format!("Tags ({}):", tags.len())];
            out.extend(tags.into_iter().map(|(tag, count)| format!("  {} ({})", tag, count)));
            out
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, draft, tag",
                content_type
            );
        }
    };

    Ok(out)
}
