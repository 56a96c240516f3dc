//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use super::{ContentError, PostMetadata};

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter block of a post
///
/// `title` and `date` are required. A post is only published when the block
/// says `published: true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Epoch seconds
    pub date: i64,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Errors carry an empty path; callers attach theirs with `ContentError::at`.
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.trim_start();

        let (first, rest) = content.split_once('\n').unwrap_or((content, ""));
        if first.trim_end() != "---" {
            return Err(ContentError::MissingFrontMatter(PathBuf::new()));
        }

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                let yaml = &rest[..offset];
                let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
                let fm = serde_yaml::from_str::<FrontMatter>(yaml).map_err(|source| {
                    ContentError::FrontMatter {
                        path: PathBuf::new(),
                        source,
                    }
                })?;
                return Ok((fm, body));
            }
            offset += line.len();
        }

        Err(ContentError::UnterminatedFrontMatter(PathBuf::new()))
    }

    /// Turn the block into post metadata. The filename stem is the slug.
    pub fn into_metadata(self, stem: &str) -> PostMetadata {
        if let Some(declared) = self.slug.as_deref() {
            if declared != stem {
                tracing::warn!(
                    "Front-matter slug {:?} differs from file name {:?}, using the file name",
                    declared,
                    stem
                );
            }
        }

        PostMetadata {
            title: self.title,
            description: self.description,
            date: self.date,
            tags: self.tags,
            slug: stem.to_string(),
            published: self.published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
description: First post
date: 1704412800
tags:
  - rust
  - kernel
slug: hello-world
published: true
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.description, "First post");
        assert_eq!(fm.date, 1704412800);
        assert_eq!(fm.tags, vec!["rust", "kernel"]);
        assert_eq!(fm.slug.as_deref(), Some("hello-world"));
        assert!(fm.published);
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_defaults() {
        let content = "---\ntitle: Draft\ndate: 0\n---\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.description, "");
        assert!(fm.tags.is_empty());
        assert_eq!(fm.slug, None);
        assert!(!fm.published);
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: One\ndate: 1\ntags: Notes\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Win\r\ndate: 5\r\n---\r\nbody\r\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "Win");
        assert_eq!(remaining, "body\r\n");
    }

    #[test]
    fn test_body_horizontal_rule_is_kept() {
        let content = "---\ntitle: Rules\ndate: 5\n---\nabove\n\n---\n\nbelow\n";
        let (_, remaining) = FrontMatter::parse(content).unwrap();
        assert!(remaining.contains("above"));
        assert!(remaining.contains("below"));
    }

    #[test]
    fn test_missing_frontmatter() {
        let err = FrontMatter::parse("# Just markdown\n").unwrap_err();
        assert!(matches!(err, ContentError::MissingFrontMatter(_)));
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let err = FrontMatter::parse("---\ntitle: Open\ndate: 1\n").unwrap_err();
        assert!(matches!(err, ContentError::UnterminatedFrontMatter(_)));
    }

    #[test]
    fn test_missing_required_field() {
        let err = FrontMatter::parse("---\ntitle: No date\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
    }

    #[test]
    fn test_date_must_be_integer() {
        let err = FrontMatter::parse("---\ntitle: T\ndate: yesterday\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
    }

    #[test]
    fn test_into_metadata_uses_file_stem() {
        let (fm, _) =
            FrontMatter::parse("---\ntitle: T\ndate: 1\nslug: other\npublished: true\n---\n")
                .unwrap();
        let meta = fm.into_metadata("from-file");
        assert_eq!(meta.slug, "from-file");
        assert!(meta.published);
    }
}
