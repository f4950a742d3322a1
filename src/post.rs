//! Defines the [`Post`] type and the front-matter extractor that splits a
//! post source file into its attributes and body. A post file is
//! structured as follows:
//!
//! 1. Initial front-matter fence (`---`)
//! 2. YAML front matter with fields `title`, `description`, and `author`
//!    (arbitrary extra fields are allowed)
//! 3. Terminal front-matter fence (`---`)
//! 4. Post body
//!
//! For example:
//!
//! ```md
//! ---
//! title: Hello, world!
//! description: The first post
//! author: J
//! ---
//! # Hello
//!
//! World
//! ```
//!
//! Attribute values come back raw; escaping for the feed document happens
//! later, in [`crate::escape`].

use crate::name::PostName;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// A post's front-matter attributes. `title`, `description`, and `author`
/// are author-supplied text and arrive unescaped. Fields beyond the known
/// ones are captured in `extra` without interpretation.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Frontmatter {
    pub title: String,
    pub description: String,
    pub author: String,

    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// A parsed post: the identifier and date recovered from the file name,
/// the front-matter attributes, and the raw (unrendered) body.
#[derive(Clone, Debug)]
pub struct Post {
    pub id: String,
    pub date: NaiveDate,
    pub front: Frontmatter,
    pub body: String,
}

impl Post {
    /// Parses a post from its file-name parts and source text.
    pub fn from_source(name: PostName, input: &str) -> Result<Post> {
        let (front, body) = extract(input)?;
        Ok(Post {
            id: name.id,
            date: name.date,
            front,
            body: body.to_owned(),
        })
    }
}

/// Splits a post source file into its front-matter attributes and body.
/// The file must open with a `---` fence. The returned body starts at the
/// byte immediately after the closing fence and is otherwise untouched.
pub fn extract(input: &str) -> Result<(Frontmatter, &str)> {
    let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
    let front = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;
    Ok((front, &input[body_start..]))
}

fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    match input[FENCE.len()..].find(FENCE) {
        None => Err(Error::FrontmatterMissingEndFence),
        Some(offset) => Ok((
            FENCE.len(),                        // yaml_start
            FENCE.len() + offset,               // yaml_stop
            FENCE.len() + offset + FENCE.len(), // body_start
        )),
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting
    /// front-matter fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal
    /// front-matter fence (the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the front matter as YAML.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SIMPLE: &str = "---\ntitle: Hello\ndescription: First post\nauthor: J\n---\nhi\n";

    #[test]
    fn test_extract() -> Result<()> {
        let (front, body) = extract(SIMPLE)?;
        assert_eq!(front.title, "Hello");
        assert_eq!(front.description, "First post");
        assert_eq!(front.author, "J");
        assert!(front.extra.is_empty());
        assert_eq!(body, "\nhi\n");
        Ok(())
    }

    // The body must come back byte-for-byte from the byte after the
    // closing fence; nothing is trimmed or normalized.
    #[test]
    fn test_extract_preserves_body_bytes() -> Result<()> {
        let input = "---\ntitle: T\ndescription: D\nauthor: A\n---\n\n  indented\ttabs\n\n";
        let (_, body) = extract(input)?;
        assert_eq!(body, "\n\n  indented\ttabs\n\n");
        Ok(())
    }

    #[test]
    fn test_extract_extra_fields() -> Result<()> {
        let input = "---\ntitle: T\ndescription: D\nauthor: A\nhero: true\ntags: [a, b]\n---\nbody";
        let (front, _) = extract(input)?;
        assert!(front.extra.contains_key("hero"));
        assert!(front.extra.contains_key("tags"));
        Ok(())
    }

    #[test]
    fn test_missing_start_fence() {
        match extract("title: T\n---\nbody") {
            Err(Error::FrontmatterMissingStartFence) => {}
            other => panic!("wanted missing start fence, got {:?}", other.map(|(f, _)| f)),
        }
    }

    #[test]
    fn test_missing_end_fence() {
        match extract("---\ntitle: T\n") {
            Err(Error::FrontmatterMissingEndFence) => {}
            other => panic!("wanted missing end fence, got {:?}", other.map(|(f, _)| f)),
        }
    }

    #[test]
    fn test_missing_required_attribute() {
        match extract("---\ntitle: T\nauthor: A\n---\nbody") {
            Err(Error::DeserializeYaml(_)) => {}
            other => panic!("wanted YAML error, got {:?}", other.map(|(f, _)| f)),
        }
    }

    #[test]
    fn test_from_source() -> Result<()> {
        let name = PostName {
            id: "hello".to_owned(),
            date: NaiveDate::from_ymd(2020, 1, 1),
        };
        let post = Post::from_source(name, SIMPLE)?;
        assert_eq!(post.id, "hello");
        assert_eq!(post.date, NaiveDate::from_ymd(2020, 1, 1));
        assert_eq!(post.front.title, "Hello");
        assert_eq!(post.body, "\nhi\n");
        Ok(())
    }
}
