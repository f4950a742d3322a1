//! Parses post identifiers and publish dates from source file names. Post
//! files follow a fixed positional naming convention:
//!
//! ```text
//! {YYYY-MM-DD}-{id}.md
//! ```
//!
//! The leading ten bytes are the publish date and `{id}` is the post's
//! URL-safe identifier (`[A-Za-z0-9_-]+`), e.g.
//! `2020-01-01-1-hello-world.md` names the post `1-hello-world` published
//! on 2020-01-01. Ids must be unique across the corpus; that invariant is
//! the site's to keep, not this parser's. Everything downstream (routes,
//! feed entries) keys off the result, so a name that doesn't fit the
//! grammar is a hard error rather than a skipped file.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

const MARKDOWN_EXTENSION: &str = ".md";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10; // "YYYY-MM-DD"

/// The identifier and publish date encoded in a post's file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostName {
    /// The post's URL-safe identifier, used in routes and entry URLs.
    pub id: String,

    /// The publish date from the name's date prefix.
    pub date: NaiveDate,
}

impl FromStr for PostName {
    type Err = MalformedFilename;

    fn from_str(name: &str) -> Result<PostName, MalformedFilename> {
        let malformed = |detail: String| MalformedFilename {
            name: name.to_owned(),
            detail,
        };

        let stem = name
            .strip_suffix(MARKDOWN_EXTENSION)
            .ok_or_else(|| malformed(format!("missing `{}` extension", MARKDOWN_EXTENSION)))?;

        let date_prefix = stem
            .get(..DATE_LEN)
            .ok_or_else(|| malformed("missing `YYYY-MM-DD` date prefix".to_owned()))?;
        let date = NaiveDate::parse_from_str(date_prefix, DATE_FORMAT)
            .map_err(|e| malformed(format!("bad date prefix `{}`: {}", date_prefix, e)))?;

        if stem.as_bytes().get(DATE_LEN) != Some(&b'-') {
            return Err(malformed("expected `-` between date and id".to_owned()));
        }

        let id = &stem[DATE_LEN + 1..];
        if id.is_empty() {
            return Err(malformed("empty id".to_owned()));
        }
        if !id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(malformed(
                "id may only contain ASCII letters, digits, `-`, and `_`".to_owned(),
            ));
        }

        Ok(PostName {
            id: id.to_owned(),
            date,
        })
    }
}

/// Returned when a file name doesn't fit the post naming convention.
#[derive(Debug)]
pub struct MalformedFilename {
    pub name: String,
    pub detail: String,
}

impl fmt::Display for MalformedFilename {
    /// Displays a [`MalformedFilename`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "malformed post file name `{}`: {}",
            self.name, self.detail
        )
    }
}

impl std::error::Error for MalformedFilename {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let name: PostName = "2020-01-01-1-hello-world.md".parse().unwrap();
        assert_eq!(name.id, "1-hello-world");
        assert_eq!(name.date, NaiveDate::from_ymd(2020, 1, 1));
    }

    #[test]
    fn test_parse_simple_id() {
        let name: PostName = "2021-04-16-greetings.md".parse().unwrap();
        assert_eq!(name.id, "greetings");
        assert_eq!(name.date, NaiveDate::from_ymd(2021, 4, 16));
    }

    #[test]
    fn test_missing_extension() {
        fixture_malformed("2020-01-01-hello", "extension");
    }

    #[test]
    fn test_missing_date_prefix() {
        fixture_malformed("hello.md", "date prefix");
    }

    #[test]
    fn test_unpadded_date() {
        fixture_malformed("2020-1-1-hello.md", "date prefix");
    }

    #[test]
    fn test_impossible_date() {
        fixture_malformed("2020-13-01-hello.md", "date prefix");
    }

    #[test]
    fn test_missing_separator() {
        fixture_malformed("2020-01-01hello.md", "`-`");
    }

    #[test]
    fn test_empty_id() {
        fixture_malformed("2020-01-01-.md", "empty id");
    }

    #[test]
    fn test_unsafe_id() {
        fixture_malformed("2020-01-01-hello world.md", "id may only contain");
    }

    fn fixture_malformed(name: &str, wanted_detail: &str) {
        let err = name.parse::<PostName>().unwrap_err();
        assert!(
            err.detail.contains(wanted_detail),
            "detail {:?} should mention {:?}",
            err.detail,
            wanted_detail
        );
        assert!(err.to_string().contains(name));
    }
}
