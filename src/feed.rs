//! Builds the feed inputs handed to the feed-document renderer: one entry
//! per post plus the document-level site metadata, and the Atom XML
//! serialization of the whole document. Entry attribute text is escaped
//! exactly once, here, via [`crate::escape`]; the rendered body is
//! embedded as-is because [`crate::markdown`] already guarantees a
//! well-formed fragment.

use crate::config::Site;
use crate::escape;
use crate::markdown;
use crate::post::Post;
use crate::routes;
use chrono::{NaiveDateTime, NaiveTime};
use std::fmt;
use std::io::Write;

/// `updated` timestamps render at millisecond precision, midnight UTC of
/// the publish date.
const UPDATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// One syndication entry. `title`, `author`, and `summary` are already
/// escaped for embedding; `content` is rendered markup and must not be
/// escaped again. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub url: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub summary: String,
    pub updated: String,
}

/// The feed document inputs handed downstream: site metadata plus the
/// ordered entry list, newest first.
#[derive(Clone, Debug)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub entries: Vec<Entry>,
}

/// Builds the feed entry for a single post: attributes escaped, body
/// rendered, the entry URL composed from the site URL and the post-show
/// path, and `updated` formatted from the publish date.
pub fn entry(site: &Site, post: &Post) -> Result<Entry> {
    let updated = NaiveDateTime::new(post.date, NaiveTime::from_hms(0, 0, 0))
        .format(UPDATED_FORMAT)
        .to_string();
    Ok(Entry {
        url: post_url(site, &post.id),
        title: escape::text(&post.front.title),
        author: escape::text(&post.front.author),
        content: markdown::to_xhtml(&post.body)?,
        summary: escape::text(&post.front.description),
        updated,
    })
}

/// Builds the full feed document for `posts`, which arrive in discovery
/// order. The entry list is reversed so the feed reads newest first —
/// the one place in the pipeline where the discovery order is not kept.
pub fn document(site: &Site, posts: &[Post]) -> Result<Document> {
    let mut entries = Vec::with_capacity(posts.len());
    for post in posts {
        entries.push(entry(site, post).map_err(|e| {
            Error::Annotated(format!("building feed entry for `{}`", post.id), Box::new(e))
        })?);
    }
    entries.reverse();
    Ok(Document {
        url: site_url(site),
        title: site.title.clone(),
        subtitle: site.description.clone(),
        entries,
    })
}

/// Serializes `document` to Atom XML. Site metadata is escaped here at
/// splice time; entry fields arrive pre-escaped and are written as-is,
/// with each entry's content embedded as inline XHTML.
pub fn write_document<W: Write>(document: &Document, mut w: W) -> Result<()> {
    // Atom requires a feed-level timestamp; the newest entry's keeps the
    // output a pure function of the directory snapshot.
    let updated = document
        .entries
        .first()
        .map(|entry| entry.updated.as_str())
        .unwrap_or("1970-01-01T00:00:00.000Z");

    writeln!(w, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
    writeln!(w, r#"<feed xmlns="http://www.w3.org/2005/Atom">"#)?;
    writeln!(w, "  <title>{}</title>", escape::text(&document.title))?;
    writeln!(w, "  <subtitle>{}</subtitle>", escape::text(&document.subtitle))?;
    writeln!(w, r#"  <link href="{}/atom.xml" rel="self" />"#, escape::text(&document.url))?;
    writeln!(w, r#"  <link href="{}" rel="alternate" />"#, escape::text(&document.url))?;
    writeln!(w, "  <id>{}/</id>", escape::text(&document.url))?;
    writeln!(w, "  <updated>{}</updated>", updated)?;
    for entry in &document.entries {
        writeln!(w, "  <entry>")?;
        writeln!(w, "    <title>{}</title>", entry.title)?;
        writeln!(w, "    <id>{}</id>", entry.url)?;
        writeln!(w, r#"    <link href="{}" rel="alternate" />"#, entry.url)?;
        writeln!(w, "    <updated>{}</updated>", entry.updated)?;
        writeln!(w, "    <author><name>{}</name></author>", entry.author)?;
        writeln!(w, "    <summary>{}</summary>", entry.summary)?;
        writeln!(
            w,
            r#"    <content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml">{}</div></content>"#,
            entry.content
        )?;
        writeln!(w, "  </entry>")?;
    }
    writeln!(w, "</feed>")?;
    Ok(())
}

fn site_url(site: &Site) -> String {
    site.url.as_str().trim_end_matches('/').to_owned()
}

fn post_url(site: &Site, id: &str) -> String {
    format!("{}{}{}", site_url(site), routes::POST_PATH_PREFIX, id)
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem building or writing the feed document.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post body fails to render.
    Render(markdown::Error),

    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// An error with an annotation naming the offending post.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Render(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Render(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<markdown::Error> for Error {
    /// Converts [`markdown::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: markdown::Error) -> Error {
        Error::Render(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
