//! Exports the [`build_site`] function which stitches together the
//! high-level steps of deriving the build artifacts: discovering the post
//! source files, parsing each one into a [`Post`], deriving the route
//! list ([`crate::routes`]) and the feed document ([`crate::feed`]), and
//! writing both to the output directory for the downstream build plugins
//! (prerender, sitemap, feed).
//!
//! A failure in any post fails the whole build: a route list or feed
//! missing an entry would be silently wrong, where a loud failure is
//! visibly broken. Nothing is written until every post has parsed.

use crate::config::Config;
use crate::feed::{self, Error as FeedError};
use crate::name::{MalformedFilename, PostName};
use crate::post::{Error as PostError, Post};
use crate::routes;
use log::info;
use std::fmt;
use std::fs::{read_dir, File};
use std::io::Read;
use std::path::Path;

const MARKDOWN_EXTENSION: &str = ".md";

/// Build-environment switches handed in by the caller; the core never
/// reads the environment itself.
pub struct BuildFlags {
    /// When false (preview deployments), the prerender handoff is
    /// skipped. Routes and feed are derived and written regardless, since
    /// the sitemap and feed steps are unconditional.
    pub prerender: bool,
}

impl Default for BuildFlags {
    fn default() -> Self {
        BuildFlags { prerender: true }
    }
}

/// The derived artifacts, each in the order its consumers expect: routes
/// in discovery order, feed entries newest first.
pub struct Artifacts {
    pub routes: Vec<String>,
    pub feed: feed::Document,
}

/// Derives the artifacts for the current contents of the posts directory
/// without touching the output directory.
pub fn plan_site(config: &Config) -> Result<Artifacts> {
    let posts = parse_posts(&config.posts_source_directory)?;
    let routes = routes::enumerate(&config.site, &posts);
    let feed = feed::document(&config.site, &posts)?;
    Ok(Artifacts { routes, feed })
}

/// Derives the site artifacts and writes them into `output_directory` as
/// `routes.txt` and `atom.xml`.
pub fn build_site(config: &Config, output_directory: &Path, flags: &BuildFlags) -> Result<()> {
    let artifacts = plan_site(config)?;

    std::fs::create_dir_all(output_directory)?;

    let routes_path = output_directory.join("routes.txt");
    routes::write(&artifacts.routes, File::create(&routes_path)?)?;
    info!(
        "wrote {} routes to {}",
        artifacts.routes.len(),
        routes_path.display()
    );

    let feed_path = output_directory.join("atom.xml");
    feed::write_document(&artifacts.feed, File::create(&feed_path)?)?;
    info!(
        "wrote {} feed entries to {}",
        artifacts.feed.entries.len(),
        feed_path.display()
    );

    if flags.prerender {
        info!("route list ready for the prerender step");
    } else {
        info!("prerendering disabled for this deployment; skipping the handoff");
    }

    Ok(())
}

/// Enumerates the post files in `source_directory` (extension = `.md`)
/// and parses each one. Discovery order is file-name order, so a
/// directory snapshot always yields the same sequence regardless of
/// platform readdir order; under the `YYYY-MM-DD-` naming convention it
/// is also chronological.
fn parse_posts(source_directory: &Path) -> Result<Vec<Post>> {
    let mut file_names = Vec::new();
    for result in read_dir(source_directory)? {
        let entry = result?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.ends_with(MARKDOWN_EXTENSION) {
            file_names.push(file_name);
        }
    }
    file_names.sort();

    let mut posts = Vec::with_capacity(file_names.len());
    for file_name in file_names {
        posts.push(parse_post(source_directory, &file_name).map_err(|e| {
            Error::Annotated(format!("parsing post `{}`", file_name), Box::new(e))
        })?);
    }
    Ok(posts)
}

fn parse_post(source_directory: &Path, file_name: &str) -> Result<Post> {
    let name: PostName = file_name.parse()?;
    let mut contents = String::new();
    File::open(source_directory.join(file_name))?.read_to_string(&mut contents)?;
    Ok(Post::from_source(name, &contents)?)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for deriving the site artifacts. Errors can be during
/// file-name parsing, post parsing, feed building, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post file name violates the naming convention.
    Name(MalformedFilename),

    /// Returned when a post's front matter cannot be parsed.
    Post(PostError),

    /// Returned when the feed document cannot be built or written.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation naming the offending file.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Name(err) => err.fmt(f),
            Error::Post(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
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
            Error::Name(err) => Some(err),
            Error::Post(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<MalformedFilename> for Error {
    /// Converts [`MalformedFilename`]s into [`Error`]. This allows us to
    /// use the `?` operator when parsing file names.
    fn from(err: MalformedFilename) -> Error {
        Error::Name(err)
    }
}

impl From<PostError> for Error {
    /// Converts [`PostError`]s into [`Error`]. This allows us to use the
    /// `?` operator when parsing posts.
    fn from(err: PostError) -> Error {
        Error::Post(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator when building the feed.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_post(dir: &Path, file_name: &str) {
        let contents = "---\ntitle: t\ndescription: d\nauthor: a\n---\nbody\n";
        std::fs::write(dir.join(file_name), contents).unwrap();
    }

    // read_dir yields files in filesystem order; discovery must not.
    #[test]
    fn test_parse_posts_sorted_by_file_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_post(dir.path(), "2021-03-03-c.md");
        write_post(dir.path(), "2021-01-01-a.md");
        write_post(dir.path(), "2021-02-02-b.md");
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let posts = parse_posts(dir.path())?;
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn test_parse_posts_annotates_offending_file() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "2021-01-01-a.md");
        write_post(dir.path(), "not-a-post.md");

        let err = parse_posts(dir.path()).unwrap_err();
        assert!(
            err.to_string().contains("not-a-post.md"),
            "error {:?} should name the file",
            err.to_string()
        );
        match err {
            Error::Annotated(_, inner) => match *inner {
                Error::Name(_) => {}
                other => panic!("wanted a file-name error, got {:?}", other),
            },
            other => panic!("wanted an annotated error, got {:?}", other),
        }
    }
}
