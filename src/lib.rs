//! The library code for the `herald` site build pipeline. The
//! architecture can be generally broken down into two distinct steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::name`],
//!    [`crate::post`])
//! 2. Deriving and writing the build artifacts ([`crate::routes`],
//!    [`crate::feed`], [`crate::build`])
//!
//! The second step produces the two artifacts the rest of the site build
//! consumes: the route list handed to the prerender and sitemap steps,
//! and the Atom feed document. Feed entries embed each post's body
//! rendered to strict self-closing markup ([`crate::markdown`]) with
//! author-supplied attribute text escaped ([`crate::escape`]). Routes and
//! feed both derive from the same discovery order — routes keep it, the
//! feed reverses it to read newest first.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod escape;
pub mod feed;
pub mod markdown;
pub mod name;
pub mod post;
pub mod routes;
