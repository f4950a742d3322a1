//! Enumerates the site's navigable routes: the configured static routes
//! followed by one post route per post. The list feeds the prerender and
//! sitemap steps, both of which are order-insensitive; the order here is
//! simply deterministic for a given set of posts.

use crate::config::Site;
use crate::post::Post;
use std::io::{self, Write};

/// The path under which individual posts are shown. Post routes and feed
/// entry URLs are both composed from it.
pub const POST_PATH_PREFIX: &str = "/blog/show/";

/// Returns every route the site serves: the static routes first, then one
/// route per post in discovery order (not reversed, unlike the feed).
pub fn enumerate(site: &Site, posts: &[Post]) -> Vec<String> {
    let mut routes = Vec::with_capacity(site.static_routes.len() + posts.len());
    routes.extend(site.static_routes.iter().cloned());
    routes.extend(posts.iter().map(|post| post_route(&post.id)));
    routes
}

/// The route for a single post id.
pub fn post_route(id: &str) -> String {
    format!("{}{}", POST_PATH_PREFIX, id)
}

/// Writes the route list, one path per line.
pub fn write<W: Write>(routes: &[String], mut w: W) -> io::Result<()> {
    for route in routes {
        writeln!(w, "{}", route)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::Frontmatter;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use url::Url;

    fn test_site() -> Site {
        Site {
            url: Url::parse("https://example.com").unwrap(),
            title: "Example".to_owned(),
            description: "An example site".to_owned(),
            static_routes: vec!["/".to_owned(), "/features".to_owned(), "/blog".to_owned()],
        }
    }

    fn test_post(id: &str) -> Post {
        Post {
            id: id.to_owned(),
            date: NaiveDate::from_ymd(2020, 1, 1),
            front: Frontmatter {
                title: "t".to_owned(),
                description: "d".to_owned(),
                author: "a".to_owned(),
                extra: HashMap::new(),
            },
            body: String::new(),
        }
    }

    #[test]
    fn test_enumerate() {
        let posts = vec![test_post("first"), test_post("second"), test_post("third")];
        let routes = enumerate(&test_site(), &posts);
        assert_eq!(
            routes,
            vec![
                "/",
                "/features",
                "/blog",
                "/blog/show/first",
                "/blog/show/second",
                "/blog/show/third",
            ]
        );
    }

    #[test]
    fn test_enumerate_counts() {
        let site = test_site();
        for n in 0..4 {
            let posts: Vec<Post> = (0..n).map(|i| test_post(&format!("p{}", i))).collect();
            assert_eq!(enumerate(&site, &posts).len(), site.static_routes.len() + n);
        }
    }

    #[test]
    fn test_every_route_starts_with_slash() {
        let posts = vec![test_post("a"), test_post("b")];
        for route in enumerate(&test_site(), &posts) {
            assert!(route.starts_with('/'), "route {:?} missing leading `/`", route);
        }
    }

    #[test]
    fn test_write() -> io::Result<()> {
        let routes = vec!["/".to_owned(), "/blog/show/a".to_owned()];
        let mut out = Vec::new();
        write(&routes, &mut out)?;
        assert_eq!(String::from_utf8(out).unwrap(), "/\n/blog/show/a\n");
        Ok(())
    }
}
