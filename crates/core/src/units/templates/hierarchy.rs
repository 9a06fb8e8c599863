//! Request classification into template types.
//!
//! Tiers mirror the host's content hierarchy, most specific first:
//! not-found, search, front page, home, singular, archive, then `index`.
//! A tier only contributes when its condition holds, and each tier lists its
//! own names from most to least specific. Resolution takes the first name
//! that has a handler, so a tier without a handler falls through to the next.

use super::registry::{HandlerEntry, TemplateRegistry};
use trellis_api::{Conditional, QueriedObject, RequestState};

pub const FALLBACK_TEMPLATE: &str = "index";

/// Every candidate template type for the request, in resolution order.
pub fn candidates(request: &dyn RequestState) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: String| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    if request.is(Conditional::NotFound) {
        push("404".into());
    }
    if request.is(Conditional::Search) {
        push("search".into());
    }
    if request.is(Conditional::FrontPage) {
        push("front-page".into());
    }
    if request.is(Conditional::Home) {
        push("home".into());
    }
    if request.is(Conditional::Singular) {
        singular_candidates(request).into_iter().for_each(&mut push);
    }
    if is_archive(request) {
        archive_candidates(request).into_iter().for_each(&mut push);
    }
    push(FALLBACK_TEMPLATE.into());

    names
}

/// First candidate with a registered handler.
pub fn resolve<'r>(
    registry: &'r TemplateRegistry,
    request: &dyn RequestState,
) -> Option<(String, &'r HandlerEntry)> {
    candidates(request)
        .into_iter()
        .find_map(|name| registry.lookup(&name).map(|entry| (name, entry)))
}

fn singular_candidates(request: &dyn RequestState) -> Vec<String> {
    let post = match request.queried_object() {
        Some(QueriedObject::Post { id, post_type, slug }) => Some((*id, post_type.as_str(), slug.as_str())),
        _ => None,
    };

    if request.is(Conditional::Attachment) {
        return vec![
            "attachment".into(),
            "single-attachment".into(),
            "single".into(),
            "singular".into(),
        ];
    }

    if request.is(Conditional::Page) {
        let mut names = Vec::new();
        if let Some((id, _, slug)) = post {
            if !slug.is_empty() {
                names.push(format!("page-{}", slug));
            }
            names.push(format!("page-{}", id));
        }
        names.push("page".into());
        names.push("singular".into());
        return names;
    }

    let mut names = Vec::new();
    if let Some((_, post_type, slug)) = post {
        if !slug.is_empty() {
            names.push(format!("single-{}-{}", post_type, slug));
        }
        names.push(format!("single-{}", post_type));
    }
    names.push("single".into());
    names.push("singular".into());
    names
}

fn is_archive(request: &dyn RequestState) -> bool {
    [
        Conditional::Archive,
        Conditional::PostTypeArchive,
        Conditional::Category,
        Conditional::Tag,
        Conditional::Taxonomy,
        Conditional::Author,
        Conditional::Date,
    ]
    .into_iter()
    .any(|c| request.is(c))
}

fn archive_candidates(request: &dyn RequestState) -> Vec<String> {
    let queried = request.queried_object();
    let mut names = Vec::new();

    if request.is(Conditional::PostTypeArchive) {
        let post_type = match queried {
            Some(QueriedObject::PostType { name }) => Some(name.as_str()),
            Some(QueriedObject::Post { post_type, .. }) => Some(post_type.as_str()),
            _ => None,
        };
        if let Some(post_type) = post_type {
            names.push(format!("archive-{}", post_type));
        }
    } else if request.is(Conditional::Category) {
        term_candidates(&mut names, "category", queried);
    } else if request.is(Conditional::Tag) {
        term_candidates(&mut names, "tag", queried);
    } else if request.is(Conditional::Taxonomy) {
        if let Some(QueriedObject::Term { taxonomy, slug, .. }) = queried {
            if !slug.is_empty() {
                names.push(format!("taxonomy-{}-{}", taxonomy, slug));
            }
            names.push(format!("taxonomy-{}", taxonomy));
        }
        names.push("taxonomy".into());
    } else if request.is(Conditional::Author) {
        if let Some(QueriedObject::Author { id, nicename }) = queried {
            if !nicename.is_empty() {
                names.push(format!("author-{}", nicename));
            }
            names.push(format!("author-{}", id));
        }
        names.push("author".into());
    } else if request.is(Conditional::Date) {
        names.push("date".into());
    }

    names.push("archive".into());
    names
}

fn term_candidates(names: &mut Vec<String>, tier: &str, queried: Option<&QueriedObject>) {
    if let Some(QueriedObject::Term { id, slug, .. }) = queried {
        if !slug.is_empty() {
            names.push(format!("{}-{}", tier, slug));
        }
        names.push(format!("{}-{}", tier, id));
    }
    names.push(tier.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_api::{ClassName, StaticRequest};

    #[test]
    fn test_singular_post_type_candidates() {
        let request = StaticRequest::singular("product", 42, "blue-shirt");
        assert_eq!(
            candidates(&request),
            vec![
                "single-product-blue-shirt",
                "single-product",
                "single",
                "singular",
                "index"
            ]
        );
    }

    #[test]
    fn test_page_candidates() {
        let request = StaticRequest::singular("page", 7, "about");
        assert_eq!(
            candidates(&request),
            vec!["page-about", "page-7", "page", "singular", "index"]
        );
    }

    #[test]
    fn test_front_page_falls_through_to_page() {
        let request = StaticRequest::singular("page", 2, "welcome").with(Conditional::FrontPage);
        let names = candidates(&request);
        assert_eq!(names[0], "front-page");
        assert_eq!(names[1], "page-welcome");
        assert_eq!(names.last().unwrap(), "index");
    }

    #[test]
    fn test_taxonomy_candidates() {
        let request = StaticRequest::new()
            .with(Conditional::Archive)
            .with(Conditional::Taxonomy)
            .queried(QueriedObject::term(3, "genre", "jazz"));
        assert_eq!(
            candidates(&request),
            vec![
                "taxonomy-genre-jazz",
                "taxonomy-genre",
                "taxonomy",
                "archive",
                "index"
            ]
        );
    }

    #[test]
    fn test_category_without_archive_flag() {
        let request = StaticRequest::new()
            .with(Conditional::Category)
            .queried(QueriedObject::term(9, "category", "news"));
        assert_eq!(
            candidates(&request),
            vec!["category-news", "category-9", "category", "archive", "index"]
        );
    }

    #[test]
    fn test_empty_slugs_are_not_candidates() {
        let tag = StaticRequest::new()
            .with(Conditional::Tag)
            .queried(QueriedObject::term(5, "post_tag", ""));
        assert_eq!(candidates(&tag), vec!["tag-5", "tag", "archive", "index"]);

        let author = StaticRequest::new()
            .with(Conditional::Author)
            .queried(QueriedObject::author(12, ""));
        assert_eq!(candidates(&author), vec!["author-12", "author", "archive", "index"]);

        let mut registry = TemplateRegistry::new();
        registry.register("tag-*", &ClassName::new("App\\Http\\TagController"), 10);
        let (name, _) = resolve(&registry, &tag).unwrap();
        assert_eq!(name, "tag-5");
    }

    #[test]
    fn test_not_found_and_search() {
        assert_eq!(
            candidates(&StaticRequest::new().with(Conditional::NotFound)),
            vec!["404", "index"]
        );
        assert_eq!(
            candidates(&StaticRequest::new().with(Conditional::Search)),
            vec!["search", "index"]
        );
    }

    #[test]
    fn test_empty_request_is_index() {
        assert_eq!(candidates(&StaticRequest::new()), vec!["index"]);
    }
}
