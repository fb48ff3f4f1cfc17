use diesel::pg::Pg;
use diesel::prelude::*;
use helpers::slug::slug::name_from_slug;
use std::collections::HashSet;
use uuid::Uuid;

use super::model::PostStatus;
use crate::routes::catalog::model::Publisher;
use crate::schema::posts;
use crate::sql_functions::lower;

/// How a `publisher` query parameter was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum PublisherMatch {
    /// A stored publisher: posts linked to it, or whose developer is its name.
    Stored { id: Uuid, name: String },
    /// No stored publisher; the slug read back as a developer name.
    GuessedName(String),
}

impl PublisherMatch {
    pub fn resolve(slug: &str, stored: Option<Publisher>) -> Self {
        match stored {
            Some(publisher) => PublisherMatch::Stored {
                id: publisher.id,
                name: publisher.name,
            },
            None => PublisherMatch::GuessedName(name_from_slug(slug)),
        }
    }

    pub fn developer_name(&self) -> &str {
        match self {
            PublisherMatch::Stored { name, .. } => name,
            PublisherMatch::GuessedName(name) => name,
        }
    }
}

/// The narrowing steps applied to published posts. Each present step must hold.
#[derive(Debug, Default)]
pub struct PostFilter {
    /// Post slugs allowed by the genre filter; `None` when no genre was requested.
    pub genre_slugs: Option<HashSet<String>>,
    pub publisher: Option<PublisherMatch>,
}

impl PostFilter {
    /// A requested genre with no fixture matches rules out every post.
    pub fn matches_nothing(&self) -> bool {
        matches!(&self.genre_slugs, Some(slugs) if slugs.is_empty())
    }

    pub fn published_posts(&self) -> posts::BoxedQuery<'static, Pg> {
        let mut query = posts::table
            .filter(posts::status.eq(PostStatus::Published))
            .into_boxed();

        if let Some(slugs) = &self.genre_slugs {
            let mut slugs: Vec<String> = slugs.iter().cloned().collect();
            slugs.sort();
            query = query.filter(posts::slug.eq_any(slugs));
        }

        match &self.publisher {
            Some(PublisherMatch::Stored { id, name }) => {
                query = query.filter(
                    posts::publisher_id
                        .eq(*id)
                        .or(lower(posts::developer).eq(lower(name.clone()))),
                );
            }
            Some(PublisherMatch::GuessedName(name)) => {
                query = query.filter(lower(posts::developer).eq(lower(name.clone())));
            }
            None => {}
        }

        query
    }
}
