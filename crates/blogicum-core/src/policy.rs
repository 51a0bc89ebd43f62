//! Visibility and access rules for posts and comments.
//!
//! Everything here is a pure function of already-loaded data and the current
//! time. Repositories translate [`PostFilter`] into their own query language;
//! the in-memory store evaluates [`PostFilter::matches`] directly.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Authored, Category, Post, User};
use crate::error::DomainError;

/// Predicate over posts, independent of any storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostFilter {
    /// Only posts written by this user.
    pub author_id: Option<Uuid>,
    /// Only posts filed under this category.
    pub category_id: Option<Uuid>,
    /// When set, only posts the public may see at this instant: published,
    /// `pub_date` not after it, and filed under a published category.
    pub public_at: Option<DateTime<Utc>>,
}

impl PostFilter {
    /// Every post, unfiltered.
    pub fn all() -> Self {
        Self::default()
    }

    /// The public filter at `now`.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            public_at: Some(now),
            ..Self::default()
        }
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Evaluate against a post and the category it references, if any.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.author_id.is_some_and(|id| id != post.author_id) {
            return false;
        }
        if self
            .category_id
            .is_some_and(|id| post.category_id != Some(id))
        {
            return false;
        }
        match self.public_at {
            Some(now) => is_public(post, category, now),
            None => true,
        }
    }
}

/// The listing a page of posts is drawn from.
#[derive(Debug, Clone, Copy)]
pub enum Listing<'a> {
    Feed,
    Category(&'a Category),
    Profile(&'a User),
}

fn is_public(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && post.pub_date <= now && category.is_some_and(|c| c.is_published)
}

/// Whether `viewer` may read `post`. The author always may; anyone else
/// only while the post is public.
pub fn can_view_post(
    post: &Post,
    category: Option<&Category>,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> bool {
    viewer == Some(post.author_id) || PostFilter::public(now).matches(post, category)
}

/// Like [`can_view_post`], but a denial is reported exactly as a missing row.
pub fn ensure_post_visible(
    post: &Post,
    category: Option<&Category>,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if can_view_post(post, category, viewer, now) {
        Ok(())
    } else {
        Err(DomainError::not_found("post", post.id))
    }
}

pub fn can_view_category(category: &Category) -> bool {
    category.is_published
}

/// A hidden category is reported exactly as a missing one.
pub fn ensure_category_visible(category: &Category) -> Result<(), DomainError> {
    if can_view_category(category) {
        Ok(())
    } else {
        Err(DomainError::not_found("category", &category.slug))
    }
}

/// Build the predicate for a listing as seen by `viewer` at `now`.
pub fn listing_filter(
    listing: Listing<'_>,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<PostFilter, DomainError> {
    match listing {
        Listing::Feed => Ok(PostFilter::public(now)),
        Listing::Category(category) => {
            ensure_category_visible(category)?;
            Ok(PostFilter::public(now).in_category(category.id))
        }
        Listing::Profile(profile) if viewer == Some(profile.id) => {
            Ok(PostFilter::all().by_author(profile.id))
        }
        Listing::Profile(profile) => Ok(PostFilter::public(now).by_author(profile.id)),
    }
}

/// Only the author may edit or delete their content.
pub fn can_mutate<T: Authored + ?Sized>(item: &T, actor: Uuid) -> bool {
    item.author_id() == actor
}

/// Where a denied mutation sends the actor instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    PostDetail { post_id: Uuid },
}

impl Redirect {
    pub fn location(&self) -> String {
        match self {
            Redirect::PostDetail { post_id } => format!("/api/posts/{post_id}"),
        }
    }
}

/// Result of a mutation attempt: either it ran, or the actor was sent to a
/// read-only view and nothing changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    Redirect(Redirect),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }
}

/// `None` when `actor` owns `item`, otherwise the redirect to serve.
pub fn authorize_mutation<T: Authored + ?Sized>(
    item: &T,
    actor: Uuid,
    post_id: Uuid,
) -> Option<Redirect> {
    if can_mutate(item, actor) {
        None
    } else {
        tracing::debug!(%actor, owner = %item.author_id(), %post_id, "mutation denied");
        Some(Redirect::PostDetail { post_id })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::{Comment, PostDraft};

    fn category(published: bool) -> Category {
        Category::new("Travel".into(), "Trips".into(), "travel".into(), published)
    }

    fn post(author: Uuid, category: &Category, pub_date: DateTime<Utc>, published: bool) -> Post {
        Post::new(
            author,
            PostDraft {
                title: "Title".into(),
                text: "Body".into(),
                pub_date,
                is_published: published,
                category_id: Some(category.id),
                location_id: None,
                image: None,
            },
        )
    }

    fn user(name: &str) -> User {
        User::new(name.into(), String::new(), "hash".into())
    }

    #[test]
    fn owner_sees_own_post_in_every_state() {
        let now = Utc::now();
        let author = Uuid::new_v4();
        for cat_published in [true, false] {
            let cat = category(cat_published);
            for published in [true, false] {
                for offset in [-1, 1] {
                    let p = post(author, &cat, now + Duration::days(offset), published);
                    assert!(can_view_post(&p, Some(&cat), Some(author), now));
                }
            }
        }
    }

    #[test]
    fn unpublished_post_hidden_from_others() {
        let now = Utc::now();
        let cat = category(true);
        let p = post(Uuid::new_v4(), &cat, now - Duration::days(1), false);

        assert!(!can_view_post(&p, Some(&cat), None, now));
        assert!(!can_view_post(&p, Some(&cat), Some(Uuid::new_v4()), now));
    }

    #[test]
    fn scheduled_post_appears_once_due() {
        let now = Utc::now();
        let cat = category(true);
        let p = post(Uuid::new_v4(), &cat, now + Duration::hours(1), true);

        assert!(!can_view_post(&p, Some(&cat), None, now));
        assert!(can_view_post(&p, Some(&cat), None, now + Duration::hours(1)));
        assert!(can_view_post(&p, Some(&cat), None, now + Duration::hours(2)));
    }

    #[test]
    fn hidden_or_missing_category_hides_post() {
        let now = Utc::now();
        let hidden = category(false);
        let p = post(Uuid::new_v4(), &hidden, now - Duration::days(1), true);

        assert!(!can_view_post(&p, Some(&hidden), None, now));
        assert!(!can_view_post(&p, None, None, now));
    }

    #[test]
    fn denial_is_reported_as_not_found() {
        let now = Utc::now();
        let cat = category(true);
        let p = post(Uuid::new_v4(), &cat, now - Duration::days(1), false);

        let err = ensure_post_visible(&p, Some(&cat), None, now).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "post", .. }));
    }

    #[test]
    fn hidden_category_listing_is_not_found() {
        let cat = category(false);
        let result = listing_filter(Listing::Category(&cat), None, Utc::now());
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn category_listing_excludes_posts_of_other_categories() {
        let now = Utc::now();
        let cat = category(true);
        let other = category(true);
        let filter = listing_filter(Listing::Category(&cat), None, now).unwrap();

        let mine = post(Uuid::new_v4(), &cat, now - Duration::days(1), true);
        let theirs = post(Uuid::new_v4(), &other, now - Duration::days(1), true);
        assert!(filter.matches(&mine, Some(&cat)));
        assert!(!filter.matches(&theirs, Some(&other)));
    }

    #[test]
    fn profile_listing_depends_on_viewer() {
        let now = Utc::now();
        let owner = user("owner");
        let hidden_cat = category(false);
        let draft = post(owner.id, &hidden_cat, now + Duration::days(3), false);

        let own = listing_filter(Listing::Profile(&owner), Some(owner.id), now).unwrap();
        assert_eq!(own, PostFilter::all().by_author(owner.id));
        assert!(own.matches(&draft, Some(&hidden_cat)));

        let other = listing_filter(Listing::Profile(&owner), Some(Uuid::new_v4()), now).unwrap();
        assert!(!other.matches(&draft, Some(&hidden_cat)));

        let anonymous = listing_filter(Listing::Profile(&owner), None, now).unwrap();
        assert_eq!(anonymous, PostFilter::public(now).by_author(owner.id));
    }

    #[test]
    fn only_author_may_mutate() {
        let author = Uuid::new_v4();
        let post_id = Uuid::new_v4();
        let comment = Comment::new(post_id, author, "hi".into(), Utc::now());

        assert!(can_mutate(&comment, author));
        assert!(!can_mutate(&comment, Uuid::new_v4()));
        assert_eq!(authorize_mutation(&comment, author, post_id), None);
        assert_eq!(
            authorize_mutation(&comment, Uuid::new_v4(), post_id),
            Some(Redirect::PostDetail { post_id })
        );
    }

    #[test]
    fn redirect_points_at_post_detail() {
        let post_id = Uuid::new_v4();
        let redirect = Redirect::PostDetail { post_id };
        assert_eq!(redirect.location(), format!("/api/posts/{post_id}"));
    }
}
