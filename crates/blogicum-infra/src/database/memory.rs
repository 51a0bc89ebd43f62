//! In-memory store - used when no `DATABASE_URL` is configured, and by tests.
//!
//! Mirrors the relational schema: usernames and category slugs are unique,
//! deleting a user or post cascades, deleting a category or location clears
//! the reference on its posts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorRef, Category, Comment, CommentView, Location, Post, PostSummary, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::policy::PostFilter;
use blogicum_core::service::Repositories;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn summarize(&self, post: &Post) -> Result<PostSummary, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .map(AuthorRef::from)
            .ok_or_else(|| RepoError::Query(format!("post {} has no author", post.id)))?;

        Ok(PostSummary {
            post: post.clone(),
            author,
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id).cloned()),
            comment_count: self
                .comments
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as u64,
        })
    }

    fn category_of(&self, post: &Post) -> Option<&Category> {
        post.category_id.and_then(|id| self.categories.get(&id))
    }
}

/// All five repositories over one shared set of tables.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every repository port, backed by this store.
    pub fn repositories(&self) -> Repositories {
        let store = Arc::new(self.clone());
        Repositories {
            users: store.clone(),
            posts: store.clone(),
            categories: store.clone(),
            locations: store.clone(),
            comments: store,
        }
    }
}

fn missing_reference(entity: &'static str, id: Uuid) -> RepoError {
    tracing::debug!(%id, entity, "rejected write to a missing row");
    RepoError::MissingReference(entity)
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "username {} is taken",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let owned_posts: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|_, p| p.author_id != id);
        tables
            .comments
            .retain(|_, c| c.author_id != id && !owned_posts.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(missing_reference("user", post.author_id));
        }
        if let Some(id) = post.category_id.filter(|id| !tables.categories.contains_key(id)) {
            return Err(missing_reference("category", id));
        }
        if let Some(id) = post.location_id.filter(|id| !tables.locations.contains_key(id)) {
            return Err(missing_reference("location", id));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|post| tables.summarize(post))
            .transpose()
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| filter.matches(post, tables.category_of(post)))
            .collect();
        matching.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let page = Page::from_vec(matching, page);
        let items = page
            .items
            .iter()
            .map(|post| tables.summarize(post))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(?filter, total = page.total_items, page = page.number, "listed posts");
        Ok(Page::new(
            items,
            PageRequest::new(page.number, page.size),
            page.total_items,
        ))
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .values()
            .any(|c| c.slug == category.slug && c.id != category.id)
        {
            return Err(RepoError::Constraint(format!(
                "slug {} is taken",
                category.slug
            )));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn save(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut published: Vec<Location> = tables
            .locations
            .values()
            .filter(|l| l.is_published)
            .cloned()
            .collect();
        published.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(published)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(missing_reference("post", comment.post_id));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(missing_reference("user", comment.author_id));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));

        comments
            .into_iter()
            .map(|comment| -> Result<CommentView, RepoError> {
                let author = tables
                    .users
                    .get(&comment.author_id)
                    .map(AuthorRef::from)
                    .ok_or_else(|| {
                        RepoError::Query(format!("comment {} has no author", comment.id))
                    })?;
                Ok(CommentView {
                    comment: comment.clone(),
                    author,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use blogicum_core::domain::PostDraft;

    use super::*;

    async fn seed(store: &InMemoryStore) -> (User, Category) {
        let user = BaseRepository::<User, Uuid>::save(
            store,
            User::new("ada".into(), "ada@example.com".into(), "hash".into()),
        )
        .await
        .unwrap();
        let category = BaseRepository::<Category, Uuid>::save(
            store,
            Category::new("Travel".into(), "Trips".into(), "travel".into(), true),
        )
        .await
        .unwrap();
        (user, category)
    }

    fn draft(category: &Category, title: &str, offset: Duration) -> PostDraft {
        PostDraft {
            title: title.into(),
            text: "body".into(),
            pub_date: Utc::now() + offset,
            is_published: true,
            category_id: Some(category.id),
            location_id: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint() {
        let store = InMemoryStore::new();
        seed(&store).await;

        let clash = User::new("ada".into(), "other@example.com".into(), "hash".into());
        let result = BaseRepository::<User, Uuid>::save(&store, clash).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_pages() {
        let store = InMemoryStore::new();
        let (user, category) = seed(&store).await;

        for (title, days) in [("old", -3), ("mid", -2), ("new", -1)] {
            let post = Post::new(user.id, draft(&category, title, Duration::days(days)));
            BaseRepository::<Post, Uuid>::save(&store, post).await.unwrap();
        }

        let page = store
            .list(&PostFilter::all(), PageRequest::new(1, 2))
            .await
            .unwrap();
        let titles: Vec<_> = page.items.iter().map(|s| s.post.title.as_str()).collect();
        assert_eq!(titles, ["new", "mid"]);
        assert_eq!(page.total_items, 3);
        assert!(page.has_next());

        let past_end = store
            .list(&PostFilter::all(), PageRequest::new(9, 2))
            .await
            .unwrap();
        assert_eq!(past_end.number, 2);
        assert_eq!(past_end.items.len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_post_removes_comments() {
        let store = InMemoryStore::new();
        let (user, category) = seed(&store).await;
        let post = Post::new(user.id, draft(&category, "p", Duration::days(-1)));
        let post = BaseRepository::<Post, Uuid>::save(&store, post).await.unwrap();
        let comment = Comment::new(post.id, user.id, "hi".into(), Utc::now());
        BaseRepository::<Comment, Uuid>::save(&store, comment.clone())
            .await
            .unwrap();

        assert_eq!(
            store.find_summary(post.id).await.unwrap().unwrap().comment_count,
            1
        );

        BaseRepository::<Post, Uuid>::delete(&store, post.id)
            .await
            .unwrap();
        let gone = BaseRepository::<Comment, Uuid>::find_by_id(&store, comment.id)
            .await
            .unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test]
    async fn test_deleting_category_clears_reference() {
        let store = InMemoryStore::new();
        let (user, category) = seed(&store).await;
        let post = Post::new(user.id, draft(&category, "p", Duration::days(-1)));
        let post = BaseRepository::<Post, Uuid>::save(&store, post).await.unwrap();

        BaseRepository::<Category, Uuid>::delete(&store, category.id)
            .await
            .unwrap();

        let reloaded = BaseRepository::<Post, Uuid>::find_by_id(&store, post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.category_id, None);

        let public = store
            .list(&PostFilter::public(Utc::now()), PageRequest::first(10))
            .await
            .unwrap();
        assert!(public.items.is_empty());
    }

    #[tokio::test]
    async fn test_comments_with_equal_timestamps_keep_a_stable_order() {
        let store = InMemoryStore::new();
        let (user, category) = seed(&store).await;
        let post = Post::new(user.id, draft(&category, "p", Duration::days(-1)));
        let post = BaseRepository::<Post, Uuid>::save(&store, post).await.unwrap();

        let at = Utc::now();
        let mut ids = Vec::new();
        for text in ["a", "b", "c", "d"] {
            let comment = Comment::new(post.id, user.id, text.into(), at);
            ids.push(comment.id);
            BaseRepository::<Comment, Uuid>::save(&store, comment)
                .await
                .unwrap();
        }
        ids.sort();

        let listed: Vec<Uuid> = store
            .list_for_post(post.id)
            .await
            .unwrap()
            .iter()
            .map(|view| view.comment.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_post_with_unknown_author_is_rejected() {
        let store = InMemoryStore::new();
        let (_, category) = seed(&store).await;
        let post = Post::new(Uuid::new_v4(), draft(&category, "p", Duration::days(-1)));

        let result = BaseRepository::<Post, Uuid>::save(&store, post).await;
        assert!(matches!(result, Err(RepoError::MissingReference("user"))));
    }

    #[tokio::test]
    async fn test_post_with_deleted_category_is_rejected() {
        let store = InMemoryStore::new();
        let (user, category) = seed(&store).await;
        BaseRepository::<Category, Uuid>::delete(&store, category.id)
            .await
            .unwrap();

        let post = Post::new(user.id, draft(&category, "p", Duration::days(-1)));
        let result = BaseRepository::<Post, Uuid>::save(&store, post).await;
        assert!(matches!(result, Err(RepoError::MissingReference("category"))));
    }
}
