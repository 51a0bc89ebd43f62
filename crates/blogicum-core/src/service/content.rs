use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    AuthorRef, Category, Comment, CommentView, Location, Post, PostDraft, PostSummary, User,
};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::policy::{self, Listing, Outcome};
use crate::ports::BaseRepository;

use super::Repositories;

/// A visible post with its comments, oldest first.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub summary: PostSummary,
    pub comments: Vec<CommentView>,
}

/// Fields of a category created by staff.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

/// Reading and writing posts, comments, categories and locations.
#[derive(Clone)]
pub struct ContentService {
    repos: Repositories,
}

impl ContentService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// The public feed, newest first.
    pub async fn feed(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<Page<PostSummary>, DomainError> {
        let filter = policy::listing_filter(Listing::Feed, viewer, now)?;
        Ok(self.repos.posts.list(&filter, page).await?)
    }

    /// Posts of one published category.
    pub async fn category_posts(
        &self,
        slug: &str,
        viewer: Option<Uuid>,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<(Category, Page<PostSummary>), DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let filter = policy::listing_filter(Listing::Category(&category), viewer, now)?;
        let posts = self.repos.posts.list(&filter, page).await?;
        Ok((category, posts))
    }

    /// A user's posts: everything for the user themselves, public posts for
    /// everyone else.
    pub async fn profile_posts(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<(User, Page<PostSummary>), DomainError> {
        let profile = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let filter = policy::listing_filter(Listing::Profile(&profile), viewer, now)?;
        let posts = self.repos.posts.list(&filter, page).await?;
        Ok((profile, posts))
    }

    pub async fn post_detail(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<PostDetail, DomainError> {
        let summary = self.visible_summary(post_id, viewer, now).await?;
        let comments = self.repos.comments.list_for_post(post_id).await?;
        Ok(PostDetail { summary, comments })
    }

    pub async fn create_post(&self, actor: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        self.check_draft(&draft).await?;
        let post = self.repos.posts.save(Post::new(actor, draft)).await?;
        tracing::info!(post_id = %post.id, author = %actor, "post created");
        Ok(post)
    }

    pub async fn edit_post(
        &self,
        actor: Uuid,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<Outcome<Post>, DomainError> {
        let mut post = self.find_post(post_id).await?;
        if let Some(redirect) = policy::authorize_mutation(&post, actor, post_id) {
            return Ok(Outcome::Redirect(redirect));
        }

        self.check_draft(&draft).await?;
        post.apply(draft);
        let post = self.repos.posts.save(post).await?;
        Ok(Outcome::Done(post))
    }

    pub async fn delete_post(
        &self,
        actor: Uuid,
        post_id: Uuid,
    ) -> Result<Outcome<()>, DomainError> {
        let post = self.find_post(post_id).await?;
        if let Some(redirect) = policy::authorize_mutation(&post, actor, post_id) {
            return Ok(Outcome::Redirect(redirect));
        }

        self.repos.posts.delete(post_id).await?;
        tracing::info!(%post_id, author = %actor, "post deleted");
        Ok(Outcome::Done(()))
    }

    /// Comment on a post the actor can currently see.
    pub async fn add_comment(
        &self,
        actor: Uuid,
        post_id: Uuid,
        text: String,
        now: DateTime<Utc>,
    ) -> Result<CommentView, DomainError> {
        self.visible_summary(post_id, Some(actor), now).await?;
        DomainError::check(Comment::validate_text(&text))?;

        let author = self.author_ref(actor).await?;
        let comment = self
            .repos
            .comments
            .save(Comment::new(post_id, actor, text, now))
            .await?;
        Ok(CommentView { comment, author })
    }

    pub async fn edit_comment(
        &self,
        actor: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> Result<Outcome<CommentView>, DomainError> {
        let mut comment = self.find_comment(post_id, comment_id).await?;
        if let Some(redirect) = policy::authorize_mutation(&comment, actor, post_id) {
            return Ok(Outcome::Redirect(redirect));
        }

        DomainError::check(Comment::validate_text(&text))?;
        comment.text = text;
        let author = self.author_ref(actor).await?;
        let comment = self.repos.comments.save(comment).await?;
        Ok(Outcome::Done(CommentView { comment, author }))
    }

    pub async fn delete_comment(
        &self,
        actor: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Outcome<()>, DomainError> {
        let comment = self.find_comment(post_id, comment_id).await?;
        if let Some(redirect) = policy::authorize_mutation(&comment, actor, post_id) {
            return Ok(Outcome::Redirect(redirect));
        }

        self.repos.comments.delete(comment_id).await?;
        Ok(Outcome::Done(()))
    }

    pub async fn published_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self.repos.locations.list_published().await?)
    }

    pub async fn create_category(
        &self,
        actor: Uuid,
        new: NewCategory,
    ) -> Result<Category, DomainError> {
        self.ensure_staff(actor).await?;

        let category = Category::new(new.title, new.description, new.slug, new.is_published);
        DomainError::check(category.validate())?;
        if self
            .repos
            .categories
            .find_by_slug(&category.slug)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate(format!(
                "category slug '{}' is taken",
                category.slug
            )));
        }

        Ok(self.repos.categories.save(category).await?)
    }

    pub async fn create_location(
        &self,
        actor: Uuid,
        name: String,
        is_published: bool,
    ) -> Result<Location, DomainError> {
        self.ensure_staff(actor).await?;

        let location = Location::new(name, is_published);
        DomainError::check(location.validate())?;
        Ok(self.repos.locations.save(location).await?)
    }

    async fn visible_summary(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<PostSummary, DomainError> {
        let summary = self
            .repos
            .posts
            .find_summary(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        policy::ensure_post_visible(&summary.post, summary.category.as_ref(), viewer, now)?;
        Ok(summary)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn find_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, DomainError> {
        self.repos
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }

    async fn author_ref(&self, user_id: Uuid) -> Result<AuthorRef, DomainError> {
        let user = self
            .repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;
        Ok(AuthorRef::from(&user))
    }

    async fn ensure_staff(&self, user_id: Uuid) -> Result<(), DomainError> {
        match self.repos.users.find_by_id(user_id).await? {
            Some(user) if user.is_staff => Ok(()),
            Some(_) => Err(DomainError::Forbidden),
            None => Err(DomainError::Unauthorized),
        }
    }

    /// Field checks plus existence of the referenced category and location.
    async fn check_draft(&self, draft: &PostDraft) -> Result<(), DomainError> {
        let mut errors = draft.validate();
        if let Some(category_id) = draft.category_id {
            if self
                .repos
                .categories
                .find_by_id(category_id)
                .await?
                .is_none()
            {
                errors.push(format!("category {category_id} does not exist"));
            }
        }
        if let Some(location_id) = draft.location_id {
            if self
                .repos
                .locations
                .find_by_id(location_id)
                .await?
                .is_none()
            {
                errors.push(format!("location {location_id} does not exist"));
            }
        }
        DomainError::check(errors)
    }
}
