//! Domain to wire conversions.

use actix_web::HttpResponse;
use actix_web::http::header;

use blogicum_core::domain::{AuthorRef, Category, CommentView, Location, PostSummary, User};
use blogicum_core::pagination::Page;
use blogicum_core::policy::Redirect;
use blogicum_core::service::PostDetail;
use blogicum_shared::RedirectResponse;
use blogicum_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, PageResponse,
    PostDetailResponse, PostResponse, ProfileResponse, UserResponse,
};

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_staff: user.is_staff,
        created_at: user.created_at,
    }
}

pub fn profile(user: &User) -> ProfileResponse {
    ProfileResponse {
        username: user.username.clone(),
        full_name: user.display_name(),
        date_joined: user.created_at,
    }
}

fn author(author: AuthorRef) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn category(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title.clone(),
        description: category.description.clone(),
        slug: category.slug.clone(),
        is_published: category.is_published,
    }
}

pub fn location(location: &Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name.clone(),
    }
}

/// An unpublished location is shown as no location at all.
pub fn post(summary: PostSummary) -> PostResponse {
    let PostSummary {
        post,
        author: by,
        category: filed_under,
        location: place,
        comment_count,
    } = summary;

    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        is_published: post.is_published,
        author: author(by),
        category: filed_under.as_ref().map(category),
        location: place.as_ref().filter(|l| l.is_published).map(location),
        image: post.image,
        comment_count,
        created_at: post.created_at,
    }
}

pub fn comment(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        post_id: view.comment.post_id,
        text: view.comment.text,
        author: author(view.author),
        created_at: view.comment.created_at,
    }
}

pub fn post_detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.summary),
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}

pub fn page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let total_pages = page.num_pages();
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(f);

    PageResponse {
        items: page.items,
        page: page.number,
        per_page: page.size,
        total_items: page.total_items,
        total_pages,
        has_next,
        has_previous,
    }
}

/// `303 See Other` pointing at the read-only view of the post.
pub fn see_other(redirect: Redirect) -> HttpResponse {
    let location = redirect.location();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.clone()))
        .json(RedirectResponse { location })
}
