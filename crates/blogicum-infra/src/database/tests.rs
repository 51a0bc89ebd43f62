use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use blogicum_core::domain::{Category, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{BaseRepository, CategoryRepository, CommentRepository, UserRepository};

use crate::database::entity::{category, comment, post, user};
use crate::database::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

fn post_model(id: Uuid, author_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        title: "Test Post".to_owned(),
        text: "Content".to_owned(),
        pub_date: now.into(),
        is_published: true,
        category_id: None,
        location_id: None,
        image: None,
        created_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::find_by_id(&repo, post_id)
        .await
        .unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_save_inserts_unknown_post() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let model = post_model(post_id, author_id);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let saved = BaseRepository::<Post, Uuid>::save(&repo, Post::from(model))
        .await
        .unwrap();

    assert_eq!(saved.id, post_id);
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category::Model {
            id: Uuid::new_v4(),
            title: "Travel".to_owned(),
            description: "Trips".to_owned(),
            slug: "travel".to_owned(),
            is_published: false,
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let found: Option<Category> = repo.find_by_slug("travel").await.unwrap();

    let found = found.expect("category should be found");
    assert_eq!(found.slug, "travel");
    assert!(!found.is_published);
}

#[tokio::test]
async fn test_find_user_by_username_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let found: Option<User> = repo.find_by_username("nobody").await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_comments_are_ordered_by_time_then_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<comment::Model>::new()])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo.list_for_post(Uuid::new_v4()).await.unwrap();
    assert!(comments.is_empty());

    let log = repo.db.into_transaction_log();
    let sql = &log[0].statements()[0].sql;
    assert!(
        sql.contains(r#"ORDER BY "comments"."created_at" ASC, "comments"."id" ASC"#),
        "{sql}"
    );
}
