use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};

use blogicum_core::domain::HasId;
use blogicum_core::error::RepoError;
use blogicum_core::ports::BaseRepository;

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Unique-key violations become [`RepoError::Constraint`], broken foreign keys
/// [`RepoError::MissingReference`], everything else a query error.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepoError::Constraint(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => match referenced_entity(&detail) {
            Some(entity) => RepoError::MissingReference(entity),
            None => RepoError::Query(detail),
        },
        _ => RepoError::Query(err.to_string()),
    }
}

/// The table a violated foreign key points at, read from the constraint names
/// the migration gives them.
fn referenced_entity(detail: &str) -> Option<&'static str> {
    const KEYS: [(&str, &str); 5] = [
        ("fk_posts_author", "user"),
        ("fk_posts_category", "category"),
        ("fk_posts_location", "location"),
        ("fk_comments_post", "post"),
        ("fk_comments_author", "user"),
    ];
    KEYS.iter()
        .find(|(constraint, _)| detail.contains(constraint))
        .map(|&(_, entity)| entity)
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: HasId<Id = ID> + From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        // Keys are generated client-side, so existence decides insert vs update.
        let exists = E::find_by_id(entity.id())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .is_some();

        let active_model: E::ActiveModel = entity.into();
        let result = if exists {
            active_model.update(&self.db).await
        } else {
            active_model.insert(&self.db).await
        };

        Ok(result.map_err(map_db_err)?.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_names_map_to_entities() {
        let detail = r#"insert or update on table "posts" violates foreign key constraint "fk_posts_category""#;
        assert_eq!(referenced_entity(detail), Some("category"));
        assert_eq!(
            referenced_entity(r#"violates foreign key constraint "fk_comments_author""#),
            Some("user")
        );
        assert_eq!(referenced_entity("violates foreign key constraint \"other\""), None);
    }
}
