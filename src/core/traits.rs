use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;

use crate::errors::ApiError;
use crate::filtering::{Criteria, Page, PageRequest, SortSpec, resolve_sort};
use crate::validation::{Validatable, ValidationErrors};

pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update model into an existing active model
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge operation fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// An API representation backed by one entity with an integer id.
#[async_trait]
pub trait Resource: Sized + Send + Sync + Serialize
where
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait + Copy + Send + Sync;

    const ID_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Attaches data that lives outside the entity's own row. The default is
    /// a plain conversion.
    async fn hydrate(
        _db: &DatabaseConnection,
        models: Vec<<Self::EntityType as EntityTrait>::Model>,
    ) -> Result<Vec<Self>, DbErr> {
        Ok(models.into_iter().map(Self::from).collect())
    }

    async fn get_one(db: &DatabaseConnection, id: i32) -> Result<Self, DbErr> {
        let model = Self::EntityType::find()
            .filter(Self::ID_COLUMN.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            )))?;
        Self::hydrate(db, vec![model])
            .await?
            .pop()
            .ok_or(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            )))
    }

    /// Every row in id order. Meant for small reference tables.
    async fn list_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        let models = Self::EntityType::find()
            .order_by_asc(Self::ID_COLUMN)
            .all(db)
            .await?;
        Self::hydrate(db, models).await
    }
}

/// Resources clients may add to.
#[async_trait]
pub trait CreatableResource: Resource
where
    Self: From<<Self::EntityType as EntityTrait>::Model>,
    <Self::EntityType as EntityTrait>::Model: IntoActiveModel<Self::ActiveModelType>,
{
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>
        + ActiveModelBehavior
        + From<<Self::EntityType as EntityTrait>::Model>
        + Send
        + Sync;
    type CreateModel: Into<Self::ActiveModelType> + Validatable + Send;

    async fn create(db: &DatabaseConnection, create_model: Self::CreateModel) -> Result<Self, DbErr> {
        let active_model: Self::ActiveModelType = create_model.into();
        let model = active_model.insert(db).await?;
        Ok(Self::from(model))
    }
}

/// Update and delete on top of create.
#[async_trait]
pub trait WritableResource: CreatableResource
where
    Self: From<<Self::EntityType as EntityTrait>::Model>,
    <Self::EntityType as EntityTrait>::Model: IntoActiveModel<Self::ActiveModelType>,
{
    type UpdateModel: MergeIntoActiveModel<Self::ActiveModelType> + Validatable + Send;

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        update_model: Self::UpdateModel,
    ) -> Result<Self, DbErr> {
        let model = Self::EntityType::find()
            .filter(Self::ID_COLUMN.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            )))?;
        let existing = Self::ActiveModelType::from(model);
        let updated = update_model.merge_into_activemodel(existing)?.update(db).await?;
        Ok(Self::from(updated))
    }

    async fn delete(db: &DatabaseConnection, id: i32) -> Result<i32, DbErr> {
        let res = Self::EntityType::delete_many()
            .filter(Self::ID_COLUMN.eq(id))
            .exec(db)
            .await?;
        match res.rows_affected {
            0 => Err(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            ))),
            _ => Ok(id),
        }
    }
}

/// Filter, sort and paginate over a resource in a single pass.
#[async_trait]
pub trait SearchResource: Resource
where
    Self: From<<Self::EntityType as EntityTrait>::Model>,
    <Self::EntityType as EntityTrait>::Model: Sync,
{
    type Criteria: Criteria + Send + Sync;

    /// Public sort field names and the columns they map to.
    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)>;

    /// Counts every match, then fetches the requested page in a stable order.
    /// The sort field is validated before any query runs; a page past the end
    /// yields no items but the true total.
    ///
    /// # Errors
    ///
    /// Unknown sort fields are a bad request; storage failures surface as
    /// [`ApiError::Unavailable`].
    async fn search(
        db: &DatabaseConnection,
        criteria: &Self::Criteria,
        sort: Option<&SortSpec>,
        page: PageRequest,
    ) -> Result<Page<Self>, ApiError> {
        let ordering = resolve_sort(sort, &Self::sortable_columns(), Self::ID_COLUMN)
            .map_err(ValidationErrors::from)?;

        let query = Self::EntityType::find().filter(criteria.condition());
        let total_count = query.clone().count(db).await?;

        let mut query = query;
        for (column, order) in ordering {
            query = query.order_by(column, order);
        }
        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(db)
            .await?;
        let items = Self::hydrate(db, models).await?;

        tracing::debug!(
            resource = Self::RESOURCE_NAME_PLURAL,
            total_count,
            page = page.page(),
            returned = items.len(),
            "Search completed"
        );
        Ok(Page::new(items, total_count, page))
    }
}
