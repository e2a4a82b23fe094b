use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Parents before children so foreign keys resolve.
        create(manager, &schema, Recipes).await?;
        create(manager, &schema, Ingredients).await?;
        create(manager, &schema, IngredientCategories).await?;
        create(manager, &schema, Diets).await?;
        create(manager, &schema, MealTypes).await?;
        create(manager, &schema, Kitchens).await?;
        create(manager, &schema, RecipeIngredients).await?;
        create(manager, &schema, IngredientCategoryLinks).await?;
        create(manager, &schema, RecipeDiets).await?;
        create(manager, &schema, RecipeMealTypes).await?;
        create(manager, &schema, RecipeKitchens).await?;
        create(manager, &schema, SavedRecipes).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedRecipes).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeKitchens).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeMealTypes).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeDiets).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IngredientCategoryLinks).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeIngredients).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Kitchens).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MealTypes).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Diets).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IngredientCategories).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes).to_owned())
            .await?;
        Ok(())
    }
}
