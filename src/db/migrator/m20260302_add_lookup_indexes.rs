use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_saved_recipes_user_recipe")
                    .table(SavedRecipes::Table)
                    .col(SavedRecipes::UserId)
                    .col(SavedRecipes::RecipeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_ingredients_recipe")
                    .table(RecipeIngredients::Table)
                    .col(RecipeIngredients::RecipeId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_ingredients_ingredient")
                    .table(RecipeIngredients::Table)
                    .col(RecipeIngredients::IngredientId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_lang")
                    .table(Recipes::Table)
                    .col(Recipes::Lang)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_recipes_lang")
                    .table(Recipes::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_recipe_ingredients_ingredient")
                    .table(RecipeIngredients::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_recipe_ingredients_recipe")
                    .table(RecipeIngredients::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_saved_recipes_user_recipe")
                    .table(SavedRecipes::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum SavedRecipes {
    Table,
    UserId,
    RecipeId,
}

#[derive(DeriveIden)]
enum RecipeIngredients {
    Table,
    RecipeId,
    IngredientId,
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Lang,
}
