use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub prep_time: Option<i32>,
    pub rating: Option<i32>,
    pub difficulty: Option<String>,
    pub image_url: Option<String>,
    /// JSON array of instruction steps, in order.
    pub instructions: Option<Json>,
    pub lang: String,
    pub source_url: Option<String>,
    #[sea_orm(default_value = 0)]
    pub viewed: i32,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    RecipeIngredients,
    #[sea_orm(has_many = "super::recipe_diets::Entity")]
    RecipeDiets,
    #[sea_orm(has_many = "super::recipe_meal_types::Entity")]
    RecipeMealTypes,
    #[sea_orm(has_many = "super::recipe_kitchens::Entity")]
    RecipeKitchens,
    #[sea_orm(has_many = "super::saved_recipes::Entity")]
    SavedRecipes,
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeIngredients.def()
    }
}

impl Related<super::saved_recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedRecipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
