use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub language: String,
    /// Per-language display names, e.g. {"en": "egg", "ru": "яйцо"}.
    pub names: Option<Json>,
    pub is_active: bool,
    pub nutritional_data: Option<Json>,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_ingredients::Entity")]
    RecipeIngredients,
    #[sea_orm(has_many = "super::ingredient_category_links::Entity")]
    CategoryLinks,
}

impl Related<super::recipe_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeIngredients.def()
    }
}

impl Related<super::ingredient_category_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
