use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredient_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub external_id: i32,
    pub names: Json,
    pub icon: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ingredient_category_links::Entity")]
    IngredientLinks,
}

impl Related<super::ingredient_category_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IngredientLinks.def()
    }
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        super::ingredient_category_links::Relation::Ingredients.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::ingredient_category_links::Relation::IngredientCategories
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}
