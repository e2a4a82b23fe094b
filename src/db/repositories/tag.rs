use crate::domain::TagKind;
use crate::entities::{diets, kitchens, meal_types, prelude::*};
use crate::models::tag::Tag;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

pub struct TagRepository {
    conn: DatabaseConnection,
}

impl TagRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Reads all three tag tables, one query each.
    pub async fn list_all(&self) -> anyhow::Result<Vec<Tag>> {
        let meal_types = MealTypes::find()
            .order_by_asc(meal_types::Column::Id)
            .all(&self.conn)
            .await?;
        let diets = Diets::find()
            .order_by_asc(diets::Column::Id)
            .all(&self.conn)
            .await?;
        let kitchens = Kitchens::find()
            .order_by_asc(kitchens::Column::Id)
            .all(&self.conn)
            .await?;

        let mut tags = Vec::with_capacity(meal_types.len() + diets.len() + kitchens.len());
        tags.extend(meal_types.into_iter().map(|m| Tag {
            id: m.id,
            kind: TagKind::MealType,
            tag: m.tag,
            slug: m.slug,
            name: m.name,
        }));
        tags.extend(diets.into_iter().map(|m| Tag {
            id: m.id,
            kind: TagKind::Diet,
            tag: m.tag,
            slug: m.slug,
            name: m.name,
        }));
        tags.extend(kitchens.into_iter().map(|m| Tag {
            id: m.id,
            kind: TagKind::Kitchen,
            tag: m.tag,
            slug: m.slug,
            name: m.name,
        }));
        Ok(tags)
    }
}
