// ============================================================================
// MODÈLE : PAGES
// ============================================================================
//
// Description:
//   Pages de contenu statique gérées depuis le panneau admin
//   (à propos, conditions, FAQ...).
//
// Points d'attention:
//   - slug UNIQUE, uniquement [a-z0-9-]
//   - une page non publiée n'est jamais renvoyée par les routes publiques
//   - menu_order : tri croissant dans le menu public
//
// ============================================================================

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pages")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_published: bool,
    pub show_in_menu: bool,
    pub menu_order: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub created_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(Some(now));
        Ok(self)
    }
}
