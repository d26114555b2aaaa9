// ============================================================================
// MODÈLE : NOTIFICATION CONFIG
// ============================================================================
//
// Description:
//   Configuration de l'envoi des notifications (WhatsApp via API HTTP)
//   à chaque nouvelle réclamation.
//
// Points d'attention:
//   - Une seule ligne, toujours id = SINGLETON_ID (pas d'auto-incrément)
//   - api_key est un secret : jamais renvoyé en clair ni loggé
//
// ============================================================================

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

/// Clé constante de l'unique ligne de configuration
pub const SINGLETON_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub phone_number: Option<String>,
    pub is_enabled: bool,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.updated_at = Set(Some(Utc::now()));
        Ok(self)
    }
}
