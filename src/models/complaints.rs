// ============================================================================
// MODÈLE : COMPLAINTS
// ============================================================================
//
// Description:
//   Réclamations / tickets de support soumis via le formulaire public.
//
// Colonnes de la table complaints:
//   - id (INTEGER, PRIMARY KEY, auto-incrément)
//   - name, subject (VARCHAR, NOT NULL)
//   - email, phone (VARCHAR, NULL)
//   - message (TEXT, NOT NULL)
//   - status (VARCHAR) - pending | in_progress | resolved | closed
//   - priority (VARCHAR) - low | medium | high | urgent
//   - attachment_url (TEXT, NULL)
//   - created_at (TIMESTAMPTZ, NOT NULL), updated_at (TIMESTAMPTZ, NULL)
//   - assigned_to (VARCHAR, NULL) - id de l'identité qui a traité le ticket
//   - notes (TEXT, NULL)
//
// Points d'attention:
//   - status/priority sont des enums : une valeur hors liste ne passe pas serde
//   - created_at/updated_at sont posés par before_save, jamais par l'appelant
//
// ============================================================================

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaints")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: ComplaintStatus,
    pub priority: ComplaintPriority,
    #[sea_orm(column_type = "Text", nullable)]
    pub attachment_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub assigned_to: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
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
