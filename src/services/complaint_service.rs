use sea_orm::*;
use sea_orm::sea_query::Expr;
use validator::ValidateEmail;

use crate::db::Db;
use crate::error::AppError;
use crate::models::complaints::{self, ComplaintPriority, ComplaintStatus};
use crate::models::dto::{ComplaintStats, ListComplaintsQuery, SubmitComplaintRequest};
use crate::services::notification_service::{NotificationOutcome, NotificationService};

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 100;
const MIN_MESSAGE_LENGTH: usize = 10;

pub struct ComplaintService;

/// Résultat d'une soumission : l'id créé, plus ce qu'il est advenu de la notification
#[derive(Debug)]
pub struct SubmitOutcome {
    pub complaint: complaints::Model,
    pub notification: NotificationOutcome,
}

/// Réclamation validée, prête à être insérée
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaint {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub attachment_url: Option<String>,
}

impl NewComplaint {
    /// Règles appliquées dans l'ordre, la première en échec gagne.
    /// Un email vide est accepté et stocké comme absent.
    pub fn validate(request: SubmitComplaintRequest) -> Result<Self, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let email = match request.email {
            Some(email) if email.is_empty() => None,
            Some(email) => {
                if !email.validate_email() {
                    return Err(AppError::Validation("Invalid email address".to_string()));
                }
                Some(email)
            }
            None => None,
        };

        if request.subject.trim().is_empty() {
            return Err(AppError::Validation("Subject is required".to_string()));
        }

        if request.message.chars().count() < MIN_MESSAGE_LENGTH {
            return Err(AppError::Validation(format!(
                "Message must be at least {} characters",
                MIN_MESSAGE_LENGTH
            )));
        }

        Ok(NewComplaint {
            name: request.name,
            email,
            phone: request.phone,
            subject: request.subject,
            message: request.message,
            attachment_url: request.attachment_url,
        })
    }
}

/// Champs modifiables d'une réclamation. None = colonne inchangée.
#[derive(Debug, Clone, Default)]
pub struct ComplaintChanges {
    pub status: Option<ComplaintStatus>,
    pub priority: Option<ComplaintPriority>,
    pub notes: Option<String>,
    pub assigned_to: Option<String>,
}

impl ComplaintChanges {
    fn into_active_model(self, id: i32) -> complaints::ActiveModel {
        let mut model = complaints::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(status) = self.status {
            model.status = Set(status);
        }
        if let Some(priority) = self.priority {
            model.priority = Set(priority);
        }
        if let Some(notes) = self.notes {
            model.notes = Set(Some(notes));
        }
        if let Some(assigned_to) = self.assigned_to {
            model.assigned_to = Set(Some(assigned_to));
        }
        model
    }
}

/// Pagination validée de la liste admin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub limit: u64,
    pub offset: u64,
}

impl ComplaintFilter {
    pub fn from_query(query: ListComplaintsQuery) -> Result<Self, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        Ok(ComplaintFilter {
            status: query.status,
            limit,
            offset: query.offset.unwrap_or(0),
        })
    }
}

impl ComplaintService {
    /// Formulaire public : valide, insère (pending/medium), recharge la ligne,
    /// puis tente la notification. Le succès ne dépend que de l'insertion.
    pub async fn submit(
        db: &Db,
        notifications: &NotificationService,
        request: SubmitComplaintRequest,
    ) -> Result<SubmitOutcome, AppError> {
        let new_complaint = NewComplaint::validate(request)?;
        let conn = db.require().await?;

        let inserted = complaints::ActiveModel {
            name: Set(new_complaint.name),
            email: Set(new_complaint.email),
            phone: Set(new_complaint.phone),
            subject: Set(new_complaint.subject),
            message: Set(new_complaint.message),
            status: Set(ComplaintStatus::Pending),
            priority: Set(ComplaintPriority::Medium),
            attachment_url: Set(new_complaint.attachment_url),
            assigned_to: Set(None),
            notes: Set(None),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        // Relecture pour partir de la ligne telle que stockée
        let complaint = complaints::Entity::find_by_id(inserted.id)
            .one(conn)
            .await?
            .ok_or(AppError::NotFound("Complaint"))?;

        tracing::info!(complaint_id = complaint.id, "complaint submitted");

        let notification = notifications.notify_new_complaint(Some(conn), &complaint).await;

        Ok(SubmitOutcome {
            complaint,
            notification,
        })
    }

    /// Plus récentes d'abord. Base indisponible : liste vide.
    pub async fn list(db: &Db, filter: ComplaintFilter) -> Result<Vec<complaints::Model>, AppError> {
        let Some(conn) = db.get().await else {
            return Ok(Vec::new());
        };

        let mut query = complaints::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(complaints::Column::Status.eq(status));
        }

        let results = query
            .order_by_desc(complaints::Column::CreatedAt)
            .order_by_desc(complaints::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(conn)
            .await?;

        Ok(results)
    }

    pub async fn get_by_id(db: &Db, id: i32) -> Result<Option<complaints::Model>, AppError> {
        let Some(conn) = db.get().await else {
            return Ok(None);
        };
        Ok(complaints::Entity::find_by_id(id).one(conn).await?)
    }

    /// Change le statut, enregistre qui a traité le ticket
    pub async fn update_status(
        db: &Db,
        id: i32,
        status: ComplaintStatus,
        notes: Option<String>,
        actor_id: &str,
    ) -> Result<complaints::Model, AppError> {
        let changes = ComplaintChanges {
            status: Some(status),
            notes,
            assigned_to: Some(actor_id.to_string()),
            ..Default::default()
        };
        Self::apply_changes(db, id, changes).await
    }

    pub async fn update_priority(
        db: &Db,
        id: i32,
        priority: ComplaintPriority,
    ) -> Result<complaints::Model, AppError> {
        let changes = ComplaintChanges {
            priority: Some(priority),
            ..Default::default()
        };
        Self::apply_changes(db, id, changes).await
    }

    async fn apply_changes(db: &Db, id: i32, changes: ComplaintChanges) -> Result<complaints::Model, AppError> {
        let conn = db.require().await?;

        match changes.into_active_model(id).update(conn).await {
            Ok(model) => Ok(model),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Err(AppError::NotFound("Complaint")),
            Err(e) => Err(e.into()),
        }
    }

    /// Renvoie true si une ligne a été supprimée
    pub async fn delete(db: &Db, id: i32) -> Result<bool, AppError> {
        let conn = db.require().await?;
        let result = complaints::Entity::delete_by_id(id).exec(conn).await?;
        if result.rows_affected > 0 {
            tracing::info!(complaint_id = id, "complaint deleted");
        }
        Ok(result.rows_affected > 0)
    }

    /// Un seul GROUP BY : total et compteurs viennent de la même lecture
    pub async fn stats(db: &Db) -> Result<ComplaintStats, AppError> {
        let Some(conn) = db.get().await else {
            return Ok(ComplaintStats::default());
        };

        let counts: Vec<(ComplaintStatus, i64)> = complaints::Entity::find()
            .select_only()
            .column(complaints::Column::Status)
            .column_as(Expr::col(complaints::Column::Id).count(), "count")
            .group_by(complaints::Column::Status)
            .into_tuple()
            .all(conn)
            .await?;

        Ok(ComplaintStats::from_counts(
            counts
                .into_iter()
                .map(|(status, count)| (status, count.max(0) as u64)),
        ))
    }
}
