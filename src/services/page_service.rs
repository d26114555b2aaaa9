use std::sync::LazyLock;

use regex::Regex;
use sea_orm::*;
use validator::Validate;

use crate::db::Db;
use crate::error::AppError;
use crate::models::dto::PageRequest;
use crate::models::pages;

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9-]+$").expect("slug regex is valid")
});

pub struct PageService;

/// Contenu complet d'une page (création et mise à jour réécrivent tous les champs)
#[derive(Debug, Clone, PartialEq)]
pub struct PageChanges {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_published: bool,
    pub show_in_menu: bool,
    pub menu_order: i32,
}

impl PageChanges {
    pub fn from_request(request: PageRequest) -> Result<Self, AppError> {
        request
            .validate()
            .map_err(|errors| AppError::Validation(errors.to_string()))?;

        if !SLUG_RE.is_match(&request.slug) {
            return Err(AppError::Validation(
                "Slug may only contain lowercase letters, digits and dashes".to_string(),
            ));
        }

        Ok(PageChanges {
            title: request.title,
            slug: request.slug,
            content: request.content,
            is_published: request.is_published,
            show_in_menu: request.show_in_menu,
            menu_order: request.menu_order,
        })
    }

    fn apply(self, model: &mut pages::ActiveModel) {
        model.title = Set(self.title);
        model.slug = Set(self.slug);
        model.content = Set(self.content);
        model.is_published = Set(self.is_published);
        model.show_in_menu = Set(self.show_in_menu);
        model.menu_order = Set(self.menu_order);
    }
}

impl PageService {
    /// Pages publiées, dans l'ordre du menu
    pub async fn list_published(db: &Db) -> Result<Vec<pages::Model>, AppError> {
        let Some(conn) = db.get().await else {
            return Ok(Vec::new());
        };

        Ok(pages::Entity::find()
            .filter(pages::Column::IsPublished.eq(true))
            .order_by_asc(pages::Column::MenuOrder)
            .order_by_asc(pages::Column::Id)
            .all(conn)
            .await?)
    }

    /// Une page non publiée est traitée comme absente
    pub async fn get_published_by_slug(db: &Db, slug: &str) -> Result<Option<pages::Model>, AppError> {
        let Some(conn) = db.get().await else {
            return Ok(None);
        };

        let page = pages::Entity::find()
            .filter(pages::Column::Slug.eq(slug))
            .one(conn)
            .await?;
        Ok(page.filter(|p| p.is_published))
    }

    pub async fn list_all(db: &Db) -> Result<Vec<pages::Model>, AppError> {
        let Some(conn) = db.get().await else {
            return Ok(Vec::new());
        };

        Ok(pages::Entity::find()
            .order_by_desc(pages::Column::CreatedAt)
            .order_by_desc(pages::Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn get_by_id(db: &Db, id: i32) -> Result<Option<pages::Model>, AppError> {
        let Some(conn) = db.get().await else {
            return Ok(None);
        };
        Ok(pages::Entity::find_by_id(id).one(conn).await?)
    }

    pub async fn create(db: &Db, changes: PageChanges, created_by: &str) -> Result<pages::Model, AppError> {
        let conn = db.require().await?;
        Self::ensure_slug_free(conn, &changes.slug, None).await?;

        let mut model = pages::ActiveModel {
            created_by: Set(Some(created_by.to_string())),
            ..Default::default()
        };
        changes.apply(&mut model);

        let page = model.insert(conn).await?;
        tracing::info!(page_id = page.id, slug = %page.slug, "page created");
        Ok(page)
    }

    pub async fn update(db: &Db, id: i32, changes: PageChanges) -> Result<pages::Model, AppError> {
        let conn = db.require().await?;
        Self::ensure_slug_free(conn, &changes.slug, Some(id)).await?;

        let mut model = pages::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        changes.apply(&mut model);

        match model.update(conn).await {
            Ok(page) => Ok(page),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Err(AppError::NotFound("Page")),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(db: &Db, id: i32) -> Result<bool, AppError> {
        let conn = db.require().await?;
        let result = pages::Entity::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Message clair plutôt qu'une violation de contrainte UNIQUE
    async fn ensure_slug_free(conn: &DatabaseConnection, slug: &str, except_id: Option<i32>) -> Result<(), AppError> {
        let mut query = pages::Entity::find().filter(pages::Column::Slug.eq(slug));
        if let Some(id) = except_id {
            query = query.filter(pages::Column::Id.ne(id));
        }

        if query.one(conn).await?.is_some() {
            return Err(AppError::Validation(format!("Slug '{}' is already used", slug)));
        }
        Ok(())
    }
}
