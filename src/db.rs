// connexion BD

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use tokio::sync::OnceCell;

use crate::error::AppError;
use crate::models::{complaints, notification_config, pages};

/// Base injoignable : les lectures dégradées répondent vite
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Connexion partagée, établie au premier accès puis réutilisée.
/// Un échec de connexion n'est pas mémorisé : la requête suivante réessaie.
pub struct Db {
    database_url: Option<String>,
    connection: OnceCell<DatabaseConnection>,
}

impl Db {
    pub fn new(database_url: Option<String>) -> Self {
        Db {
            database_url,
            connection: OnceCell::new(),
        }
    }

    /// Connexion déjà ouverte (tests, outils)
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Db {
            database_url: None,
            connection: OnceCell::new_with(Some(connection)),
        }
    }

    /// None si la base n'est pas configurée ou injoignable.
    /// Les routes de lecture s'en servent pour renvoyer un résultat vide.
    pub async fn get(&self) -> Option<&DatabaseConnection> {
        if let Some(connection) = self.connection.get() {
            return Some(connection);
        }

        let url = self.database_url.as_deref()?;
        let result = self
            .connection
            .get_or_try_init(|| async {
                let mut options = ConnectOptions::new(url);
                options
                    .connect_timeout(CONNECT_TIMEOUT)
                    .acquire_timeout(CONNECT_TIMEOUT);
                let connection = Database::connect(options).await?;
                ensure_schema(&connection).await?;
                tracing::info!("database connected");
                Ok::<_, DbErr>(connection)
            })
            .await;

        match result {
            Ok(connection) => Some(connection),
            Err(e) => {
                // Jamais l'URL dans les logs : elle contient le mot de passe
                tracing::warn!(error = %e, "database not available");
                None
            }
        }
    }

    /// Pour les écritures : base indisponible = erreur
    pub async fn require(&self) -> Result<&DatabaseConnection, AppError> {
        self.get().await.ok_or(AppError::DatabaseUnavailable)
    }
}

/// Crée les tables manquantes à partir des entités
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    create_table(db, &schema, complaints::Entity).await?;
    create_table(db, &schema, pages::Entity).await?;
    create_table(db, &schema, notification_config::Entity).await?;

    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement)).await?;
    Ok(())
}
