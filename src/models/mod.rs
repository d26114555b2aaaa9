// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Les entités SeaORM correspondent aux tables créées par db::ensure_schema.
//
// Liste des modules:
//   - health : Health check API
//   - identity : Identité résolue pour une requête (jamais persistée)
//   - complaints : Réclamations / tickets de support
//   - pages : Pages de contenu statique
//   - notification_config : Configuration des notifications (une seule ligne)
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// ============================================================================

pub mod health;
pub mod identity;
pub mod complaints;
pub mod pages;
pub mod notification_config;
pub mod dto;
