pub mod auth_service;
pub mod complaint_service;
pub mod identity_provider;
pub mod notification_service;
pub mod page_service;
