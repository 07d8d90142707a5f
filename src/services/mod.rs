pub mod attempt_service;
pub mod catalog_service;
pub mod file_store;
pub mod quiz_service;
pub mod resource_service;

pub use attempt_service::AttemptService;
pub use catalog_service::CatalogService;
pub use file_store::{FileStore, FileUpload, LocalFileStore};
pub use quiz_service::QuizService;
pub use resource_service::ResourceService;
