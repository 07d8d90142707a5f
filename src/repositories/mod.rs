pub mod class_repository;
pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod resource_repository;
pub mod subject_repository;
pub mod term_repository;
pub mod user_repository;

pub use class_repository::{ClassRepository, MongoClassRepository};
pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use resource_repository::{MongoResourceRepository, ResourceRepository};
pub use subject_repository::{MongoSubjectRepository, SubjectRepository};
pub use term_repository::{MongoTermRepository, TermRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

#[cfg(test)]
pub use class_repository::MockClassRepository;
#[cfg(test)]
pub use quiz_attempt_repository::MockQuizAttemptRepository;
#[cfg(test)]
pub use quiz_repository::MockQuizRepository;
#[cfg(test)]
pub use resource_repository::MockResourceRepository;
#[cfg(test)]
pub use subject_repository::MockSubjectRepository;
#[cfg(test)]
pub use term_repository::MockTermRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
