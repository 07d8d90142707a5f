pub mod catalog;
pub mod dependents;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod resource;
pub mod user;

pub use catalog::{Class, Subject, Term};
pub use dependents::DependentCounts;
pub use quiz::{Difficulty, Quiz};
pub use quiz_attempt::{AttemptAnswer, QuizAttempt};
pub use quiz_question::QuizQuestion;
pub use resource::{Resource, ResourceType, StoredFile};
pub use user::{User, UserRole};
