pub const CLASSES_COLLECTION: &str = "classes";
pub const TERMS_COLLECTION: &str = "terms";
pub const SUBJECTS_COLLECTION: &str = "subjects";
pub const RESOURCES_COLLECTION: &str = "resources";
pub const QUIZZES_COLLECTION: &str = "quizzes";
pub const QUIZ_ATTEMPTS_COLLECTION: &str = "quiz_attempts";
pub const USERS_COLLECTION: &str = "users";

// Unique index names. Duplicate-key errors are classified by these.
pub const CLASS_ORDER_INDEX: &str = "class_order_unique";
pub const CLASS_NAME_INDEX: &str = "class_name_unique";
pub const TERM_ORDER_INDEX: &str = "term_class_order_unique";
pub const TERM_NAME_INDEX: &str = "term_class_name_unique";
pub const SUBJECT_CODE_INDEX: &str = "subject_term_code_unique";
pub const QUIZ_RESOURCE_INDEX: &str = "quiz_resource_unique";
pub const ID_INDEX: &str = "id_unique";

/// Every question has exactly four options.
pub const OPTION_COUNT: usize = 4;
pub const DEFAULT_QUESTION_MARKS: i32 = 1;

// Pass threshold: 3/5 = 60%.
pub const PASS_RATIO_NUMERATOR: i32 = 3;
pub const PASS_RATIO_DENOMINATOR: i32 = 5;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "ppt", "pptx", "jpg", "jpeg", "png", "txt",
];
