#[cfg(test)]
pub mod fixtures {
    use crate::constants::OPTION_COUNT;
    use crate::models::domain::{Class, Difficulty, Quiz, QuizQuestion, Subject, Term};

    /// Class VI at order 9
    pub fn test_class() -> Class {
        Class::new("Class VI", Some("Sixth grade"), 9)
    }

    pub fn test_term(class_id: &str) -> Term {
        Term::new(class_id, "Term 1", 1)
    }

    pub fn test_subject(term_id: &str) -> Subject {
        Subject::new(term_id, "Mathematics", "MATH-6", 0)
    }

    pub fn four_options() -> [String; OPTION_COUNT] {
        ["a".into(), "b".into(), "c".into(), "d".into()]
    }

    /// An active quiz with one question per entry; each entry is the
    /// 0-based authored index of the correct option.
    pub fn quiz_with_correct_answers(correct: &[usize]) -> Quiz {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, &authored)| {
                QuizQuestion::new(
                    &format!("Question {}", i + 1),
                    four_options(),
                    authored,
                    Some("because"),
                    i as i32 + 1,
                )
                .expect("valid question")
            })
            .collect();

        Quiz::new("resource-1", "Quiz", 10, Difficulty::Medium, true, questions, "teacher")
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_fixture_hierarchy_links_up() {
        let class = test_class();
        let term = test_term(&class.id);
        let subject = test_subject(&term.id);

        assert_eq!(class.order, 9);
        assert_eq!(term.class_id, class.id);
        assert_eq!(subject.term_id, term.id);
        assert_eq!(subject.code, "MATH-6");
    }

    #[test]
    fn test_fixture_quiz_stores_one_based_answers() {
        let quiz = quiz_with_correct_answers(&[0, 1]);
        assert_eq!(quiz.total_marks, 2);
        assert_eq!(quiz.questions[0].correct_answer, 1);
        assert_eq!(quiz.questions[1].correct_answer, 2);
    }

    #[test]
    fn test_status_helpers() {
        assert_error_status(StatusCode::CONFLICT);
        assert_success_status(StatusCode::CREATED);
    }
}
