//! The host collaborator for `self`/`that` expansion (§4.6).

/// One field belonging to a question: a concrete variable name, plus the
/// portion of that name past the question's SGQA prefix (used by the
/// `sq_<regex>` / `nosq_<regex>` filters).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub code: String,
}

/// A question's identity and the set of concrete variables it owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub sgqa: String,
    pub fields: Vec<Field>,
}

/// Host lookup for `self`/`that` expansion. `current` answers `self`
/// (the question the expression is attached to); `get_by_code` answers
/// `that.<qcode>`.
pub trait QuestionResolver {
    fn current(&self) -> Option<Question>;
    fn get_by_code(&self, code: &str) -> Option<Question>;
}

/// A resolver backed by an in-memory map of question code to [`Question`],
/// with one of them designated as the current question. For tests and the
/// `bracet` CLI's demo mode.
#[derive(Clone, Debug, Default)]
pub struct MapQuestionResolver {
    pub questions: std::collections::HashMap<String, Question>,
    pub current_code: Option<String>,
}

impl MapQuestionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_question(mut self, code: impl Into<String>, question: Question) -> Self {
        self.questions.insert(code.into(), question);
        self
    }

    pub fn with_current(mut self, code: impl Into<String>) -> Self {
        self.current_code = Some(code.into());
        self
    }
}

impl QuestionResolver for MapQuestionResolver {
    fn current(&self) -> Option<Question> {
        let code = self.current_code.as_ref()?;
        self.questions.get(code).cloned()
    }

    fn get_by_code(&self, code: &str) -> Option<Question> {
        self.questions.get(code).cloned()
    }
}
