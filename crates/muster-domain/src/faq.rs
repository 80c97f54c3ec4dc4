//! FAQ tree: section → rule → question/answer

use serde::{Deserialize, Serialize};

/// A question with its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text, marker stripped
    pub question: String,

    /// Answer text, marker stripped
    pub answer: String,
}

/// A rule heading and the questions filed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule title as printed (upper-case)
    pub title: String,

    /// Questions in document order
    pub questions: Vec<Question>,
}

/// A "FREQUENTLY ASKED QUESTIONS" section of the rules update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqSection {
    /// Section title
    pub title: String,

    /// Questions that appeared before any rule heading
    pub questions: Vec<Question>,

    /// Rules in document order
    pub rules: Vec<Rule>,
}
