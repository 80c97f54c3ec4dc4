//! FAQ tree builder
//!
//! Consumes the column lines of each page in order and accumulates a
//! section → rule → question tree. Question/answer collection is an explicit
//! state machine; a second answer marker while an answer is open is an
//! [`ExtractorError::IllegalTransition`].

use std::collections::BTreeSet;
use std::mem;

use muster_domain::{normalize_text, FaqSection, Question, Rule};
use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::segmenter::{contains_faq, FaqLayout};

const SECTION_MARKER: &str = "FREQUENTLY ASKED QUESTIONS";
const UNKNOWN_SECTION: &str = "Unknown Section";
const DELETED_PREFIX: &str = "DELETED";
const TAG_LINES: &[&str] = &["NEW", "UPDATED"];

/// Question/answer collection state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum QaState {
    /// Not inside a question
    #[default]
    Idle,
    /// Collecting question text
    Question { question: Vec<String> },
    /// Collecting answer text
    Answer {
        question: Vec<String>,
        answer: Vec<String>,
    },
}

impl QaState {
    fn name(&self) -> &'static str {
        match self {
            QaState::Idle => "idle",
            QaState::Question { .. } => "collecting question",
            QaState::Answer { .. } => "collecting answer",
        }
    }
}

/// Classification of one column line
enum LineEvent<'a> {
    QuestionMarker(&'a str),
    AnswerMarker(&'a str),
    Text(&'a str),
}

impl<'a> LineEvent<'a> {
    fn of(line: &'a str) -> Self {
        if let Some(rest) = strip_marker(line, 'Q') {
            LineEvent::QuestionMarker(rest)
        } else if let Some(rest) = strip_marker(line, 'A') {
            LineEvent::AnswerMarker(rest)
        } else {
            LineEvent::Text(line)
        }
    }

    fn is_question(&self) -> bool {
        matches!(self, LineEvent::QuestionMarker(_))
    }
}

/// Strip a leading `Q:`/`Q.` (or `A:`/`A.`) marker and following whitespace
fn strip_marker(line: &str, letter: char) -> Option<&str> {
    let rest = line.strip_prefix(letter)?;
    let rest = rest.strip_prefix(':').or_else(|| rest.strip_prefix('.'))?;
    Some(rest.trim_start())
}

fn is_marker_line(line: &str) -> bool {
    !matches!(LineEvent::of(line), LineEvent::Text(_))
}

/// True if the line has at least one letter and no lower-case letters
pub fn is_upper_line(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

/// Accumulates FAQ sections across the pages of one rules-update document
#[derive(Debug)]
pub struct FaqSectionBuilder {
    config: ExtractorConfig,
    known_titles: BTreeSet<String>,
    sections: Vec<FaqSection>,
    section_title: Option<String>,
    section_questions: Vec<Question>,
    rules: Vec<Rule>,
    open_rule: Option<Rule>,
    state: QaState,
}

impl FaqSectionBuilder {
    /// Create a builder with an empty tree
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            known_titles: BTreeSet::new(),
            sections: Vec::new(),
            section_title: None,
            section_questions: Vec::new(),
            rules: Vec::new(),
            open_rule: None,
            state: QaState::Idle,
        }
    }

    /// Rule titles discovered so far in this run
    pub fn known_titles(&self) -> &BTreeSet<String> {
        &self.known_titles
    }

    /// Feed one segmented page.
    ///
    /// Pages whose column text has no question followed by an answer are
    /// ignored.
    pub fn process_page(&mut self, layout: &FaqLayout) -> Result<(), ExtractorError> {
        let lines = layout.column_lines();
        if !contains_faq(&lines.join(" ")) {
            return Ok(());
        }

        if let Some(title) = self.section_title_of(&layout.outside) {
            self.start_section(title);
        }

        for (index, line) in lines.iter().enumerate() {
            if LineEvent::of(line).is_question() {
                if let Some(title) = rule_title_before(&lines, index) {
                    if self.known_titles.insert(title.clone()) {
                        debug!("Discovered rule title: {}", title);
                    }
                }
            }
        }

        for line in &lines {
            if let Some(title) = self.matching_title(line) {
                self.finalize_question();
                self.start_rule(title);
            }
            self.handle_line(line)?;
        }
        Ok(())
    }

    /// Close every open structure and return the sections, minus rules whose
    /// title marks them as deleted
    pub fn finish(mut self) -> Vec<FaqSection> {
        self.finalize_question();
        self.finalize_section();

        for section in &mut self.sections {
            section
                .rules
                .retain(|rule| !rule.title.starts_with(DELETED_PREFIX));
        }
        info!("Extracted {} FAQ sections", self.sections.len());
        self.sections
    }

    fn section_title_of(&self, outside: &[String]) -> Option<String> {
        if !outside.iter().any(|line| line.contains(SECTION_MARKER)) {
            return None;
        }
        let title = outside
            .get(self.config.section_title_line)
            .map(|line| line.trim().to_string())
            .unwrap_or_else(|| UNKNOWN_SECTION.to_string());
        Some(title)
    }

    /// Exact match first, then the first known title the line is a prefix of
    fn matching_title(&self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return None;
        }
        if self.known_titles.contains(line) {
            return Some(line.to_string());
        }
        self.known_titles
            .iter()
            .find(|title| title.starts_with(line))
            .cloned()
    }

    fn handle_line(&mut self, line: &str) -> Result<(), ExtractorError> {
        match LineEvent::of(line) {
            LineEvent::QuestionMarker(text) => {
                self.finalize_question();
                self.state = QaState::Question {
                    question: vec![text.to_string()],
                };
            }
            LineEvent::AnswerMarker(text) => {
                self.state = match mem::take(&mut self.state) {
                    QaState::Idle => QaState::Answer {
                        question: Vec::new(),
                        answer: vec![text.to_string()],
                    },
                    QaState::Question { question } => QaState::Answer {
                        question,
                        answer: vec![text.to_string()],
                    },
                    state @ QaState::Answer { .. } => {
                        return Err(ExtractorError::IllegalTransition {
                            state: state.name(),
                            event: "answer marker",
                            line: line.to_string(),
                        });
                    }
                };
            }
            LineEvent::Text(text) => match &mut self.state {
                QaState::Idle => {}
                QaState::Question { question } => question.push(text.trim().to_string()),
                QaState::Answer { answer, .. } => answer.push(text.trim().to_string()),
            },
        }
        Ok(())
    }

    fn finalize_question(&mut self) {
        let QaState::Answer { question, answer } = mem::take(&mut self.state) else {
            return;
        };
        let question = normalize_text(question.join(" ").trim());
        let answer = normalize_text(answer.join(" ").trim());
        if question.is_empty() || answer.is_empty() {
            return;
        }

        let entry = Question { question, answer };
        match &mut self.open_rule {
            Some(rule) => rule.questions.push(entry),
            None => self.section_questions.push(entry),
        }
    }

    fn start_rule(&mut self, title: String) {
        self.finalize_rule();
        debug!("Starting rule: {}", title);
        self.open_rule = Some(Rule {
            title,
            questions: Vec::new(),
        });
    }

    fn finalize_rule(&mut self) {
        if let Some(rule) = self.open_rule.take() {
            if !rule.questions.is_empty() {
                self.rules.push(rule);
            }
        }
    }

    fn start_section(&mut self, title: String) {
        self.finalize_question();
        self.finalize_section();
        info!("Starting section: {}", title);
        self.section_title = Some(title);
    }

    fn finalize_section(&mut self) {
        self.finalize_rule();
        let title = self.section_title.take();
        let questions = mem::take(&mut self.section_questions);
        let rules = mem::take(&mut self.rules);
        if title.is_none() && questions.is_empty() && rules.is_empty() {
            return;
        }
        self.sections.push(FaqSection {
            title: title.unwrap_or_else(|| UNKNOWN_SECTION.to_string()),
            questions,
            rules,
        });
    }
}

/// Collect the upper-case lines directly above `index`, skipping tag lines
/// and stopping at the first empty, marker or mixed-case line
fn rule_title_before(lines: &[String], index: usize) -> Option<String> {
    let mut collected = Vec::new();
    for line in lines[..index].iter().rev() {
        let text = line.trim();
        if TAG_LINES.contains(&text) {
            continue;
        }
        if text.is_empty() || is_marker_line(text) || !is_upper_line(text) {
            break;
        }
        collected.push(text);
    }
    if collected.is_empty() {
        return None;
    }
    collected.reverse();
    Some(collected.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(outside: &[&str], left: &[&str], right: &[&str]) -> FaqLayout {
        let owned = |lines: &[&str]| lines.iter().map(|l| l.to_string()).collect();
        FaqLayout {
            outside: owned(outside),
            left: owned(left),
            right: owned(right),
        }
    }

    fn builder() -> FaqSectionBuilder {
        FaqSectionBuilder::new(ExtractorConfig::default())
    }

    #[test]
    fn test_rule_less_question() {
        let mut builder = builder();
        builder
            .process_page(&layout(&[], &["Q: Foo?", "A: Bar."], &[]))
            .unwrap();
        let sections = builder.finish();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Unknown Section");
        assert!(sections[0].rules.is_empty());
        assert_eq!(
            sections[0].questions,
            vec![Question {
                question: "Foo?".to_string(),
                answer: "Bar.".to_string(),
            }]
        );
    }

    #[test]
    fn test_rules_and_continuation_lines() {
        let mut builder = builder();
        builder
            .process_page(&layout(
                &[],
                &[
                    "ALL-OUT ATTACK",
                    "Q: Can I use this",
                    "twice?",
                    "A: No.",
                    "REDEPLOY",
                    "Q: Does it count",
                    "as a move?",
                ],
                &["A: Yes, it is", "a normal move."],
            ))
            .unwrap();
        let sections = builder.finish();
        let rules = &sections[0].rules;

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].title, "ALL-OUT ATTACK");
        assert_eq!(rules[0].questions[0].question, "Can I use this twice?");
        assert_eq!(rules[1].title, "REDEPLOY");
        assert_eq!(rules[1].questions[0].answer, "Yes, it is a normal move.");
    }

    #[test]
    fn test_multi_line_title_and_tag_lines() {
        let mut builder = builder();
        builder
            .process_page(&layout(
                &[],
                &["BATTLE TACTIC:", "STRIKE FIRST", "UPDATED", "Q: When?", "A: Now."],
                &[],
            ))
            .unwrap();

        assert!(builder.known_titles().contains("BATTLE TACTIC: STRIKE FIRST"));
        let sections = builder.finish();
        assert_eq!(sections[0].rules[0].title, "BATTLE TACTIC: STRIKE FIRST");
    }

    #[test]
    fn test_titles_persist_across_pages() {
        let mut builder = builder();
        builder
            .process_page(&layout(&[], &["COMMAND POINTS", "Q: One?", "A: Yes."], &[]))
            .unwrap();
        // The heading repeats on a later page without a directly following question.
        builder
            .process_page(&layout(
                &[],
                &["Q: Two?", "A: Yes.", "COMMAND POINTS", "(continued)", "Q: Three?", "A: No."],
                &[],
            ))
            .unwrap();
        let sections = builder.finish();
        let section = &sections[0];

        assert_eq!(section.questions.len(), 0);
        assert_eq!(section.rules.len(), 2);
        assert_eq!(section.rules[0].questions.len(), 2);
        assert_eq!(section.rules[1].questions[0].question, "Three?");
    }

    #[test]
    fn test_section_marker_flushes() {
        let mut builder = builder();
        builder
            .process_page(&layout(
                &["WARHAMMER", "AGE OF SIGMAR", "FREQUENTLY ASKED QUESTIONS", "CORE RULES"],
                &["CHARGE", "Q: A?", "A: B."],
                &[],
            ))
            .unwrap();
        builder
            .process_page(&layout(
                &["WARHAMMER", "AGE OF SIGMAR", "FREQUENTLY ASKED QUESTIONS", "ADVANCED RULES"],
                &["Q: C?", "A: D."],
                &[],
            ))
            .unwrap();
        let sections = builder.finish();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "CORE RULES");
        assert_eq!(sections[0].rules[0].title, "CHARGE");
        assert_eq!(sections[1].title, "ADVANCED RULES");
        assert_eq!(sections[1].questions[0].question, "C?");
    }

    #[test]
    fn test_deleted_rules_removed() {
        let mut builder = builder();
        builder
            .process_page(&layout(
                &[],
                &["DELETED: OLD RULE", "Q: Gone?", "A: Yes.", "KEPT RULE", "Q: Here?", "A: Yes."],
                &[],
            ))
            .unwrap();
        let sections = builder.finish();

        assert_eq!(sections[0].rules.len(), 1);
        assert_eq!(sections[0].rules[0].title, "KEPT RULE");
    }

    #[test]
    fn test_page_without_faq_ignored() {
        let mut builder = builder();
        builder
            .process_page(&layout(&["FREQUENTLY ASKED QUESTIONS"], &["Just prose."], &[]))
            .unwrap();
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn test_second_answer_is_illegal() {
        let mut builder = builder();
        let err = builder
            .process_page(&layout(&[], &["Q: Foo?", "A: Bar.", "A: Baz."], &[]))
            .unwrap_err();

        match err {
            ExtractorError::IllegalTransition { state, line, .. } => {
                assert_eq!(state, "collecting answer");
                assert_eq!(line, "A: Baz.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unanswered_question_dropped() {
        let mut builder = builder();
        builder
            .process_page(&layout(&[], &["Q: Lost?", "Q: Kept?", "A: Yes."], &[]))
            .unwrap();
        let sections = builder.finish();
        assert_eq!(sections[0].questions.len(), 1);
        assert_eq!(sections[0].questions[0].question, "Kept?");
    }

    #[test]
    fn test_answer_text_normalized() {
        let mut builder = builder();
        builder
            .process_page(&layout(
                &[],
                &["Q: First?", "A: Yes.", "Q. Is it \u{201c}fine\u{201d}?", "A. Yes \u{2014} always."],
                &[],
            ))
            .unwrap();
        let sections = builder.finish();
        assert_eq!(sections[0].questions[1].question, "Is it \"fine\"?");
        assert_eq!(sections[0].questions[1].answer, "Yes - always.");
    }

    #[test]
    fn test_is_upper_line() {
        assert!(is_upper_line("ALL-OUT ATTACK"));
        assert!(is_upper_line("12.3 REDEPLOY"));
        assert!(!is_upper_line("Redeploy"));
        assert!(!is_upper_line("12.3"));
    }
}
