//! Registration extraction from the transcript
//!
//! A single linear pass over the conversation recovers the student's email
//! address and the courses they mentioned. Course mentions only count inside
//! the registration window: the stretch between the assistant's "let me know"
//! prompt and its "is there anything else" closing line.

#[cfg(test)]
mod proptests;

use crate::transcript::{ChatMessage, Role};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Phrase (in any message) that opens the registration window
pub const REGISTRATION_OPEN: &str = "let me know";
/// Phrase (in any message) that closes the registration window
pub const REGISTRATION_CLOSE: &str = "is there anything else";

/// Loose email shape: local part, `@`, domain with at least one dot.
/// First match in the transcript wins; nothing beyond the shape is checked.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+\.[\w.-]+").expect("email pattern compiles"));

/// Keyword → display name for the July course offering
const COURSES: &[(&str, &str)] = &[
    ("ux", "UX/Product Design"),
    ("ai", "AI and Reinforcement Learning"),
    ("data", "Data Visualization"),
    ("cstugpt", "CSTUGPT"),
    ("python", "Python For AI"),
    ("security", "Security (Seminar)"),
];

/// Fixed keyword-to-course mapping, static for the process lifetime
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    entries: &'static [(&'static str, &'static str)],
}

impl CourseCatalog {
    pub fn standard() -> Self {
        Self { entries: COURSES }
    }

    /// Scan the transcript for an email address and course mentions.
    ///
    /// Per-message check order matters: email first, then window-open, then
    /// course extraction, then window-close. A message that opens the window
    /// can itself contribute courses, and a user message carrying the
    /// closing phrase still counts.
    pub fn scan(&self, messages: &[ChatMessage]) -> EnrollmentResult {
        let mut email: Option<String> = None;
        let mut courses: HashSet<String> = HashSet::new();
        let mut registration_open = false;

        for message in messages {
            let content = message.content.to_lowercase();

            if email.is_none() {
                if let Some(m) = EMAIL_PATTERN.find(&content) {
                    email = Some(m.as_str().to_string());
                }
            }

            if content.contains(REGISTRATION_OPEN) {
                registration_open = true;
            }

            if registration_open && message.role == Role::User {
                for (keyword, display) in self.entries {
                    if content.contains(keyword) {
                        courses.insert((*display).to_string());
                    }
                }
            }

            if content.contains(REGISTRATION_CLOSE) {
                registration_open = false;
            }
        }

        EnrollmentResult { email, courses }
    }
}

/// Outcome of a transcript scan; never persisted
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnrollmentResult {
    pub email: Option<String>,
    /// De-duplicated, unordered; repeated mentions are treated as noise
    pub courses: HashSet<String>,
}

impl EnrollmentResult {
    /// Both an email and at least one course were found
    pub fn is_complete(&self) -> bool {
        self.email.is_some() && !self.courses.is_empty()
    }

    /// Courses in sorted order, for deterministic rendering
    pub fn sorted_courses(&self) -> Vec<String> {
        let mut courses: Vec<String> = self.courses.iter().cloned().collect();
        courses.sort();
        courses
    }
}
