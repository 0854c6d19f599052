//! Property-based tests for the transcript scanner

use super::{CourseCatalog, REGISTRATION_CLOSE, REGISTRATION_OPEN};
use crate::transcript::ChatMessage;
use proptest::prelude::*;

fn catalog() -> CourseCatalog {
    CourseCatalog::standard()
}

proptest! {
    /// Without the opening phrase, no course is ever collected.
    #[test]
    fn no_open_phrase_no_courses(contents in prop::collection::vec("[a-z ]{0,40}", 0..8)) {
        let messages: Vec<ChatMessage> = contents
            .iter()
            .filter(|c| !c.contains(REGISTRATION_OPEN))
            .map(ChatMessage::user)
            .collect();

        let result = catalog().scan(&messages);
        prop_assert!(result.courses.is_empty());
    }

    /// Content without an '@' never yields an email.
    #[test]
    fn no_at_sign_no_email(contents in prop::collection::vec("[a-z0-9 .-]{0,40}", 0..8)) {
        let messages: Vec<ChatMessage> = contents.iter().map(ChatMessage::user).collect();
        let result = catalog().scan(&messages);
        prop_assert!(result.email.is_none());
    }

    /// A well-formed address is always recovered, lowercased, from anywhere
    /// in the transcript.
    #[test]
    fn wellformed_email_is_found(
        local in "[a-z][a-z0-9]{0,10}",
        domain in "[a-z][a-z0-9]{0,10}",
        tld in "[a-z]{2,4}",
        padding in "[a-z ]{0,20}",
    ) {
        let address = format!("{local}@{domain}.{tld}");
        let messages = vec![ChatMessage::assistant(format!("{padding} {address}"))];
        let result = catalog().scan(&messages);
        prop_assert_eq!(result.email, Some(address));
    }

    /// After the closing phrase, user course mentions stop counting until
    /// the window reopens.
    #[test]
    fn closed_window_ignores_mentions(keyword_idx in 0usize..6) {
        let keyword = ["ux", "ai", "data", "cstugpt", "python", "security"][keyword_idx];
        let messages = vec![
            ChatMessage::assistant(REGISTRATION_OPEN),
            ChatMessage::assistant(REGISTRATION_CLOSE),
            ChatMessage::user(keyword),
        ];
        let result = catalog().scan(&messages);
        prop_assert!(result.courses.is_empty());
    }

    /// Inside the window every catalog keyword maps to exactly one display
    /// name, however often it repeats.
    #[test]
    fn open_window_collects_one_course_per_keyword(
        keyword_idx in 0usize..6,
        repeats in 1usize..5,
    ) {
        let keyword = ["ux", "ai", "data", "cstugpt", "python", "security"][keyword_idx];
        let mut messages = vec![ChatMessage::assistant(REGISTRATION_OPEN)];
        for _ in 0..repeats {
            messages.push(ChatMessage::user(keyword));
        }
        let result = catalog().scan(&messages);
        prop_assert_eq!(result.courses.len(), 1);
    }
}
