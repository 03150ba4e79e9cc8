//! Notification Policy Engine
//!
//! Decides whether a reply, resend request or reaction notifies the sender,
//! and composes the text. Resend requests count as replies throughout.
//!
//! ## Decision order
//!
//! | Step | Condition | Result |
//! |------|-----------|--------|
//! | 1 | `notify_mode == none` | skip |
//! | 2 | reaction, mode not `replies_and_reactions` | skip |
//! | 3 | mode `first_new_reply` | contents forced off |
//! | 4 | contents on, `content` key present | `null` ⇒ skip, else content message |
//! | 5 | otherwise | summary over stored counts + 1 |
//!
//! Summary notifications need the number of stored records, which only the
//! caller can fetch; [`decide`] returns [`PolicyDecision::Summarize`] for
//! those and [`SummaryRule::compose`] finishes the job.
//!
//! Counts are read before this event's record is written. A concurrent
//! response for the same sender can still slip between count and write, so
//! a "first reply" may occasionally be missed or doubled.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::{Content, NotifyMode, ResponseEvent, SenderConfig};

const CONTENT_FOOTER: &str = "#### MESSAGE END ####\n\
    Open Stello to reply and confirm author. Ignore storage provider's notes below.\
    Instead, change notification settings in Stello.";

const SUMMARY_FOOTER: &str =
    "Ignore storage provider's notes below. Instead, change notification settings in Stello.";

/// Blank lines pushing the footer below whatever the transport prepends.
const SEPARATOR_LINES: usize = 10;

/// A composed notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subject: String,
    pub message: String,
}

impl Notification {
    /// Append ` ({tag})` to the subject.
    pub fn tagged(mut self, tag: &str) -> Self {
        self.subject.push_str(&format!(" ({})", tag));
        self
    }
}

/// Why no notification was sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Event type never notifies.
    NotNotifiable,
    /// Sender turned notifications off.
    Disabled,
    /// Reactions only notify in `replies_and_reactions`.
    ReactionsExcluded,
    /// A reaction was cleared.
    ReactionCleared,
    /// `first_new_reply` and this is not the first unseen reply.
    NotFirstReply,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotNotifiable => "type does not notify",
            Self::Disabled => "notifications disabled",
            Self::ReactionsExcluded => "reactions not notified",
            Self::ReactionCleared => "reaction cleared",
            Self::NotFirstReply => "not the first new reply",
        };
        f.write_str(s)
    }
}

/// Records already stored for a sender, before the current event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResponseCounts {
    /// Stored replies plus resend requests
    pub replies: u64,
    pub reactions: u64,
}

/// Summary still to be composed once stored counts are known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryRule {
    pub is_reaction: bool,
    pub first_reply_only: bool,
}

impl SummaryRule {
    /// Add the current event to `stored` and compose the summary.
    ///
    /// # Errors
    ///
    /// [`SkipReason::NotFirstReply`] when only the first reply notifies and
    /// this is not it.
    pub fn compose(&self, stored: ResponseCounts) -> Result<Notification, SkipReason> {
        let mut counts = stored;
        if self.is_reaction {
            counts.reactions += 1;
        } else {
            counts.replies += 1;
        }

        if self.first_reply_only && counts.replies != 1 {
            return Err(SkipReason::NotFirstReply);
        }

        let summary = summary_line(counts);
        Ok(Notification {
            subject: format!("Stello: {}", summary),
            message: format!(
                "You have {} to your Stello messages (open Stello to see them){}{}",
                summary,
                "\n".repeat(SEPARATOR_LINES),
                SUMMARY_FOOTER
            ),
        })
    }
}

/// Outcome of the count-free part of the policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyDecision {
    Skip(SkipReason),
    Send(Notification),
    Summarize(SummaryRule),
}

/// Run the policy for `event` under the sender's settings.
pub fn decide(config: &SenderConfig, event: &ResponseEvent) -> PolicyDecision {
    let is_reaction = match event {
        ResponseEvent::Reaction { .. } => true,
        ResponseEvent::Reply { .. } | ResponseEvent::Resend { .. } => false,
        _ => return PolicyDecision::Skip(SkipReason::NotNotifiable),
    };

    if config.notify_mode == NotifyMode::None {
        return PolicyDecision::Skip(SkipReason::Disabled);
    }
    if is_reaction && config.notify_mode != NotifyMode::RepliesAndReactions {
        return PolicyDecision::Skip(SkipReason::ReactionsExcluded);
    }

    let first_reply_only = config.notify_mode == NotifyMode::FirstNewReply;
    let include_contents = config.notify_include_contents && !first_reply_only;

    if include_contents {
        match event.content() {
            Content::Absent => {}
            Content::Cleared => return PolicyDecision::Skip(SkipReason::ReactionCleared),
            Content::Text(text) => {
                let (subject, body) = if is_reaction {
                    ("Stello: New reaction", format!("Someone reacted with: {}", text))
                } else {
                    ("Stello: New reply", text.clone())
                };
                return PolicyDecision::Send(Notification {
                    subject: subject.to_string(),
                    message: format!(
                        "{}{}{}",
                        body,
                        "\n".repeat(SEPARATOR_LINES),
                        CONTENT_FOOTER
                    ),
                });
            }
        }
    }

    PolicyDecision::Summarize(SummaryRule {
        is_reaction,
        first_reply_only,
    })
}

/// "2 new replies", "1 new reaction", "3 new replies and 1 new reaction".
pub fn summary_line(counts: ResponseCounts) -> String {
    let mut parts = Vec::with_capacity(2);
    if counts.replies > 0 {
        let noun = if counts.replies == 1 { "reply" } else { "replies" };
        parts.push(format!("{} new {}", counts.replies, noun));
    }
    if counts.reactions > 0 {
        let noun = if counts.reactions == 1 {
            "reaction"
        } else {
            "reactions"
        };
        parts.push(format!("{} new {}", counts.reactions, noun));
    }
    parts.join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: NotifyMode, include: bool) -> SenderConfig {
        SenderConfig {
            notify_mode: mode,
            notify_include_contents: include,
            allow_replies: true,
            allow_reactions: true,
            allow_resend_requests: true,
            allow_delete: false,
            resp_key_public: String::new(),
            email: None,
        }
    }

    fn reply(content: Content) -> ResponseEvent {
        ResponseEvent::Reply { content }
    }

    fn reaction(content: Content) -> ResponseEvent {
        ResponseEvent::Reaction { content }
    }

    fn summarize(decision: PolicyDecision) -> SummaryRule {
        match decision {
            PolicyDecision::Summarize(rule) => rule,
            other => panic!("expected summary, got {:?}", other),
        }
    }

    #[test]
    fn test_mode_none_never_notifies() {
        let cfg = config(NotifyMode::None, true);
        assert_eq!(
            decide(&cfg, &reply(Content::Text("hi".into()))),
            PolicyDecision::Skip(SkipReason::Disabled)
        );
    }

    #[test]
    fn test_reactions_need_reactions_mode() {
        for mode in [NotifyMode::FirstNewReply, NotifyMode::Replies] {
            assert_eq!(
                decide(&config(mode, false), &reaction(Content::Text("like".into()))),
                PolicyDecision::Skip(SkipReason::ReactionsExcluded)
            );
        }
    }

    #[test]
    fn test_first_new_reply_fires_once() {
        let cfg = config(NotifyMode::FirstNewReply, true);
        let rule = summarize(decide(&cfg, &reply(Content::Text("secret".into()))));
        assert!(rule.first_reply_only);

        let first = rule.compose(ResponseCounts::default()).unwrap();
        assert_eq!(first.subject, "Stello: 1 new reply");
        assert!(!first.message.contains("secret"));

        assert_eq!(
            rule.compose(ResponseCounts {
                replies: 1,
                reactions: 0
            }),
            Err(SkipReason::NotFirstReply)
        );
    }

    #[test]
    fn test_first_new_reply_ignores_reactions_in_count() {
        let rule = summarize(decide(
            &config(NotifyMode::FirstNewReply, false),
            &reply(Content::Absent),
        ));
        let sent = rule
            .compose(ResponseCounts {
                replies: 0,
                reactions: 4,
            })
            .unwrap();
        assert_eq!(sent.subject, "Stello: 1 new reply and 4 new reactions");
    }

    #[test]
    fn test_cleared_reaction_with_contents_skipped() {
        let cfg = config(NotifyMode::RepliesAndReactions, true);
        assert_eq!(
            decide(&cfg, &reaction(Content::Cleared)),
            PolicyDecision::Skip(SkipReason::ReactionCleared)
        );
    }

    #[test]
    fn test_cleared_reaction_without_contents_summarized() {
        let cfg = config(NotifyMode::RepliesAndReactions, false);
        assert!(matches!(
            decide(&cfg, &reaction(Content::Cleared)),
            PolicyDecision::Summarize(_)
        ));
    }

    #[test]
    fn test_content_messages() {
        let cfg = config(NotifyMode::RepliesAndReactions, true);
        let PolicyDecision::Send(note) = decide(&cfg, &reaction(Content::Text("laugh".into())))
        else {
            panic!("expected content notification");
        };
        assert_eq!(note.subject, "Stello: New reaction");
        assert!(note
            .message
            .starts_with("Someone reacted with: laugh\n\n\n\n\n\n\n\n\n\n#### MESSAGE END ####\n"));
        assert!(note.message.ends_with("change notification settings in Stello."));

        let PolicyDecision::Send(note) = decide(&cfg, &reply(Content::Text("Hello".into())))
        else {
            panic!("expected content notification");
        };
        assert_eq!(note.subject, "Stello: New reply");
        assert!(note.message.starts_with("Hello\n"));
    }

    #[test]
    fn test_contents_wanted_but_absent_falls_back_to_summary() {
        let cfg = config(NotifyMode::Replies, true);
        assert!(matches!(
            decide(&cfg, &reply(Content::Absent)),
            PolicyDecision::Summarize(_)
        ));
    }

    #[test]
    fn test_resend_counts_as_reply() {
        let cfg = config(NotifyMode::Replies, false);
        let rule = summarize(decide(&cfg, &ResponseEvent::Resend { content: Content::Absent }));
        assert!(!rule.is_reaction);
        let note = rule
            .compose(ResponseCounts {
                replies: 2,
                reactions: 0,
            })
            .unwrap();
        assert_eq!(note.subject, "Stello: 3 new replies");
        assert_eq!(
            note.message,
            format!(
                "You have 3 new replies to your Stello messages (open Stello to see them){}{}",
                "\n".repeat(10),
                SUMMARY_FOOTER
            )
        );
    }

    #[test]
    fn test_summary_line() {
        let line = |replies, reactions| summary_line(ResponseCounts { replies, reactions });
        assert_eq!(line(2, 0), "2 new replies");
        assert_eq!(line(0, 1), "1 new reaction");
        assert_eq!(line(3, 1), "3 new replies and 1 new reaction");
        assert_eq!(line(1, 2), "1 new reply and 2 new reactions");
    }

    #[test]
    fn test_subject_tag() {
        let note = Notification {
            subject: "Stello: 1 new reply".into(),
            message: String::new(),
        };
        assert_eq!(note.tagged("my-bucket").subject, "Stello: 1 new reply (my-bucket)");
    }

    #[test]
    fn test_informational_types_skip() {
        let cfg = config(NotifyMode::RepliesAndReactions, true);
        assert_eq!(
            decide(&cfg, &ResponseEvent::Address),
            PolicyDecision::Skip(SkipReason::NotNotifiable)
        );
    }
}
