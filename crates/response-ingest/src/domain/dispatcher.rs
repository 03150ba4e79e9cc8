//! Event Dispatcher
//!
//! Maps each validated event to exactly one handler action after checking
//! the sender's permission for its type. The match is exhaustive: adding a
//! [`ResponseEvent`] variant fails to compile until it is handled here.

use shared_types::{Authorization, CopyId, DenialReason, ResponseEvent, SenderConfig};

/// Side effect a handler performs on the messages bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerAction {
    /// Nothing beyond recording.
    RecordOnly,
    /// Advance the copy's read counter, deleting it at its limit.
    AdvanceReadCounter(CopyId),
    /// Delete the recipient's own copy (legacy).
    DeleteCopy(CopyId),
}

/// What the pipeline does for one authorized event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    pub action: HandlerAction,
    /// Whether the notification policy is consulted
    pub notifies: bool,
}

/// Check the sender's permission for `event`.
pub fn authorize(event: &ResponseEvent, config: &SenderConfig) -> Authorization {
    let denied = match event {
        ResponseEvent::Reply { .. } if !config.allow_replies => Some(DenialReason::RepliesDisabled),
        ResponseEvent::Reaction { .. } if !config.allow_reactions => {
            Some(DenialReason::ReactionsDisabled)
        }
        ResponseEvent::Resend { .. } if !config.allow_resend_requests => {
            Some(DenialReason::ResendRequestsDisabled)
        }
        ResponseEvent::Delete { .. } if !config.allow_delete => Some(DenialReason::DeleteDisabled),
        _ => None,
    };
    match denied {
        Some(reason) => Authorization::Denied(reason),
        None => Authorization::Authorized,
    }
}

/// Authorize `event` and pick its handler.
///
/// # Errors
///
/// The denial reason when the sender disabled this type.
pub fn dispatch(event: &ResponseEvent, config: &SenderConfig) -> Result<Dispatch, DenialReason> {
    if let Authorization::Denied(reason) = authorize(event, config) {
        return Err(reason);
    }

    let dispatch = match event {
        ResponseEvent::Read {
            copy_id,
            has_max_reads,
        } => Dispatch {
            action: if *has_max_reads {
                HandlerAction::AdvanceReadCounter(copy_id.clone())
            } else {
                HandlerAction::RecordOnly
            },
            notifies: false,
        },
        ResponseEvent::Reply { .. } | ResponseEvent::Reaction { .. } | ResponseEvent::Resend { .. } => {
            Dispatch {
                action: HandlerAction::RecordOnly,
                notifies: true,
            }
        }
        ResponseEvent::Subscription | ResponseEvent::Address | ResponseEvent::Error => Dispatch {
            action: HandlerAction::RecordOnly,
            notifies: false,
        },
        ResponseEvent::Delete { copy_id } => Dispatch {
            action: HandlerAction::DeleteCopy(copy_id.clone()),
            notifies: false,
        },
    };
    Ok(dispatch)
}
