// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Doshka workspace.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of a conversation (a Telegram private chat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Platform identity of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Identifier of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i64);

/// Whether a listing offers work or offers a service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Job,
    Service,
}

/// A persisted classified ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Globally unique, monotonically assigned by the store's counter.
    pub id: i64,
    pub owner_id: UserId,
    /// Platform username of the owner; `None` renders as a private user.
    pub owner_display: Option<String>,
    pub kind: ListingKind,
    pub category: String,
    pub description: String,
    pub contact: Option<String>,
    /// Drives sort order, edit-window expiry, and retention expiry.
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Whether the owner may still edit this listing at `now`.
    ///
    /// Recomputed on every authorization attempt; never cache the result.
    pub fn editable_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.created_at < window
    }
}

/// Conjunctive filter over the listing collection. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub kind: Option<ListingKind>,
    pub owner: Option<UserId>,
}

impl ListingFilter {
    /// Browse filter: a category plus an optional kind.
    pub fn browse(category: impl Into<String>, kind: Option<ListingKind>) -> Self {
        Self {
            category: Some(category.into()),
            kind,
            owner: None,
        }
    }

    /// Owner-scoped filter for the "my listings" screen.
    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner: Some(owner),
            ..Self::default()
        }
    }
}

/// What happens when a control is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlPress {
    /// Delivered back to the bot as an opaque action string.
    Action(String),
    /// Opens an external link; nothing is delivered back.
    Link(String),
}

/// A single labelled control attached to an interface message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub press: ControlPress,
}

impl Control {
    pub fn action(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            press: ControlPress::Action(data.into()),
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            press: ControlPress::Link(url.into()),
        }
    }
}

/// Ordered rows of controls rendered under an interface message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    pub rows: Vec<Vec<Control>>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row of controls, builder style.
    pub fn row(mut self, controls: Vec<Control>) -> Self {
        self.rows.push(controls);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }
}

/// Payload of an inbound user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Free text typed by the user.
    Text(String),
    /// An opaque action string from a pressed control.
    Control(String),
}

/// An inbound user action delivered by the channel gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub chat: ChatId,
    pub user: UserId,
    /// Platform username, when the user has one.
    pub user_display: Option<String>,
    /// The interface message a control press originated from, if any.
    pub origin_message: Option<MessageId>,
    pub payload: EventPayload,
}

/// Result of an in-place edit attempt.
///
/// `Unchanged` is the no-op case (new content byte-identical to the old):
/// a success, distinct from the fallback-triggering outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Edited,
    Unchanged,
    /// The target message no longer exists.
    NotFound,
    /// The transport refused the edit (e.g. content validation).
    Rejected,
}

/// Result of a message delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}
