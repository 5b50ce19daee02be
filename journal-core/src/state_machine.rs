//! The manuscript lifecycle state machine: a static transition table from
//! `(State, Action)` to a tagged next-state/handler pair. This is the only
//! part of the table that is data-dependent — `Delete Referee` from `Review`
//! branches on whether any referees remain — everything else is a pure
//! function of the two codes.
//!
//! Encoded as a closed table rather than a map of callables: each cell names
//! a [`HandlerTag`] from a fixed set, so the table is exhaustiveness-checked
//! by the compiler instead of relying on runtime dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    #[serde(rename = "SUB")]
    Submitted,
    #[serde(rename = "REV")]
    InReferee,
    #[serde(rename = "CED")]
    CopyEdit,
    #[serde(rename = "AUR")]
    AuthorReview,
    #[serde(rename = "ARV")]
    AuthorRevision,
    #[serde(rename = "EDR")]
    EditorReview,
    #[serde(rename = "FMT")]
    Formatting,
    #[serde(rename = "PUB")]
    Published,
    #[serde(rename = "REJ")]
    Rejected,
    #[serde(rename = "WIT")]
    Withdrawn,
}

impl State {
    pub const ALL: [State; 10] = [
        State::Submitted,
        State::InReferee,
        State::CopyEdit,
        State::AuthorReview,
        State::AuthorRevision,
        State::EditorReview,
        State::Formatting,
        State::Published,
        State::Rejected,
        State::Withdrawn,
    ];

    pub fn code(self) -> &'static str {
        match self {
            State::Submitted => "SUB",
            State::InReferee => "REV",
            State::CopyEdit => "CED",
            State::AuthorReview => "AUR",
            State::AuthorRevision => "ARV",
            State::EditorReview => "EDR",
            State::Formatting => "FMT",
            State::Published => "PUB",
            State::Rejected => "REJ",
            State::Withdrawn => "WIT",
        }
    }

    pub fn parse(code: &str) -> Option<State> {
        State::ALL.into_iter().find(|s| s.code() == code)
    }

    /// `PUB`, `REJ`, and `WIT` never transition except `WIT` itself, which
    /// has no outgoing transitions at all.
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Published | State::Rejected | State::Withdrawn)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "ARF")]
    AssignReferee,
    #[serde(rename = "DRF")]
    DeleteReferee,
    #[serde(rename = "SBR")]
    SubmitReview,
    #[serde(rename = "ACC")]
    Accept,
    #[serde(rename = "AWR")]
    AcceptWithRevisions,
    #[serde(rename = "REJ")]
    Reject,
    #[serde(rename = "DON")]
    Done,
    #[serde(rename = "WIT")]
    Withdraw,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::AssignReferee,
        Action::DeleteReferee,
        Action::SubmitReview,
        Action::Accept,
        Action::AcceptWithRevisions,
        Action::Reject,
        Action::Done,
        Action::Withdraw,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Action::AssignReferee => "ARF",
            Action::DeleteReferee => "DRF",
            Action::SubmitReview => "SBR",
            Action::Accept => "ACC",
            Action::AcceptWithRevisions => "AWR",
            Action::Reject => "REJ",
            Action::Done => "DON",
            Action::Withdraw => "WIT",
        }
    }

    pub fn parse(code: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.code() == code)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Where a transition lands. Only `DeleteReferee` from `InReferee` needs the
/// data-dependent variant; every other cell is `Fixed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextState {
    Fixed(State),
    /// `InReferee` if at least one referee remains after the handler runs,
    /// `Submitted` otherwise.
    DependsOnReferees,
}

/// The closed set of referee-list side effects a transition may have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerTag {
    /// No effect on the referee sequence.
    Constant,
    /// Append the supplied referee, failing if already present.
    AssignReferee,
    /// Remove the supplied referee, failing if absent.
    DeleteReferee,
    /// No effect; records only that a review was submitted (self-loop).
    SubmitReview,
}

#[derive(Clone, Copy, Debug)]
pub struct Transition {
    pub next: NextState,
    pub handler: HandlerTag,
}

const fn fixed(state: State, handler: HandlerTag) -> Transition {
    Transition {
        next: NextState::Fixed(state),
        handler,
    }
}

/// Looks up the legal transition for `(state, action)`, or `None` if the
/// action is illegal from that state.
pub fn lookup(state: State, action: Action) -> Option<Transition> {
    use Action::*;
    use State::*;

    match (state, action) {
        (Submitted, AssignReferee) => Some(fixed(InReferee, HandlerTag::AssignReferee)),
        (Submitted, Reject) => Some(fixed(Rejected, HandlerTag::Constant)),
        (Submitted, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),

        (InReferee, AssignReferee) => Some(fixed(InReferee, HandlerTag::AssignReferee)),
        (InReferee, DeleteReferee) => Some(Transition {
            next: NextState::DependsOnReferees,
            handler: HandlerTag::DeleteReferee,
        }),
        (InReferee, SubmitReview) => Some(fixed(InReferee, HandlerTag::SubmitReview)),
        (InReferee, Accept) => Some(fixed(CopyEdit, HandlerTag::Constant)),
        (InReferee, AcceptWithRevisions) => Some(fixed(AuthorRevision, HandlerTag::Constant)),
        (InReferee, Reject) => Some(fixed(Rejected, HandlerTag::Constant)),
        (InReferee, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),

        (CopyEdit, Done) => Some(fixed(AuthorReview, HandlerTag::Constant)),
        (CopyEdit, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),

        (AuthorReview, Done) => Some(fixed(Formatting, HandlerTag::Constant)),
        (AuthorReview, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),

        (AuthorRevision, Done) => Some(fixed(EditorReview, HandlerTag::Constant)),
        (AuthorRevision, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),

        (EditorReview, Accept) => Some(fixed(CopyEdit, HandlerTag::Constant)),
        (EditorReview, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),

        (Formatting, Done) => Some(fixed(Published, HandlerTag::Constant)),
        (Formatting, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),

        (Published, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),
        (Rejected, Withdraw) => Some(fixed(Withdrawn, HandlerTag::Constant)),

        // Withdrawn is fully terminal; every other (state, action) pair not
        // listed above is illegal.
        _ => None,
    }
}

/// The set of actions that are legal from `state` — used to render available
/// operations to a caller.
pub fn legal_actions(state: State) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|&action| lookup(state, action).is_some())
        .collect()
}
