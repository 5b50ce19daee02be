//! Role-based authorization: maps (resource, operation) to the role set
//! required to perform it. Denial is a `Forbidden` error; an absent
//! caller is `Unauthenticated` — that distinction is made by the caller of
//! this module (the HTTP layer resolves `X-User-Id` before authorization
//! ever runs), not here.

use crate::error::JournalError;
use crate::manuscript::Manuscript;
use crate::person::Person;
use crate::roles::Role;
use crate::state_machine::{Action, State};

const PERSON_MUTATION_ROLES: [Role; 2] = [Role::Editor, Role::ManagingEditor];
const EDITORIAL_ACTION_ROLES: [Role; 2] = [Role::Editor, Role::ManagingEditor];

fn has_any_role(caller: &Person, allowed: &[Role]) -> bool {
    allowed.iter().any(|r| caller.roles.contains(r))
}

fn require_any_role(caller: &Person, allowed: &[Role]) -> Result<(), JournalError> {
    if has_any_role(caller, allowed) {
        Ok(())
    } else {
        Err(JournalError::Forbidden)
    }
}

/// Update/delete/add-role/delete-role on a person record: `{ED, ME}`.
pub fn require_can_mutate_person(caller: &Person) -> Result<(), JournalError> {
    require_any_role(caller, &PERSON_MUTATION_ROLES)
}

/// Editorial transitions (`ACC`, `AWR`, `REJ`, `DON`, `ARF`, `DRF`): `{ED, ME}`.
/// `SBR` and `WIT` are authorized separately, see below.
pub fn require_can_apply_editorial_action(
    caller: &Person,
    action: Action,
) -> Result<(), JournalError> {
    debug_assert!(matches!(
        action,
        Action::Accept
            | Action::AcceptWithRevisions
            | Action::Reject
            | Action::Done
            | Action::AssignReferee
            | Action::DeleteReferee
    ));
    require_any_role(caller, &EDITORIAL_ACTION_ROLES)
}

/// `SBR` requires the `{RE}` role AND that the caller is one of the
/// manuscript's assigned referees — without the identity check, any referee
/// on any manuscript could submit a review against a manuscript they were
/// never assigned to.
pub fn require_can_submit_review(
    caller: &Person,
    manuscript: &Manuscript,
) -> Result<(), JournalError> {
    require_any_role(caller, &[Role::Referee])?;
    let is_assigned = manuscript
        .referees
        .iter()
        .any(|r| r == &caller.id || r == &caller.email);
    if is_assigned {
        Ok(())
    } else {
        Err(JournalError::Forbidden)
    }
}

/// `WIT` from `SUB`/`REV` by the manuscript's author: the author email on
/// the manuscript must match the caller.
pub fn require_is_author(caller: &Person, manuscript: &Manuscript) -> Result<(), JournalError> {
    if manuscript.author_email == caller.email {
        Ok(())
    } else {
        Err(JournalError::Forbidden)
    }
}

/// `WIT` is reachable by either the assigned editor/managing editor, or by
/// the manuscript's own author (while still in `SUB`/`REV`). The executor
/// calls this once the target state has been computed as `WIT`.
pub fn require_can_withdraw(caller: &Person, manuscript: &Manuscript) -> Result<(), JournalError> {
    if has_any_role(caller, &EDITORIAL_ACTION_ROLES) {
        return Ok(());
    }
    if !matches!(manuscript.state, State::Submitted | State::InReferee) {
        return Err(JournalError::Forbidden);
    }
    require_is_author(caller, manuscript)
}

/// Registration is open to anyone while the person collection is empty
/// (bootstrap), otherwise restricted to `{ED, ME}`.
pub fn can_bootstrap_register(person_count: usize) -> bool {
    person_count == 0
}
