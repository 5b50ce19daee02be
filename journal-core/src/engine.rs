//! `JournalEngine` is the top-level facade that wires the repositories, the
//! state machine, and authorization together. The HTTP layer delegates to
//! this; it never touches a repository directly.

use crate::auth::AuthGate;
use crate::authz;
use crate::comment::{Comment, CommentRepository};
use crate::error::JournalError;
use crate::ids::Identifier;
use crate::manuscript::{Manuscript, ManuscriptRepository};
use crate::person::{MastheadEntry, Person, PersonRepository};
use crate::roles::Role;
use crate::state_machine::{self, Action, State};
use crate::store::DocumentStore;
use crate::text::{TextPage, TextRepository};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct JournalEngine {
    people: Arc<PersonRepository>,
    manuscripts: Arc<ManuscriptRepository>,
    texts: Arc<TextRepository>,
    comments: Arc<CommentRepository>,
    auth: AuthGate,
}

impl JournalEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let people = Arc::new(PersonRepository::new(store.clone()));
        Self {
            manuscripts: Arc::new(ManuscriptRepository::new(store.clone())),
            texts: Arc::new(TextRepository::new(store.clone())),
            comments: Arc::new(CommentRepository::new(store)),
            auth: AuthGate::new(people.clone()),
            people,
        }
    }

    /// Resolves the caller identity carried in `X-User-Id`. Returns
    /// `Unauthenticated` if the header is absent or does not resolve to a
    /// known person — the HTTP layer is responsible for treating a missing
    /// header as "no identity" before calling this.
    pub async fn resolve_caller(&self, raw: &str) -> Result<Person, JournalError> {
        self.people
            .resolve(&Identifier::classify(raw))
            .await?
            .ok_or(JournalError::Unauthenticated)
    }

    // ---- People ----

    pub async fn register_person(
        &self,
        caller: Option<&Person>,
        name: &str,
        affiliation: &str,
        email: &str,
        roles: BTreeSet<Role>,
        bio: Option<String>,
    ) -> Result<Person, JournalError> {
        let existing_count = self.people.list().await?.len();
        if !authz::can_bootstrap_register(existing_count) {
            let caller = caller.ok_or(JournalError::Unauthenticated)?;
            authz::require_can_mutate_person(caller)?;
        }
        self.people
            .create(name, affiliation, email, roles, bio, None)
            .await
    }

    pub async fn get_person(&self, id: &str) -> Result<Person, JournalError> {
        self.people
            .find_by_id(id)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("person {id}")))
    }

    pub async fn list_people(&self) -> Result<Vec<Person>, JournalError> {
        self.people.list().await
    }

    pub async fn masthead(&self) -> Result<Vec<MastheadEntry>, JournalError> {
        self.people.masthead().await
    }

    pub async fn update_person(
        &self,
        caller: &Person,
        id: &str,
        name: Option<String>,
        affiliation: Option<String>,
        bio: Option<String>,
    ) -> Result<Person, JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.people.update(id, name, affiliation, bio).await
    }

    pub async fn delete_person(&self, caller: &Person, id: &str) -> Result<(), JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.people.delete(id).await
    }

    pub async fn add_role(
        &self,
        caller: &Person,
        id: &str,
        role: Role,
    ) -> Result<Person, JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.people.add_role(id, role).await
    }

    pub async fn delete_role(
        &self,
        caller: &Person,
        id: &str,
        role: Role,
    ) -> Result<Person, JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.people.delete_role(id, role).await
    }

    // ---- Auth ----

    pub async fn register_credentials(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, JournalError> {
        self.auth.register(name, email, password).await
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, JournalError> {
        self.auth.login(identifier, password).await
    }

    // ---- Manuscripts ----

    /// Creates a manuscript and its auto-generated page "1" from the
    /// submission body. Both writes succeed or the manuscript is not
    /// left referencing a missing page — if page creation fails the
    /// manuscript is removed again.
    pub async fn create_manuscript(
        &self,
        title: &str,
        author: &str,
        author_email: &str,
        editor_email: &str,
        abstract_text: &str,
        body: &str,
    ) -> Result<Manuscript, JournalError> {
        let manuscript = self
            .manuscripts
            .create(title, author, author_email, editor_email, abstract_text)
            .await?;

        if let Err(e) = self
            .texts
            .create_initial_page(&manuscript.id, title, body)
            .await
        {
            let _ = self.manuscripts.delete(&manuscript.id).await;
            return Err(e);
        }

        Ok(manuscript)
    }

    pub async fn get_manuscript(&self, id: &str) -> Result<Manuscript, JournalError> {
        self.manuscripts
            .find_by_id(id)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("manuscript {id}")))
    }

    pub async fn list_manuscripts(&self) -> Result<Vec<Manuscript>, JournalError> {
        self.manuscripts.list().await
    }

    pub async fn update_manuscript(
        &self,
        caller: &Person,
        id: &str,
        title: Option<String>,
        abstract_text: Option<String>,
        editor_email: Option<String>,
    ) -> Result<Manuscript, JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.manuscripts
            .update_fields(id, title, abstract_text, editor_email)
            .await
    }

    pub async fn delete_manuscript(&self, caller: &Person, id: &str) -> Result<(), JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.manuscripts.delete(id).await?;
        self.texts.delete_for_manuscript(id).await?;
        Ok(())
    }

    /// The transition executor's authorization gate: editorial actions need
    /// `{ED, ME}`, `SBR` needs the assigned referee, `WIT` needs the editor
    /// or the manuscript's own author.
    pub async fn update_manuscript_state(
        &self,
        caller: &Person,
        id: &str,
        action: Action,
        referee: Option<&str>,
    ) -> Result<Manuscript, JournalError> {
        let manuscript = self.get_manuscript(id).await?;

        match action {
            Action::Accept
            | Action::AcceptWithRevisions
            | Action::Reject
            | Action::Done
            | Action::AssignReferee
            | Action::DeleteReferee => {
                authz::require_can_apply_editorial_action(caller, action)?;
            }
            Action::SubmitReview => {
                authz::require_can_submit_review(caller, &manuscript)?;
            }
            Action::Withdraw => {
                authz::require_can_withdraw(caller, &manuscript)?;
            }
        }

        self.manuscripts.apply_action(id, action, referee).await
    }

    pub fn valid_actions(&self, state: State) -> Vec<Action> {
        state_machine::legal_actions(state)
    }

    /// The fixed set of actions an editor/managing editor may ever invoke,
    /// independent of the manuscript's current state — used to render a
    /// menu of editorial operations.
    pub fn editor_actions(&self) -> Vec<Action> {
        vec![
            Action::AssignReferee,
            Action::DeleteReferee,
            Action::Accept,
            Action::AcceptWithRevisions,
            Action::Reject,
            Action::Done,
            Action::Withdraw,
        ]
    }

    /// The fixed set of actions a referee may ever invoke.
    pub fn referee_actions(&self) -> Vec<Action> {
        vec![Action::SubmitReview]
    }

    // ---- Text pages ----
    //
    // Mutations are gated behind the same `{ED, ME}` policy as manuscript
    // field updates: the distilled design names text pages as publicly
    // readable but is silent on writes, and leaving manuscript content
    // writable by anyone would undercut the editorial-integrity goal that
    // motivates every other protected mutation.

    pub async fn list_text(&self, manuscript_id: &str) -> Result<Vec<TextPage>, JournalError> {
        self.texts.list(manuscript_id).await
    }

    pub async fn get_text(
        &self,
        manuscript_id: &str,
        page: &str,
    ) -> Result<TextPage, JournalError> {
        self.texts
            .find(manuscript_id, page)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("page {page}")))
    }

    pub async fn create_text(
        &self,
        caller: &Person,
        manuscript_id: &str,
        page: &str,
        title: &str,
        body: &str,
    ) -> Result<TextPage, JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.get_manuscript(manuscript_id).await?;
        self.texts.create(manuscript_id, page, title, body).await
    }

    pub async fn update_text(
        &self,
        caller: &Person,
        manuscript_id: &str,
        page: &str,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<TextPage, JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.texts.update(manuscript_id, page, title, body).await
    }

    pub async fn delete_text(
        &self,
        caller: &Person,
        manuscript_id: &str,
        page: &str,
    ) -> Result<(), JournalError> {
        authz::require_can_mutate_person(caller)?;
        self.texts.delete(manuscript_id, page).await
    }

    // ---- Comments ----

    pub async fn create_comment(
        &self,
        caller: &Person,
        manuscript_id: &str,
        text: &str,
    ) -> Result<Comment, JournalError> {
        let allowed = [Role::Editor, Role::ManagingEditor, Role::CopyEditor, Role::Referee];
        if !caller.roles.iter().any(|r| allowed.contains(r)) {
            return Err(JournalError::Forbidden);
        }
        self.get_manuscript(manuscript_id).await?;
        self.comments
            .create(manuscript_id, &caller.id, text, Utc::now())
            .await
    }

    pub async fn create_comment_at(
        &self,
        caller: &Person,
        manuscript_id: &str,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Comment, JournalError> {
        let allowed = [Role::Editor, Role::ManagingEditor, Role::CopyEditor, Role::Referee];
        if !caller.roles.iter().any(|r| allowed.contains(r)) {
            return Err(JournalError::Forbidden);
        }
        self.get_manuscript(manuscript_id).await?;
        self.comments
            .create(manuscript_id, &caller.id, text, created_at)
            .await
    }

    pub async fn list_comments(&self, manuscript_id: &str) -> Result<Vec<Comment>, JournalError> {
        self.comments.list_for_manuscript(manuscript_id).await
    }

    pub async fn update_comment(&self, id: &str, text: &str) -> Result<Comment, JournalError> {
        self.comments.update_text(id, text).await
    }

    pub async fn delete_comment(&self, id: &str) -> Result<(), JournalError> {
        self.comments.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn engine() -> JournalEngine {
        JournalEngine::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn bootstrap_allows_first_registration_without_caller() {
        let engine = engine();
        let person = engine
            .register_person(
                None,
                "First Editor",
                "Journal HQ",
                "first@example.com",
                BTreeSet::from([Role::ManagingEditor]),
                None,
            )
            .await
            .unwrap();
        assert_eq!(person.name, "First Editor");
    }

    #[tokio::test]
    async fn second_registration_requires_editor_caller() {
        let engine = engine();
        let editor = engine
            .register_person(
                None,
                "Editor",
                "HQ",
                "editor@example.com",
                BTreeSet::from([Role::ManagingEditor]),
                None,
            )
            .await
            .unwrap();

        let author = engine
            .register_person(
                Some(&editor),
                "Author",
                "Uni",
                "author@example.com",
                BTreeSet::from([Role::Author]),
                None,
            )
            .await
            .unwrap();

        let err = engine
            .register_person(
                Some(&author),
                "Another",
                "Uni",
                "another@example.com",
                BTreeSet::new(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Forbidden));
    }

    #[tokio::test]
    async fn cascade_delete_end_to_end() {
        let engine = engine();
        let editor = engine
            .register_person(
                None,
                "Editor",
                "HQ",
                "editor@example.com",
                BTreeSet::from([Role::ManagingEditor]),
                None,
            )
            .await
            .unwrap();

        let manuscript = engine
            .create_manuscript(
                "T",
                "A",
                "author@example.com",
                "editor@example.com",
                "abstract",
                "initial body",
            )
            .await
            .unwrap();

        engine
            .create_text(&editor, &manuscript.id, "2", "Page 2", "body 2")
            .await
            .unwrap();
        engine
            .create_text(&editor, &manuscript.id, "3", "Page 3", "body 3")
            .await
            .unwrap();

        engine.delete_manuscript(&editor, &manuscript.id).await.unwrap();
        assert!(engine.list_text(&manuscript.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn referee_must_be_assigned_to_submit_review() {
        let engine = engine();
        let editor = engine
            .register_person(
                None,
                "Editor",
                "HQ",
                "editor@example.com",
                BTreeSet::from([Role::ManagingEditor]),
                None,
            )
            .await
            .unwrap();
        let referee = engine
            .register_person(
                Some(&editor),
                "Ref",
                "Uni",
                "ref@example.com",
                BTreeSet::from([Role::Referee]),
                None,
            )
            .await
            .unwrap();

        let manuscript = engine
            .create_manuscript(
                "T",
                "A",
                "author@example.com",
                "editor@example.com",
                "abstract",
                "body",
            )
            .await
            .unwrap();

        let manuscript = engine
            .update_manuscript_state(
                &editor,
                &manuscript.id,
                Action::AssignReferee,
                Some(&referee.email),
            )
            .await
            .unwrap();
        assert_eq!(manuscript.state, State::InReferee);

        let err = engine
            .update_manuscript_state(&editor, &manuscript.id, Action::SubmitReview, None)
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Forbidden));

        let ok = engine
            .update_manuscript_state(&referee, &manuscript.id, Action::SubmitReview, None)
            .await
            .unwrap();
        assert_eq!(ok.state, State::InReferee);
    }

    #[tokio::test]
    async fn author_can_withdraw_own_manuscript() {
        let engine = engine();
        let editor = engine
            .register_person(
                None,
                "Editor",
                "HQ",
                "editor@example.com",
                BTreeSet::from([Role::ManagingEditor]),
                None,
            )
            .await
            .unwrap();
        let author = engine
            .register_person(
                Some(&editor),
                "Author",
                "Uni",
                "author@example.com",
                BTreeSet::from([Role::Author]),
                None,
            )
            .await
            .unwrap();

        let manuscript = engine
            .create_manuscript(
                "T",
                "A",
                "author@example.com",
                "editor@example.com",
                "abstract",
                "body",
            )
            .await
            .unwrap();

        let withdrawn = engine
            .update_manuscript_state(&author, &manuscript.id, Action::Withdraw, None)
            .await
            .unwrap();
        assert_eq!(withdrawn.state, State::Withdrawn);
    }
}
