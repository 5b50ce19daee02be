//! Manuscript records, the manuscript collection repository, and the
//! transition executor: load, validate, apply, append-to-history,
//! persist as a single atomic replace.

use crate::error::JournalError;
use crate::ids::new_id;
use crate::state_machine::{lookup, Action, HandlerTag, NextState, State};
use crate::store::{DocumentStore, Filter};
use crate::validation::{require_non_blank, require_valid_email};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const COLLECTION: &str = "manuscripts";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Manuscript {
    pub id: String,
    pub title: String,
    pub author: String,
    pub author_email: String,
    pub editor_email: String,
    pub abstract_text: String,
    pub state: State,
    pub referees: Vec<String>,
    pub history: Vec<State>,
}

pub struct ManuscriptRepository {
    store: Arc<dyn DocumentStore>,
}

impl ManuscriptRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        title: &str,
        author: &str,
        author_email: &str,
        editor_email: &str,
        abstract_text: &str,
    ) -> Result<Manuscript, JournalError> {
        require_non_blank("title", title)?;
        require_non_blank("author", author)?;
        require_non_blank("abstract", abstract_text)?;
        require_valid_email(author_email)?;
        require_valid_email(editor_email)?;

        let manuscript = Manuscript {
            id: new_id(),
            title: title.to_string(),
            author: author.to_string(),
            author_email: author_email.to_string(),
            editor_email: editor_email.to_string(),
            abstract_text: abstract_text.to_string(),
            state: State::Submitted,
            referees: Vec::new(),
            history: vec![State::Submitted],
        };
        self.store
            .insert(
                COLLECTION,
                serde_json::to_value(&manuscript).map_err(internal)?,
            )
            .await?;
        Ok(manuscript)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Manuscript>, JournalError> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("id", id))
            .await?;
        doc.map(from_doc).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Manuscript>, JournalError> {
        self.store
            .find(COLLECTION, &Filter::new())
            .await?
            .into_iter()
            .map(from_doc)
            .collect()
    }

    pub async fn update_fields(
        &self,
        id: &str,
        title: Option<String>,
        abstract_text: Option<String>,
        editor_email: Option<String>,
    ) -> Result<Manuscript, JournalError> {
        let mut manuscript = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("manuscript {id}")))?;

        if let Some(title) = title {
            require_non_blank("title", &title)?;
            manuscript.title = title;
        }
        if let Some(abstract_text) = abstract_text {
            require_non_blank("abstract", &abstract_text)?;
            manuscript.abstract_text = abstract_text;
        }
        if let Some(editor_email) = editor_email {
            require_valid_email(&editor_email)?;
            manuscript.editor_email = editor_email;
        }

        self.replace(&manuscript).await?;
        Ok(manuscript)
    }

    pub async fn delete(&self, id: &str) -> Result<(), JournalError> {
        let deleted = self
            .store
            .delete_one(COLLECTION, &Filter::new().eq("id", id))
            .await?;
        if deleted {
            Ok(())
        } else {
            Err(JournalError::not_found(format!("manuscript {id}")))
        }
    }

    /// The transition executor: load, look up the legal transition, invoke
    /// the handler, compose the write, persist atomically. Never partially
    /// mutates on failure — the candidate manuscript is only persisted once
    /// every step succeeds.
    pub async fn apply_action(
        &self,
        id: &str,
        action: Action,
        referee: Option<&str>,
    ) -> Result<Manuscript, JournalError> {
        let mut manuscript = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("manuscript {id}")))?;

        let transition = lookup(manuscript.state, action).ok_or_else(|| {
            JournalError::invalid(format!(
                "action {action} is not legal from state {}",
                manuscript.state
            ))
        })?;

        match transition.handler {
            HandlerTag::Constant | HandlerTag::SubmitReview => {}
            HandlerTag::AssignReferee => {
                let referee = referee
                    .filter(|r| !r.trim().is_empty())
                    .ok_or_else(|| JournalError::invalid("ARF requires a referee identifier"))?;
                if manuscript.referees.iter().any(|r| r == referee) {
                    return Err(JournalError::invalid(format!(
                        "referee {referee} is already assigned"
                    )));
                }
                manuscript.referees.push(referee.to_string());
            }
            HandlerTag::DeleteReferee => {
                let referee = referee
                    .filter(|r| !r.trim().is_empty())
                    .ok_or_else(|| JournalError::invalid("DRF requires a referee identifier"))?;
                let pos = manuscript
                    .referees
                    .iter()
                    .position(|r| r == referee)
                    .ok_or_else(|| {
                        JournalError::invalid(format!("referee {referee} is not assigned"))
                    })?;
                manuscript.referees.remove(pos);
            }
        }

        let next_state = match transition.next {
            NextState::Fixed(state) => state,
            NextState::DependsOnReferees => {
                if manuscript.referees.is_empty() {
                    State::Submitted
                } else {
                    State::InReferee
                }
            }
        };

        manuscript.state = next_state;
        manuscript.history.push(next_state);

        self.replace(&manuscript).await?;
        Ok(manuscript)
    }

    async fn replace(&self, manuscript: &Manuscript) -> Result<(), JournalError> {
        let updated = self
            .store
            .update_one(
                COLLECTION,
                &Filter::new().eq("id", manuscript.id.clone()),
                serde_json::to_value(manuscript).map_err(internal)?,
            )
            .await?;
        if updated {
            Ok(())
        } else {
            Err(JournalError::not_found(format!(
                "manuscript {}",
                manuscript.id
            )))
        }
    }
}

fn from_doc(doc: serde_json::Value) -> Result<Manuscript, JournalError> {
    serde_json::from_value(doc).map_err(internal)
}

fn internal(e: serde_json::Error) -> JournalError {
    JournalError::Internal(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn repo() -> ManuscriptRepository {
        ManuscriptRepository::new(Arc::new(InMemoryStore::new()))
    }

    async fn new_manuscript(repo: &ManuscriptRepository) -> Manuscript {
        repo.create(
            "T",
            "A",
            "author@example.com",
            "editor@example.com",
            "An abstract.",
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_read_has_expected_defaults() {
        let repo = repo();
        let m = new_manuscript(&repo).await;
        let found = repo.find_by_id(&m.id).await.unwrap().unwrap();
        assert_eq!(found.state, State::Submitted);
        assert_eq!(found.history, vec![State::Submitted]);
        assert!(found.referees.is_empty());
    }

    #[tokio::test]
    async fn happy_path_publication() {
        let repo = repo();
        let m = new_manuscript(&repo).await;

        let m = repo
            .apply_action(&m.id, Action::AssignReferee, Some("r1"))
            .await
            .unwrap();
        assert_eq!(m.state, State::InReferee);

        let m = repo.apply_action(&m.id, Action::Accept, None).await.unwrap();
        assert_eq!(m.state, State::CopyEdit);

        let m = repo.apply_action(&m.id, Action::Done, None).await.unwrap();
        assert_eq!(m.state, State::AuthorReview);

        let m = repo.apply_action(&m.id, Action::Done, None).await.unwrap();
        assert_eq!(m.state, State::Formatting);

        let m = repo.apply_action(&m.id, Action::Done, None).await.unwrap();
        assert_eq!(m.state, State::Published);

        assert_eq!(
            m.history,
            vec![
                State::Submitted,
                State::InReferee,
                State::CopyEdit,
                State::AuthorReview,
                State::Formatting,
                State::Published,
            ]
        );
    }

    #[tokio::test]
    async fn revision_round_trip() {
        let repo = repo();
        let m = new_manuscript(&repo).await;
        let m = repo
            .apply_action(&m.id, Action::AssignReferee, Some("r1"))
            .await
            .unwrap();
        let m = repo
            .apply_action(&m.id, Action::AcceptWithRevisions, None)
            .await
            .unwrap();
        assert_eq!(m.state, State::AuthorRevision);
        let m = repo.apply_action(&m.id, Action::Done, None).await.unwrap();
        assert_eq!(m.state, State::EditorReview);
        let m = repo.apply_action(&m.id, Action::Accept, None).await.unwrap();
        assert_eq!(m.state, State::CopyEdit);
    }

    #[tokio::test]
    async fn referee_bounce() {
        let repo = repo();
        let m = new_manuscript(&repo).await;

        let m = repo
            .apply_action(&m.id, Action::AssignReferee, Some("r1"))
            .await
            .unwrap();
        assert_eq!(m.referees, vec!["r1"]);

        let m = repo
            .apply_action(&m.id, Action::AssignReferee, Some("r2"))
            .await
            .unwrap();
        assert_eq!(m.referees, vec!["r1", "r2"]);

        let m = repo
            .apply_action(&m.id, Action::DeleteReferee, Some("r1"))
            .await
            .unwrap();
        assert_eq!(m.referees, vec!["r2"]);
        assert_eq!(m.state, State::InReferee);

        let m = repo
            .apply_action(&m.id, Action::DeleteReferee, Some("r2"))
            .await
            .unwrap();
        assert!(m.referees.is_empty());
        assert_eq!(m.state, State::Submitted);
    }

    #[tokio::test]
    async fn illegal_action_leaves_state_and_history_unchanged() {
        let repo = repo();
        let m = new_manuscript(&repo).await;
        let err = repo.apply_action(&m.id, Action::Accept, None).await.unwrap_err();
        assert!(matches!(err, JournalError::InvalidArgument(_)));
        let reloaded = repo.find_by_id(&m.id).await.unwrap().unwrap();
        assert_eq!(reloaded.state, State::Submitted);
        assert_eq!(reloaded.history, vec![State::Submitted]);
    }

    #[tokio::test]
    async fn withdraw_from_published_then_terminal() {
        let repo = repo();
        let m = new_manuscript(&repo).await;
        let m = repo
            .apply_action(&m.id, Action::AssignReferee, Some("r1"))
            .await
            .unwrap();
        let m = repo.apply_action(&m.id, Action::Accept, None).await.unwrap();
        let m = repo.apply_action(&m.id, Action::Done, None).await.unwrap();
        let m = repo.apply_action(&m.id, Action::Done, None).await.unwrap();
        let m = repo.apply_action(&m.id, Action::Done, None).await.unwrap();
        assert_eq!(m.state, State::Published);

        let m = repo.apply_action(&m.id, Action::Withdraw, None).await.unwrap();
        assert_eq!(m.state, State::Withdrawn);

        let err = repo.apply_action(&m.id, Action::Withdraw, None).await.unwrap_err();
        assert!(matches!(err, JournalError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn assigning_same_referee_twice_fails_and_leaves_sequence_unchanged() {
        let repo = repo();
        let m = new_manuscript(&repo).await;
        let m = repo
            .apply_action(&m.id, Action::AssignReferee, Some("r1"))
            .await
            .unwrap();
        assert_eq!(m.referees, vec!["r1"]);
        let err = repo
            .apply_action(&m.id, Action::AssignReferee, Some("r1"))
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::InvalidArgument(_)));
        let reloaded = repo.find_by_id(&m.id).await.unwrap().unwrap();
        assert_eq!(reloaded.referees, vec!["r1"]);
    }

    #[tokio::test]
    async fn action_on_nonexistent_manuscript_is_not_found() {
        let repo = repo();
        let err = repo
            .apply_action("does-not-exist", Action::Accept, None)
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::NotFound(_)));
    }
}
