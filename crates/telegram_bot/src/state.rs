use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

/// Where a user is in the guided add flow. No entry means idle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FlowStep {
    AwaitingCategory,
    AwaitingAmount { category: String },
}

/// Per-user flow state, kept in memory only.
///
/// Requests of different users never share an entry. Two concurrent requests
/// of the same user are not serialized: the last write wins.
#[derive(Clone, Default)]
pub(crate) struct SessionStore {
    inner: Arc<Mutex<HashMap<u64, FlowStep>>>,
}

impl SessionStore {
    pub(crate) async fn get(&self, user_id: u64) -> Option<FlowStep> {
        let guard = self.inner.lock().await;
        guard.get(&user_id).cloned()
    }

    pub(crate) async fn set(&self, user_id: u64, step: FlowStep) {
        let mut guard = self.inner.lock().await;
        guard.insert(user_id, step);
    }

    /// Drops the user's flow state and returns what it was.
    pub(crate) async fn clear(&self, user_id: u64) -> Option<FlowStep> {
        let mut guard = self.inner.lock().await;
        guard.remove(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn users_do_not_share_state() {
        let sessions = SessionStore::default();
        sessions.set(1, FlowStep::AwaitingCategory).await;
        sessions
            .set(
                2,
                FlowStep::AwaitingAmount {
                    category: "Coffee".to_string(),
                },
            )
            .await;

        assert_eq!(sessions.get(1).await, Some(FlowStep::AwaitingCategory));
        assert!(sessions.clear(2).await.is_some());
        assert_eq!(sessions.get(2).await, None);
        assert_eq!(sessions.get(1).await, Some(FlowStep::AwaitingCategory));
    }

    #[tokio::test]
    async fn last_write_wins() {
        let sessions = SessionStore::default();
        for category in ["Food", "Coffee"] {
            sessions
                .set(
                    1,
                    FlowStep::AwaitingAmount {
                        category: category.to_string(),
                    },
                )
                .await;
        }
        assert_eq!(
            sessions.get(1).await,
            Some(FlowStep::AwaitingAmount {
                category: "Coffee".to_string()
            })
        );
    }
}
