//! Profile repository.
//!
//! Profiles live in `users` keyed by principal id. Company profiles are also
//! written to `companies` so company lookups do not scan every account.

use std::sync::Arc;

use board_core::{PrincipalId, Profile};
use serde_json::Value;

use crate::DbError;
use crate::store::{DocumentStore, collections, to_document};

/// Repository for profile persistence operations.
pub struct ProfileRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for ProfileRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> ProfileRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get the profile for a principal, `None` when it has not been written yet.
    pub async fn get(&self, principal_id: &PrincipalId) -> Result<Option<Profile>, DbError> {
        let Some(doc) = self
            .store
            .get(collections::USERS, principal_id.as_str())
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(Value::Object(doc.data))?))
    }

    /// Create or replace the profile under every collection it is indexed in.
    pub async fn save(&self, principal_id: &PrincipalId, profile: &Profile) -> Result<(), DbError> {
        let data = to_document(profile)?;
        match profile {
            Profile::JobSeeker(_) => {
                self.store
                    .set(collections::USERS, principal_id.as_str(), data)
                    .await
            }
            // `users` is what reads go to, so it is written last.
            Profile::Company(_) => {
                self.store
                    .set(collections::COMPANIES, principal_id.as_str(), data.clone())
                    .await?;
                self.store
                    .set(collections::USERS, principal_id.as_str(), data)
                    .await
            }
        }
    }
}
