// ==========================================
// Depot Management - depot form service
// ==========================================
// Create-or-edit workflow behind the depot editor:
// validate -> activate -> attribute -> add (id 0) or update
// ==========================================

use crate::domain::{validate_name, Depot, ValidationError};
use crate::repository::{DepotRepository, MutationOutcome, RepositoryError};
use std::sync::Arc;
use thiserror::Error;

/// Attribution used when the editor has no signed-in user
pub const ANONYMOUS_USER: &str = "Anonymous";

#[derive(Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// What a save did
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// New depot stored, with its assigned id
    Created(Depot),
    /// Existing depot overwritten
    Updated(Depot),
    /// The edited depot no longer exists (or was deleted meanwhile)
    NotFound,
}

pub struct DepotFormService {
    repository: Arc<dyn DepotRepository>,
}

impl DepotFormService {
    pub fn new(repository: Arc<dyn DepotRepository>) -> Self {
        Self { repository }
    }

    /// Editable copy of a stored depot, or a blank draft for id 0
    pub async fn load_draft(&self, id: i64) -> Result<Option<Depot>, FormError> {
        if id == 0 {
            return Ok(Some(Depot::default()));
        }
        Ok(self.repository.get_by_id(id).await?)
    }

    /// Save a draft on behalf of `user_name`
    ///
    /// `user_name` is recorded as `created_by` on creation only; an edit
    /// keeps the draft's attribution, which is what the store retains.
    ///
    /// # Returns
    /// - `Created` when `draft.id == 0`
    /// - `Updated` / `NotFound` otherwise
    pub async fn save(&self, draft: Depot, user_name: Option<&str>) -> Result<SaveOutcome, FormError> {
        let name = validate_name(draft.name.as_deref())?;
        let created_by = user_name
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(ANONYMOUS_USER);

        let depot = Depot {
            active: Some(true),
            name: Some(name),
            ..draft
        };

        if depot.id == 0 {
            let depot = Depot {
                created_by: Some(created_by.to_string()),
                ..depot
            };
            let created = self.repository.add(depot).await?;
            tracing::info!(id = created.id, user = created_by, "depot created");
            return Ok(SaveOutcome::Created(created));
        }

        match self.repository.update(&depot).await? {
            MutationOutcome::Updated => {
                tracing::info!(id = depot.id, user = created_by, "depot updated");
                Ok(SaveOutcome::Updated(depot))
            }
            MutationOutcome::NotFound => {
                tracing::warn!(id = depot.id, "depot to update not found");
                Ok(SaveOutcome::NotFound)
            }
        }
    }
}
