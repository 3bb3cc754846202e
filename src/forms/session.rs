//! One editing session of a form

use crate::core::entity::Entity;
use crate::core::error::{PersistenceError, RegistryError, ValidationError};
use crate::core::events::{DataChangeEvent, DataChangeListener, DataChangeListeners, EventEnvelope};
use crate::core::service::Repository;
use crate::forms::FormBinding;
use std::fmt;
use std::sync::Arc;

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Waiting for input; also the state after input was rejected
    Editing,
    /// A save is in progress
    Validating,
    /// The entity was persisted and listeners notified; the session is closed
    Saved,
    /// The repository failed; the session may be saved again
    PersistenceFailed,
}

/// Editing session for one entity.
///
/// The entity being edited and the repository are required up front, so a
/// session can never be saved without them.
///
/// # Example
///
/// ```rust,ignore
/// let mut form = DepartmentForm::new(Department::new(""), Arc::new(departments));
/// form.subscribe_data_change_listener(Arc::new(|_: &EventEnvelope| refresh_list()));
///
/// match form.save(&DepartmentInput::new("", "IT")).await {
///     Ok(saved) => println!("saved #{:?}", saved.id()),
///     Err(RegistryError::Validation(e)) => show_field_errors(e.errors()),
///     Err(err) => show_alert(err.alert_title(), &err.to_string()),
/// }
/// ```
pub struct FormSession<B: FormBinding> {
    entity: B::Entity,
    repository: Arc<dyn Repository<B::Entity>>,
    listeners: DataChangeListeners,
    state: FormState,
    errors: ValidationError,
}

impl<B: FormBinding> FormSession<B> {
    pub fn new(entity: B::Entity, repository: Arc<dyn Repository<B::Entity>>) -> Self {
        Self {
            entity,
            repository,
            listeners: DataChangeListeners::new(),
            state: FormState::Editing,
            errors: ValidationError::new(),
        }
    }

    /// The entity as last loaded or saved
    pub fn entity(&self) -> &B::Entity {
        &self.entity
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Field errors of the last rejected save; empty otherwise
    pub fn errors(&self) -> &ValidationError {
        &self.errors
    }

    /// Form values for the current entity
    pub fn input(&self) -> B::Input {
        B::input_for(&self.entity)
    }

    /// Add a listener called after each successful save, after the ones
    /// subscribed before it
    pub fn subscribe_data_change_listener(&mut self, listener: Arc<dyn DataChangeListener>) {
        self.listeners.subscribe(listener);
    }

    /// Validate `input`, then insert or update the entity and notify listeners.
    ///
    /// On field errors nothing is persisted, the errors are kept on the
    /// session and it goes back to [`FormState::Editing`]. On a repository
    /// failure nothing is notified and the session may be saved again.
    ///
    /// # Panics
    ///
    /// Panics when the session was already saved.
    pub async fn save(&mut self, input: &B::Input) -> Result<B::Entity, RegistryError> {
        assert!(
            self.state != FormState::Saved,
            "{} form session is closed",
            B::Entity::resource_name_singular()
        );
        self.state = FormState::Validating;

        let mut candidate = match B::bind(input) {
            Ok(candidate) => candidate,
            Err(errors) => {
                tracing::debug!(
                    entity_type = B::Entity::resource_name_singular(),
                    fields = ?errors.errors().keys().collect::<Vec<_>>(),
                    "Form input rejected"
                );
                self.errors = errors.clone();
                self.state = FormState::Editing;
                return Err(errors.into());
            }
        };
        self.errors = ValidationError::new();

        let created = !candidate.is_persisted();
        if let Err(err) = self.repository.save_or_update(&mut candidate).await {
            return Err(self.persistence_failed(err));
        }
        let Some(entity_id) = candidate.id() else {
            return Err(self.persistence_failed(PersistenceError::new(
                "Repository did not assign an id",
            )));
        };

        let envelope = EventEnvelope::new(Self::change_event(&candidate, entity_id, created));
        self.entity = candidate.clone();
        self.state = FormState::Saved;

        tracing::info!(
            entity_type = B::Entity::resource_name_singular(),
            entity_id,
            action = envelope.event.action(),
            "Form saved"
        );
        self.listeners.notify(&envelope);

        Ok(candidate)
    }

    fn persistence_failed(&mut self, err: PersistenceError) -> RegistryError {
        tracing::warn!(
            entity_type = B::Entity::resource_name_singular(),
            error = %err,
            "Error saving object"
        );
        self.state = FormState::PersistenceFailed;
        err.into()
    }

    fn change_event(entity: &B::Entity, entity_id: i64, created: bool) -> DataChangeEvent {
        let entity_type = B::Entity::resource_name_singular().to_string();
        let data = serde_json::to_value(entity).unwrap_or(serde_json::Value::Null);

        if created {
            DataChangeEvent::Created {
                entity_type,
                entity_id,
                data,
            }
        } else {
            DataChangeEvent::Updated {
                entity_type,
                entity_id,
                data,
            }
        }
    }
}

impl<B: FormBinding> fmt::Debug for FormSession<B>
where
    B::Entity: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("entity", &self.entity)
            .field("state", &self.state)
            .field("errors", &self.errors)
            .field("listeners", &self.listeners)
            .finish()
    }
}
