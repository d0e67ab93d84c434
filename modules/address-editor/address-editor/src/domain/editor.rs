//! Address editor state machine.
//!
//! ```text
//! Closed --open--> Open --submit(invalid)--> Open[error]
//! Open | Open[error] --submit(200)--> Closed, then on_change()
//! Open[pending] --close--> Closed, the submission resolves as Cancelled
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use address_editor_sdk::{
    Address, AddressField, AddressUpdateApi, AddressUpdateError, CustomerId, FieldValue,
};

use crate::config::{DraftPolicy, EditorMessages};
use crate::domain::validation::{ValidationError, ValidationRules};

/// Snapshot of the editor for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub is_open: bool,
    pub address: Address,
    /// Empty when there is nothing to show.
    pub error_message: String,
    /// A submission is in flight.
    pub pending: bool,
}

/// Why `submit()` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotOpen,
    AlreadyPending,
}

/// Result of one `submit()` call.
///
/// The editor's `error_message` is the user-facing result; this value is for
/// callers that need to branch on what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the address; the editor closed and `on_change` ran.
    Saved,
    /// Rejected locally; no request was made.
    Invalid(ValidationError),
    /// The request failed; the editor stays open with the draft intact.
    Rejected(AddressUpdateError),
    /// `close()` was called while the request was in flight.
    Cancelled,
    Skipped(SkipReason),
}

/// Behavior knobs for an [`AddressEditor`].
#[derive(Debug, Clone, Default)]
pub struct EditorSettings {
    pub rules: ValidationRules,
    pub messages: EditorMessages,
    pub draft_policy: DraftPolicy,
}

type ChangeCallback = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct EditorState {
    is_open: bool,
    address: Address,
    error_message: String,
    pending: Option<CancellationToken>,
}

struct Inner {
    api: Arc<dyn AddressUpdateApi>,
    customer_id: CustomerId,
    settings: EditorSettings,
    on_change: ChangeCallback,
    state: Mutex<EditorState>,
}

/// Releases the pending slot if the `submit()` future is dropped mid-flight.
struct PendingGuard<'a> {
    state: &'a Mutex<EditorState>,
    token: &'a CancellationToken,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        if !self.token.is_cancelled() {
            state.pending = None;
            self.token.cancel();
        }
    }
}

/// Editing surface for one customer's shipping address.
///
/// Cheap to clone; clones share state, so the handle itself serves as the
/// field-update, submit and close callbacks of a view.
#[derive(Clone)]
pub struct AddressEditor {
    inner: Arc<Inner>,
}

impl fmt::Debug for AddressEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("AddressEditor")
            .field("customer_id", &self.inner.customer_id)
            .field("is_open", &state.is_open)
            .field("pending", &state.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl AddressEditor {
    /// Create a closed editor with an empty draft.
    ///
    /// `on_change` runs once after every successful submission, after the
    /// editor has closed.
    #[must_use]
    pub fn new(
        api: Arc<dyn AddressUpdateApi>,
        customer_id: CustomerId,
        settings: EditorSettings,
        on_change: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                customer_id,
                settings,
                on_change: Box::new(on_change),
                state: Mutex::new(EditorState::default()),
            }),
        }
    }

    #[must_use]
    pub fn customer_id(&self) -> &CustomerId {
        &self.inner.customer_id
    }

    /// Show the editor and clear any stale error.
    pub fn open(&self) {
        let mut state = self.inner.state.lock();
        if !state.is_open && self.inner.settings.draft_policy == DraftPolicy::Reset {
            state.address = Address::default();
        }
        state.is_open = true;
        state.error_message.clear();
    }

    /// Hide the editor and clear the error. The draft is kept.
    ///
    /// A submission still in flight is cancelled: its response is discarded
    /// and `on_change` does not run.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        if let Some(token) = state.pending.take() {
            debug!("closing editor with a pending submission; cancelling it");
            token.cancel();
        }
        state.is_open = false;
        state.error_message.clear();
    }

    /// Overwrite one field of the draft. Never fails and never validates.
    pub fn update_field(&self, field: AddressField, value: impl Into<FieldValue>) {
        self.inner.state.lock().address.set(field, value.into());
    }

    #[must_use]
    pub fn view(&self) -> EditorView {
        let state = self.inner.state.lock();
        EditorView {
            is_open: state.is_open,
            address: state.address.clone(),
            error_message: state.error_message.clone(),
            pending: state.pending.is_some(),
        }
    }

    /// Validate the draft and, if it passes, send it to the backend once.
    #[instrument(name = "address_editor.submit", skip_all)]
    pub async fn submit(&self) -> SubmitOutcome {
        let (token, draft) = {
            let mut state = self.inner.state.lock();
            if !state.is_open {
                return SubmitOutcome::Skipped(SkipReason::NotOpen);
            }
            if state.pending.is_some() {
                debug!("submission already in flight; ignoring");
                return SubmitOutcome::Skipped(SkipReason::AlreadyPending);
            }
            if let Err(err) = self.inner.settings.rules.validate(&state.address) {
                debug!(error = %err, "draft rejected locally");
                state.error_message = self.validation_message(&err).to_owned();
                return SubmitOutcome::Invalid(err);
            }

            let token = CancellationToken::new();
            state.pending = Some(token.clone());
            (token, state.address.clone())
        };
        let mut guard = PendingGuard {
            state: &self.inner.state,
            token: &token,
            armed: true,
        };

        let result = tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!("submission cancelled before a response arrived");
                return SubmitOutcome::Cancelled;
            }
            result = self.inner.api.update_address(&self.inner.customer_id, &draft) => result,
        };

        {
            let mut state = self.inner.state.lock();
            guard.armed = false;
            // close() cancels under this lock, so an uncancelled token is still ours
            if token.is_cancelled() {
                return SubmitOutcome::Cancelled;
            }
            state.pending = None;

            if let Err(err) = result {
                warn!(error = %err, "address update failed");
                state.error_message = self.failure_message(&err);
                return SubmitOutcome::Rejected(err);
            }

            state.error_message.clear();
            state.is_open = false;
        }

        debug!("address updated");
        (self.inner.on_change)();
        SubmitOutcome::Saved
    }

    fn validation_message(&self, err: &ValidationError) -> &str {
        let messages = &self.inner.settings.messages;
        match err {
            ValidationError::MissingFields { .. } => &messages.required_fields,
            ValidationError::InvalidPostalCode => &messages.invalid_postal_code,
        }
    }

    fn failure_message(&self, err: &AddressUpdateError) -> String {
        match err {
            AddressUpdateError::NoResponse { .. } => {
                self.inner.settings.messages.no_response.clone()
            }
            AddressUpdateError::ServerRejected { message, .. }
            | AddressUpdateError::RequestConstruction { message } => message.clone(),
        }
    }
}
