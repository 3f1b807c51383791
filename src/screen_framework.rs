use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, instrument};

use crate::domain::{FieldKey, FieldValue, UserProfileForm};
use crate::error::ScreenError;

// =============================================================================
// 1. THE ABSTRACTION (SubmitFlow trait)
// =============================================================================

/// What a screen starts from: the seeded form, plus the update target captured
/// alongside it when one exists.
#[derive(Debug, Clone, Default)]
pub struct FormSeed {
    pub form: UserProfileForm,
    pub user_id: Option<String>,
}

/// A point-in-time copy of the screen state handed to a submit.
#[derive(Debug, Clone)]
pub struct FormSnapshot {
    pub form: UserProfileForm,
    pub user_id: Option<String>,
}

/// How a submit attempt ended. Side effects (navigation, alerts) have already
/// happened by the time the caller sees this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request succeeded and the success side effect ran.
    Completed,
    /// The server rejected the request; its message was surfaced to the user.
    Rejected,
    /// The request never reached the server; a generic message was surfaced.
    Failed,
    /// Update only: no user id was captured, nothing was sent.
    MissingUserId,
}

/// Trait a screen variant implements to be driven by [`FormScreen`].
#[async_trait]
pub trait SubmitFlow: Send + Sync + 'static {
    /// Seed the form at screen startup. Defaults to a blank form.
    async fn prefill(&self) -> FormSeed {
        FormSeed::default()
    }

    /// Serialize the snapshot, perform the outbound request, and run the
    /// success or failure side effect.
    async fn submit(&self, snapshot: FormSnapshot) -> SubmitOutcome;
}

// =============================================================================
// 2. THE MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, ScreenError>>;

#[derive(Debug)]
pub enum ScreenRequest {
    SetField {
        key: FieldKey,
        value: FieldValue,
        respond_to: Response<UserProfileForm>,
    },
    Snapshot {
        respond_to: Response<UserProfileForm>,
    },
    Submit {
        respond_to: Response<SubmitOutcome>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE SCREEN EVENT LOOP
// =============================================================================

/// One mounted form screen: owns the editable form and runs the event loop
/// that the view layer talks to through [`ScreenClient`].
pub struct FormScreen<F: SubmitFlow> {
    receiver: mpsc::Receiver<ScreenRequest>,
    flow: Arc<F>,
    form: UserProfileForm,
    user_id: Option<String>,
    in_flight: JoinSet<()>,
}

impl<F: SubmitFlow> FormScreen<F> {
    pub fn new(buffer_size: usize, flow: F) -> (Self, ScreenClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let screen = Self {
            receiver,
            flow: Arc::new(flow),
            form: UserProfileForm::default(),
            user_id: None,
            in_flight: JoinSet::new(),
        };
        (screen, ScreenClient { sender })
    }

    /// Run until shutdown. Prefills once at startup, then serves requests.
    ///
    /// Submits run as tasks owned by this loop, so a second tap is never
    /// blocked behind the first; requests still in flight at teardown are
    /// aborted before the loop returns, and no completion can touch a
    /// dismantled screen.
    pub async fn run(mut self) {
        let seed = self.flow.prefill().await;
        self.form = seed.form;
        self.user_id = seed.user_id;

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ScreenRequest::SetField { key, value, respond_to } => {
                    match self.form.with_field(key, value) {
                        Ok(next) => {
                            self.form = next.clone();
                            let _ = respond_to.send(Ok(next));
                        }
                        Err(e) => {
                            let _ = respond_to.send(Err(e.into()));
                        }
                    }
                }
                ScreenRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.form.clone()));
                }
                ScreenRequest::Submit { respond_to } => {
                    let flow = Arc::clone(&self.flow);
                    let snapshot = FormSnapshot {
                        form: self.form.clone(),
                        user_id: self.user_id.clone(),
                    };
                    self.in_flight.spawn(async move {
                        let outcome = flow.submit(snapshot).await;
                        let _ = respond_to.send(Ok(outcome));
                    });
                }
                ScreenRequest::Shutdown => break,
            }
        }

        self.in_flight.abort_all();
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// Cloneable handle to a running screen; the stand-in for the view layer.
#[derive(Clone)]
pub struct ScreenClient {
    sender: mpsc::Sender<ScreenRequest>,
}

impl ScreenClient {
    /// Replace one field. Resolves to the fresh snapshot the view should
    /// render next. Values are skipped from the trace; fields may be secret.
    #[instrument(skip(self, value))]
    pub async fn set_field(
        &self,
        key: FieldKey,
        value: FieldValue,
    ) -> Result<UserProfileForm, ScreenError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ScreenRequest::SetField { key, value, respond_to })
            .await
            .map_err(|_| ScreenError::Unavailable("screen closed".to_string()))?;
        response
            .await
            .map_err(|_| ScreenError::Unavailable("screen dropped".to_string()))?
    }

    /// Current form state.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<UserProfileForm, ScreenError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ScreenRequest::Snapshot { respond_to })
            .await
            .map_err(|_| ScreenError::Unavailable("screen closed".to_string()))?;
        response
            .await
            .map_err(|_| ScreenError::Unavailable("screen dropped".to_string()))?
    }

    /// Submit the current form. Resolves once the request and its side
    /// effects finish; tapping again before then issues a second, concurrent
    /// request.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmitOutcome, ScreenError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ScreenRequest::Submit { respond_to })
            .await
            .map_err(|_| ScreenError::Unavailable("screen closed".to_string()))?;
        response
            .await
            .map_err(|_| ScreenError::Unavailable("screen dropped".to_string()))?
    }

    /// Ask the screen loop to exit. In-flight submits are aborted by the loop.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ScreenError> {
        self.sender
            .send(ScreenRequest::Shutdown)
            .await
            .map_err(|_| ScreenError::Unavailable("screen closed".to_string()))
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct SeededFlow {
        seed: FormSeed,
        submitted: Arc<Mutex<Vec<FormSnapshot>>>,
        barrier: Option<tokio::sync::Barrier>,
    }

    impl SeededFlow {
        fn new(seed: FormSeed) -> (Self, Arc<Mutex<Vec<FormSnapshot>>>) {
            let submitted = Arc::new(Mutex::new(Vec::new()));
            let flow = Self { seed, submitted: Arc::clone(&submitted), barrier: None };
            (flow, submitted)
        }
    }

    #[async_trait]
    impl SubmitFlow for SeededFlow {
        async fn prefill(&self) -> FormSeed {
            self.seed.clone()
        }

        async fn submit(&self, snapshot: FormSnapshot) -> SubmitOutcome {
            // With a barrier installed, a lone submit parks here forever; only
            // two concurrent submits can both get through.
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            self.submitted.lock().unwrap().push(snapshot);
            SubmitOutcome::Completed
        }
    }

    #[tokio::test]
    async fn prefill_seeds_form_and_update_target() {
        let form = UserProfileForm::default()
            .with_field(FieldKey::Username, FieldValue::Text("bob".to_string()))
            .unwrap();
        let seed = FormSeed { form: form.clone(), user_id: Some("42".to_string()) };
        let (flow, submitted) = SeededFlow::new(seed);
        let (screen, client) = FormScreen::new(8, flow);
        tokio::spawn(screen.run());

        assert_eq!(client.snapshot().await.unwrap(), form);
        let outcome = client.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed);

        // The submit saw the seeded state, captured id included.
        let snapshots = submitted.lock().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].form, form);
        assert_eq!(snapshots[0].user_id, Some("42".to_string()));
    }

    #[tokio::test]
    async fn set_field_returns_the_fresh_snapshot() {
        let (flow, _submitted) = SeededFlow::new(FormSeed::default());
        let (screen, client) = FormScreen::new(8, flow);
        tokio::spawn(screen.run());

        let snapshot = client
            .set_field(FieldKey::Email, FieldValue::Text("bob@example.com".to_string()))
            .await
            .unwrap();
        assert_eq!(snapshot.email, "bob@example.com");
        assert_eq!(client.snapshot().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn two_submits_run_concurrently() {
        // Both submits must be inside the flow at the same time to pass the
        // barrier; a serializing screen would deadlock here.
        let (mut flow, _submitted) = SeededFlow::new(FormSeed::default());
        flow.barrier = Some(tokio::sync::Barrier::new(2));
        let (screen, client) = FormScreen::new(8, flow);
        tokio::spawn(screen.run());

        let first = {
            let client = client.clone();
            tokio::spawn(async move { client.submit().await })
        };
        let second = {
            let client = client.clone();
            tokio::spawn(async move { client.submit().await })
        };

        assert_eq!(first.await.unwrap().unwrap(), SubmitOutcome::Completed);
        assert_eq!(second.await.unwrap().unwrap(), SubmitOutcome::Completed);
    }
}
