use chrono::{DateTime, Utc};
use log::{info, warn};

use super::api::{
    ApiError, ContinueOutcome, ContinueRequest, GenerateRequest, GenerationResult, Inbound,
    Outbound, StartRequest,
};
use super::product::ProductConfig;
use super::progress::{self, Slot};
use super::session::{Session, Snapshot};
use super::storage::SnapshotStore;
use crate::config;

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    NotStarted,
    /// A saved snapshot is being validated against the server.
    Checking(Snapshot),
    ResumeOffer(Snapshot),
    InProgress,
    Review,
    AwaitingGeneration,
    Generated(GenerationResult),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorNotice {
    pub message: String,
    /// The request that failed, re-sent verbatim by [`WizardController::retry`].
    pub retry: Option<Outbound>,
}

/// Drives one product's question/answer wizard.
///
/// The controller performs no I/O besides the snapshot store. Every action
/// that needs the server returns an [`Outbound`]; the caller runs it through
/// [`super::api::dispatch`] and hands the [`Inbound`] back to [`apply`].
/// While a request is outstanding every such action returns `None`.
///
/// [`apply`]: WizardController::apply
pub struct WizardController<S: SnapshotStore> {
    product: &'static ProductConfig,
    store: S,
    token: Option<String>,
    phase: Phase,
    session: Option<Session>,
    error: Option<ErrorNotice>,
    in_flight: Option<Outbound>,
}

impl<S: SnapshotStore> WizardController<S> {
    pub fn new(product: &'static ProductConfig, store: S, token: Option<String>) -> Self {
        Self {
            product,
            store,
            token: token.filter(|t| !t.trim().is_empty()),
            phase: Phase::NotStarted,
            session: None,
            error: None,
            in_flight: None,
        }
    }

    pub fn product(&self) -> &'static ProductConfig {
        self.product
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorNotice> {
        self.error.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn progress(&self) -> Vec<Slot> {
        match self.phase {
            Phase::Review | Phase::AwaitingGeneration | Phase::Generated(_) => {
                progress::all_completed(self.product.progress_slots)
            }
            _ => {
                let count = self.session.as_ref().map_or(0, |s| s.question_count);
                progress::slots(self.product.progress_slots, count)
            }
        }
    }

    /// Looks for a resumable snapshot. Stale or unreadable snapshots are
    /// dropped without bothering the user.
    pub fn load(&mut self, now: DateTime<Utc>) -> Option<Outbound> {
        if self.phase != Phase::NotStarted || self.is_busy() {
            return None;
        }
        let raw = self.store.load(self.product.storage_key)?;
        match Snapshot::from_json(&raw) {
            Ok(snapshot) if snapshot.is_fresh(now, config::snapshot_ttl()) => {
                let probe = Outbound::Probe(snapshot.session_id.clone());
                self.phase = Phase::Checking(snapshot);
                self.issue(probe)
            }
            Ok(_) => {
                info!("Discarding expired {} snapshot", self.product.slug);
                self.store.clear(self.product.storage_key);
                None
            }
            Err(e) => {
                warn!("Discarding unreadable snapshot: {}", e);
                self.store.clear(self.product.storage_key);
                None
            }
        }
    }

    pub fn resume(&mut self) {
        if let Phase::ResumeOffer(snapshot) = &self.phase {
            let session = snapshot.clone().into_session();
            info!("Resuming session at question {}", session.question_count);
            self.session = Some(session);
            self.phase = Phase::InProgress;
        }
    }

    pub fn start_fresh(&mut self) {
        if matches!(self.phase, Phase::ResumeOffer(_)) {
            self.reset();
        }
    }

    pub fn start(&mut self, first_name: &str) -> Option<Outbound> {
        if self.phase != Phase::NotStarted || self.is_busy() {
            return None;
        }
        let first_name = first_name.trim();
        if self.product.asks_first_name && first_name.is_empty() {
            self.error = Some(ErrorNotice {
                message: format!("Please enter the {}.", self.product.first_name_label.to_lowercase()),
                retry: None,
            });
            return None;
        }
        self.error = None;
        self.store.clear(self.product.storage_key);
        let request = StartRequest {
            product_id: self.product.product_id.to_string(),
            token: self.token.clone(),
            first_name: if self.product.asks_first_name {
                Some(first_name.to_string())
            } else {
                None
            },
        };
        self.issue(Outbound::Start(request))
    }

    /// Blank answers are ignored: nothing is sent and nothing changes.
    pub fn submit_answer(&mut self, answer: &str, now: DateTime<Utc>) -> Option<Outbound> {
        if self.phase != Phase::InProgress || self.is_busy() {
            return None;
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        let session = self.session.as_mut()?;
        session.record_answer(answer.to_string());
        let request = ContinueRequest {
            session_id: session.session_id.clone(),
            user_message: answer.to_string(),
        };
        self.error = None;
        self.persist(now);
        self.issue(Outbound::Continue(request))
    }

    pub fn confirm_review(&mut self) -> Option<Outbound> {
        if self.phase != Phase::Review || self.is_busy() {
            return None;
        }
        self.phase = Phase::AwaitingGeneration;
        self.generate()
    }

    pub fn generate(&mut self) -> Option<Outbound> {
        if self.phase != Phase::AwaitingGeneration || self.is_busy() {
            return None;
        }
        let session = self.session.as_ref()?;
        let request = GenerateRequest {
            session_id: session.session_id.clone(),
            token: self.token.clone(),
            first_name: session.first_name.clone(),
        };
        self.error = None;
        self.issue(Outbound::Generate(request))
    }

    pub fn retry(&mut self) -> Option<Outbound> {
        if self.is_busy() {
            return None;
        }
        let outbound = self.error.as_mut()?.retry.take()?;
        self.error = None;
        self.issue(outbound)
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn restart(&mut self) {
        if self.is_busy() {
            return;
        }
        self.reset();
        self.error = None;
    }

    /// Feeds back the result of the outstanding request. May return a
    /// follow-up request (generation right after the last answer).
    pub fn apply(&mut self, inbound: Inbound, now: DateTime<Utc>) -> Option<Outbound> {
        let Some(sent) = self.in_flight.take() else {
            warn!("Ignoring response with no request in flight");
            return None;
        };
        match inbound {
            Inbound::Probed(Ok(())) => {
                if let Phase::Checking(snapshot) = &self.phase {
                    self.phase = Phase::ResumeOffer(snapshot.clone());
                }
                None
            }
            Inbound::Probed(Err(e)) => {
                info!("Saved session is no longer resumable: {}", e);
                self.reset();
                None
            }
            Inbound::Started(Ok(started)) => {
                let first_name = match &sent {
                    Outbound::Start(req) => req.first_name.clone(),
                    _ => None,
                };
                self.session = Some(Session::new(started.session_id, first_name, started.question));
                self.phase = Phase::InProgress;
                self.persist(now);
                None
            }
            Inbound::Continued(Ok(ContinueOutcome::NextQuestion(question))) => {
                if let Some(session) = self.session.as_mut() {
                    session.advance(question);
                }
                self.persist(now);
                None
            }
            Inbound::Continued(Ok(ContinueOutcome::ReadyForGeneration)) => {
                info!("Questions finished for {}", self.product.slug);
                if self.product.review_before_generate {
                    self.phase = Phase::Review;
                    None
                } else {
                    self.phase = Phase::AwaitingGeneration;
                    self.generate()
                }
            }
            Inbound::Generated(Ok(result)) => {
                self.store.clear(self.product.storage_key);
                self.session = None;
                self.phase = Phase::Generated(result);
                None
            }
            Inbound::Started(Err(e)) | Inbound::Continued(Err(e)) | Inbound::Generated(Err(e)) => {
                self.fail(e, sent);
                None
            }
        }
    }

    fn issue(&mut self, outbound: Outbound) -> Option<Outbound> {
        self.in_flight = Some(outbound.clone());
        Some(outbound)
    }

    fn fail(&mut self, error: ApiError, sent: Outbound) {
        warn!("Request failed: {:?}", error);
        if error.is_session_expired() {
            self.reset();
            self.error = Some(ErrorNotice { message: error.to_string(), retry: None });
        } else {
            self.error = Some(ErrorNotice { message: error.to_string(), retry: Some(sent) });
        }
    }

    fn reset(&mut self) {
        self.store.clear(self.product.storage_key);
        self.session = None;
        self.phase = Phase::NotStarted;
    }

    fn persist(&self, now: DateTime<Utc>) {
        let Some(session) = &self.session else { return };
        match session.snapshot(now).to_json() {
            Ok(json) => self.store.save(self.product.storage_key, &json),
            Err(e) => warn!("Could not serialize snapshot: {}", e),
        }
    }
}
