use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Notify;

use proposta_domain::id::ProposalId;
use proposta_domain::status::ProposalStatus;
use proposta_proposals::domain::document::{DecisionLinks, DocumentComposer};
use proposta_proposals::domain::repository::{
    DeliveryError, DocumentRenderer, MailTransport, ProposalRepository, RenderError,
};
use proposta_proposals::domain::types::{
    DeliveryReceipt, Envelope, HistoryCursor, NewProposal, PageOptions, Proposal,
};
use proposta_proposals::error::ProposalsServiceError;
use proposta_proposals::usecase::dispatch::{
    DispatchProposalInput, DispatchProposalUseCase, DispatchSettings,
};

// ── InMemoryProposalRepo ─────────────────────────────────────────────────────

struct RepoState {
    proposals: Vec<Proposal>,
    next_id: i64,
    clock: DateTime<Utc>,
}

/// Store double. Each insert advances the clock by `clock_step`.
#[derive(Clone)]
pub struct InMemoryProposalRepo {
    state: Arc<Mutex<RepoState>>,
    clock_step: Duration,
    pub fail_creates: bool,
    /// Fails both `update_status` and `transition_status`.
    pub fail_updates: bool,
    list_calls: Arc<AtomicUsize>,
}

impl InMemoryProposalRepo {
    pub fn new() -> Self {
        Self::with_clock_step(Duration::minutes(1))
    }

    pub fn with_clock_step(clock_step: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RepoState {
                proposals: vec![],
                next_id: 1,
                clock: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            })),
            clock_step,
            fail_creates: false,
            fail_updates: false,
            list_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_updates() -> Self {
        Self {
            fail_updates: true,
            ..Self::new()
        }
    }

    pub fn failing_creates() -> Self {
        Self {
            fail_creates: true,
            ..Self::new()
        }
    }

    pub fn set_status(&self, id: ProposalId, status: ProposalStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(p) = state.proposals.iter_mut().find(|p| p.id == id) {
            p.status = status;
        }
    }

    /// Poll until the record reaches `status`, giving up after a few seconds.
    pub async fn wait_for_status(&self, id: ProposalId, status: ProposalStatus) {
        let reached = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while self.get(id).map(|p| p.status) != Some(status) {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(
            reached.is_ok(),
            "proposal {id} never reached {status}, last seen {:?}",
            self.get(id).map(|p| p.status)
        );
    }

    pub fn all(&self) -> Vec<Proposal> {
        self.state.lock().unwrap().proposals.clone()
    }

    pub fn get(&self, id: ProposalId) -> Option<Proposal> {
        self.all().into_iter().find(|p| p.id == id)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Insert a record that already has the given status.
    pub fn seed(&self, status: ProposalStatus) -> ProposalId {
        let mut state = self.state.lock().unwrap();
        let id = ProposalId(state.next_id);
        state.next_id += 1;
        let submitted_at = state.clock;
        state.clock += self.clock_step;
        state.proposals.push(Proposal {
            id,
            client_name: "Seeded".to_owned(),
            company_name: "Seed Co".to_owned(),
            amount: "1.00".to_owned(),
            description: "seeded record".to_owned(),
            recipient_email: "seed@example.com".to_owned(),
            validity: None,
            submitted_at,
            status,
        });
        id
    }
}

impl ProposalRepository for InMemoryProposalRepo {
    async fn create(&self, proposal: &NewProposal) -> Result<Proposal, ProposalsServiceError> {
        if self.fail_creates {
            return Err(anyhow::anyhow!("database is starting up").into());
        }
        let mut state = self.state.lock().unwrap();
        let created = Proposal {
            id: ProposalId(state.next_id),
            client_name: proposal.client_name.clone(),
            company_name: proposal.company_name.clone(),
            amount: proposal.amount.clone(),
            description: proposal.description.clone(),
            recipient_email: proposal.recipient_email.clone(),
            validity: proposal.validity,
            submitted_at: state.clock,
            status: ProposalStatus::Pending,
        };
        state.next_id += 1;
        state.clock += self.clock_step;
        state.proposals.push(created.clone());
        Ok(created)
    }

    async fn update_status(
        &self,
        id: ProposalId,
        status: ProposalStatus,
    ) -> Result<bool, ProposalsServiceError> {
        if self.fail_updates {
            return Err(anyhow::anyhow!("connection reset by peer").into());
        }
        let mut state = self.state.lock().unwrap();
        match state.proposals.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transition_status(
        &self,
        id: ProposalId,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> Result<bool, ProposalsServiceError> {
        if self.fail_updates {
            return Err(anyhow::anyhow!("connection reset by peer").into());
        }
        let mut state = self.state.lock().unwrap();
        match state
            .proposals
            .iter_mut()
            .find(|p| p.id == id && p.status == from)
        {
            Some(p) => {
                p.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, id: ProposalId) -> Result<Option<Proposal>, ProposalsServiceError> {
        Ok(self.get(id))
    }

    async fn list_page(
        &self,
        after: Option<HistoryCursor>,
        limit: u64,
    ) -> Result<Vec<Proposal>, ProposalsServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut proposals = self.all();
        proposals.sort_by(|a, b| (b.submitted_at, b.id).cmp(&(a.submitted_at, a.id)));
        Ok(proposals
            .into_iter()
            .filter(|p| match after {
                Some(cursor) => (p.submitted_at, p.id) < (cursor.submitted_at, cursor.id),
                None => true,
            })
            .take(limit as usize)
            .collect())
    }
}

// ── FakeRenderer ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeRenderer {
    pub fail: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeRenderer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub const FAKE_PDF: &[u8] = b"%PDF-1.7 fake";

impl DocumentRenderer for FakeRenderer {
    async fn render(&self, markup: &str, page: &PageOptions) -> Result<Bytes, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(*page, PageOptions::A4);
        assert!(markup.contains("<html>"));
        if self.fail {
            return Err(RenderError::Unreachable("connection refused".to_owned()));
        }
        Ok(Bytes::from_static(FAKE_PDF))
    }
}

// ── FakeMailer ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeMailer {
    pub fail: bool,
    sent: Arc<Mutex<Vec<Envelope>>>,
    gate: Option<Arc<Notify>>,
    started: Arc<Notify>,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Hold every `send` until `release` is called.
    pub fn gated(self) -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..self
        }
    }

    /// Envelopes handed to the transport, including rejected ones.
    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }

    /// Resolves once a `send` call has started.
    pub async fn delivery_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

impl MailTransport for FakeMailer {
    async fn send(&self, envelope: &Envelope) -> Result<DeliveryReceipt, DeliveryError> {
        self.sent.lock().unwrap().push(envelope.clone());
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(DeliveryError::Rejected(
                "550 mailbox unavailable".to_owned(),
            ));
        }
        Ok(DeliveryReceipt {
            code: "250".to_owned(),
            message: Some("OK queued".to_owned()),
        })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub const TEST_BASE_URL: &str = "https://proposals.example.com";
pub const TEST_SENDER: &str = "Proposta <proposals@example.com>";

pub fn dispatch_usecase(
    repo: InMemoryProposalRepo,
    renderer: FakeRenderer,
    mailer: FakeMailer,
) -> DispatchProposalUseCase<InMemoryProposalRepo, FakeRenderer, FakeMailer> {
    DispatchProposalUseCase {
        repo,
        renderer,
        mailer,
        composer: Arc::new(DocumentComposer::new().unwrap()),
        settings: DispatchSettings {
            sender: TEST_SENDER.to_owned(),
            links: Some(DecisionLinks::new(TEST_BASE_URL)),
        },
    }
}

pub fn dispatch_input(term_days: &str) -> DispatchProposalInput {
    DispatchProposalInput {
        client_name: "Ana Souza".to_owned(),
        company_name: "Acme Ltda".to_owned(),
        amount: "1500.00".to_owned(),
        description: "Website redesign".to_owned(),
        recipient_email: "ana@example.com".to_owned(),
        subject: "Your proposal".to_owned(),
        term_days: term_days.to_owned(),
    }
}
