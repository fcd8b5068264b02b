use std::{fmt, sync::Arc};

use shared::{
    domain::{AnalysisResult, ConfigStatus, CostEstimate, Roadmap, Server, ServerId},
    protocol::{Endpoint, RoadmapRequest, ServerIdRequest, ServerListResponse, UploadResponse},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    error::{ValidationError, WorkflowError},
    notifications::{Notification, NotificationKind, NotificationSink},
    presentation::{AnalysisView, CostEstimateView, RoadmapView},
    registry::ServerRegistry,
    transport::{decode, fetch, send_json, Transport, UploadFile},
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Discovery,
    Analysis,
    Estimate,
    Roadmap,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Discovery, Slot::Analysis, Slot::Estimate, Slot::Roadmap];

    fn index(self) -> usize {
        match self {
            Slot::Discovery => 0,
            Slot::Analysis => 1,
            Slot::Estimate => 2,
            Slot::Roadmap => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Slot::Discovery => "discovery",
            Slot::Analysis => "analysis",
            Slot::Estimate => "estimate",
            Slot::Roadmap => "roadmap",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Sequence number minted per logical operation. Later tokens compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    status: SlotStatus,
    latest: Option<RequestToken>,
}

// One counter across all slots; a response only lands while its token is the slot's latest.
#[derive(Debug, Default)]
struct SlotBoard {
    minted: u64,
    slots: [SlotState; 4],
}

impl SlotBoard {
    fn mint(&mut self, slot: Slot) -> RequestToken {
        self.minted += 1;
        let token = RequestToken(self.minted);
        let state = &mut self.slots[slot.index()];
        state.latest = Some(token);
        state.status = SlotStatus::Pending;
        token
    }

    fn is_current(&self, slot: Slot, token: RequestToken) -> bool {
        self.slots[slot.index()].latest == Some(token)
    }

    /// Moves the slot to `status` if `token` is still the latest for it.
    fn settle(&mut self, slot: Slot, token: RequestToken, status: SlotStatus) -> bool {
        if !self.is_current(slot, token) {
            return false;
        }
        self.slots[slot.index()].status = status;
        true
    }

    fn status(&self, slot: Slot) -> SlotStatus {
        self.slots[slot.index()].status
    }

    fn latest(&self, slot: Slot) -> Option<RequestToken> {
        self.slots[slot.index()].latest
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerScoped<T> {
    pub server_id: ServerId,
    pub value: T,
}

#[derive(Default)]
struct WorkflowState {
    registry: ServerRegistry,
    slots: SlotBoard,
    analysis: Option<ServerScoped<AnalysisResult>>,
    estimate: Option<ServerScoped<CostEstimate>>,
    roadmap: Option<Roadmap>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowView {
    pub servers: Vec<Server>,
    pub selected: Option<ServerId>,
    pub statuses: [(Slot, SlotStatus); 4],
    pub analysis: Option<ServerScoped<AnalysisResult>>,
    pub estimate: Option<ServerScoped<CostEstimate>>,
    pub roadmap: Option<Roadmap>,
}

impl WorkflowView {
    pub fn status(&self, slot: Slot) -> SlotStatus {
        self.statuses[slot.index()].1
    }
}

#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    SlotChanged {
        slot: Slot,
        status: SlotStatus,
    },
    ServersReplaced {
        count: usize,
    },
    AnalysisApplied {
        server_id: ServerId,
        view: AnalysisView,
    },
    EstimateApplied {
        server_id: ServerId,
        view: CostEstimateView,
    },
    RoadmapApplied(RoadmapView),
    Notification(Notification),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Applied,
    Superseded,
    Failed(WorkflowError),
}

impl StageOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StageOutcome::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeOutcome {
    pub analysis: StageOutcome,
    pub estimate: Option<StageOutcome>,
}

pub struct WorkflowOrchestrator {
    transport: Arc<dyn Transport>,
    notifications: NotificationSink,
    state: Mutex<WorkflowState>,
    events: broadcast::Sender<WorkflowEvent>,
}

impl WorkflowOrchestrator {
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        Self::with_notifications(transport, NotificationSink::default())
    }

    pub fn with_notifications(
        transport: Arc<dyn Transport>,
        notifications: NotificationSink,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            transport,
            notifications,
            state: Mutex::new(WorkflowState::default()),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    pub fn notifications(&self) -> &NotificationSink {
        &self.notifications
    }

    pub async fn snapshot(&self) -> WorkflowView {
        let state = self.state.lock().await;
        WorkflowView {
            servers: state.registry.servers().to_vec(),
            selected: state.registry.selected_id().cloned(),
            statuses: Slot::ALL.map(|slot| (slot, state.slots.status(slot))),
            analysis: state.analysis.clone(),
            estimate: state.estimate.clone(),
            roadmap: state.roadmap.clone(),
        }
    }

    pub async fn slot_status(&self, slot: Slot) -> SlotStatus {
        self.state.lock().await.slots.status(slot)
    }

    pub async fn latest_token(&self, slot: Slot) -> Option<RequestToken> {
        self.state.lock().await.slots.latest(slot)
    }

    pub async fn initialize(&self) -> StageOutcome {
        self.check_configuration().await;
        self.refresh_servers().await
    }

    pub async fn check_configuration(&self) -> Option<ConfigStatus> {
        let status =
            match fetch::<ConfigStatus>(self.transport.as_ref(), Endpoint::CheckConfig, None).await
            {
                Ok(status) => status,
                Err(err) => {
                    self.notify_error(format!("Failed to check configuration: {err}"))
                        .await;
                    return None;
                }
            };

        if !status.configured {
            self.notify_error(
                "Service configuration not found. Configure credentials or use test data.",
            )
            .await;
        } else if status.is_test_mode() {
            self.notify_info("Running in test mode with sample data").await;
        }
        info!(configured = status.configured, mode = %status.mode, "configuration checked");
        Some(status)
    }

    pub async fn refresh_servers(&self) -> StageOutcome {
        let token = self.begin(Slot::Discovery).await;
        let result = fetch::<ServerListResponse>(self.transport.as_ref(), Endpoint::ListServers, None)
            .await
            .map_err(WorkflowError::from);

        self.complete(
            Slot::Discovery,
            token,
            result,
            "Failed to load servers",
            |state, response| {
                state.registry.replace_all(response.servers);
                WorkflowEvent::ServersReplaced {
                    count: state.registry.len(),
                }
            },
        )
        .await
    }

    /// Shares the discovery slot with `refresh_servers`; the later trigger wins.
    pub async fn upload_test_data(&self, file: Option<UploadFile>) -> StageOutcome {
        let file = match validate_upload(file) {
            Ok(file) => file,
            Err(err) => {
                self.notify_error(err.to_string()).await;
                return StageOutcome::Failed(err.into());
            }
        };

        let token = self.begin(Slot::Discovery).await;
        let result = self
            .transport
            .upload(Endpoint::UploadTestData, file)
            .await
            .and_then(|body| decode::<UploadResponse>(Endpoint::UploadTestData, body))
            .map_err(WorkflowError::from);

        let outcome = self
            .complete(
                Slot::Discovery,
                token,
                result,
                "Error uploading test data",
                |state, response| {
                    state.registry.replace_all(response.servers);
                    WorkflowEvent::ServersReplaced {
                        count: state.registry.len(),
                    }
                },
            )
            .await;

        if outcome.is_applied() {
            self.notify_info("Test data uploaded successfully").await;
        }
        outcome
    }

    pub async fn select_and_analyze(&self, server_id: &ServerId) -> AnalyzeOutcome {
        let token = {
            let mut state = self.state.lock().await;
            let rejected = state.registry.select(server_id).map(|_| ()).err();
            if let Some(err) = rejected {
                drop(state);
                self.notify_error(err.to_string()).await;
                return AnalyzeOutcome {
                    analysis: StageOutcome::Failed(err.into()),
                    estimate: None,
                };
            }
            if state
                .analysis
                .as_ref()
                .is_some_and(|analysis| &analysis.server_id != server_id)
            {
                state.analysis = None;
            }
            state.slots.mint(Slot::Analysis)
        };
        self.announce_pending(Slot::Analysis, token);

        let result = send_json::<_, AnalysisResult>(
            self.transport.as_ref(),
            Endpoint::Analyze,
            &server_id_request(server_id),
        )
        .await
        .map_err(WorkflowError::from);

        let scoped_id = server_id.clone();
        let analysis = self
            .complete(
                Slot::Analysis,
                token,
                result,
                "Failed to analyze server",
                move |state, analysis| {
                    let view = AnalysisView::from_result(&analysis);
                    state.analysis = Some(ServerScoped {
                        server_id: scoped_id.clone(),
                        value: analysis,
                    });
                    WorkflowEvent::AnalysisApplied {
                        server_id: scoped_id,
                        view,
                    }
                },
            )
            .await;

        if !analysis.is_applied() {
            return AnalyzeOutcome {
                analysis,
                estimate: None,
            };
        }

        // The estimate is judged by its own token, not by the current selection.
        let estimate = self.estimate_costs(server_id).await;
        AnalyzeOutcome {
            analysis,
            estimate: Some(estimate),
        }
    }

    pub async fn estimate_costs(&self, server_id: &ServerId) -> StageOutcome {
        let token = self.begin(Slot::Estimate).await;
        let result = send_json::<_, CostEstimate>(
            self.transport.as_ref(),
            Endpoint::Estimate,
            &server_id_request(server_id),
        )
        .await
        .map_err(WorkflowError::from);

        let scoped_id = server_id.clone();
        self.complete(
            Slot::Estimate,
            token,
            result,
            "Failed to estimate costs",
            move |state, estimate| {
                let view = CostEstimateView::from_estimate(&estimate);
                state.estimate = Some(ServerScoped {
                    server_id: scoped_id.clone(),
                    value: estimate,
                });
                WorkflowEvent::EstimateApplied {
                    server_id: scoped_id,
                    view,
                }
            },
        )
        .await
    }

    /// Builds a roadmap over the whole registry snapshot, not the selection.
    pub async fn generate_roadmap(&self) -> StageOutcome {
        let (token, servers) = {
            let mut state = self.state.lock().await;
            let servers = state.registry.servers().to_vec();
            (state.slots.mint(Slot::Roadmap), servers)
        };
        self.announce_pending(Slot::Roadmap, token);

        let result = send_json::<_, Roadmap>(
            self.transport.as_ref(),
            Endpoint::Roadmap,
            &RoadmapRequest { servers },
        )
        .await
        .map_err(WorkflowError::from);

        self.complete(
            Slot::Roadmap,
            token,
            result,
            "Failed to generate roadmap",
            |state, roadmap| {
                let view = RoadmapView::from_roadmap(&roadmap);
                state.roadmap = Some(roadmap);
                WorkflowEvent::RoadmapApplied(view)
            },
        )
        .await
    }

    async fn begin(&self, slot: Slot) -> RequestToken {
        let token = self.state.lock().await.slots.mint(slot);
        self.announce_pending(slot, token);
        token
    }

    fn announce_pending(&self, slot: Slot, token: RequestToken) {
        debug!(%slot, token = token.value(), "request issued");
        let _ = self.events.send(WorkflowEvent::SlotChanged {
            slot,
            status: SlotStatus::Pending,
        });
    }

    /// Applies `result` if `token` still owns `slot`. Stale completions,
    /// successful or not, are dropped without touching state or notifying.
    async fn complete<T, F>(
        &self,
        slot: Slot,
        token: RequestToken,
        result: Result<T, WorkflowError>,
        failure_context: &str,
        apply: F,
    ) -> StageOutcome
    where
        F: FnOnce(&mut WorkflowState, T) -> WorkflowEvent,
    {
        match result {
            Ok(payload) => {
                let event = {
                    let mut state = self.state.lock().await;
                    if !state.slots.settle(slot, token, SlotStatus::Succeeded) {
                        None
                    } else {
                        Some(apply(&mut *state, payload))
                    }
                };
                let Some(event) = event else {
                    debug!(%slot, token = token.value(), "discarding superseded response");
                    return StageOutcome::Superseded;
                };

                let _ = self.events.send(WorkflowEvent::SlotChanged {
                    slot,
                    status: SlotStatus::Succeeded,
                });
                let _ = self.events.send(event);
                StageOutcome::Applied
            }
            Err(err) => {
                let current = self
                    .state
                    .lock()
                    .await
                    .slots
                    .settle(slot, token, SlotStatus::Failed);
                if !current {
                    debug!(%slot, token = token.value(), error = %err, "discarding superseded failure");
                    return StageOutcome::Superseded;
                }

                warn!(%slot, token = token.value(), error = %err, "stage failed");
                let _ = self.events.send(WorkflowEvent::SlotChanged {
                    slot,
                    status: SlotStatus::Failed,
                });
                self.notify_error(format!("{failure_context}: {err}")).await;
                StageOutcome::Failed(err)
            }
        }
    }

    async fn notify_info(&self, message: impl Into<String>) {
        self.notify(NotificationKind::Info, message.into()).await;
    }

    async fn notify_error(&self, message: impl Into<String>) {
        self.notify(NotificationKind::Error, message.into()).await;
    }

    async fn notify(&self, kind: NotificationKind, message: String) {
        let notification = self.notifications.post(kind, message).await;
        let _ = self.events.send(WorkflowEvent::Notification(notification));
    }
}

fn server_id_request(server_id: &ServerId) -> ServerIdRequest {
    ServerIdRequest {
        server_id: server_id.clone(),
    }
}

fn validate_upload(file: Option<UploadFile>) -> Result<UploadFile, ValidationError> {
    let Some(file) = file else {
        return Err(ValidationError::new("Please select a file to upload"));
    };
    if file.file_name.trim().is_empty() {
        return Err(ValidationError::new("No file selected"));
    }
    if file.bytes.is_empty() {
        return Err(ValidationError::new(format!(
            "Selected file '{}' is empty",
            file.file_name
        )));
    }
    Ok(file)
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
