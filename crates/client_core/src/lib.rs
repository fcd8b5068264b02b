//! Client core for the server-migration assessment workflow.

pub mod error;
pub mod notifications;
pub mod orchestrator;
pub mod presentation;
pub mod quota;
pub mod registry;
pub mod transport;

pub use error::{NotFoundError, TransportError, TransportErrorKind, ValidationError, WorkflowError};
pub use notifications::{Notification, NotificationKind, NotificationSink};
pub use orchestrator::{
    AnalyzeOutcome, RequestToken, ServerScoped, Slot, SlotStatus, StageOutcome, WorkflowEvent,
    WorkflowOrchestrator, WorkflowView,
};
pub use quota::QuotaMonitor;
pub use registry::ServerRegistry;
pub use transport::{HttpTransport, Transport, UploadFile};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
