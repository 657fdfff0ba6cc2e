//! Client-side coordination of per-file actions: the action menu, the modal
//! editor behind it, and the backend calls those surfaces trigger.

pub mod board;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod grantees;
pub mod http_backend;
pub mod memory;
pub mod presenter;

pub use board::FileBoard;
pub use catalog::{ActionCatalog, ActionDefinition, ActionKey};
pub use config::{load_settings, ClientSettings};
pub use controller::{
    ActionController, ControllerPhase, ControllerState, PendingSubmission, Selection,
    SubmitOutcome, SubmitStart,
};
pub use error::ActionError;
pub use gateway::{BackendGateway, FileBackend, LocationProvider, NavigationContext};
pub use grantees::GranteeListEditor;
pub use http_backend::HttpFileBackend;
pub use memory::InMemoryFileBackend;
pub use presenter::{
    dispatch_intent, plan_intent, ActionMenuView, DownloadLink, IntentOutcome, IntentPlan, ModalView,
    UserIntent,
};
