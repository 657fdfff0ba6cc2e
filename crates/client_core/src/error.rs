use thiserror::Error;

use crate::catalog::ActionKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// A key that is not part of the action catalog reached the parse boundary.
    #[error("unknown file action '{0}'")]
    InvalidAction(String),
    #[error("backend rejected {0} request")]
    BackendRejected(ActionKey),
    #[error("result for selection generation {issued} discarded (current generation {current})")]
    StaleResult { issued: u64, current: u64 },
    #[error("a submission is still in flight for this file")]
    SubmissionInFlight,
}
