use snafu::Snafu;

#[derive(Snafu, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    InvalidScore,
    HistoryUnavailable,
    PersistenceConflict,
    PersistenceFailure,
    Interrupted,
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
