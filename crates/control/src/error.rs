use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("unknown control mode `{0}` (expected MANUAL, AUTOHELM, WAYPOINT or SEMI_AUTO)")]
    UnknownMode(String),
}
