// lapin error conversion
// Note: From<lapin::Error> for PublishError is not allowed here (orphan rules),
// so adapters convert through this helper.

use jobgate_core::port::PublishError;

/// Classify a broker client error for the Publisher port.
pub fn to_publish_error(err: lapin::Error) -> PublishError {
    match &err {
        lapin::Error::IOError(_)
        | lapin::Error::InvalidConnectionState(_)
        | lapin::Error::MissingHeartbeatError => PublishError::Connection(err.to_string()),
        lapin::Error::ProtocolError(_) => PublishError::Rejected(err.to_string()),
        _ => PublishError::Channel(err.to_string()),
    }
}
