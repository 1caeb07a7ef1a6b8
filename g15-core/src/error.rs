//! Error types shared by the transport and the device interface.

/// Errors reported by the HID transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The device went away (unplugged or re-enumerated)
    #[error("no such device")]
    Disconnected,

    /// Fewer bytes than requested reached the device
    #[error("incomplete write: sent {sent} of {all} bytes")]
    IncompleteWrite { sent: usize, all: usize },

    /// Access to the hidraw node was refused
    #[error("hid permission denied: {0}")]
    PermissionDenied(String),

    /// Any other hidapi failure
    #[error("hid error: {0}")]
    Hid(String),
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        if let hidapi::HidError::IncompleteSendError { sent, all } = e {
            return TransportError::IncompleteWrite { sent, all };
        }
        let msg = e.to_string();
        if is_disconnect_message(&msg) {
            TransportError::Disconnected
        } else if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::PermissionDenied(msg)
        } else {
            TransportError::Hid(msg)
        }
    }
}

/// hidapi only hands back strerror text, so device loss is recognised by message
fn is_disconnect_message(msg: &str) -> bool {
    const MARKERS: [&str; 4] = [
        "No such device",
        "ENODEV",
        "os error 19",
        "Device not configured",
    ];
    MARKERS.iter().any(|m| msg.contains(m))
}

/// Errors that can occur during device operations
#[derive(Debug, thiserror::Error)]
pub enum G15Error {
    /// The transport could not open the device
    #[error("failed to open device: {0}")]
    OpenFailed(#[source] TransportError),

    /// The interface has no device descriptor yet
    #[error("interface is not bound to a device")]
    NotBound,

    /// No live session, call `init` first
    #[error("device is not open")]
    NotOpen,

    /// The device disappeared mid session. Drop the interface and rediscover.
    #[error("device disconnected, rediscover and re-initialise")]
    DeviceGone,

    #[error("failed to write to device: {0}")]
    WriteFailed(#[source] TransportError),

    #[error("failed to read from device: {0}")]
    ReadFailed(#[source] TransportError),

    /// No report arrived in the allotted window
    #[error("timed out waiting for a key report")]
    Timeout,

    /// A report arrived that the active decoder cannot use; retry right away
    #[error("report not usable by the active decoder, try again")]
    TryAgain,

    #[error("failed to write pixmap to lcd: {0}")]
    WritingPixmap(#[source] TransportError),

    #[error("failed to write lcd buffer: {0}")]
    WritingBuffer(#[source] TransportError),

    /// The model's capability bits do not allow this operation
    #[error("{operation} is not supported by {model}")]
    Unsupported {
        model: &'static str,
        operation: &'static str,
    },

    /// A level or mask outside the accepted range
    #[error("invalid level {level} for {operation}")]
    InvalidLevel { operation: &'static str, level: u32 },

    /// Pixmap or buffer of the wrong size
    #[error("invalid pixmap: expected {expected} bytes, got {actual}")]
    InvalidPixmap { expected: usize, actual: usize },
}

impl G15Error {
    /// Only `TryAgain` should be retried, and immediately
    pub fn is_retryable(&self) -> bool {
        matches!(self, G15Error::TryAgain)
    }

    /// The instance is dead and the device must be rediscovered
    pub fn requires_rediscovery(&self) -> bool {
        matches!(self, G15Error::DeviceGone)
    }
}

pub type Result<T> = std::result::Result<T, G15Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hid_errors_are_classified() {
        let gone = hidapi::HidError::HidApiError {
            message: "hid_read: No such device".into(),
        };
        assert_eq!(TransportError::from(gone), TransportError::Disconnected);

        let denied = hidapi::HidError::HidApiError {
            message: "Permission denied (os error 13)".into(),
        };
        assert!(matches!(
            TransportError::from(denied),
            TransportError::PermissionDenied(_)
        ));

        let short = hidapi::HidError::IncompleteSendError { sent: 3, all: 4 };
        assert_eq!(
            TransportError::from(short),
            TransportError::IncompleteWrite { sent: 3, all: 4 }
        );
    }

    #[test]
    fn retry_and_rediscovery_hints() {
        assert!(G15Error::TryAgain.is_retryable());
        assert!(!G15Error::Timeout.is_retryable());
        assert!(G15Error::DeviceGone.requires_rediscovery());
        assert!(!G15Error::OpenFailed(TransportError::Disconnected).requires_rediscovery());
    }
}
