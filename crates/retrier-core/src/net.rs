//! Network failure taxonomy for the probe: status kinds, the
//! transient-status table, and the mapping from curl errors.

use std::fmt;

/// Status of a failed network operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetStatus {
    /// Connect or read timed out.
    Timeout,
    /// Peer closed the connection mid-exchange.
    ConnectionClosed,
    /// TCP connect failed.
    ConnectFailure,
    /// Sending the request failed.
    SendFailure,
    /// Receiving the response failed.
    ReceiveFailure,
    /// The request was canceled before completion.
    RequestCanceled,
    /// A keep-alive connection could not be reused.
    KeepAliveFailure,
    /// DNS resolution failed.
    NameResolutionFailure,
    /// TLS certificate could not be validated.
    TrustFailure,
    /// The response violated the protocol (or the request never made sense).
    ProtocolError,
}

impl NetStatus {
    /// Whether a failure with this status is worth retrying.
    ///
    /// Closed set; everything not listed here is terminal. Name resolution
    /// and trust failures in particular do not get better by asking again.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            NetStatus::Timeout
                | NetStatus::ConnectionClosed
                | NetStatus::ConnectFailure
                | NetStatus::SendFailure
                | NetStatus::ReceiveFailure
                | NetStatus::RequestCanceled
                | NetStatus::KeepAliveFailure
        )
    }
}

impl fmt::Display for NetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NetStatus::Timeout => "timeout",
            NetStatus::ConnectionClosed => "connection closed",
            NetStatus::ConnectFailure => "connect failure",
            NetStatus::SendFailure => "send failure",
            NetStatus::ReceiveFailure => "receive failure",
            NetStatus::RequestCanceled => "request canceled",
            NetStatus::KeepAliveFailure => "keep-alive failure",
            NetStatus::NameResolutionFailure => "name resolution failure",
            NetStatus::TrustFailure => "trust failure",
            NetStatus::ProtocolError => "protocol error",
        };
        f.write_str(text)
    }
}

/// Error returned by a single probe attempt: a transport failure with its
/// status, or an HTTP response outside 2xx.
///
/// Carries an explicit kind tag so classifiers can match on the variant and
/// its payload instead of on runtime type identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Transport-level failure.
    Net(NetStatus),
    /// Response arrived with a non-2xx status.
    Http(u32),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Net(status) => write!(f, "network error: {}", status),
            ProbeError::Http(code) => write!(f, "HTTP {}", code),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Maps a curl error onto the status taxonomy.
pub fn classify_curl_error(e: &curl::Error) -> NetStatus {
    if e.is_operation_timedout() {
        return NetStatus::Timeout;
    }
    if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return NetStatus::NameResolutionFailure;
    }
    if e.is_couldnt_connect() {
        return NetStatus::ConnectFailure;
    }
    if e.is_send_error() {
        return NetStatus::SendFailure;
    }
    if e.is_recv_error() || e.is_read_error() {
        return NetStatus::ReceiveFailure;
    }
    if e.is_got_nothing() || e.is_partial_file() {
        return NetStatus::ConnectionClosed;
    }
    if e.is_ssl_connect_error() || e.is_ssl_certproblem() || e.is_peer_failed_verification() {
        return NetStatus::TrustFailure;
    }
    if e.is_aborted_by_callback() {
        return NetStatus::RequestCanceled;
    }
    NetStatus::ProtocolError
}

/// Whether an HTTP error status is worth retrying: throttling (429) or a
/// server-side failure (5xx). Client errors are terminal.
pub fn http_status_transient(code: u32) -> bool {
    matches!(code, 429 | 500..=599)
}
