//! Hub synchronization client.
//!
//! Speaks the hub's small JSON-over-HTTP protocol: register on boot,
//! periodic keepalives, state push/pull, alarm reports, and a final
//! deregistration.  The transport is injected through [`HttpTransport`] so
//! the client runs unchanged against the ESP-IDF HTTP stack or a test
//! double.

pub mod wire;

use core::fmt;

use log::{debug, warn};

use wire::{HouseStateWire, KeepaliveBody, RegisterBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failures, independent of HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// TCP connect or DNS resolution failed.
    Connect,
    /// The request was sent but the connection dropped before a response.
    Io,
    /// No response within the transport's deadline.
    Timeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection failed"),
            Self::Io => write!(f, "i/o error mid-request"),
            Self::Timeout => write!(f, "request timed out"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubError {
    Transport(TransportError),
    /// The hub answered with a status outside the accepted set.
    Status(u16),
    /// The hub answered 2xx but the body was not what the protocol promises.
    Protocol(&'static str),
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "hub transport: {e}"),
            Self::Status(code) => write!(f, "hub rejected request with status {code}"),
            Self::Protocol(what) => write!(f, "hub protocol violation: {what}"),
        }
    }
}

impl From<TransportError> for HubError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Minimal blocking HTTP seam the client drives.
pub trait HttpTransport {
    fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, TransportError>;
}

/// What the hub asked for in its keepalive reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepaliveOutcome {
    /// 200: nothing to do.
    Ok,
    /// 202: another house raised a global alarm; trigger ours.
    ActivateAlarm,
    /// 205: the hub holds a newer desired state; pull it.
    StateAvailable,
}

/// Client for one registered house.
pub struct HubClient<T: HttpTransport> {
    transport: T,
    base_url: String,
    house_id: String,
    ip_address: String,
}

impl<T: HttpTransport> HubClient<T> {
    pub fn new(transport: T, base_url: &str, house_id: &str, ip_address: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            house_id: house_id.to_string(),
            ip_address: ip_address.to_string(),
        }
    }

    pub fn house_id(&self) -> &str {
        &self.house_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn set_ip_address(&mut self, ip: &str) {
        self.ip_address = ip.to_string();
    }

    fn house_url(&self, suffix: &str) -> String {
        format!("{}/houses/{}{}", self.base_url, self.house_id, suffix)
    }

    fn send(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, HubError> {
        debug!("hub: {} {}", method.as_str(), url);
        let resp = self.transport.request(method, url, body)?;
        Ok(resp)
    }

    fn expect_success(resp: HttpResponse) -> Result<HttpResponse, HubError> {
        if (200..300).contains(&resp.status) {
            Ok(resp)
        } else {
            warn!("hub: request failed with status {}", resp.status);
            Err(HubError::Status(resp.status))
        }
    }

    /// Announce this house to the hub with its full initial state.
    pub fn register(&mut self, state: &HouseStateWire) -> Result<(), HubError> {
        let body = RegisterBody {
            unique_id: &self.house_id,
            ip_address: &self.ip_address,
            state,
        };
        let json = serde_json::to_string(&body)
            .map_err(|_| HubError::Protocol("register body not serializable"))?;
        let url = format!("{}/houses", self.base_url);
        let resp = self.send(HttpMethod::Post, &url, Some(&json))?;
        Self::expect_success(resp).map(drop)
    }

    /// Periodic liveness ping.  The status code doubles as a command channel.
    pub fn keepalive(&mut self) -> Result<KeepaliveOutcome, HubError> {
        let body = KeepaliveBody {
            unique_id: &self.house_id,
            ip_address: &self.ip_address,
        };
        let json = serde_json::to_string(&body)
            .map_err(|_| HubError::Protocol("keepalive body not serializable"))?;
        let url = self.house_url("/keepalive");
        let resp = self.send(HttpMethod::Put, &url, Some(&json))?;
        match resp.status {
            200 => Ok(KeepaliveOutcome::Ok),
            202 => Ok(KeepaliveOutcome::ActivateAlarm),
            205 => Ok(KeepaliveOutcome::StateAvailable),
            other => {
                warn!("hub: keepalive rejected with status {other}");
                Err(HubError::Status(other))
            }
        }
    }

    /// Upload the current house state.
    pub fn push_state(&mut self, state: &HouseStateWire) -> Result<(), HubError> {
        let json = serde_json::to_string(state)
            .map_err(|_| HubError::Protocol("state body not serializable"))?;
        let url = self.house_url("/state");
        let resp = self.send(HttpMethod::Put, &url, Some(&json))?;
        Self::expect_success(resp).map(drop)
    }

    /// Download the hub's desired state for this house.
    pub fn pull_state(&mut self) -> Result<HouseStateWire, HubError> {
        let url = self.house_url("/state");
        let resp = self.send(HttpMethod::Get, &url, None)?;
        let resp = Self::expect_success(resp)?;
        serde_json::from_str(&resp.body).map_err(|_| {
            warn!("hub: unparseable state body: {}", resp.body);
            HubError::Protocol("state body is not a house state")
        })
    }

    /// Tell the hub our alarm fired so it can fan out to global listeners.
    pub fn report_alarm(&mut self) -> Result<(), HubError> {
        let url = self.house_url("/report_alarm");
        let resp = self.send(HttpMethod::Put, &url, None)?;
        Self::expect_success(resp).map(drop)
    }

    /// Deregister on shutdown.  Best-effort; callers log and move on.
    pub fn finalize(&mut self) -> Result<(), HubError> {
        let url = self.house_url("");
        let resp = self.send(HttpMethod::Delete, &url, None)?;
        Self::expect_success(resp).map(drop)
    }
}
