//! Mock adapters for integration tests.
//!
//! Records every hub request and display write so tests can assert on the
//! full history without touching real peripherals or sockets.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use smarthouse::app::ports::DisplayPort;
use smarthouse::devices::button::{Button, ButtonId};
use smarthouse::devices::motion::Motion;
use smarthouse::devices::Device;
use smarthouse::drivers::hw_timer;
use smarthouse::hub::{HttpMethod, HttpResponse, HttpTransport, TransportError};

// ── Shared-latch serialization ────────────────────────────────
//
// Button and motion ISR latches are process-wide atomics; tests that
// drive them must not interleave.

static HW_LOCK: Mutex<()> = Mutex::new(());

/// Take the hardware lock and clear every latch a previous test may have
/// left behind.
pub fn hw_guard() -> MutexGuard<'static, ()> {
    let guard = HW_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    Button::new(ButtonId::A).finalize();
    Button::new(ButtonId::B).finalize();
    Motion::new().finalize();
    let _ = hw_timer::take_keepalive_due();
    guard
}

// ── Hub transport mock ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Default)]
pub struct MockTransport {
    pub calls: Vec<RecordedCall>,
    responses: VecDeque<Result<HttpResponse, TransportError>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response; requests beyond the queue get `200 ""`.
    pub fn push_response(&mut self, status: u16, body: &str) {
        self.responses.push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_failure(&mut self, err: TransportError) {
        self.responses.push_back(Err(err));
    }

    pub fn last_call(&self) -> Option<&RecordedCall> {
        self.calls.last()
    }

    /// Number of recorded requests whose URL contains `fragment`.
    pub fn calls_to(&self, fragment: &str) -> usize {
        self.calls.iter().filter(|c| c.url.contains(fragment)).count()
    }
}

impl HttpTransport for MockTransport {
    fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        self.calls.push(RecordedCall {
            method,
            url: url.to_string(),
            body: body.map(str::to_string),
        });
        self.responses.pop_front().unwrap_or(Ok(HttpResponse {
            status: 200,
            body: String::new(),
        }))
    }
}

// ── Display mock ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub lines: [String; 2],
    pub cleared: u32,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplayPort for MockDisplay {
    fn write_line(&mut self, row: u8, text: &str) {
        self.lines[usize::from(row.min(1))] = text.to_string();
    }

    fn clear(&mut self) {
        self.lines = [String::new(), String::new()];
        self.cleared += 1;
    }
}
