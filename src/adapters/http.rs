//! ESP-IDF HTTP transport for the hub client.
//!
//! Thin blocking wrapper over `EspHttpConnection`; one connection object is
//! reused across requests (ESP-IDF keeps the underlying session alive when
//! the host repeats).

use std::time::Duration;

use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use esp_idf_svc::http::Method;
use esp_idf_svc::io::{Read, Write};
use log::warn;

use crate::hub::{HttpMethod, HttpResponse, HttpTransport, TransportError};

const READ_CHUNK: usize = 256;

pub struct EspHttpTransport {
    conn: EspHttpConnection,
}

impl EspHttpTransport {
    pub fn new(timeout_ms: u32) -> Result<Self, TransportError> {
        let conn = EspHttpConnection::new(&HttpConfiguration {
            timeout: Some(Duration::from_millis(u64::from(timeout_ms))),
            ..Default::default()
        })
        .map_err(|_| TransportError::Connect)?;
        Ok(Self { conn })
    }
}

fn to_idf_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::Get,
        HttpMethod::Post => Method::Post,
        HttpMethod::Put => Method::Put,
        HttpMethod::Delete => Method::Delete,
    }
}

impl HttpTransport for EspHttpTransport {
    fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        let headers = [("Content-Type", "application/json")];
        self.conn
            .initiate_request(to_idf_method(method), url, &headers)
            .map_err(|_| TransportError::Connect)?;

        if let Some(body) = body {
            self.conn
                .write_all(body.as_bytes())
                .map_err(|_| TransportError::Io)?;
        }

        self.conn
            .initiate_response()
            .map_err(|_| TransportError::Io)?;
        let status = self.conn.status();

        let mut out = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = self
                .conn
                .read(&mut chunk)
                .map_err(|_| TransportError::Io)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }

        let body = match String::from_utf8(out) {
            Ok(s) => s,
            Err(e) => {
                warn!("http: non-utf8 response body ({} bytes)", e.as_bytes().len());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(HttpResponse { status, body })
    }
}
