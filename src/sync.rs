// SPDX-License-Identifier: GPL-3.0-or-later
//! Instance synchronisation over a localhost socket.
//!
//! Several running instances of the application keep their presentation in
//! sync by exchanging small JSON envelopes over TCP on the loopback
//! interface. Each envelope names a signal and carries parameters plus
//! metadata (instance id, timestamp, request id). A server answers every
//! request with one of the built-in outcome signals: a signal sent by the
//! receiving instance itself is ignored, a signal whose requirements (e.g.
//! protocol version) do not match is rejected, an unknown signal reports
//! not-found, everything else runs the registered handler and acks.
//!
//! The core controller stays synchronous; only this layer is async.

use crate::defaults::{APP_NAME, SYNC_MIN_PORT, SYNC_READ_BUFFER_BYTES, SYNC_TIMEOUT_SECS};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Well-known signal names.
pub mod signals {
    /// Another instance changed palette or theme; re-evaluate and apply.
    pub const UPDATE_PRESENTATION: &str = "AUI_UPDATE_PRESENTATION";
    /// Show an informational popup in every instance.
    pub const INFO_POPUP: &str = "AUI_INFO_POPUP";
    /// An error occurred in another instance.
    pub const ERROR_OCCURRED: &str = "AUI_ERROR_OCCURRED";

    // Built-in protocol outcomes.
    pub const ERROR_SIGNAL_IGNORED: &str = "__error_signal_ignored";
    pub const ERROR_SIGNAL_NOT_FOUND: &str = "__error_signal_not_found";
    pub const ERROR_REQUIREMENTS_MISMATCH: &str = "__error_requirements_mismatch";
    pub const SUCCESS_SIGNAL_PROCESSED: &str = "__success_signal_processed";
    pub const FETCH_METADATA: &str = "__fetch_socket_metadata";
}

/// Free-form signal parameters.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Key/value pairs both ends must agree on before a signal is processed.
pub type Requirements = BTreeMap<String, String>;

/// This process's sync identity: pid plus startup timestamp, so restarting
/// a process yields a fresh id.
pub fn instance_id() -> &'static str {
    static ID: OnceLock<String> = OnceLock::new();
    ID.get_or_init(|| {
        format!(
            "{}_{}",
            std::process::id(),
            chrono::Utc::now().timestamp_micros()
        )
    })
}

/// The default requirements set: both ends must run the same crate version.
#[must_use]
pub fn version_requirements() -> Requirements {
    let mut requires = Requirements::new();
    requires.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());
    requires
}

/// Envelope metadata identifying the sender and the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    pub instance_id: String,
    pub name: String,
    /// RFC 3339 send time.
    pub timestamp: String,
    pub request_id: String,
    /// Extra metadata attached by the serving instance (e.g. UI stats).
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub attached: Params,
}

impl EnvelopeMetadata {
    fn generate(instance: &str, request_id: Option<&str>) -> Self {
        Self {
            instance_id: instance.to_string(),
            name: APP_NAME.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id: request_id
                .map(str::to_string)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            attached: Params::new(),
        }
    }
}

/// One message on the wire, in either direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub signal: String,
    #[serde(default)]
    pub params: Params,
    #[serde(
        rename = "__socket_metadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<EnvelopeMetadata>,
    #[serde(
        rename = "__socket_requires",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub requires: Option<Requirements>,
}

impl Envelope {
    /// The human-readable message carried in `params`, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.params.get("message").and_then(|v| v.as_str())
    }
}

/// Connection settings shared by server and client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub host: String,
    pub port: u16,
    pub requires: Requirements,
}

impl SyncConfig {
    /// Loopback config on the given port.
    ///
    /// Port 0 asks the OS for an ephemeral port (useful in tests);
    /// otherwise the port must fall in the dynamic range 49152-65535.
    ///
    /// # Errors
    ///
    /// Returns `Error::Sync` for a port outside the dynamic range.
    pub fn new(port: u16) -> Result<Self> {
        if port != 0 && port < SYNC_MIN_PORT {
            return Err(Error::Sync(format!(
                "port {} is outside the dynamic range {}-65535",
                port, SYNC_MIN_PORT
            )));
        }
        Ok(Self {
            host: "127.0.0.1".to_string(),
            port,
            requires: version_requirements(),
        })
    }

    #[must_use]
    pub fn with_requirements(mut self, requires: Requirements) -> Self {
        self.requires = requires;
        self
    }
}

type Handler = Box<dyn Fn(&Params) + Send + Sync>;
type MetadataSource = Box<dyn Fn() -> Params + Send + Sync>;

/// Configures and binds a [`SyncServer`].
pub struct SyncServerBuilder {
    config: SyncConfig,
    handlers: HashMap<String, Handler>,
    metadata_sources: Vec<MetadataSource>,
}

impl SyncServerBuilder {
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            handlers: HashMap::new(),
            metadata_sources: Vec::new(),
        }
    }

    /// Registers a handler for a signal name.
    #[must_use]
    pub fn on<F>(mut self, signal: &str, handler: F) -> Self
    where
        F: Fn(&Params) + Send + Sync + 'static,
    {
        self.handlers.insert(signal.to_string(), Box::new(handler));
        self
    }

    /// Attaches a source of extra metadata included in every response
    /// (the original exposes live UI stats this way).
    #[must_use]
    pub fn attach_metadata<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Params + Send + Sync + 'static,
    {
        self.metadata_sources.push(Box::new(source));
        self
    }

    /// Binds the listener and spawns the accept loop.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` when the address cannot be bound.
    pub async fn bind(self) -> Result<SyncServer> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let local_addr = listener.local_addr()?;
        let inner = Arc::new(ServerInner {
            requires: self.config.requires,
            handlers: self.handlers,
            metadata_sources: self.metadata_sources,
        });

        tracing::info!(%local_addr, "sync server listening");
        let task = tokio::spawn(accept_loop(listener, inner));

        Ok(SyncServer { local_addr, task })
    }
}

/// Handle to a running sync server. Dropping it stops the accept loop.
pub struct SyncServer {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl SyncServer {
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for SyncServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct ServerInner {
    requires: Requirements,
    handlers: HashMap<String, Handler>,
    metadata_sources: Vec<MetadataSource>,
}

impl ServerInner {
    fn response(&self, signal: &str, message: &str, request_id: Option<&str>) -> Envelope {
        let mut metadata = EnvelopeMetadata::generate(instance_id(), request_id);
        for source in &self.metadata_sources {
            metadata.attached.extend(source());
        }

        let mut params = Params::new();
        if !message.is_empty() {
            params.insert("message".to_string(), message.into());
        }

        Envelope {
            signal: signal.to_string(),
            params,
            metadata: Some(metadata),
            requires: None,
        }
    }
}

async fn accept_loop(listener: TcpListener, inner: Arc<ServerInner>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let inner = Arc::clone(&inner);
                tokio::spawn(async move {
                    if let Err(err) = handle_client(stream, addr, inner).await {
                        tracing::error!(%addr, %err, "sync connection failed");
                    }
                });
            }
            Err(err) => {
                tracing::error!(%err, "sync accept failed");
                break;
            }
        }
    }
}

async fn handle_client(
    mut stream: TcpStream,
    addr: SocketAddr,
    inner: Arc<ServerInner>,
) -> Result<()> {
    tracing::debug!(%addr, "sync connection accepted");

    let mut buf = vec![0u8; SYNC_READ_BUFFER_BYTES];
    let n = stream.read(&mut buf).await?;
    let envelope: Envelope = serde_json::from_slice(&buf[..n])?;
    tracing::debug!(signal = %envelope.signal, "received signal");

    let request_id = envelope.metadata.as_ref().map(|m| m.request_id.as_str());
    let sender_requires = envelope.requires.clone().unwrap_or_default();

    let response = if envelope
        .metadata
        .as_ref()
        .is_some_and(|m| m.instance_id == instance_id())
    {
        tracing::warn!("ignoring signal from self");
        inner.response(
            signals::ERROR_SIGNAL_IGNORED,
            "Ignoring signal from self",
            request_id,
        )
    } else if sender_requires != inner.requires {
        let mismatch = requirements_mismatch(&sender_requires, &inner.requires);
        tracing::error!(?mismatch, "signal does not meet the requirements");
        inner.response(
            signals::ERROR_REQUIREMENTS_MISMATCH,
            &format!("Requirements mismatch: {}", mismatch.join(", ")),
            request_id,
        )
    } else if envelope.signal == signals::FETCH_METADATA {
        tracing::debug!("sending socket metadata");
        inner.response(signals::SUCCESS_SIGNAL_PROCESSED, "", request_id)
    } else if let Some(handler) = inner.handlers.get(&envelope.signal) {
        handler(&envelope.params);
        inner.response(
            signals::SUCCESS_SIGNAL_PROCESSED,
            &format!("Signal '{}' processed successfully", envelope.signal),
            request_id,
        )
    } else {
        tracing::error!(signal = %envelope.signal, "signal not found");
        inner.response(
            signals::ERROR_SIGNAL_NOT_FOUND,
            &format!("Signal '{}' not found", envelope.signal),
            request_id,
        )
    };

    stream.write_all(&serde_json::to_vec(&response)?).await?;
    Ok(())
}

/// Lists requirement keys whose values differ between the two ends.
fn requirements_mismatch(theirs: &Requirements, ours: &Requirements) -> Vec<String> {
    let mut keys: Vec<&String> = theirs.keys().chain(ours.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter(|key| theirs.get(*key) != ours.get(*key))
        .map(|key| {
            format!(
                "{}: {} != {}",
                key,
                theirs.get(key).map_or("<missing>", String::as_str),
                ours.get(key).map_or("<missing>", String::as_str),
            )
        })
        .collect()
}

/// Sends signals to another instance's sync server.
#[derive(Debug, Clone)]
pub struct SyncClient {
    config: SyncConfig,
    instance: String,
}

impl SyncClient {
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            instance: instance_id().to_string(),
        }
    }

    /// Overrides the instance id stamped on outgoing envelopes, for tests
    /// and tooling that act on behalf of a separate instance.
    #[must_use]
    pub fn with_instance_id(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    /// Sends a signal and waits for the response envelope.
    ///
    /// # Errors
    ///
    /// Returns `Error::Sync` when the peer cannot be reached, the exchange
    /// times out or either envelope fails to encode/decode.
    pub async fn send(&self, signal: &str, params: Params) -> Result<Envelope> {
        let envelope = Envelope {
            signal: signal.to_string(),
            params,
            metadata: Some(EnvelopeMetadata::generate(&self.instance, None)),
            requires: Some(self.config.requires.clone()),
        };
        let payload = serde_json::to_vec(&envelope)?;

        let exchange = async {
            let mut stream =
                TcpStream::connect((self.config.host.as_str(), self.config.port)).await?;
            stream.write_all(&payload).await?;

            let mut buf = vec![0u8; SYNC_READ_BUFFER_BYTES];
            let n = stream.read(&mut buf).await?;
            let response: Envelope = serde_json::from_slice(&buf[..n])?;
            Ok::<Envelope, Error>(response)
        };

        let response = tokio::time::timeout(Duration::from_secs(SYNC_TIMEOUT_SECS), exchange)
            .await
            .map_err(|_| {
                Error::Sync(format!("timed out waiting for a response to '{}'", signal))
            })??;

        interpret_response(&response);
        Ok(response)
    }

    /// Fire-and-forget send on a background task; failures are logged.
    pub fn notify(&self, signal: &str, params: Params) {
        let client = self.clone();
        let signal = signal.to_string();
        tokio::spawn(async move {
            if let Err(err) = client.send(&signal, params).await {
                tracing::error!(%err, signal, "background sync send failed");
            }
        });
    }

    /// Fetches the peer's metadata (instance id, attached stats).
    ///
    /// # Errors
    ///
    /// Propagates transport errors; also fails if the peer answered
    /// without metadata.
    pub async fn server_info(&self) -> Result<EnvelopeMetadata> {
        let response = self.send(signals::FETCH_METADATA, Params::new()).await?;
        response
            .metadata
            .ok_or_else(|| Error::Sync("response carried no metadata".to_string()))
    }
}

fn interpret_response(envelope: &Envelope) {
    let message = envelope.message().unwrap_or("<no message>");
    match envelope.signal.as_str() {
        signals::ERROR_SIGNAL_IGNORED
        | signals::ERROR_SIGNAL_NOT_FOUND
        | signals::ERROR_REQUIREMENTS_MISMATCH => {
            tracing::error!(signal = %envelope.signal, message, "sync signal rejected");
        }
        signals::SUCCESS_SIGNAL_PROCESSED => {
            tracing::debug!(signal = %envelope.signal, message, "sync signal processed");
        }
        _ => tracing::info!(signal = %envelope.signal, message, "sync response"),
    }
}
