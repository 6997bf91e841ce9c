//! Routing-layer seam.
//!
//! The controller never owns client sessions. It talks to whatever proxy it is
//! embedded in through [`ProxyHost`], which can list the sessions parked on a
//! node, deliver a message to one of them, and move one to another node.
//!
//! # Data Flow
//! ```text
//! Controller transition
//!     → ProxyHost::sessions_on(holding node)
//!     → ProxyHost::notify / ProxyHost::redirect per session
//!
//! Initial client connection (gate)
//!     → ProxyHost::notify + ProxyHost::redirect (hold)
//!       or ProxyHost::disconnect, under the controller lock
//!     → GateDecision returned; the routing layer only acts on Proceed
//! ```
//!
//! # Design Decisions
//! - Every call is a local, non-blocking enqueue; it is safe to make while the
//!   controller holds its state lock
//! - Session membership is owned by the routing layer; the controller only reads it

pub mod memory;

use std::fmt;

pub use memory::MemoryProxy;

/// Identifier of a node (server) registered with the routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a client session as assigned by the routing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Presentation hint for a session-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
}

/// A session-facing message. Lines are rendered in order, each with its own tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    lines: Vec<(Tone, String)>,
}

impl Notice {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            lines: vec![(tone, text.into())],
        }
    }

    /// Append another line, e.g. a warning suffix.
    pub fn with_line(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.lines.push((tone, text.into()));
        self
    }

    pub fn lines(&self) -> &[(Tone, String)] {
        &self.lines
    }

    /// Tone of the first line.
    pub fn tone(&self) -> Tone {
        self.lines.first().map(|(tone, _)| *tone).unwrap_or(Tone::Warning)
    }

    /// Plain text with lines joined by newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// The proxy the controller is embedded in.
pub trait ProxyHost: Send + Sync {
    /// Returns true if a node with this name is registered.
    fn has_node(&self, node: &NodeId) -> bool;

    /// Sessions currently connected to `node`.
    fn sessions_on(&self, node: &NodeId) -> Vec<SessionId>;

    /// Deliver a chat-style message to a session.
    fn notify(&self, session: SessionId, notice: &Notice);

    /// Ask the routing layer to move a session to `node`. Fire-and-forget.
    fn redirect(&self, session: SessionId, node: &NodeId);

    /// Terminate a session, showing it `reason`.
    fn disconnect(&self, session: SessionId, reason: &Notice);
}
