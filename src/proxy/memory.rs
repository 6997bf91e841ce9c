//! In-process routing layer.
//!
//! Tracks which node each session is on and keeps every message delivered to a
//! session. Used when the controller runs standalone and as the test double for
//! the real proxy.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::{DashMap, DashSet};

use crate::hibernation::GateDecision;
use crate::proxy::{NodeId, Notice, ProxyHost, SessionId};

#[derive(Debug, Default)]
struct SessionRecord {
    node: Option<NodeId>,
    inbox: Vec<Notice>,
}

/// A [`ProxyHost`] that keeps all state in memory.
#[derive(Debug)]
pub struct MemoryProxy {
    nodes: DashSet<NodeId>,
    sessions: DashMap<SessionId, SessionRecord>,
    disconnected: DashMap<SessionId, Notice>,
    next_id: AtomicU64,
}

impl MemoryProxy {
    pub fn new() -> Self {
        Self {
            nodes: DashSet::new(),
            sessions: DashMap::new(),
            disconnected: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a proxy with the given nodes registered.
    pub fn with_nodes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let proxy = Self::new();
        for name in names {
            proxy.register_node(NodeId::new(name));
        }
        proxy
    }

    pub fn register_node(&self, node: NodeId) {
        self.nodes.insert(node);
    }

    /// Allocate a session that is not yet attached to any node.
    pub fn open_session(&self) -> SessionId {
        let id = SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sessions.insert(id, SessionRecord::default());
        id
    }

    /// Node the session is currently attached to.
    pub fn node_of(&self, session: SessionId) -> Option<NodeId> {
        self.sessions.get(&session).and_then(|r| r.node.clone())
    }

    /// Messages delivered to the session so far, oldest first.
    pub fn inbox(&self, session: SessionId) -> Vec<Notice> {
        self.sessions
            .get(&session)
            .map(|r| r.inbox.clone())
            .unwrap_or_default()
    }

    /// Reason given when the session was terminated, if it was.
    pub fn disconnect_reason(&self, session: SessionId) -> Option<Notice> {
        self.disconnected.get(&session).map(|n| n.value().clone())
    }

    /// Finish routing a gated session that asked to join `requested`.
    ///
    /// Holds and disconnects were already carried out by the gate, so only
    /// `Proceed` moves the session.
    pub fn route(&self, session: SessionId, requested: &NodeId, decision: &GateDecision) {
        if *decision == GateDecision::Proceed {
            self.place(session, requested);
        }
    }

    /// Attach a session to `node` without any checks.
    pub fn place(&self, session: SessionId, node: &NodeId) {
        if let Some(mut record) = self.sessions.get_mut(&session) {
            record.node = Some(node.clone());
        }
    }

    /// Remove a session, e.g. when the client leaves.
    pub fn close_session(&self, session: SessionId) {
        self.sessions.remove(&session);
    }
}

impl Default for MemoryProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyHost for MemoryProxy {
    fn has_node(&self, node: &NodeId) -> bool {
        self.nodes.contains(node)
    }

    fn sessions_on(&self, node: &NodeId) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().node.as_ref() == Some(node))
            .map(|entry| *entry.key())
            .collect();
        ids.sort();
        ids
    }

    fn notify(&self, session: SessionId, notice: &Notice) {
        if let Some(mut record) = self.sessions.get_mut(&session) {
            record.inbox.push(notice.clone());
        }
    }

    fn redirect(&self, session: SessionId, node: &NodeId) {
        if !self.has_node(node) {
            tracing::warn!(session = %session, node = %node, "Redirect to unknown node ignored");
            return;
        }
        self.place(session, node);
    }

    fn disconnect(&self, session: SessionId, reason: &Notice) {
        self.sessions.remove(&session);
        tracing::debug!(session = %session, reason = %reason, "Session disconnected");
        self.disconnected.insert(session, reason.clone());
    }
}
