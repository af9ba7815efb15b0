//! Background request dispatch.
//!
//! Requests run on a tokio runtime while the UI thread keeps drawing. Each
//! request gets a [`Ticket`]; the response comes back over a channel tagged
//! with it. A requester keeps the latest ticket it issued in a
//! [`RequestSlot`] and ignores every response carrying an older one.

use crate::api::CrmApi;
use crate::error::ApiError;
use crate::models::{CatalogEntity, ClientSearchResponse, Identity, LineKind};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{info, warn};

pub type Ticket = u64;

#[derive(Debug)]
pub enum Payload {
    Catalog {
        kind: LineKind,
        entities: Vec<CatalogEntity>,
    },
    Clients(ClientSearchResponse),
}

#[derive(Debug)]
pub struct Response {
    pub ticket: Ticket,
    pub result: Result<Payload, ApiError>,
}

/// Cloneable handle used by screens to start requests.
#[derive(Clone)]
pub struct Dispatcher {
    runtime: Handle,
    api: Arc<CrmApi>,
    identity: Option<Identity>,
    outbox: Sender<Response>,
    counter: Arc<AtomicU64>,
}

impl Dispatcher {
    /// Creates the dispatcher and the receiving end the UI loop drains.
    pub fn new(
        runtime: Handle,
        api: CrmApi,
        identity: Option<Identity>,
    ) -> (Self, Receiver<Response>) {
        let (outbox, inbox) = mpsc::channel();
        let dispatcher = Self {
            runtime,
            api: Arc::new(api),
            identity,
            outbox,
            counter: Arc::new(AtomicU64::new(0)),
        };
        (dispatcher, inbox)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    pub fn api(&self) -> &CrmApi {
        &self.api
    }

    /// Starts a catalog fetch. Without an identity nothing is sent.
    pub fn fetch_catalog(&self, kind: LineKind) -> Result<Ticket, ApiError> {
        let identity = self.identity.clone().ok_or(ApiError::MissingIdentity)?;
        let api = Arc::clone(&self.api);
        Ok(self.spawn(async move {
            let entities = api.fetch_catalog(kind, &identity).await?;
            Ok(Payload::Catalog { kind, entities })
        }))
    }

    /// Starts a client search by name. Without an identity nothing is sent.
    pub fn search_clients(&self, name: &str) -> Result<Ticket, ApiError> {
        let identity = self.identity.clone().ok_or(ApiError::MissingIdentity)?;
        let api = Arc::clone(&self.api);
        let name = name.to_string();
        Ok(self.spawn(async move {
            let response = api.search_clients(&identity, &name).await?;
            Ok(Payload::Clients(response))
        }))
    }

    fn spawn<F>(&self, request: F) -> Ticket
    where
        F: Future<Output = Result<Payload, ApiError>> + Send + 'static,
    {
        let ticket = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let outbox = self.outbox.clone();
        self.runtime.spawn(async move {
            let result = request.await;
            if let Err(e) = &result {
                warn!(ticket, error = %e, "request failed");
            }
            if outbox.send(Response { ticket, result }).is_err() {
                info!(ticket, "response arrived after the UI shut down");
            }
        });
        ticket
    }
}

/// Latest outstanding ticket of one requester purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSlot {
    latest: Option<Ticket>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly issued ticket, superseding any earlier one.
    pub fn issue(&mut self, ticket: Ticket) {
        self.latest = Some(ticket);
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.latest
    }

    pub fn owns(&self, ticket: Ticket) -> bool {
        self.latest == Some(ticket)
    }

    /// True only for the response to the latest ticket, which settles the slot.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.owns(ticket) {
            self.latest = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn dispatcher(
        identity: Option<Identity>,
    ) -> (tokio::runtime::Runtime, Dispatcher, Receiver<Response>) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        // Port 9 (discard) on loopback refuses connections immediately.
        let api = CrmApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let (dispatcher, inbox) = Dispatcher::new(runtime.handle().clone(), api, identity);
        (runtime, dispatcher, inbox)
    }

    #[test]
    fn test_slot_accepts_only_latest_ticket() {
        let mut slot = RequestSlot::new();
        slot.issue(1);
        slot.issue(2);
        assert!(!slot.accept(1));
        assert!(slot.owns(2));
        assert!(slot.accept(2));
        assert_eq!(slot.pending(), None);
        assert!(!slot.accept(2));
    }

    #[test]
    fn test_missing_identity_issues_no_request() {
        let (_runtime, dispatcher, inbox) = dispatcher(None);
        assert!(matches!(
            dispatcher.fetch_catalog(LineKind::Medicine),
            Err(ApiError::MissingIdentity)
        ));
        assert!(matches!(
            dispatcher.search_clients("Jane"),
            Err(ApiError::MissingIdentity)
        ));
        assert!(inbox.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_tickets_increase_and_failures_are_delivered() {
        let (_runtime, dispatcher, inbox) = dispatcher(Identity::new("u1"));
        let first = dispatcher.fetch_catalog(LineKind::Procedure).unwrap();
        let second = dispatcher.search_clients("Jane").unwrap();
        assert!(second > first);

        let mut seen = Vec::new();
        for _ in 0..2 {
            let response = inbox.recv_timeout(Duration::from_secs(10)).unwrap();
            assert!(matches!(response.result, Err(ApiError::Transport(_))));
            seen.push(response.ticket);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![first, second]);
    }
}
