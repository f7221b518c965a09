//! `idle -> loading -> (success | error)` lifecycle for one kind of user-triggered fetch.
//!
//! Every `begin` hands out a [`Ticket`]. Only the ticket of the fetch currently in
//! flight may settle the machine; anything else is a late response and is dropped,
//! which is how a closed modal ignores a detail fetch that resolves afterwards.

use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct FetchMachine<T> {
    state: FetchState<T>,
    generation: u64,
}

impl<T> Default for FetchMachine<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Idle,
            generation: 0,
        }
    }
}

impl<T> FetchMachine<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            FetchState::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Starts a new fetch from any state. Earlier tickets stop being accepted.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = FetchState::Loading;
        Ticket(self.generation)
    }

    pub fn resolve(&mut self, ticket: Ticket, value: T) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state = FetchState::Success(value);
        true
    }

    pub fn fail(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state = FetchState::Error(message.into());
        true
    }

    /// Back to `Idle`; a fetch still in flight will be ignored when it lands.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.state = FetchState::Idle;
    }

    fn accepts(&self, ticket: Ticket) -> bool {
        let current = self.is_loading() && ticket.0 == self.generation;
        if !current {
            debug!("Discarding stale fetch result (ticket {})", ticket.0);
        }
        current
    }
}
