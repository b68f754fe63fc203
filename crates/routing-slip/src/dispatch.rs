use tracing::error;

use crate::error::DispatchError;
use crate::host::{Acceptance, ActivityHost, Handled};
use crate::slip::RoutingSlip;

/// Ordered list of hosts that an arriving slip is offered to.
///
/// Hosts are tried in registration order and the first one that claims the
/// address processes the slip.
#[derive(Debug, Default)]
pub struct HostDispatcher {
    hosts: Vec<ActivityHost>,
}

impl HostDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_host(mut self, host: ActivityHost) -> Self {
        self.hosts.push(host);
        self
    }

    pub fn push(&mut self, host: ActivityHost) {
        self.hosts.push(host);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hand `slip` to the first host that claims `address`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Undeliverable` with the slip if no host claims
    /// the address, or `DispatchError::Host` if the claiming host failed.
    pub fn dispatch(&self, address: &str, slip: RoutingSlip) -> Result<Handled, DispatchError> {
        let mut slip = slip;
        for host in &self.hosts {
            match host.accept_message(address, slip)? {
                Acceptance::Handled(handled) => return Ok(handled),
                Acceptance::Declined(returned) => slip = returned,
            }
        }

        error!(address, "no host accepts address");
        Err(DispatchError::Undeliverable {
            address: address.to_string(),
            slip: Box::new(slip),
        })
    }
}
