// tnep/src/service/registry.rs

use log::{debug, trace};

use crate::service::Service;
use crate::types::ServiceParam;
use crate::{Error, Result};

/// Table of registered services. Fixed after construction except for the
/// availability flags and advertised parameters rewritten by discovery.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: Vec<Service>,
}

impl ServiceRegistry {
    pub fn new(services: Vec<Service>) -> Result<Self> {
        if services.is_empty() {
            return Err(Error::InvalidArgument("service table is empty".into()));
        }
        Ok(Self { services })
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Service> {
        self.services.iter()
    }

    pub fn lookup(&self, index: usize) -> Result<&Service> {
        self.services
            .get(index)
            .ok_or(Error::NoSuchService { index })
    }

    pub fn lookup_mut(&mut self, index: usize) -> Result<&mut Service> {
        self.services
            .get_mut(index)
            .ok_or(Error::NoSuchService { index })
    }

    /// Index of the service registered under `uri`.
    pub fn position(&self, uri: &[u8]) -> Option<usize> {
        self.services.iter().position(|s| s.uri().as_bytes() == uri)
    }

    /// Start a discovery pass: nothing is available until re-advertised.
    pub fn begin_discovery(&mut self) {
        for svc in &mut self.services {
            svc.set_available(false);
        }
    }

    /// Mark the service advertised by `param` as available and take over
    /// its advertised parameters. Returns false for unknown URIs.
    pub fn mark_available(&mut self, param: &ServiceParam) -> bool {
        match self.position(param.uri.as_bytes()) {
            Some(idx) => {
                let svc = &mut self.services[idx];
                svc.set_available(true);
                svc.update_from(param);
                trace!("service {} available: {:?}", idx, param);
                true
            }
            None => {
                debug!("tag advertises unknown service {}", param.uri);
                false
            }
        }
    }

    /// Replace availability with exactly the advertised set.
    pub fn refresh(&mut self, advertised: &[ServiceParam]) -> usize {
        self.begin_discovery();
        advertised.iter().filter(|p| self.mark_available(p)).count()
    }

    pub fn mark_all_available(&mut self) {
        for svc in &mut self.services {
            svc.set_available(true);
        }
    }

    pub fn reset_availability(&mut self) {
        self.begin_discovery();
    }

    pub fn into_inner(self) -> Vec<Service> {
        self.services
    }
}
