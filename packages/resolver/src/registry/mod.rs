//! Identity registry clients.
//!
//! The resolvers talk to the business registry (Brreg) and the population
//! registry (Freg) through the [`BusinessRegistry`] and [`PopulationRegistry`]
//! traits so passes can be tested without network access.

mod client;
mod types;

pub use client::{BrregClient, BusinessRegistry, FregClient, PopulationRegistry};
pub use types::{AddressGrading, CompanyProfile, PersonProfile, ProfileScope, ResidentialAddress};

/// Test utilities for the registry clients.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use crate::error::RegistryError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock business registry with canned profiles and a call counter.
    #[derive(Default)]
    pub struct MockBusinessRegistry {
        profiles: HashMap<String, CompanyProfile>,
        failing: bool,
        calls: AtomicUsize,
    }

    impl MockBusinessRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        /// A registry whose every lookup fails with a 503.
        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        pub fn with_company(mut self, org_number: &str, profile: CompanyProfile) -> Self {
            self.profiles.insert(org_number.to_string(), profile);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BusinessRegistry for MockBusinessRegistry {
        async fn lookup_by_org_number(
            &self,
            org_number: &str,
        ) -> Result<Option<CompanyProfile>, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(RegistryError::Status {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }
            Ok(self.profiles.get(org_number).cloned())
        }
    }

    /// Mock population registry with canned profiles and a call counter.
    #[derive(Default)]
    pub struct MockPopulationRegistry {
        profiles: HashMap<String, PersonProfile>,
        failing: bool,
        calls: AtomicUsize,
    }

    impl MockPopulationRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        pub fn with_person(mut self, ssn: &str, profile: PersonProfile) -> Self {
            self.profiles.insert(ssn.to_string(), profile);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PopulationRegistry for MockPopulationRegistry {
        async fn lookup_by_ssn(
            &self,
            ssn: &str,
            _scope: ProfileScope,
        ) -> Result<Option<PersonProfile>, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(RegistryError::Status {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }
            Ok(self.profiles.get(ssn).cloned())
        }
    }
}
