//! Entity variants, enrichment records and the contact policy derived from them.

use crate::config::{LEGAL_ENTITY_VARIANT, NATURAL_PERSON_VARIANT};
use crate::registry::{CompanyProfile, PersonProfile};

/// Variants that trigger a registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityVariant {
    /// `JuridiskPerson`, looked up in the business registry.
    LegalEntity,
    /// `FysiskPerson`, looked up in the population registry.
    NaturalPerson,
}

impl EntityVariant {
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            LEGAL_ENTITY_VARIANT => Some(Self::LegalEntity),
            NATURAL_PERSON_VARIANT => Some(Self::NaturalPerson),
            _ => None,
        }
    }
}

/// Business registry answer for one organization number.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalEntityRecord {
    pub profile: Option<CompanyProfile>,
    /// Deleted from the registry, or not registered at all.
    pub dissolved: bool,
}

impl LegalEntityRecord {
    pub fn from_lookup(profile: Option<CompanyProfile>) -> Self {
        let dissolved = profile.as_ref().map_or(true, CompanyProfile::is_dissolved);
        Self { profile, dissolved }
    }
}

/// How a person may be contacted based on their population registry profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPolicy {
    Contactable,
    /// The person has opted out of contact.
    CannotContact,
    /// Active person with a confidential residential address.
    ConfidentialAddress,
    /// Person registered with an identity number that is no longer active.
    InactiveSubject,
    /// No profile, or the profile does not say.
    Unknown,
}

impl ContactPolicy {
    pub fn for_profile(profile: &PersonProfile) -> Self {
        match profile.kan_kontaktes {
            Some(false) => Self::CannotContact,
            Some(true) if profile.is_inactive() => Self::InactiveSubject,
            Some(true) if profile.address_grading().is_restricted() => Self::ConfidentialAddress,
            Some(true) => Self::Contactable,
            None => Self::Unknown,
        }
    }

    pub fn requires_manual_handling(self) -> bool {
        matches!(self, Self::ConfidentialAddress | Self::InactiveSubject)
    }

    /// Only confidential addresses are removed; inactive subjects keep theirs.
    pub fn suppresses_address(self) -> bool {
        matches!(self, Self::ConfidentialAddress)
    }
}

/// Population registry answer for one national identity number.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    pub profile: Option<PersonProfile>,
    pub contactable: Option<bool>,
    pub policy: ContactPolicy,
    pub must_handle_manually: bool,
}

impl PersonRecord {
    pub fn from_lookup(profile: Option<PersonProfile>) -> Self {
        let policy = profile
            .as_ref()
            .map(ContactPolicy::for_profile)
            .unwrap_or(ContactPolicy::Unknown);
        Self {
            contactable: profile.as_ref().and_then(|p| p.kan_kontaktes),
            must_handle_manually: policy.requires_manual_handling(),
            policy,
            profile,
        }
    }
}
