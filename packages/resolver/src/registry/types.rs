//! Profiles returned by the identity registries.
//!
//! Only the fields the resolution policy reads are typed; everything else the
//! registries send is kept in `details` and attached to the tree untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::INACTIVE_STATUS;

/// A unit in Enhetsregisteret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisasjonsnummer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navn: Option<String>,
    /// Date the unit was deleted from the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slettedato: Option<NaiveDate>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl CompanyProfile {
    pub fn is_dissolved(&self) -> bool {
        self.slettedato.is_some()
    }
}

/// Which profile the population registry should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileScope {
    /// Complete record including history.
    Full,
    /// Current name, address and contact status only.
    Light,
}

impl ProfileScope {
    pub fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }

    pub fn is_light(self) -> bool {
        matches!(self, Self::Light)
    }
}

/// A person in Folkeregisteret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kan_kontaktes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bostedsadresse: Option<ResidentialAddress>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl PersonProfile {
    pub fn is_inactive(&self) -> bool {
        self.status.as_deref() == Some(INACTIVE_STATUS)
    }

    /// Grading of the residential address; ungraded when absent.
    pub fn address_grading(&self) -> AddressGrading {
        self.bostedsadresse
            .as_ref()
            .and_then(|address| address.adressegradering.as_deref())
            .map(AddressGrading::parse)
            .unwrap_or(AddressGrading::Ugradert)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidentialAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adressegradering: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Confidentiality grading of a residential address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressGrading {
    Ugradert,
    Fortrolig,
    StrengtFortrolig,
    Klientadresse,
    /// A grading this crate does not know about.
    Other,
}

impl AddressGrading {
    pub fn parse(value: &str) -> Self {
        match value {
            "ugradert" => Self::Ugradert,
            "fortrolig" => Self::Fortrolig,
            "strengtFortrolig" => Self::StrengtFortrolig,
            "klientadresse" => Self::Klientadresse,
            _ => Self::Other,
        }
    }

    /// Gradings whose address must not reach downstream consumers.
    pub fn is_restricted(self) -> bool {
        matches!(
            self,
            Self::Fortrolig | Self::StrengtFortrolig | Self::Klientadresse
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_company_profile_keeps_unknown_fields() {
        let profile: CompanyProfile = serde_json::from_value(json!({
            "organisasjonsnummer": "912345678",
            "navn": "EKSEMPEL AS",
            "slettedato": "2021-03-01",
            "hjemmeside": "eksempel.no"
        }))
        .unwrap();

        assert!(profile.is_dissolved());
        assert_eq!(profile.details["hjemmeside"], json!("eksempel.no"));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["slettedato"], json!("2021-03-01"));
        assert_eq!(back["hjemmeside"], json!("eksempel.no"));
    }

    #[test]
    fn test_active_company() {
        let profile: CompanyProfile =
            serde_json::from_value(json!({ "organisasjonsnummer": "912345678" })).unwrap();
        assert!(!profile.is_dissolved());
    }

    #[test]
    fn test_person_profile_grading() {
        let profile: PersonProfile = serde_json::from_value(json!({
            "kanKontaktes": true,
            "status": "bosatt",
            "bostedsadresse": { "adressegradering": "strengtFortrolig", "kommunenummer": "3907" }
        }))
        .unwrap();

        assert_eq!(profile.kan_kontaktes, Some(true));
        assert!(!profile.is_inactive());
        assert_eq!(profile.address_grading(), AddressGrading::StrengtFortrolig);
        assert!(profile.address_grading().is_restricted());
    }

    #[test]
    fn test_missing_address_is_ungraded() {
        let profile = PersonProfile::default();
        assert_eq!(profile.address_grading(), AddressGrading::Ugradert);
        assert!(!profile.address_grading().is_restricted());
    }

    #[test]
    fn test_unknown_grading_is_not_restricted() {
        assert_eq!(AddressGrading::parse("hemmelig"), AddressGrading::Other);
        assert!(!AddressGrading::Other.is_restricted());
        assert!(AddressGrading::Klientadresse.is_restricted());
    }
}
