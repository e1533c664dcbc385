//! Validation of the gradual place hierarchy.
//!
//! Levels run country → state/region → settlement → name → street → house.
//! A place may stop at any level. A settlement needs a region, a street needs
//! a settlement and a house needs a street. The waiver flags are optional
//! assertions that a level is absent.

use std::fmt;

use thiserror::Error;
use visit_types::{api::NewPlace, models::Address};

use crate::country;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    StateOrRegion,
    Settlement,
    Name,
    Street,
    House,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StateOrRegion => "stateOrRegion",
            Self::Settlement => "settlement",
            Self::Name => "name",
            Self::Street => "street",
            Self::House => "house",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Invalidation {
    #[error("Invalid country")]
    Country,
    #[error("{0} is both set and waived")]
    Contradiction(Level),
    #[error("Data must be gradual: {0} is set below an unset level")]
    NotGradual(Level),
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_waiver(level: Level, value: &Option<String>, waived: bool) -> Result<(), Invalidation> {
    if waived && value.is_some() {
        Err(Invalidation::Contradiction(level))
    } else {
        Ok(())
    }
}

/// Checks a submitted place and returns its normalized address.
pub fn validate(place: NewPlace) -> Result<Address, Invalidation> {
    let country = place.country.trim();
    if !country::is_known(country) {
        return Err(Invalidation::Country);
    }

    let address = Address {
        country: country.to_string(),
        state_or_region: normalize(place.state_or_region),
        settlement: normalize(place.settlement),
        name: normalize(place.name),
        street: normalize(place.street),
        house: normalize(place.house),
    };

    check_waiver(
        Level::StateOrRegion,
        &address.state_or_region,
        place.no_state_region,
    )?;
    check_waiver(Level::Settlement, &address.settlement, place.no_settlement)?;
    check_waiver(Level::Name, &address.name, place.omit_name)?;

    if address.settlement.is_some() && address.state_or_region.is_none() {
        return Err(Invalidation::NotGradual(Level::Settlement));
    }
    if address.street.is_some() && address.settlement.is_none() {
        return Err(Invalidation::NotGradual(Level::Street));
    }
    if address.house.is_some() && address.street.is_none() {
        return Err(Invalidation::NotGradual(Level::House));
    }

    Ok(address)
}
