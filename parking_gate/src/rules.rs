//! Entry and exit authorization rules.
//!
//! Pure reads over the [`Registry`]; nothing here mutates it. The gate
//! controller performs the reservation or release itself once a check passes.
//!
//! Entry requires: driver id and plate present, vehicle on the induction
//! loop, driver authorized, plate not already parked, a free slot.
//! Exit requires: plate present, vehicle on the induction loop, plate parked.

use parking_common::io::{DriverId, LicensePlate};

use crate::registry::Registry;

/// Why a vehicle was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    MissingDriverId,
    MissingLicensePlate,
    /// Inductive sensor not active.
    NoVehicle,
    UnauthorizedDriver,
    AlreadyParked,
    LotFull,
    NotParked,
}

impl Denial {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingDriverId => "no driver id read",
            Self::MissingLicensePlate => "no license plate read",
            Self::NoVehicle => "no vehicle on the induction loop",
            Self::UnauthorizedDriver => "driver not authorized",
            Self::AlreadyParked => "vehicle already parked",
            Self::LotFull => "lot at capacity",
            Self::NotParked => "vehicle not parked in this lot",
        }
    }
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check every entry condition, reporting the first that fails.
pub fn check_entry(
    registry: &Registry,
    driver_id: Option<&DriverId>,
    license_plate: Option<&LicensePlate>,
    inductive_sensor: bool,
) -> Result<(), Denial> {
    let driver_id = driver_id.ok_or(Denial::MissingDriverId)?;
    let license_plate = license_plate.ok_or(Denial::MissingLicensePlate)?;
    if !inductive_sensor {
        return Err(Denial::NoVehicle);
    }
    if !registry.is_authorized(driver_id) {
        return Err(Denial::UnauthorizedDriver);
    }
    if registry.is_parked(license_plate) {
        return Err(Denial::AlreadyParked);
    }
    if !registry.has_free_slot() {
        return Err(Denial::LotFull);
    }
    Ok(())
}

/// Check every exit condition, reporting the first that fails.
pub fn check_exit(
    registry: &Registry,
    license_plate: Option<&LicensePlate>,
    inductive_sensor: bool,
) -> Result<(), Denial> {
    let license_plate = license_plate.ok_or(Denial::MissingLicensePlate)?;
    if !inductive_sensor {
        return Err(Denial::NoVehicle);
    }
    if !registry.is_parked(license_plate) {
        return Err(Denial::NotParked);
    }
    Ok(())
}

/// Whether the vehicle may enter.
#[inline]
pub fn can_enter(
    registry: &Registry,
    driver_id: Option<&DriverId>,
    license_plate: Option<&LicensePlate>,
    inductive_sensor: bool,
) -> bool {
    check_entry(registry, driver_id, license_plate, inductive_sensor).is_ok()
}

/// Whether the vehicle may leave.
#[inline]
pub fn can_exit(
    registry: &Registry,
    license_plate: Option<&LicensePlate>,
    inductive_sensor: bool,
) -> bool {
    check_exit(registry, license_plate, inductive_sensor).is_ok()
}
