#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core ride domain types shared across the rideway system.
//!
//! This crate defines the canonical closed enums (ride status, driver
//! status, vehicle type, payment mode/status, account role), the ride
//! status transition table that every mutating operation consults, and
//! the fare/route-estimation policy used when creating rides.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lifecycle status of a ride.
///
/// Legal transitions form a straight line with an escape hatch:
/// `Requested → Accepted → Ongoing → Completed`, and `Cancelled` is
/// reachable from any non-terminal state. `Completed` and `Cancelled`
/// are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RideStatus {
    /// Passenger has requested the ride; no driver confirmation yet.
    Requested,
    /// Assigned driver has accepted the ride.
    Accepted,
    /// Ride is in progress.
    Ongoing,
    /// Ride finished normally. Terminal.
    Completed,
    /// Ride was cancelled before completion. Terminal.
    Cancelled,
}

impl RideStatus {
    /// Returns `true` if no further transition is permitted out of this
    /// status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` if moving from this status to `next` is a legal
    /// transition.
    ///
    /// This is the single source of truth for ride state integrity;
    /// every status-mutating operation checks it before writing.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Requested => matches!(next, Self::Accepted | Self::Cancelled),
            Self::Accepted => matches!(next, Self::Ongoing | Self::Cancelled),
            Self::Ongoing => matches!(next, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => false,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Requested,
            Self::Accepted,
            Self::Ongoing,
            Self::Completed,
            Self::Cancelled,
        ]
    }
}

/// Availability status of a driver.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DriverStatus {
    /// Eligible for new ride assignments.
    Active,
    /// Temporarily not taking rides.
    Inactive,
    /// Blocked by an operator; not assignable.
    Suspended,
}

impl DriverStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Active, Self::Inactive, Self::Suspended]
    }
}

/// Category of vehicle a driver registers and a passenger can request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum VehicleType {
    Car,
    Bike,
    Auto,
    #[serde(rename = "SUV")]
    #[strum(serialize = "SUV")]
    Suv,
    Luxury,
}

impl VehicleType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Car, Self::Bike, Self::Auto, Self::Suv, Self::Luxury]
    }
}

/// How a payment was made.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PaymentMode {
    Cash,
    Card,
    #[serde(rename = "UPI")]
    #[strum(serialize = "UPI")]
    Upi,
    Wallet,
}

impl PaymentMode {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Cash, Self::Card, Self::Upi, Self::Wallet]
    }
}

/// Settlement state of a payment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PaymentStatus {
    Pending,
    Successful,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Returns `true` if a refund may be applied to a payment in this
    /// status. Only settled payments can be refunded, and only once.
    #[must_use]
    pub const fn refundable(self) -> bool {
        matches!(self, Self::Successful)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pending, Self::Successful, Self::Failed, Self::Refunded]
    }
}

/// Which account table an authenticated identity belongs to.
///
/// Serialized in lowercase to match the `userType` discriminator the
/// API accepts at registration and embeds in session tokens.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AccountRole {
    Passenger,
    Driver,
}

impl AccountRole {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Passenger, Self::Driver]
    }
}

/// Flat-rate fare schedule applied to passenger-requested rides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarePolicy {
    /// Fixed amount charged on every ride.
    pub base_fare: f64,
    /// Amount charged per kilometre of route distance.
    pub per_km_rate: f64,
}

impl FarePolicy {
    /// The production fare schedule: 50 base + 10 per km.
    pub const DEFAULT: Self = Self {
        base_fare: 50.0,
        per_km_rate: 10.0,
    };

    /// Computes the fare for a route of the given distance.
    #[must_use]
    pub fn fare(&self, distance_km: f64) -> f64 {
        self.base_fare + self.per_km_rate * distance_km
    }
}

impl Default for FarePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Distance and duration estimate for a route between two addresses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    /// Estimated driving distance in kilometres.
    pub distance_km: f64,
    /// Estimated driving time in minutes.
    pub duration_min: i64,
}

/// Produces a distance/duration estimate for a route.
///
/// No mapping service is integrated; the production implementation is
/// [`FixedRouteEstimator`], which returns the same constants for every
/// pair of addresses. The seam exists so a real estimator can be
/// plugged in without touching ride creation.
pub trait RouteEstimator: Send + Sync {
    /// Estimates distance and duration between two free-text addresses.
    fn estimate(&self, start_point: &str, end_point: &str) -> RouteEstimate;
}

/// Estimator that returns a fixed placeholder estimate for every route.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRouteEstimator;

impl FixedRouteEstimator {
    /// Placeholder distance applied to every route, in kilometres.
    pub const DISTANCE_KM: f64 = 10.0;
    /// Placeholder duration applied to every route, in minutes.
    pub const DURATION_MIN: i64 = 20;
}

impl RouteEstimator for FixedRouteEstimator {
    fn estimate(&self, _start_point: &str, _end_point: &str) -> RouteEstimate {
        RouteEstimate {
            distance_km: Self::DISTANCE_KM,
            duration_min: Self::DURATION_MIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn forward_transitions_are_legal() {
        assert!(RideStatus::Requested.can_transition_to(RideStatus::Accepted));
        assert!(RideStatus::Accepted.can_transition_to(RideStatus::Ongoing));
        assert!(RideStatus::Ongoing.can_transition_to(RideStatus::Completed));
    }

    #[test]
    fn cancel_is_legal_from_any_non_terminal_status() {
        for status in RideStatus::all() {
            let legal = status.can_transition_to(RideStatus::Cancelled);
            assert_eq!(
                legal,
                !status.is_terminal(),
                "{status:?} → Cancelled legality mismatch"
            );
        }
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for from in [RideStatus::Completed, RideStatus::Cancelled] {
            for to in RideStatus::all() {
                assert!(
                    !from.can_transition_to(*to),
                    "{from:?} → {to:?} should be illegal"
                );
            }
        }
    }

    #[test]
    fn skipping_states_is_illegal() {
        assert!(!RideStatus::Requested.can_transition_to(RideStatus::Ongoing));
        assert!(!RideStatus::Requested.can_transition_to(RideStatus::Completed));
        assert!(!RideStatus::Accepted.can_transition_to(RideStatus::Completed));
        assert!(!RideStatus::Ongoing.can_transition_to(RideStatus::Accepted));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            RideStatus::from_str("ongoing").unwrap(),
            RideStatus::Ongoing
        );
        assert_eq!(
            RideStatus::from_str("Completed").unwrap(),
            RideStatus::Completed
        );
        assert!(RideStatus::from_str("teleported").is_err());
    }

    #[test]
    fn vehicle_type_uses_canonical_strings() {
        assert_eq!(VehicleType::Suv.as_ref(), "SUV");
        assert_eq!(VehicleType::from_str("suv").unwrap(), VehicleType::Suv);
        assert_eq!(VehicleType::Car.to_string(), "Car");
    }

    #[test]
    fn payment_mode_upi_round_trips() {
        assert_eq!(PaymentMode::Upi.as_ref(), "UPI");
        assert_eq!(PaymentMode::from_str("upi").unwrap(), PaymentMode::Upi);
    }

    #[test]
    fn only_successful_payments_are_refundable() {
        for status in PaymentStatus::all() {
            assert_eq!(
                status.refundable(),
                *status == PaymentStatus::Successful,
                "{status:?} refundability mismatch"
            );
        }
    }

    #[test]
    fn account_role_serializes_lowercase() {
        assert_eq!(AccountRole::Passenger.to_string(), "passenger");
        assert_eq!(
            AccountRole::from_str("Driver").unwrap(),
            AccountRole::Driver
        );
    }

    #[test]
    fn default_fare_matches_schedule() {
        let policy = FarePolicy::DEFAULT;
        assert!((policy.fare(10.0) - 150.0).abs() < f64::EPSILON);
        assert!((policy.fare(0.0) - 50.0).abs() < f64::EPSILON);
        // Each additional km costs exactly the per-km rate.
        let delta = policy.fare(11.0) - policy.fare(10.0);
        assert!((delta - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fixed_estimator_ignores_addresses() {
        let estimator = FixedRouteEstimator;
        let a = estimator.estimate("Connaught Place", "Nehru Place");
        let b = estimator.estimate("Bandra West", "Powai");
        assert!((a.distance_km - 10.0).abs() < f64::EPSILON);
        assert_eq!(a.duration_min, 20);
        assert!((a.distance_km - b.distance_km).abs() < f64::EPSILON);
    }
}
