// src/simulation/mod.rs
//! Time-stepped state advanced once per frame
//!
//! The rocket flight is a closed-form curve rather than a physics model; the
//! frame clock supplies the deltas that drive it.

pub mod clock;
pub mod rocket;

pub use clock::FrameClock;
pub use rocket::{FlightPhase, RocketFlight, RocketPose};
