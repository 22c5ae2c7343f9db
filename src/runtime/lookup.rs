//! Reservation desk used when no real booking system is wired up

use super::traits::ReservationLookup;
use crate::state_machine::Reservation;
use async_trait::async_trait;

/// Answers every well-formed code with the same confirmed flight
#[derive(Debug, Clone)]
pub struct StaticReservationDesk {
    pub flight_id: String,
    pub status: String,
    pub route: String,
}

impl Default for StaticReservationDesk {
    fn default() -> Self {
        Self {
            flight_id: "HS123".to_string(),
            status: "Confirmed".to_string(),
            route: "Pune → Mumbai".to_string(),
        }
    }
}

#[async_trait]
impl ReservationLookup for StaticReservationDesk {
    async fn lookup(&self, code: &str) -> Option<Reservation> {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Reservation {
            pnr: code.to_string(),
            flight_id: self.flight_id.clone(),
            status: self.status.clone(),
            route: self.route.clone(),
        })
    }
}
