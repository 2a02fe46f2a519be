//! Orchestration entry points — the event handlers the shell dispatches to.
//!
//! Each function drives one asynchronous leg of the flow: begin the fetch
//! against the session (which gates and hands out a generation ticket),
//! await the backend, settle the outcome. Errors never escape: both
//! fetchers convert failures to user-facing messages inside the session.

use crate::api_client::TriageApi;
use crate::session::{Session, SubmitError};

/// Submit the effective symptom: run the guidance lookup and open the
/// Guide screen on settlement, whatever the outcome was.
///
/// Returns the intake-side rejection (empty symptom, already in flight)
/// so the shell can re-prompt without any state transition.
pub async fn submit_symptom<A: TriageApi>(
    session: &mut Session,
    api: &A,
) -> Result<(), SubmitError> {
    let ticket = session.begin_guidance()?;
    tracing::info!(symptom = %ticket.symptom, "Requesting emergency guidance");

    let outcome = api
        .emergency_guidance(&ticket.symptom)
        .await
        .map_err(|e| e.to_string());
    session.settle_guidance(ticket.generation(), outcome);
    Ok(())
}

/// Run the hospital lookup if its inputs just became available.
///
/// Safe to call on every shell tick: it does nothing unless the session
/// has both a committed symptom and a position with no fetch started for
/// that pair. Returns whether a fetch ran.
pub async fn refresh_hospitals<A: TriageApi>(session: &mut Session, api: &A) -> bool {
    let Some(ticket) = session.begin_hospitals() else {
        return false;
    };
    tracing::info!(
        symptom = %ticket.symptom,
        latitude = ticket.location.latitude,
        longitude = ticket.location.longitude,
        "Requesting hospital recommendations"
    );

    let outcome = api
        .hospital_recommendations(
            &ticket.symptom,
            ticket.location.latitude,
            ticket.location.longitude,
        )
        .await
        .map_err(|e| e.to_string());
    session.settle_hospitals(ticket.generation(), outcome);
    true
}
