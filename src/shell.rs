//! Terminal shell — the thin view layer over the session.
//!
//! Renders the active screen and forwards user events to the session and
//! the flow entry points; no orchestration logic lives here. The position
//! fix is acquired once by a background task at startup and delivered over
//! a oneshot channel, so intake never blocks on geolocation.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;

use crate::api_client::TriageApi;
use crate::flow;
use crate::guide::{CALL_EMERGENCY_LINE, DEFAULT_PROCEDURE, QUICK_SYMPTOMS};
use crate::location::{EnvPositionSource, LocationService};
use crate::models::{RecommendedHospital, UserLocation};
use crate::session::{GuidancePhase, HospitalSection, Session, ViewState};

/// Run the interactive shell until the user quits or stdin closes.
pub async fn run_shell<A: TriageApi>(api: A) -> std::io::Result<()> {
    let mut session = Session::new();
    let mut location_rx = Some(spawn_location_task());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        poll_location(&mut session, &mut location_rx);

        match session.view() {
            ViewState::Intake => render_intake(&session),
            ViewState::Guide => {
                if session.hospital_fetch_ready() {
                    println!("Loading hospital recommendations...");
                }
                flow::refresh_hospitals(&mut session, &api).await;
                render_guide(&session);
            }
        }

        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim().to_string();

        match session.view() {
            ViewState::Intake => {
                if !handle_intake_input(&mut session, &api, &input).await {
                    break;
                }
            }
            ViewState::Guide => {
                if !handle_guide_input(&mut session, &input) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns false when the user asked to quit.
async fn handle_intake_input<A: TriageApi>(
    session: &mut Session,
    api: &A,
    input: &str,
) -> bool {
    match input {
        "q" | "quit" => return false,
        "go" | "" => {
            println!("Looking up emergency guidance for the patient...");
            if let Err(e) = flow::submit_symptom(session, api).await {
                println!("{e}.");
            }
        }
        pick if pick.len() == 1 && pick.chars().all(|c| c.is_ascii_digit()) => {
            let index: usize = pick.parse().unwrap_or(0);
            match index.checked_sub(1).and_then(|i| QUICK_SYMPTOMS.get(i)) {
                Some(phrase) => session.pick_quick_symptom(phrase),
                None => println!("No quick pick numbered {pick}."),
            }
        }
        text => session.set_symptom_text(text),
    }
    true
}

/// Returns false when the user asked to quit.
fn handle_guide_input(session: &mut Session, input: &str) -> bool {
    match input {
        "q" | "quit" => return false,
        "n" | "new" => session.start_new_symptom(),
        "b" | "back" => session.close_guide(),
        "" => {} // re-render; picks up a late position fix
        other => match other.parse::<u32>() {
            Ok(rank) => session.toggle_hospital(rank),
            Err(_) => println!("Enter a rank number, 'n' for a new symptom, or 'q' to quit."),
        },
    }
    true
}

// ── Location task ───────────────────────────────────────────

fn spawn_location_task() -> oneshot::Receiver<UserLocation> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let mut service = LocationService::new(EnvPositionSource);
        if let Some(location) = service.acquire().await {
            let _ = tx.send(location);
        }
    });
    rx
}

/// Apply the startup fix to the session once it arrives. The channel is
/// dropped after first delivery or failure; no retry.
fn poll_location(session: &mut Session, rx: &mut Option<oneshot::Receiver<UserLocation>>) {
    if let Some(receiver) = rx {
        match receiver.try_recv() {
            Ok(location) => {
                session.resolve_location(location);
                *rx = None;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => *rx = None,
        }
    }
}

// ── Rendering ───────────────────────────────────────────────

fn render_intake(session: &Session) {
    println!();
    println!("=== Emergency ===");
    println!("Tell us what is happening.");
    println!();
    if session.symptom_text().is_empty() {
        println!("Symptom: (none yet — type a description)");
    } else {
        println!("Symptom: {}", session.symptom_text());
    }
    println!();
    println!("Quick picks:");
    for (i, phrase) in QUICK_SYMPTOMS.iter().enumerate() {
        let marker = if session.quick_pick() == Some(phrase) { "*" } else { " " };
        println!("  [{}]{marker} {phrase}", i + 1);
    }
    println!();
    println!("Type a symptom, pick 1-6, 'go' to continue, 'q' to quit.");
}

fn render_guide(session: &Session) {
    println!();
    println!("=== Emergency guide ===");
    println!(
        "Reported symptom: {}",
        session.committed_symptom().unwrap_or("(none)")
    );
    println!();

    if let GuidancePhase::Settled { content, warning } = session.guidance() {
        if let Some(message) = warning {
            println!("! Couldn't load the emergency guide: {message}");
            println!("  Showing default guidance instead.");
            println!();
        }

        match content.fetched() {
            Some(guidance) => {
                if let Some(summary) = &guidance.situation_summary {
                    println!("Situation: {summary}");
                    println!();
                }
                println!("Do this now:");
                match guidance.immediate_actions.as_deref() {
                    Some(actions) if !actions.is_empty() => {
                        for action in actions {
                            println!("  - {action}");
                        }
                    }
                    _ => println!("  - {CALL_EMERGENCY_LINE}"),
                }
                if let Some(avoid) = guidance.do_not_do.as_deref() {
                    if !avoid.is_empty() {
                        println!();
                        println!("Do NOT:");
                        for item in avoid {
                            println!("  x {item}");
                        }
                    }
                }
            }
            None => {
                println!("General emergency procedure:");
                for (i, step) in DEFAULT_PROCEDURE.iter().enumerate() {
                    println!("  {}. {step}", i + 1);
                }
            }
        }
    }

    println!();
    println!("--- Recommended hospitals ---");
    match session.hospital_section() {
        HospitalSection::Unavailable => {
            println!("No recommendation available (no position fix for this session).");
        }
        HospitalSection::Loading => println!("Loading hospital information..."),
        HospitalSection::Error(message) => {
            println!("! Couldn't load hospital recommendations: {message}");
        }
        HospitalSection::Empty => println!("No hospitals to recommend."),
        HospitalSection::List(hospitals) => {
            for hospital in hospitals {
                render_hospital(hospital, session.expanded_rank() == Some(hospital.rank));
            }
        }
    }
    println!();
    println!("Rank number toggles detail, 'n' = new symptom, 'b' = back, 'q' = quit.");
}

fn render_hospital(h: &RecommendedHospital, expanded: bool) {
    println!();
    println!("#{} {}", h.rank, h.hospital_name);
    print!(
        "    {:.2} km, about {:.1} min",
        h.distance_km, h.travel_time_min
    );
    if let Some(phone) = &h.hospital_phone {
        print!(", tel {phone}");
    }
    println!();

    if !expanded {
        return;
    }

    println!("    Accept probability: {:>5.1}%  {}", h.accept_percent(), bar(h.accept_prob));
    println!("    ER beds:  {:>3} of {}", h.er_beds, h.total_er_beds);
    println!("    ICU beds: {:>3} of {}", h.icu_beds, h.total_icu_beds);
    if h.trauma_icu_beds > 0 {
        println!("    Trauma ICU beds: {}", h.trauma_icu_beds);
    }
    println!(
        "    CT: {}   Ventilator: {}",
        availability(h.ct_available),
        availability(h.ventilator_available)
    );
}

/// A fixed-width text gauge for a fraction. Out-of-range input only
/// saturates the gauge; the printed number is the service's own.
fn bar(fraction: f64) -> String {
    const WIDTH: usize = 20;
    let filled = (fraction.clamp(0.0, 1.0) * WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "not available"
    }
}
