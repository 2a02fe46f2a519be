//! Session state machine — the single explicit state record of a triage
//! session.
//!
//! **Why this exists**: every piece of mutable session state (symptom
//! input, position, guidance, hospital list, detail expansion, active
//! screen) lives here and changes only through the named transitions below.
//! Renderers get `&Session`; nothing mutates ad hoc.
//!
//! **Supersession**: the fetch transitions are split into a `begin_*` step
//! that hands out a generation ticket and a `settle_*` step that applies an
//! outcome. A settlement whose generation is no longer current (a newer
//! request started, or the session was reset) is discarded instead of
//! overwriting fresher state.

use crate::guide::GuidanceContent;
use crate::models::{EmergencyGuidance, HospitalRecommendationResponse, RecommendedHospital, UserLocation};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Which screen is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Symptom entry — free text plus quick picks.
    Intake,
    /// Post-submission screen: guidance content + hospital recommendations.
    Guide,
}

/// Lifecycle of the guidance lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidancePhase {
    Idle,
    Loading,
    /// The lookup finished, successfully or not. `warning` carries the
    /// user-facing message when the fetch failed and content degraded to
    /// the generic procedure.
    Settled {
        content: GuidanceContent,
        warning: Option<String>,
    },
}

/// Lifecycle of the hospital recommendation lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum HospitalPhase {
    Idle,
    Loading,
    Ready(HospitalRecommendationResponse),
    Failed(String),
}

/// What the hospital section should render right now.
#[derive(Debug, PartialEq)]
pub enum HospitalSection<'a> {
    /// Inputs never became available — "no recommendation available".
    Unavailable,
    Loading,
    Error(&'a str),
    /// Service returned an empty list — "no hospitals to recommend".
    Empty,
    List(&'a [RecommendedHospital]),
}

/// Submission rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please describe the symptom first")]
    EmptySymptom,
    #[error("A guidance request is already in flight")]
    InFlight,
}

/// Ticket for an in-flight guidance lookup.
#[derive(Debug)]
pub struct GuidanceTicket {
    pub symptom: String,
    gen: u64,
}

impl GuidanceTicket {
    pub fn generation(&self) -> u64 {
        self.gen
    }
}

/// Ticket for an in-flight hospital lookup.
#[derive(Debug)]
pub struct HospitalTicket {
    pub symptom: String,
    pub location: UserLocation,
    gen: u64,
}

impl HospitalTicket {
    pub fn generation(&self) -> u64 {
        self.gen
    }
}

// ═══════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════

/// One triage session. Created at startup, lives until the program exits.
pub struct Session {
    view: ViewState,
    /// Free-text symptom entry.
    symptom_text: String,
    /// Last quick-pick selection (kept for intake highlighting).
    quick_pick: Option<String>,
    /// The symptom a submission committed to — the one fetches use.
    committed_symptom: Option<String>,
    /// Set at most once per session; never cleared by a reset.
    location: Option<UserLocation>,
    guidance: GuidancePhase,
    guidance_gen: u64,
    hospitals: HospitalPhase,
    hospital_gen: u64,
    /// Whether a hospital fetch has started for the current input pair.
    hospital_fetch_started: bool,
    /// At most one expanded detail panel, keyed by rank.
    expanded_rank: Option<u32>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            view: ViewState::Intake,
            symptom_text: String::new(),
            quick_pick: None,
            committed_symptom: None,
            location: None,
            guidance: GuidancePhase::Idle,
            guidance_gen: 0,
            hospitals: HospitalPhase::Idle,
            hospital_gen: 0,
            hospital_fetch_started: false,
            expanded_rank: None,
        }
    }

    // ── Read access ─────────────────────────────────────────

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn symptom_text(&self) -> &str {
        &self.symptom_text
    }

    pub fn quick_pick(&self) -> Option<&str> {
        self.quick_pick.as_deref()
    }

    pub fn committed_symptom(&self) -> Option<&str> {
        self.committed_symptom.as_deref()
    }

    pub fn location(&self) -> Option<&UserLocation> {
        self.location.as_ref()
    }

    pub fn guidance(&self) -> &GuidancePhase {
        &self.guidance
    }

    pub fn is_guidance_loading(&self) -> bool {
        matches!(self.guidance, GuidancePhase::Loading)
    }

    pub fn hospitals(&self) -> &HospitalPhase {
        &self.hospitals
    }

    pub fn expanded_rank(&self) -> Option<u32> {
        self.expanded_rank
    }

    /// The single active symptom string: free text wins over a quick pick;
    /// whitespace-only input counts as absent.
    pub fn effective_symptom(&self) -> Option<&str> {
        let typed = self.symptom_text.trim();
        if !typed.is_empty() {
            return Some(typed);
        }
        self.quick_pick.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// What the hospital area of the Guide screen should show.
    pub fn hospital_section(&self) -> HospitalSection<'_> {
        match &self.hospitals {
            HospitalPhase::Idle => HospitalSection::Unavailable,
            HospitalPhase::Loading => HospitalSection::Loading,
            HospitalPhase::Failed(message) => HospitalSection::Error(message),
            HospitalPhase::Ready(response) if response.hospitals.is_empty() => {
                HospitalSection::Empty
            }
            HospitalPhase::Ready(response) => HospitalSection::List(&response.hospitals),
        }
    }

    // ── Symptom input ───────────────────────────────────────

    pub fn set_symptom_text(&mut self, text: &str) {
        self.symptom_text = text.to_string();
    }

    /// Selecting a quick pick also overwrites the free text, mirroring the
    /// intake form: the pick becomes the effective symptom until the user
    /// types over it.
    pub fn pick_quick_symptom(&mut self, phrase: &str) {
        self.quick_pick = Some(phrase.to_string());
        self.symptom_text = phrase.to_string();
    }

    // ── Guidance lookup ─────────────────────────────────────

    /// Begin a guidance lookup for the effective symptom.
    ///
    /// Rejects an empty symptom (no transition, the caller re-prompts) and
    /// a second submission while one is pending (the intake screen disables
    /// resubmission; this guard backs that convention).
    pub fn begin_guidance(&mut self) -> Result<GuidanceTicket, SubmitError> {
        if self.is_guidance_loading() {
            return Err(SubmitError::InFlight);
        }
        let symptom = self
            .effective_symptom()
            .ok_or(SubmitError::EmptySymptom)?
            .to_string();

        self.guidance_gen += 1;
        self.guidance = GuidancePhase::Loading;
        self.committed_symptom = Some(symptom.clone());
        // New symptom — the hospital list must be fetched afresh.
        self.hospital_fetch_started = false;

        Ok(GuidanceTicket {
            symptom,
            gen: self.guidance_gen,
        })
    }

    /// Apply a guidance outcome. Success and failure both open the Guide
    /// screen; failure only changes what it shows (generic procedure plus a
    /// warning banner). Stale or superseded settlements are discarded.
    pub fn settle_guidance(
        &mut self,
        gen: u64,
        outcome: Result<EmergencyGuidance, String>,
    ) {
        if gen != self.guidance_gen || !self.is_guidance_loading() {
            tracing::debug!(gen, latest = self.guidance_gen, "Discarding stale guidance outcome");
            return;
        }

        let (content, warning) = match outcome {
            Ok(guidance) => (GuidanceContent::from_fetch(Some(guidance)), None),
            Err(message) => {
                tracing::warn!(%message, "Guidance lookup failed, showing default guidance");
                (GuidanceContent::Default, Some(message))
            }
        };

        self.guidance = GuidancePhase::Settled { content, warning };
        self.view = ViewState::Guide;
    }

    // ── Location ────────────────────────────────────────────

    /// Record the session's position fix. Set at most once; later fixes
    /// are ignored.
    pub fn resolve_location(&mut self, location: UserLocation) {
        if self.location.is_some() {
            tracing::debug!("Position already resolved for this session, ignoring new fix");
            return;
        }
        tracing::debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            "Session position resolved"
        );
        self.location = Some(location);
    }

    // ── Hospital lookup ─────────────────────────────────────

    /// Whether the next `begin_hospitals` call would start a fetch.
    pub fn hospital_fetch_ready(&self) -> bool {
        !self.hospital_fetch_started
            && self.committed_symptom.is_some()
            && self.location.is_some()
    }

    /// Start a hospital lookup when — and only when — both a committed
    /// symptom and a position are available and no fetch has started for
    /// this input pair. Returns `None` (and the section renders
    /// "no recommendation available") otherwise.
    pub fn begin_hospitals(&mut self) -> Option<HospitalTicket> {
        if self.hospital_fetch_started {
            return None;
        }
        let symptom = self.committed_symptom.clone()?;
        let location = self.location.clone()?;

        self.hospital_fetch_started = true;
        self.hospital_gen += 1;
        self.hospitals = HospitalPhase::Loading;

        Some(HospitalTicket {
            symptom,
            location,
            gen: self.hospital_gen,
        })
    }

    /// Apply a hospital lookup outcome. The previous result is replaced
    /// wholesale; expansion state resets with it because ranks are scoped
    /// to a single result set. No fallback list is fabricated on failure.
    pub fn settle_hospitals(
        &mut self,
        gen: u64,
        outcome: Result<HospitalRecommendationResponse, String>,
    ) {
        if gen != self.hospital_gen || !matches!(self.hospitals, HospitalPhase::Loading) {
            tracing::debug!(gen, latest = self.hospital_gen, "Discarding stale hospital outcome");
            return;
        }

        self.hospitals = match outcome {
            Ok(response) => {
                tracing::debug!(count = response.hospitals.len(), "Hospital recommendations ready");
                HospitalPhase::Ready(response)
            }
            Err(message) => {
                tracing::warn!(%message, "Hospital lookup failed");
                HospitalPhase::Failed(message)
            }
        };
        self.expanded_rank = None;
    }

    // ── Detail expansion ────────────────────────────────────

    /// Accordion toggle: expanding a rank collapses whichever panel was
    /// open; toggling the open rank collapses it.
    pub fn toggle_hospital(&mut self, rank: u32) {
        self.expanded_rank = if self.expanded_rank == Some(rank) {
            None
        } else {
            Some(rank)
        };
    }

    // ── Screen transitions ──────────────────────────────────

    /// "New symptom": back to intake with everything cleared except the
    /// position fix, which lives for the whole session.
    pub fn start_new_symptom(&mut self) {
        self.view = ViewState::Intake;
        self.symptom_text.clear();
        self.quick_pick = None;
        self.committed_symptom = None;
        self.guidance = GuidancePhase::Idle;
        self.hospitals = HospitalPhase::Idle;
        self.hospital_fetch_started = false;
        self.expanded_rank = None;
    }

    /// Optional embedding hook: leave the Guide screen without clearing
    /// anything. The reset flow above does not use it.
    pub fn close_guide(&mut self) {
        self.view = ViewState::Intake;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
