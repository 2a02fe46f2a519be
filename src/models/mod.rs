pub mod guidance;
pub mod hospital;
pub mod location;

pub use guidance::EmergencyGuidance;
pub use hospital::{HospitalRecommendationResponse, RecommendedHospital};
pub use location::UserLocation;
