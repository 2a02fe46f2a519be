use serde::{Deserialize, Serialize};

/// One hospital in a recommendation result.
///
/// Ranking, distances and the accept probability are computed entirely by
/// the recommendation service; the client renders them as received. Bed
/// counts are expected to satisfy `er_beds <= total_er_beds` and
/// `icu_beds + trauma_icu_beds <= total_icu_beds`, but the contract is not
/// enforced here — rendering must survive a service that violates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedHospital {
    pub hospital_id: String,
    /// 1-based position within the result; unique per result, used as the
    /// detail-expansion key.
    pub rank: u32,
    pub hospital_name: String,
    pub hospital_phone: Option<String>,
    pub distance_km: f64,
    pub travel_time_min: f64,
    /// Service-computed admission likelihood in [0, 1]; opaque to the client.
    pub accept_prob: f64,
    pub er_beds: u32,
    pub total_er_beds: u32,
    pub icu_beds: u32,
    pub total_icu_beds: u32,
    pub trauma_icu_beds: u32,
    pub ct_available: bool,
    pub ventilator_available: bool,
}

impl RecommendedHospital {
    /// Accept probability as a percentage, for display.
    pub fn accept_percent(&self) -> f64 {
        self.accept_prob * 100.0
    }

    /// Fraction of ER beds available, guarding against a zero total.
    pub fn er_availability(&self) -> f64 {
        self.er_beds as f64 / self.total_er_beds.max(1) as f64
    }

    /// Fraction of ICU beds available, guarding against a zero total.
    pub fn icu_availability(&self) -> f64 {
        self.icu_beds as f64 / self.total_icu_beds.max(1) as f64
    }

    /// Fraction of trauma-ICU beds available (shares the ICU total).
    pub fn trauma_icu_availability(&self) -> f64 {
        self.trauma_icu_beds as f64 / self.total_icu_beds.max(1) as f64
    }
}

/// A complete recommendation result. Replaced wholesale on every fetch,
/// never merged with a previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HospitalRecommendationResponse {
    #[serde(default)]
    pub hospitals: Vec<RecommendedHospital>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(rank: u32) -> RecommendedHospital {
        RecommendedHospital {
            hospital_id: format!("h-{rank}"),
            rank,
            hospital_name: format!("General Hospital {rank}"),
            hospital_phone: Some("02-1234-5678".into()),
            distance_km: 3.2,
            travel_time_min: 12.5,
            accept_prob: 0.87,
            er_beds: 4,
            total_er_beds: 10,
            icu_beds: 2,
            total_icu_beds: 8,
            trauma_icu_beds: 1,
            ct_available: true,
            ventilator_available: false,
        }
    }

    #[test]
    fn accept_percent_scales_probability() {
        assert!((sample(1).accept_percent() - 87.0).abs() < 1e-9);
    }

    #[test]
    fn availability_ratios() {
        let h = sample(1);
        assert!((h.er_availability() - 0.4).abs() < 1e-9);
        assert!((h.icu_availability() - 0.25).abs() < 1e-9);
        assert!((h.trauma_icu_availability() - 0.125).abs() < 1e-9);
    }

    #[test]
    fn zero_totals_do_not_divide_by_zero() {
        let h = RecommendedHospital {
            total_er_beds: 0,
            total_icu_beds: 0,
            ..sample(1)
        };
        assert!((h.er_availability() - 4.0).abs() < 1e-9);
        assert!(h.icu_availability().is_finite());
        assert!(h.trauma_icu_availability().is_finite());
    }

    #[test]
    fn violated_bed_invariant_still_renders() {
        // er_beds > total_er_beds is a contract violation the client tolerates.
        let h = RecommendedHospital {
            er_beds: 12,
            total_er_beds: 10,
            ..sample(1)
        };
        assert!(h.er_availability() > 1.0);
    }

    #[test]
    fn optional_phone_may_be_missing() {
        let json = r#"{
            "hospital_id": "h-1", "rank": 1, "hospital_name": "City ER",
            "distance_km": 1.0, "travel_time_min": 5.0, "accept_prob": 0.5,
            "er_beds": 1, "total_er_beds": 2, "icu_beds": 0,
            "total_icu_beds": 1, "trauma_icu_beds": 0,
            "ct_available": true, "ventilator_available": true
        }"#;
        let h: RecommendedHospital = serde_json::from_str(json).unwrap();
        assert!(h.hospital_phone.is_none());
    }

    #[test]
    fn response_without_hospitals_key_is_empty() {
        let r: HospitalRecommendationResponse = serde_json::from_str("{}").unwrap();
        assert!(r.hospitals.is_empty());
    }

    #[test]
    fn response_preserves_service_ordering() {
        let r = HospitalRecommendationResponse {
            hospitals: vec![sample(1), sample(2), sample(3)],
        };
        let json = serde_json::to_string(&r).unwrap();
        let back: HospitalRecommendationResponse = serde_json::from_str(&json).unwrap();
        let ranks: Vec<u32> = back.hospitals.iter().map(|h| h.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }
}
