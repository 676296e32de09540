//! Binding of prediction responses to display state

use std::cmp::Ordering;

use sohmon_core::{HealthStatus, PredictionResponse};

/// Fixed five-decimal rendering for importance weights
pub fn format_weight(weight: f64) -> String {
    format!("{weight:.5}")
}

/// One fully applied prediction, derived from one service response
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub soh: f64,
    pub status: HealthStatus,
    /// Status string exactly as the service sent it
    pub raw_status: String,
    metrics: Vec<(String, f64)>,
    importance: Vec<(String, f64)>,
}

impl PredictionOutcome {
    fn from_response(response: PredictionResponse) -> Self {
        Self {
            soh: response.soh,
            status: HealthStatus::from_label(&response.status),
            raw_status: response.status,
            metrics: response.metrics,
            importance: response.importance,
        }
    }

    /// SOH magnitude for display, three decimals
    pub fn soh_display(&self) -> String {
        format!("{:.3}", self.soh)
    }

    /// All metric entries in the order the service sent them, unfiltered
    pub fn metrics_summary(&self) -> &[(String, f64)] {
        &self.metrics
    }

    /// The `k` importance entries with the largest absolute weight. Ties
    /// keep their received order. Weights render with [`format_weight`].
    pub fn top_importances(&self, k: usize) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .importance
            .iter()
            .map(|(name, weight)| (name.as_str(), *weight))
            .collect();
        // sort_by is stable, so equal weights stay in wire order
        entries.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(Ordering::Equal)
        });
        entries.truncate(k);
        entries
    }
}

/// Holds the latest applied prediction; explicitly empty until the first
/// successful response.
#[derive(Debug, Clone, Default)]
pub struct PredictionResultView {
    current: Option<PredictionOutcome>,
    last_seq: u64,
}

impl PredictionResultView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the response for submission `seq`. The stored outcome is
    /// replaced in one step, and a response that is not newer than the last
    /// applied one is discarded so a slow reply can never overwrite a
    /// fresher prediction. Returns whether the response was applied.
    pub fn on_prediction_response(&mut self, seq: u64, response: PredictionResponse) -> bool {
        if seq <= self.last_seq {
            return false;
        }
        self.last_seq = seq;
        self.current = Some(PredictionOutcome::from_response(response));
        true
    }

    /// Latest outcome; `None` until the first successful response
    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(
        soh: f64,
        status: &str,
        importance: Vec<(&str, f64)>,
    ) -> PredictionResponse {
        PredictionResponse {
            soh,
            status: status.to_string(),
            metrics: vec![("accuracy".to_string(), 0.95)],
            importance: importance
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    #[test]
    fn test_no_data_before_first_response() {
        let view = PredictionResultView::new();
        assert!(view.outcome().is_none());
    }

    #[test]
    fn test_status_is_taken_verbatim() {
        let mut view = PredictionResultView::new();
        view.on_prediction_response(1, response(0.91, "Healthy", vec![]));
        assert_eq!(view.outcome().unwrap().status, HealthStatus::Healthy);

        // Even a high score does not override the service's own label
        view.on_prediction_response(2, response(0.99, "Degraded", vec![]));
        let outcome = view.outcome().unwrap();
        assert_eq!(outcome.status, HealthStatus::Unhealthy);
        assert_eq!(outcome.raw_status, "Degraded");
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut view = PredictionResultView::new();
        assert!(view.on_prediction_response(2, response(0.8, "Healthy", vec![])));
        // A reply from an older submission arrives late
        assert!(!view.on_prediction_response(1, response(0.2, "Unhealthy", vec![])));
        assert_eq!(view.outcome().unwrap().soh, 0.8);
        // Replays of the same sequence are ignored too
        assert!(!view.on_prediction_response(2, response(0.3, "Unhealthy", vec![])));
    }

    #[test]
    fn test_replacement_is_wholesale() {
        let mut view = PredictionResultView::new();
        view.on_prediction_response(1, response(0.9, "Healthy", vec![("U1", 0.5)]));
        view.on_prediction_response(2, response(0.4, "Unhealthy", vec![]));

        let outcome = view.outcome().unwrap();
        assert_eq!(outcome.soh, 0.4);
        // No merging: importances from the first response are gone
        assert!(outcome.top_importances(10).is_empty());
    }

    #[test]
    fn test_top_importances_orders_by_absolute_weight() {
        let mut view = PredictionResultView::new();
        view.on_prediction_response(
            1,
            response(
                0.9,
                "Healthy",
                vec![("U1", 0.05), ("U2", -0.3), ("U3", 0.12)],
            ),
        );

        let top = view.outcome().unwrap().top_importances(2);
        assert_eq!(top, vec![("U2", -0.3), ("U3", 0.12)]);
    }

    #[test]
    fn test_top_importances_edge_counts() {
        let mut view = PredictionResultView::new();
        view.on_prediction_response(
            1,
            response(0.9, "Healthy", vec![("U1", 0.1), ("U2", 0.2)]),
        );
        let outcome = view.outcome().unwrap();

        assert!(outcome.top_importances(0).is_empty());
        // k beyond the entry count returns everything, still sorted
        let all = outcome.top_importances(10);
        assert_eq!(all, vec![("U2", 0.2), ("U1", 0.1)]);
    }

    #[test]
    fn test_top_importances_ties_keep_wire_order() {
        let mut view = PredictionResultView::new();
        view.on_prediction_response(
            1,
            response(
                0.9,
                "Healthy",
                vec![("U7", 0.1), ("U2", 0.1), ("U5", 0.1)],
            ),
        );

        let top = view.outcome().unwrap().top_importances(3);
        let names: Vec<&str> = top.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["U7", "U2", "U5"]);
    }

    #[test]
    fn test_metrics_keep_received_order() {
        let mut view = PredictionResultView::new();
        let mut resp = response(0.9, "Healthy", vec![]);
        resp.metrics = vec![
            ("R2".to_string(), 0.95),
            ("MSE".to_string(), 0.002),
            ("MAE".to_string(), 0.01),
        ];
        view.on_prediction_response(1, resp);

        let names: Vec<&str> = view
            .outcome()
            .unwrap()
            .metrics_summary()
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["R2", "MSE", "MAE"]);
    }

    #[test]
    fn test_display_precision() {
        let mut view = PredictionResultView::new();
        view.on_prediction_response(1, response(0.91, "Healthy", vec![("U3", 0.12)]));
        let outcome = view.outcome().unwrap();

        assert_eq!(outcome.soh_display(), "0.910");
        assert_eq!(format_weight(outcome.top_importances(1)[0].1), "0.12000");
    }
}
