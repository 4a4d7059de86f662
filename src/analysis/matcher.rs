use crate::models::{PredictedInterval, UserEvent};

/// Whether `event` satisfies `predicted`.
///
/// Emotions compare case-insensitively and the spans are treated as closed
/// intervals: an event ending exactly where the prediction starts still matches.
pub fn matches(event: &UserEvent, predicted: &PredictedInterval) -> bool {
    same_emotion(&event.emotion, &predicted.emotion)
        && event.end >= predicted.start
        && event.start <= predicted.end
}

/// Whether any event of a timeline satisfies `predicted`.
pub fn timeline_matches(events: &[UserEvent], predicted: &PredictedInterval) -> bool {
    events.iter().any(|event| matches(event, predicted))
}

fn same_emotion(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_endpoints_match() {
        let predicted = PredictedInterval::new("happy", 10.0, 20.0);
        assert!(matches(&UserEvent::new(0.0, 10.0, "happy"), &predicted));
        assert!(matches(&UserEvent::new(20.0, 25.0, "happy"), &predicted));
    }

    #[test]
    fn disjoint_spans_do_not_match() {
        let predicted = PredictedInterval::new("happy", 10.0, 20.0);
        assert!(!matches(&UserEvent::new(0.0, 9.99, "happy"), &predicted));
        assert!(!matches(&UserEvent::new(20.01, 25.0, "happy"), &predicted));
    }

    #[test]
    fn emotion_must_agree_ignoring_case() {
        let predicted = PredictedInterval::new("happy", 10.0, 20.0);
        assert!(matches(&UserEvent::new(12.0, 14.0, "HAPPY"), &predicted));
        assert!(!matches(&UserEvent::new(12.0, 14.0, "sad"), &predicted));
    }

    #[test]
    fn containment_matches_in_both_directions() {
        let predicted = PredictedInterval::new("sad", 10.0, 20.0);
        assert!(matches(&UserEvent::new(0.0, 30.0, "sad"), &predicted));
        assert!(matches(&UserEvent::new(12.0, 13.0, "sad"), &predicted));
    }
}
