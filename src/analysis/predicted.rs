//! Decoding of the compact predicted-emotion encoding.
//!
//! `label(start-end)[,label(start-end)...]`, e.g. `happy(3.5-7.0),sad(7.0-9.2)`.
//! Bounds may use `.` or `,` as decimal separator. A comma inside parentheses
//! that is followed by a digit is a decimal comma, so `happy(3,5-7,0)` survives;
//! every other comma separates items.

use crate::models::{AnalysisIssue, PredictedInterval};
use crate::utils::parse_decimal;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Parse a predicted-emotion string. Malformed items are dropped silently.
pub fn parse_predicted(raw: &str) -> Vec<PredictedInterval> {
    let mut issues = Vec::new();
    parse_predicted_collecting(raw, &mut issues)
}

/// Like [`parse_predicted`], recording every dropped item in `issues`.
pub fn parse_predicted_collecting(
    raw: &str,
    issues: &mut Vec<AnalysisIssue>,
) -> Vec<PredictedInterval> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut intervals = Vec::new();
    for item in split_items(raw) {
        match parse_item(item) {
            Some(interval) => intervals.push(interval),
            None => {
                log_debug!("dropping malformed predicted item '{item}'");
                issues.push(AnalysisIssue::MalformedPredictionItem {
                    item: item.to_string(),
                });
            }
        }
    }

    intervals
}

/// Render intervals back into the compact encoding.
pub fn render_predicted(intervals: &[PredictedInterval]) -> String {
    intervals
        .iter()
        .map(|interval| format!("{}({}-{})", interval.emotion, interval.start, interval.end))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split on item-separating commas, dropping empty entries.
fn split_items(raw: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut item_start = 0;

    for (idx, ch) in raw.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' => {
                let decimal_comma = depth > 0
                    && raw[idx + 1..]
                        .trim_start()
                        .starts_with(|c: char| c.is_ascii_digit());
                if !decimal_comma {
                    items.push(&raw[item_start..idx]);
                    item_start = idx + 1;
                    depth = 0;
                }
            }
            _ => {}
        }
    }
    items.push(&raw[item_start..]);

    items.into_iter().filter(|item| !item.is_empty()).collect()
}

fn parse_item(item: &str) -> Option<PredictedInterval> {
    let open = item.find('(')?;
    let close = item.find(')')?;
    if close < open {
        return None;
    }

    let emotion = item[..open].trim().to_lowercase();
    let bounds: Vec<&str> = item[open + 1..close]
        .split('-')
        .filter(|token| !token.is_empty())
        .collect();

    let [start, end] = bounds.as_slice() else {
        return None;
    };

    Some(PredictedInterval::new(
        emotion,
        parse_decimal(start)?,
        parse_decimal(end)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_in_source_order() {
        let parsed = parse_predicted("Happy(3.5-7.0), sad (7.0-9.2)");
        assert_eq!(
            parsed,
            vec![
                PredictedInterval::new("happy", 3.5, 7.0),
                PredictedInterval::new("sad", 7.0, 9.2),
            ]
        );
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_predicted("").is_empty());
        assert!(parse_predicted("   ").is_empty());
    }

    #[test]
    fn accepts_decimal_commas_inside_parentheses() {
        let parsed = parse_predicted("happy(3,5-7,25),sad(8-9)");
        assert_eq!(
            parsed,
            vec![
                PredictedInterval::new("happy", 3.5, 7.25),
                PredictedInterval::new("sad", 8.0, 9.0),
            ]
        );
    }

    #[test]
    fn drops_malformed_items_and_keeps_the_rest() {
        let mut issues = Vec::new();
        let parsed = parse_predicted_collecting(
            "happy10-20,sad(1-2-3),angry(x-4),)scared(,neutral(4-6)",
            &mut issues,
        );

        assert_eq!(parsed, vec![PredictedInterval::new("neutral", 4.0, 6.0)]);
        assert_eq!(issues.len(), 4);
        assert!(issues.iter().all(|issue| matches!(
            issue,
            AnalysisIssue::MalformedPredictionItem { .. }
        )));
    }

    #[test]
    fn rejects_non_finite_bounds() {
        assert!(parse_predicted("happy(NaN-4)").is_empty());
    }

    #[test]
    fn render_then_parse_preserves_intervals() {
        let intervals = vec![
            PredictedInterval::new("happy", 10.0, 20.0),
            PredictedInterval::new("sad", 10.0, 20.0),
            PredictedInterval::new("angry", 25.125, 30.5),
            PredictedInterval::new("surprised", 0.0, 0.75),
        ];
        assert_eq!(parse_predicted(&render_predicted(&intervals)), intervals);
    }
}
