use crate::engine::Alternative;

/// Pick the candidate with the strictly greatest confidence
///
/// Falls back to `primary` when the engine reported no alternative list.
/// Ties keep the earliest candidate, and a NaN confidence never wins over a
/// real score.
pub fn select_best<'a>(
    primary: &'a Alternative,
    alternatives: &'a [Alternative],
) -> &'a Alternative {
    let mut candidates = alternatives.iter();
    let Some(first) = candidates.next() else {
        return primary;
    };

    candidates.fold(first, |best, candidate| {
        if score(candidate) > score(best) {
            candidate
        } else {
            best
        }
    })
}

fn score(candidate: &Alternative) -> f32 {
    if candidate.confidence.is_nan() {
        f32::NEG_INFINITY
    } else {
        candidate.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt(text: &str, confidence: f32) -> Alternative {
        Alternative::new(text, confidence)
    }

    #[test]
    fn test_highest_confidence_wins() {
        let primary = alt("helo", 0.4);
        let alternatives = vec![alt("helo", 0.4), alt("hello", 0.85), alt("hollow", 0.1)];

        assert_eq!(select_best(&primary, &alternatives).text, "hello");
    }

    #[test]
    fn test_tie_keeps_earliest() {
        let primary = alt("a", 0.7);
        let alternatives = vec![alt("a", 0.7), alt("b", 0.7), alt("c", 0.7)];

        assert_eq!(select_best(&primary, &alternatives).text, "a");
    }

    #[test]
    fn test_later_strict_winner_after_tie() {
        let primary = alt("a", 0.5);
        let alternatives = vec![alt("a", 0.5), alt("b", 0.5), alt("c", 0.6)];

        assert_eq!(select_best(&primary, &alternatives).text, "c");
    }

    #[test]
    fn test_empty_alternatives_fall_back_to_primary() {
        let primary = alt("hello world", 0.9);

        let best = select_best(&primary, &[]);
        assert_eq!(best.text, "hello world");
        assert_eq!(best.confidence, 0.9);
    }

    #[test]
    fn test_nan_never_wins() {
        let primary = alt("x", f32::NAN);
        let alternatives = vec![alt("x", f32::NAN), alt("y", 0.1)];

        assert_eq!(select_best(&primary, &alternatives).text, "y");
    }

    #[test]
    fn test_selected_is_not_below_any_candidate() {
        let primary = alt("p", 0.3);
        let alternatives = vec![
            alt("p", 0.3),
            alt("q", 0.92),
            alt("r", 0.92),
            alt("s", 0.05),
        ];

        let best = select_best(&primary, &alternatives);
        assert!(alternatives.iter().all(|a| best.confidence >= a.confidence));
        assert_eq!(best.text, "q");
    }
}
