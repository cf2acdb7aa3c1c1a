use nook_core::messages::ChatMessage;

/// Default size budget for a context window, in message characters.
pub const DEFAULT_WINDOW_BUDGET: usize = 4096;

/// Build a size-bounded, recency-biased context window from a
/// channel's history plus a new prompt.
///
/// Walks the stored history newest to oldest, accumulating raw
/// character length as the token proxy. The budget is a soft ceiling
/// checked after inclusion: the message that pushes the counter over
/// is still part of the window, then the walk stops. The result is in
/// chronological order with the new prompt appended last; the prompt
/// is never dropped, whatever the budget.
///
/// Stored history carries no role tags, so every included entry is
/// sent as a user message; only the live prompt is distinguished by
/// position.
pub fn build_window(history: &[String], prompt: &str, budget: usize) -> Vec<ChatMessage> {
    let mut included: Vec<ChatMessage> = Vec::new();
    let mut used = 0usize;

    for msg in history.iter().rev() {
        included.push(ChatMessage::user(msg.clone()));
        used += msg.len();
        if used > budget {
            break;
        }
    }

    included.reverse();
    included.push(ChatMessage::user(prompt));
    included
}

#[cfg(test)]
mod tests {
    use super::*;
    use nook_core::messages::Role;

    fn history(sizes: &[usize]) -> Vec<String> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, n)| format!("{i}").repeat(*n))
            .collect()
    }

    #[test]
    fn empty_history_yields_prompt_only() {
        let window = build_window(&[], "hello", 100);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0], ChatMessage::user("hello"));
    }

    #[test]
    fn everything_fits_under_budget() {
        let hist = history(&[10, 10]);
        let window = build_window(&hist, "hi", 100);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, hist[0]);
        assert_eq!(window[1].content, hist[1]);
        assert_eq!(window[2].content, "hi");
    }

    #[test]
    fn overflowing_message_is_still_included() {
        // Four stored messages of 10 chars, budget 25: the walk takes
        // the newest two (20), then the third pushes the counter to 30
        // and is included before iteration stops. The oldest is out.
        let hist = history(&[10, 10, 10, 10]);
        let window = build_window(&hist, "yo", 25);

        assert_eq!(window.len(), 4);
        assert_eq!(window[0].content, hist[1]);
        assert_eq!(window[1].content, hist[2]);
        assert_eq!(window[2].content, hist[3]);
        assert_eq!(window[3].content, "yo");
    }

    #[test]
    fn recency_bias_drops_oldest_first() {
        let hist = history(&[10, 10, 10, 10]);
        let window = build_window(&hist, "yo", 15);

        // Newest fits (10), the next overflows (20 > 15) but is kept.
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, hist[2]);
        assert_eq!(window[1].content, hist[3]);
        assert_eq!(window[2].content, "yo");
    }

    #[test]
    fn single_oversized_message_makes_a_window_of_one() {
        let hist = history(&[300]);
        let window = build_window(&hist, "hello", 25);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].content, hist[0]);
        assert_eq!(window[1].content, "hello");
    }

    #[test]
    fn window_is_chronological_and_user_tagged() {
        let hist: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let window = build_window(&hist, "d", 1000);
        let contents: Vec<&str> = window.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c", "d"]);
        assert!(window.iter().all(|m| m.role == Role::User));
    }
}
