//! Per-camera list sizing.

/// Token written for an unused camera slot.
pub const PLACEHOLDER: &str = "---";

/// Camera count assumed by sections that are read without an explicit one.
pub const MAX_CAMS: usize = 4;

/// Upper bound for list lengths declared inside a file (`n_img`,
/// `n_planes`) or a document (`num_cams`).
pub const MAX_DECLARED_COUNT: usize = 256;

/// How [`resize_to`] fills missing entries.
#[derive(Clone, Debug, PartialEq)]
pub enum Pad<T> {
    /// Append copies of the given value.
    With(T),
    /// Append copies of the current last element, or of the fallback when
    /// the list is empty.
    RepeatLast(T),
}

/// Grow or truncate `list` to exactly `n` entries.
pub fn resize_to<T: Clone>(list: &mut Vec<T>, n: usize, pad: Pad<T>) {
    if list.len() >= n {
        list.truncate(n);
        return;
    }
    let fill = match pad {
        Pad::With(value) => value,
        Pad::RepeatLast(fallback) => list.last().cloned().unwrap_or(fallback),
    };
    list.resize(n, fill);
}

/// Placeholder padding for per-camera file names.
#[inline]
pub fn placeholder() -> Pad<String> {
    Pad::With(PLACEHOLDER.to_string())
}

/// True when `text` marks an unused slot.
#[inline]
pub fn is_placeholder(text: &str) -> bool {
    let t = text.trim();
    t.is_empty() || t == PLACEHOLDER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_with_value_and_truncates() {
        let mut v = vec!["a".to_string()];
        resize_to(&mut v, 3, placeholder());
        assert_eq!(v, ["a", PLACEHOLDER, PLACEHOLDER]);
        resize_to(&mut v, 1, placeholder());
        assert_eq!(v, ["a"]);
    }

    #[test]
    fn repeat_last_uses_fallback_only_when_empty() {
        let mut v = vec![10, 20];
        resize_to(&mut v, 4, Pad::RepeatLast(0));
        assert_eq!(v, [10, 20, 20, 20]);

        let mut empty: Vec<i32> = Vec::new();
        resize_to(&mut empty, 2, Pad::RepeatLast(7));
        assert_eq!(empty, [7, 7]);
    }

    #[test]
    fn empty_text_counts_as_placeholder() {
        assert!(is_placeholder(""));
        assert!(is_placeholder(" --- "));
        assert!(!is_placeholder("cam1.tif"));
    }
}
