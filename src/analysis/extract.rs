//! Candidate JSON span location in free-form completions.
//!
//! Models are asked for bare JSON but routinely wrap it in prose
//! ("Sure, here is the analysis: {...} Hope this helps!"). The span runs from
//! the first `{` to the last `}`. Nested braces are not balanced, so prose
//! containing braces outside the real object, or two objects in one reply,
//! selects the wrong span and fails later at parse time.

/// Return the substring from the first `{` to the last `}` inclusive.
///
/// `None` when either brace is missing or the last `}` precedes the first `{`.
pub fn candidate_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
