const MAX_VISIBLE_CHARS: usize = 100;

/// Shortens user-supplied question text for logging.
///
/// Call transcripts and questions can hold personal content, so log lines
/// carry at most a prefix plus the total length.
pub fn sanitize_question(question: &str) -> String {
    let trimmed = question.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    match trimmed.char_indices().nth(MAX_VISIBLE_CHARS) {
        Some((byte_index, _)) => format!(
            "{}... ({} chars total)",
            &trimmed[..byte_index],
            trimmed.chars().count()
        ),
        None => trimmed.to_string(),
    }
}
