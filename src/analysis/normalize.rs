use std::cmp::Ordering;

/// Comparison key for answers and choices: surrounding whitespace and case
/// do not make two options different.
pub fn answer_key(text: &str) -> String {
    text.trim().to_lowercase()
}

pub fn same_answer(a: &str, b: &str) -> bool {
    answer_key(a) == answer_key(b)
}

/// Order strings by UTF-16 code units, the order browsers sort strings in.
/// Differs from `str::cmp` only for characters outside the BMP.
pub fn utf16_cmp(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Trim, sort by [`utf16_cmp`], then drop every entry whose [`answer_key`]
/// was already seen. The first spelling in sorted order survives.
pub fn sorted_unique(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut items: Vec<String> = items.into_iter().map(|s| s.trim().to_string()).collect();
    items.sort_by(|a, b| utf16_cmp(a, b));

    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(answer_key(item)));
    items
}
