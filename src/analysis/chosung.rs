//! Initial-consonant (choseong) matching for Hangul text.
//!
//! Every precomposed syllable (U+AC00..=U+D7A3) is projected onto its leading
//! consonant, written with the compatibility jamo a user types on a keyboard
//! (`빌려온` -> `ㅂㄹㅇ`). Any other character projects onto itself.

const CHOSEONG: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

const SYLLABLE_FIRST: u32 = 0xAC00; // '가'
const SYLLABLE_LAST: u32 = 0xD7A3; // '힣'
const SYLLABLES_PER_INITIAL: u32 = 21 * 28;

pub fn initial_of(c: char) -> char {
    let code = c as u32;
    if !(SYLLABLE_FIRST..=SYLLABLE_LAST).contains(&code) {
        return c;
    }
    CHOSEONG[((code - SYLLABLE_FIRST) / SYLLABLES_PER_INITIAL) as usize]
}

pub fn initials(text: &str) -> String {
    text.chars().map(initial_of).collect()
}

pub fn is_initial(c: char) -> bool {
    CHOSEONG.contains(&c)
}

/// True when the query is made of initial consonants only (`ㅂㄹㅇ`).
pub fn is_initials_query(query: &str) -> bool {
    !query.is_empty() && query.chars().all(is_initial)
}

/// Case-insensitive substring match, falling back to initial-consonant match.
///
/// An initials-only query is looked up in the projection of `text`. A query
/// holding full syllables is projected as well, so `빌려` finds `빌려온` and
/// also any other text whose syllables share those initials.
pub fn initials_contains(text: &str, query: &str) -> bool {
    if text.is_empty() || query.is_empty() {
        return false;
    }

    let text = text.to_lowercase();
    let query = query.to_lowercase();
    if text.contains(&query) {
        return true;
    }

    let projected = initials(&text);
    if is_initials_query(&query) {
        projected.contains(&query)
    } else {
        projected.contains(&initials(&query))
    }
}

/// Prefix variant of [`initials_contains`]; only initials-only queries use
/// the projection.
pub fn initials_starts_with(text: &str, query: &str) -> bool {
    if text.is_empty() || query.is_empty() {
        return false;
    }

    let text = text.to_lowercase();
    let query = query.to_lowercase();
    if text.starts_with(&query) {
        return true;
    }

    is_initials_query(&query) && initials(&text).starts_with(&query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_syllables_to_initials() {
        assert_eq!(initials("빌려온"), "ㅂㄹㅇ");
        assert_eq!(initials("가힣"), "ㄱㅎ");
        assert_eq!(initials("까치 abc"), "ㄲㅊ abc");
    }

    #[test]
    fn initials_query_matches_inside_text() {
        assert!(initials_contains("돈을 빌려온 사람", "ㅂㄹㅇ"));
        assert!(!initials_contains("돈을 빌려준 사람", "ㅂㄹㅇ"));
    }

    #[test]
    fn plain_queries_are_case_insensitive() {
        assert!(initials_contains("The Capital of FRANCE", "france"));
        assert!(!initials_contains("The Capital of Spain", "france"));
        assert!(!initials_contains("", "a"));
        assert!(!initials_contains("a", ""));
    }

    #[test]
    fn syllable_query_matches_on_shared_initials() {
        assert!(initials_contains("빌려온", "빌려"));
        assert!(initials_contains("바람", "빌려"));
        assert!(!initials_contains("사람", "빌려"));
    }

    #[test]
    fn prefix_match_uses_initials_only_for_jamo_queries() {
        assert!(initials_starts_with("빌려온", "ㅂㄹ"));
        assert!(initials_starts_with("Paris", "pa"));
        assert!(!initials_starts_with("바람", "빌"));
    }
}
