use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;

use crate::error::{DlpError, Result};

/// Optional leading province / metropolitan city.
const PROVINCE: &str = "(?:서울특별시|부산광역시|대구광역시|인천광역시|광주광역시|\
대전광역시|울산광역시|세종특별자치시|경기도|강원도|\
충청북도|충청남도|전라북도|전라남도|경상북도|\
경상남도|제주특별자치도)?";

/// Filler allowed between address components.
const FILL: &str = r"[\s가-힣0-9\-~.,]";

/// Unit suffixes a candidate is scored against.
const KEYWORDS: [&str; 15] = [
    "도", "시", "군", "구", "동", "읍", "면", "리", "로", "길", "대로", "번지", "건물", "아파트", "호",
];

/// Rest of the line. Stops at CR, LF and the Unicode line/paragraph separators.
const REST_OF_LINE: &str = r"[^\r\n\x{2028}\x{2029}]*";

/// Distinct keywords a candidate must contain to be kept.
const MIN_KEYWORDS: usize = 2;

/// Free-form Korean address detector.
///
/// A broad four-way pattern proposes candidates; a keyword floor then drops
/// candidates that only look like an address by accident.
#[derive(Debug)]
pub struct AddressHeuristic {
    candidates: Regex,
    keywords: AhoCorasick,
}

impl AddressHeuristic {
    pub fn new() -> Result<Self> {
        let candidates = Regex::new(&Self::candidate_pattern()).map_err(|e| {
            DlpError::InvalidConfig {
                reason: format!("invalid address pattern: {e}"),
            }
        })?;
        let keywords = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(KEYWORDS)
            .map_err(|e| DlpError::InvalidConfig {
                reason: format!("invalid address keywords: {e}"),
            })?;
        Ok(Self {
            candidates,
            keywords,
        })
    }

    /// Disjunction of road-name, lot-number, abbreviated and bare road shapes.
    fn candidate_pattern() -> String {
        let number = r"\s*[0-9]{1,5}(?:-[0-9]{1,5})?";
        let road = format!(
            "{PROVINCE}{FILL}{{0,20}}?(?:시|군|구|읍|면|동|리){FILL}{{0,30}}?\
             (?:로|길|대로|번길|번지|건물|아파트){number}"
        );
        let lot = format!("{PROVINCE}{FILL}{{0,20}}?(?:시|군|구|읍|면|동|리){number}");
        let abbreviated = format!("[가-힣]+(?:로|길|대로|번길){number}{REST_OF_LINE}");
        let bare = r"[가-힣]+로\s*[0-9]{1,5}".to_string();
        [road, lot, abbreviated, bare].join("|")
    }

    /// Candidate addresses in `text`, in order of discovery.
    pub fn detect_addresses(&self, text: &str) -> Vec<String> {
        self.candidates
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|candidate| self.has_enough_keywords(candidate))
            .map(str::to_string)
            .collect()
    }

    /// True once two distinct keywords have been seen.
    pub fn has_enough_keywords(&self, candidate: &str) -> bool {
        let mut seen = [false; KEYWORDS.len()];
        let mut count = 0;
        for mat in self.keywords.find_overlapping_iter(candidate) {
            let id = mat.pattern().as_usize();
            if !seen[id] {
                seen[id] = true;
                count += 1;
                if count >= MIN_KEYWORDS {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compiles() {
        assert!(AddressHeuristic::new().is_ok());
    }

    #[test]
    fn test_keyword_floor() {
        let h = AddressHeuristic::new().unwrap();
        assert!(!h.has_enough_keywords("테헤란로 123"));
        assert!(h.has_enough_keywords("강남구 테헤란로"));
        // "대로" contains "로", both count
        assert!(h.has_enough_keywords("대로"));
        assert!(!h.has_enough_keywords("12345"));
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let h = AddressHeuristic::new().unwrap();
        assert!(!h.has_enough_keywords("로로로 1"));
    }
}
