use smallvec::SmallVec;
use std::cmp::Ordering;

use crate::config::PathFlags;

use super::token::{Segment, Token};

const SEGMENT: i32 = 4000;
const STATIC: i32 = 4000;
const DYNAMIC: i32 = 2000;
const ROOT: i32 = 9000;
const CUSTOM_RE_BONUS: i32 = 1000;
const WILDCARD_PENALTY: i32 = -5000;
const REPEATABLE_PENALTY: i32 = -2000;
const OPTIONAL_PENALTY: i32 = -800;
const STRICT_BONUS: i32 = 70;
const CASE_SENSITIVE_BONUS: i32 = 25;

pub type SegmentScore = SmallVec<[i32; 4]>;

/// Per-segment specificity weights, root-most segment first. The total
/// order over scores decides which matcher wins a path scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathScore {
    segments: Vec<SegmentScore>,
}

impl PathScore {
    /// `Ordering::Less` means `self` ranks ahead of `other`.
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        let a = &self.segments;
        let b = &other.segments;
        let mut i = 0;
        while i < a.len() && i < b.len() {
            match compare_segment(&a[i], &b[i]) {
                Ordering::Equal => i += 1,
                decided => return decided,
            }
        }
        // A deeper template outranks its own truncation, unless the extra
        // depth is a trailing optional/wildcard segment.
        if a.len().abs_diff(b.len()) == 1 {
            if ends_negative(a) {
                return Ordering::Greater;
            }
            if ends_negative(b) {
                return Ordering::Less;
            }
        }
        b.len().cmp(&a.len())
    }
}

fn compare_segment(a: &SegmentScore, b: &SegmentScore) -> Ordering {
    let mut i = 0;
    while i < a.len() && i < b.len() {
        match b[i].cmp(&a[i]) {
            Ordering::Equal => i += 1,
            decided => return decided,
        }
    }
    // A lone static token beats a longer sub-segment run; any other
    // prefix loses to the longer run.
    match a.len().cmp(&b.len()) {
        Ordering::Less => {
            if a.len() == 1 && a[0] == SEGMENT + STATIC {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        Ordering::Greater => {
            if b.len() == 1 && b[0] == SEGMENT + STATIC {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        Ordering::Equal => Ordering::Equal,
    }
}

fn ends_negative(segments: &[SegmentScore]) -> bool {
    segments
        .last()
        .and_then(|scores| scores.last())
        .is_some_and(|weight| *weight < 0)
}

pub fn score(tokens: &[Segment], flags: PathFlags) -> PathScore {
    let case_bonus = if flags.contains(PathFlags::SENSITIVE) {
        CASE_SENSITIVE_BONUS
    } else {
        0
    };

    let mut segments = Vec::with_capacity(tokens.len());
    for segment in tokens {
        let mut weights = SegmentScore::new();
        if segment.is_empty() {
            weights.push(ROOT);
        }
        for token in segment {
            let mut weight = SEGMENT + case_bonus;
            match token {
                Token::Static(_) => weight += STATIC,
                Token::Param {
                    pattern,
                    optional,
                    repeatable,
                    ..
                } => {
                    weight += dynamic_weight(pattern.as_deref(), *optional, *repeatable);
                }
                Token::Group {
                    pattern,
                    optional,
                    repeatable,
                } => {
                    weight += dynamic_weight(Some(pattern.as_str()), *optional, *repeatable);
                }
            }
            weights.push(weight);
        }
        segments.push(weights);
    }

    if flags.contains(PathFlags::STRICT | PathFlags::END)
        && let Some(last) = segments.last_mut()
        && let Some(weight) = last.last_mut()
    {
        *weight += STRICT_BONUS;
    }

    PathScore { segments }
}

fn dynamic_weight(pattern: Option<&str>, optional: bool, repeatable: bool) -> i32 {
    let mut weight = DYNAMIC;
    if let Some(pattern) = pattern {
        weight += CUSTOM_RE_BONUS;
        if pattern == ".*" {
            weight += WILDCARD_PENALTY;
        }
    }
    if optional {
        weight += OPTIONAL_PENALTY;
    }
    if repeatable {
        weight += REPEATABLE_PENALTY;
    }
    weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::tokenize;

    fn score_of(template: &str, flags: PathFlags) -> PathScore {
        score(&tokenize(template).unwrap(), flags)
    }

    #[test]
    fn static_beats_custom_beats_bare_dynamic() {
        let fixed = score_of("/user/1", PathFlags::END);
        let custom = score_of("/user/:id(\\d+)", PathFlags::END);
        let bare = score_of("/user/:id", PathFlags::END);
        assert_eq!(fixed.cmp_priority(&custom), Ordering::Less);
        assert_eq!(custom.cmp_priority(&bare), Ordering::Less);
    }

    #[test]
    fn deeper_template_outranks_its_truncation() {
        let shallow = score_of("/a", PathFlags::END);
        let deep = score_of("/a/b", PathFlags::END);
        assert_eq!(deep.cmp_priority(&shallow), Ordering::Less);
    }

    #[test]
    fn trailing_catch_all_loses_to_the_truncation() {
        let shallow = score_of("/a", PathFlags::END);
        let catch_all_tail = score_of("/a/:rest(.*)*", PathFlags::END);
        assert_eq!(shallow.cmp_priority(&catch_all_tail), Ordering::Less);
    }

    #[test]
    fn strict_and_sensitive_bonuses_order_the_flag_grid() {
        let plain = score_of("/user", PathFlags::END);
        let sensitive = score_of("/user", PathFlags::END | PathFlags::SENSITIVE);
        let strict = score_of("/user", PathFlags::END | PathFlags::STRICT);
        let both = score_of(
            "/user",
            PathFlags::END | PathFlags::STRICT | PathFlags::SENSITIVE,
        );
        assert_eq!(both.cmp_priority(&strict), Ordering::Less);
        assert_eq!(strict.cmp_priority(&sensitive), Ordering::Less);
        assert_eq!(sensitive.cmp_priority(&plain), Ordering::Less);
    }

    #[test]
    fn trailing_slash_adds_a_segment_weight() {
        let bare = score_of("/user", PathFlags::END);
        let slashed = score_of("/user/", PathFlags::END);
        assert_eq!(slashed.cmp_priority(&bare), Ordering::Less);
    }

    #[test]
    fn lone_static_beats_a_mixed_sub_segment() {
        let lone = score_of("/user/admin", PathFlags::END);
        let mixed = score_of("/user/admin-:id", PathFlags::END);
        assert_eq!(lone.cmp_priority(&mixed), Ordering::Less);
    }
}
