//! Repair of known tag-mismatch mistakes
//!
//! Models asked to emit TagLog reliably produce a small set of wrong
//! closing tags: a `<target>` block closed by `</source>` or `</parameter>`,
//! misspellings like `</traget>`, a `<relation>` closed by `</rel>`. Each
//! rule keys off a distinct canonical open tag, so the rules are disjoint
//! and application order cannot change the outcome. The pass is idempotent:
//! repaired text contains only matched pairs, which no rule fires on.

use crate::scan::find_ci;

/// Longest value a single repair will span. A missing closer must not
/// swallow the rest of the text.
const MAX_VALUE_LEN: usize = 500;

/// One repair rule: a canonical open tag and the closing-tag mistakes that
/// are rewritten back to its matching closer.
#[derive(Debug, Clone, Copy)]
pub struct RepairRule {
    pub open: &'static str,
    pub bad_closers: &'static [&'static str],
}

/// The fixed rule table.
pub const REPAIR_RULES: &[RepairRule] = &[
    RepairRule {
        open: "target",
        bad_closers: &["source", "parameter", "targe", "traget", "taget"],
    },
    RepairRule {
        open: "source",
        bad_closers: &["target", "parameter"],
    },
    RepairRule {
        open: "relation",
        bad_closers: &["relations", "rel"],
    },
];

/// Result of one repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub text: String,
    /// Rewrites performed, summed across all rules
    pub repairs: u64,
}

/// Rewrite known mismatched open/close pairs to the canonical pair,
/// counting every rewrite.
pub fn repair(text: &str) -> RepairOutcome {
    let mut out = text.to_string();
    let mut repairs = 0;
    for rule in REPAIR_RULES {
        let (next, count) = apply_rule(&out, rule);
        out = next;
        repairs += count;
    }
    RepairOutcome { text: out, repairs }
}

fn apply_rule(text: &str, rule: &RepairRule) -> (String, u64) {
    let open = format!("<{}>", rule.open);
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut pos = 0;
    while let Some(at) = find_ci(text, &open, pos) {
        out.push_str(&text[pos..at]);
        let value_start = at + open.len();
        match match_bad_closer(text, value_start, rule) {
            Some((value, resume)) => {
                out.push_str(&format!("<{o}>{value}</{o}>", o = rule.open));
                count += 1;
                pos = resume;
            }
            None => {
                // keep the open tag as written and scan on
                out.push_str(&text[at..value_start]);
                pos = value_start;
            }
        }
    }
    out.push_str(&text[pos..]);
    (out, count)
}

/// If the text at `value_start` is a bounded tag-free value followed by one
/// of the rule's bad closers, return the trimmed value and the position
/// just past that closer.
fn match_bad_closer<'a>(
    text: &'a str,
    value_start: usize,
    rule: &RepairRule,
) -> Option<(&'a str, usize)> {
    let rest = &text[value_start..];
    let lt = rest.find('<')?;
    if lt == 0 || lt > MAX_VALUE_LEN {
        return None;
    }
    let closer_at = value_start + lt;
    for bad in rule.bad_closers {
        let closer = format!("</{bad}>");
        if text.len() >= closer_at + closer.len()
            && text.as_bytes()[closer_at..closer_at + closer.len()]
                .eq_ignore_ascii_case(closer.as_bytes())
        {
            return Some((rest[..lt].trim(), closer_at + closer.len()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Scenario: wrong closer from a sibling field tag ---

    #[test]
    fn target_closed_by_source_is_rewritten() {
        let input = "<edge><source>a</source><target>b</source><relation>x</relation></edge>";
        let outcome = repair(input);
        assert_eq!(outcome.repairs, 1);
        assert_eq!(
            outcome.text,
            "<edge><source>a</source><target>b</target><relation>x</relation></edge>"
        );
    }

    #[test]
    fn misspelled_closers_are_rewritten() {
        for bad in ["targe", "traget", "taget", "parameter", "source"] {
            let input = format!("<target>val</{bad}>");
            let outcome = repair(&input);
            assert_eq!(outcome.repairs, 1, "closer </{bad}> should repair");
            assert_eq!(outcome.text, "<target>val</target>");
        }
    }

    #[test]
    fn each_rule_fires_independently() {
        let input = "<source>a</parameter> <target>b</traget> <relation>c</rel>";
        let outcome = repair(input);
        assert_eq!(outcome.repairs, 3);
        assert_eq!(
            outcome.text,
            "<source>a</source> <target>b</target> <relation>c</relation>"
        );
    }

    #[test]
    fn well_formed_text_is_untouched() {
        let input = "<target>b</target><relation>x</relation>";
        let outcome = repair(input);
        assert_eq!(outcome.repairs, 0);
        assert_eq!(outcome.text, input);
    }

    // --- Property: idempotence ---

    #[test]
    fn repairing_twice_repairs_nothing_further() {
        let input = "<target>b</source> <source>a</target> <relation>r</relations> plain text";
        let first = repair(input);
        assert!(first.repairs > 0);
        let second = repair(&first.text);
        assert_eq!(second.repairs, 0);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let outcome = repair("<TARGET>b</Source>");
        assert_eq!(outcome.repairs, 1);
        assert_eq!(outcome.text, "<target>b</target>");
    }

    #[test]
    fn unknown_closer_is_left_alone() {
        let input = "<target>b</weight>";
        let outcome = repair(input);
        assert_eq!(outcome.repairs, 0);
        assert_eq!(outcome.text, input);
    }

    #[test]
    fn overlong_value_is_left_alone() {
        let input = format!("<target>{}</source>", "x".repeat(MAX_VALUE_LEN + 1));
        let outcome = repair(&input);
        assert_eq!(outcome.repairs, 0);
        assert_eq!(outcome.text, input);
    }

    #[test]
    fn value_is_trimmed_in_the_rewrite() {
        let outcome = repair("<relation>  KNOWS \n</rel>");
        assert_eq!(outcome.repairs, 1);
        assert_eq!(outcome.text, "<relation>KNOWS</relation>");
    }

    #[test]
    fn repeated_mistakes_are_all_counted() {
        let input = "<target>a</source><target>b</source><target>c</taget>";
        let outcome = repair(input);
        assert_eq!(outcome.repairs, 3);
        assert_eq!(
            outcome.text,
            "<target>a</target><target>b</target><target>c</target>"
        );
    }
}
