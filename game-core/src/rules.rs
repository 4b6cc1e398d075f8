use std::borrow::Cow;
use std::fmt;

use game_types::{ContainMode, EndMode, LengthMode, PlayerRuleMode, Rules, normalize_word};

/// A single failed sub-rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    MustEnd(char),
    MustNotEnd(char),
    MustBe(u32),
    MustNotBe(u32),
    MustContain(char),
    MustNotContain(char),
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::MustEnd(c) => write!(f, "Word must end with \"{c}\""),
            RuleViolation::MustNotEnd(c) => write!(f, "Word must not end with \"{c}\""),
            RuleViolation::MustBe(n) => write!(f, "Word must be {n} letters"),
            RuleViolation::MustNotBe(n) => write!(f, "Word must not be {n} letters"),
            RuleViolation::MustContain(c) => write!(f, "Word must contain \"{c}\""),
            RuleViolation::MustNotContain(c) => write!(f, "Word must not contain \"{c}\""),
        }
    }
}

pub struct RuleEngine;

impl RuleEngine {
    /// Whether the rules constrain this player at all. `None` is the global check.
    pub fn applies_to(rules: &Rules, player_id: Option<&str>) -> bool {
        match player_id {
            Some(id) if rules.per_player => rules.mode_for(id) != PlayerRuleMode::Ignore,
            _ => true,
        }
    }

    pub fn passes(word: &str, rules: &Rules, player_id: Option<&str>) -> bool {
        Self::check(word, rules, player_id).is_none()
    }

    /// User-facing reason the word is refused, `None` exactly when `passes` is true.
    pub fn explain(word: &str, rules: &Rules, player_id: Option<&str>) -> Option<String> {
        Self::check(word, rules, player_id).map(|violation| violation.to_string())
    }

    /// The first failing sub-rule, evaluated as end, length, contain.
    pub fn check(word: &str, rules: &Rules, player_id: Option<&str>) -> Option<RuleViolation> {
        if !Self::applies_to(rules, player_id) {
            return None;
        }

        let word = normalized(word);

        if rules.end.enabled {
            if let Some(letter) = rule_letter(&rules.end.letter) {
                let ends = word.ends_with(letter);
                match rules.end.mode {
                    EndMode::MustEnd if !ends => return Some(RuleViolation::MustEnd(letter)),
                    EndMode::MustNotEnd if ends => return Some(RuleViolation::MustNotEnd(letter)),
                    _ => {}
                }
            }
        }

        if rules.length.enabled {
            if let Some(value) = rules.length.value {
                let len = word.chars().count() as u32;
                match rules.length.mode {
                    LengthMode::MustBe if len != value => return Some(RuleViolation::MustBe(value)),
                    LengthMode::MustNotBe if len == value => {
                        return Some(RuleViolation::MustNotBe(value));
                    }
                    _ => {}
                }
            }
        }

        if rules.contain.enabled {
            if let Some(letter) = rule_letter(&rules.contain.letter) {
                let contains = word.contains(letter);
                match rules.contain.mode {
                    ContainMode::MustContain if !contains => {
                        return Some(RuleViolation::MustContain(letter));
                    }
                    ContainMode::MustNotContain if contains => {
                        return Some(RuleViolation::MustNotContain(letter));
                    }
                    _ => {}
                }
            }
        }

        None
    }
}

/// First character of a rule letter, lowercased. Blank means no constraint.
fn rule_letter(letter: &str) -> Option<char> {
    letter
        .trim()
        .chars()
        .next()
        .and_then(|c| c.to_lowercase().next())
}

fn normalized(word: &str) -> Cow<'_, str> {
    if word.chars().all(char::is_lowercase) {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(normalize_word(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::{ContainRule, EndRule, LengthRule};

    fn end_rule(mode: EndMode, letter: &str) -> Rules {
        Rules {
            end: EndRule {
                enabled: true,
                mode,
                letter: letter.to_string(),
            },
            ..Rules::default()
        }
    }

    fn length_rule(mode: LengthMode, value: Option<u32>) -> Rules {
        Rules {
            length: LengthRule {
                enabled: true,
                mode,
                value,
            },
            ..Rules::default()
        }
    }

    fn contain_rule(mode: ContainMode, letter: &str) -> Rules {
        Rules {
            contain: ContainRule {
                enabled: true,
                mode,
                letter: letter.to_string(),
            },
            ..Rules::default()
        }
    }

    #[test]
    fn test_default_rules_accept_everything() {
        let rules = Rules::default();
        for word in ["cat", "apple", "x", "supercalifragilistic"] {
            assert!(RuleEngine::passes(word, &rules, None));
            assert!(RuleEngine::explain(word, &rules, None).is_none());
        }
    }

    #[test]
    fn test_must_end_rule() {
        let rules = end_rule(EndMode::MustEnd, "e");
        assert!(!RuleEngine::passes("cat", &rules, None));
        assert!(RuleEngine::passes("apple", &rules, None));
        assert_eq!(
            RuleEngine::explain("cat", &rules, None).as_deref(),
            Some("Word must end with \"e\"")
        );

        let rules = end_rule(EndMode::MustNotEnd, "E");
        assert!(RuleEngine::passes("cat", &rules, None));
        assert_eq!(
            RuleEngine::explain("apple", &rules, None).as_deref(),
            Some("Word must not end with \"e\"")
        );
    }

    #[test]
    fn test_length_rule() {
        let rules = length_rule(LengthMode::MustNotBe, Some(5));
        assert!(!RuleEngine::passes("apple", &rules, None));
        assert!(RuleEngine::passes("cat", &rules, None));
        assert_eq!(
            RuleEngine::explain("apple", &rules, None).as_deref(),
            Some("Word must not be 5 letters")
        );

        let rules = length_rule(LengthMode::MustBe, Some(3));
        assert!(RuleEngine::passes("cat", &rules, None));
        assert_eq!(
            RuleEngine::explain("tiger", &rules, None).as_deref(),
            Some("Word must be 3 letters")
        );
    }

    #[test]
    fn test_contain_rule_uses_first_letter_only() {
        let rules = contain_rule(ContainMode::MustContain, "rz");
        assert!(RuleEngine::passes("tiger", &rules, None));
        assert!(!RuleEngine::passes("cat", &rules, None));
        assert_eq!(
            RuleEngine::explain("cat", &rules, None).as_deref(),
            Some("Word must contain \"r\"")
        );

        let rules = contain_rule(ContainMode::MustNotContain, "a");
        assert!(!RuleEngine::passes("cat", &rules, None));
        assert!(RuleEngine::passes("tiger", &rules, None));
    }

    #[test]
    fn test_missing_parameters_do_not_constrain() {
        assert!(RuleEngine::passes("cat", &end_rule(EndMode::MustEnd, ""), None));
        assert!(RuleEngine::passes("cat", &end_rule(EndMode::MustEnd, "  "), None));
        assert!(RuleEngine::passes("cat", &length_rule(LengthMode::MustBe, None), None));
        assert!(RuleEngine::passes(
            "cat",
            &contain_rule(ContainMode::MustContain, ""),
            None
        ));
    }

    #[test]
    fn test_disabled_rules_do_not_constrain() {
        let mut rules = end_rule(EndMode::MustEnd, "e");
        rules.end.enabled = false;
        assert!(RuleEngine::passes("cat", &rules, None));
    }

    #[test]
    fn test_single_failure_fails_whole_check() {
        let mut rules = end_rule(EndMode::MustEnd, "e");
        rules.length = LengthRule {
            enabled: true,
            mode: LengthMode::MustBe,
            value: Some(5),
        };
        assert!(RuleEngine::passes("apple", &rules, None));
        // Ends with "e" but is six letters.
        assert_eq!(
            RuleEngine::check("orange", &rules, None),
            Some(RuleViolation::MustBe(5))
        );
        // End rule is reported first.
        assert_eq!(
            RuleEngine::check("banana", &rules, None),
            Some(RuleViolation::MustEnd('e'))
        );
    }

    #[test]
    fn test_ignore_override_bypasses_all_rules() {
        let mut rules = end_rule(EndMode::MustEnd, "e");
        rules.length = LengthRule {
            enabled: true,
            mode: LengthMode::MustBe,
            value: Some(10),
        };
        rules.contain = ContainRule {
            enabled: true,
            mode: ContainMode::MustContain,
            letter: "z".to_string(),
        };
        rules.per_player = true;
        rules
            .player_modes
            .insert("p1".to_string(), PlayerRuleMode::Ignore);
        rules
            .player_modes
            .insert("p2".to_string(), PlayerRuleMode::Global);

        assert!(RuleEngine::passes("cat", &rules, Some("p1")));
        assert!(RuleEngine::explain("cat", &rules, Some("p1")).is_none());
        assert!(!RuleEngine::passes("cat", &rules, Some("p2")));
        assert!(!RuleEngine::passes("cat", &rules, Some("unknown")));
        // The global check never uses an override.
        assert!(!RuleEngine::passes("cat", &rules, None));

        // Overrides are inert while per-player mode is off.
        rules.per_player = false;
        assert!(!RuleEngine::passes("cat", &rules, Some("p1")));
    }

    #[test]
    fn test_passes_and_explain_agree() {
        let rule_sets = [
            end_rule(EndMode::MustEnd, "t"),
            end_rule(EndMode::MustNotEnd, "t"),
            length_rule(LengthMode::MustBe, Some(5)),
            length_rule(LengthMode::MustNotBe, Some(3)),
            contain_rule(ContainMode::MustContain, "i"),
            contain_rule(ContainMode::MustNotContain, "a"),
        ];
        for rules in &rule_sets {
            for word in ["cat", "tiger", "apple", "rabbit", "tit", "Toast"] {
                assert_eq!(
                    RuleEngine::passes(word, rules, None),
                    RuleEngine::explain(word, rules, None).is_none(),
                    "drift for {word} under {rules:?}"
                );
            }
        }
    }

    #[test]
    fn test_case_insensitive_comparison() {
        let rules = end_rule(EndMode::MustEnd, "E");
        assert!(RuleEngine::passes("APPLE", &rules, None));
        let rules = contain_rule(ContainMode::MustNotContain, "T");
        assert!(!RuleEngine::passes("Cat", &rules, None));
    }
}
