use super::common::*;
use crate::scoring::{
    apply_policy, Policy, PolicyOverrides, RejectRules, RejectionReason, ScoreResult,
    StrictnessProfile, Verdict,
};
use crate::signals::Signals;

fn strict() -> Policy {
    StrictnessProfile::Strict.policy()
}

#[test]
fn strict_profile_rejects_any_citation_needed_marker() {
    let signals = Signals {
        citation_needed: 1,
        ..exemplary_signals()
    };

    let result = apply_policy(&signals, &strict());

    assert_eq!(
        result,
        ScoreResult::Rejected {
            reason: RejectionReason::CitationNeeded
        }
    );
    assert_close(result.score(), 0.0);
    assert_eq!(result.verdict(), Verdict::Weak);
    assert!(result.highlights().is_none());
}

#[test]
fn first_matching_rule_wins() {
    let both = Signals {
        citation_needed: 2,
        problem_templates: 1,
        days_since_last_edit: 4000.0,
        ..Signals::default()
    };
    let templates_and_stale = Signals {
        problem_templates: 1,
        days_since_last_edit: 4000.0,
        ..Signals::default()
    };
    let reverts_and_stale = Signals {
        revert_rate: 0.5,
        days_since_last_edit: 4000.0,
        ..Signals::default()
    };

    assert_eq!(
        apply_policy(&both, &strict()).reason(),
        Some(RejectionReason::CitationNeeded)
    );
    assert_eq!(
        apply_policy(&templates_and_stale, &strict()).reason(),
        Some(RejectionReason::ProblemTemplates)
    );
    assert_eq!(
        apply_policy(&reverts_and_stale, &strict()).reason(),
        Some(RejectionReason::RevertRate)
    );
}

#[test]
fn thresholds_are_strictly_greater_than() {
    let at_limit = Signals {
        revert_rate: 0.4,
        days_since_last_edit: 1825.0,
        ..exemplary_signals()
    };

    assert!(!apply_policy(&at_limit, &strict()).is_rejected());
}

#[test]
fn normal_profile_has_no_rejection_rules() {
    let result = apply_policy(&troubled_signals(), &Policy::default());

    assert!(!result.is_rejected());
}

#[test]
fn override_rules_replace_profile_rules() {
    let policy = PolicyOverrides::profile(StrictnessProfile::Strict)
        .with_reject_rules(RejectRules {
            revert_rate_above: Some(0.3),
            ..RejectRules::default()
        })
        .build()
        .expect("valid policy");

    let noisy = Signals {
        citation_needed: 4,
        revert_rate: 0.35,
        ..exemplary_signals()
    };

    assert_eq!(
        apply_policy(&noisy, &policy).reason(),
        Some(RejectionReason::RevertRate)
    );
}

#[test]
fn rejection_serializes_reason_code() {
    let signals = Signals {
        days_since_last_edit: 2000.0,
        ..exemplary_signals()
    };
    let result = apply_policy(&signals, &strict());
    let json = serde_json::to_value(&result).expect("serializable");

    assert_eq!(json["rejected"], true);
    assert_eq!(json["reason"], "stale");
    assert_eq!(json["score"], 0.0);
    assert!(json.get("highlights").is_none());
}
