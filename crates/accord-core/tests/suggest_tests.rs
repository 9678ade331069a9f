use accord_core::suggest::parse_suggestions;

// ── Well-formed replies ───────────────────────────────────────────────────

#[test]
fn numbered_lines_are_kept_with_markers_stripped() {
    let raw = "Here are my suggestions:\n\
               1. Pay the full invoice within 30 days\n\
               2. Split the repair costs evenly\n";
    let parsed = parse_suggestions(raw, None);
    assert_eq!(
        parsed,
        vec![
            "Pay the full invoice within 30 days".to_string(),
            "Split the repair costs evenly".to_string(),
        ]
    );
}

#[test]
fn bullet_and_bold_lines_are_candidates() {
    let raw = "- Refund half of the deposit immediately\n\
               • Schedule a joint inspection of the property\n\
               **Structured Payout**: monthly installments over one year\n";
    let parsed = parse_suggestions(raw, None);
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0], "Refund half of the deposit immediately");
    assert_eq!(parsed[1], "Schedule a joint inspection of the property");
    assert_eq!(
        parsed[2],
        "**Structured Payout**: monthly installments over one year"
    );
}

#[test]
fn prose_lines_are_ignored() {
    let raw = "Considering the evidence provided, I recommend:\n\
               1. Return the vehicle and refund the purchase price\n\
               2. Arrange an independent mechanical inspection\n\
               That concludes my assessment.";
    let parsed = parse_suggestions(raw, None);
    assert_eq!(parsed.len(), 2);
}

#[test]
fn short_remnants_are_dropped_as_noise() {
    // "- ok" and a bare "1." survive marker stripping at <= 10 chars.
    let raw = "1.\n\
               - ok\n\
               1. Pay the outstanding balance in full\n\
               2. Provide a written apology and a service credit\n";
    let parsed = parse_suggestions(raw, None);
    assert_eq!(parsed.len(), 2);
    assert!(parsed.iter().all(|s| s.chars().count() > 10));
}

// ── Fallback set ──────────────────────────────────────────────────────────

#[test]
fn sparse_input_returns_fixed_fallback() {
    let parsed = parse_suggestions("ok", None);
    assert_eq!(parsed.len(), 4);
    assert!(parsed[0].starts_with("Mediated Settlement:"));
    assert!(parsed[1].starts_with("Partial Payment:"));
    assert!(parsed[2].starts_with("Alternative Resolution:"));
    assert!(parsed[3].starts_with("Legal Documentation:"));
}

#[test]
fn single_candidate_still_falls_back() {
    let parsed = parse_suggestions("1. Pay the outstanding balance in full", None);
    assert_eq!(parsed.len(), 4);
}

#[test]
fn fallback_interpolates_seventy_percent_of_amount() {
    let parsed = parse_suggestions("nothing useful", Some(1000.0));
    let expected = format!(
        "Partial Payment: Structured payment plan for {}",
        1000.0_f64 * 0.7
    );
    assert_eq!(parsed[1], expected);
}

#[test]
fn fallback_uses_placeholder_without_amount() {
    for amount in [None, Some(0.0)] {
        let parsed = parse_suggestions("", amount);
        assert_eq!(
            parsed[1],
            "Partial Payment: Structured payment plan for the disputed amount"
        );
    }
}
