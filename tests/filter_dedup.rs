// tests/filter_dedup.rs
use outage_watch::{filter_new_matches, MatchRule, SeenSet};

fn rule() -> MatchRule {
    MatchRule::new("CPH", "electrical shutdown")
}

#[test]
fn second_pass_never_re_emits() {
    let mut seen = SeenSet::new();
    let batch = vec![
        "CPH electrical shutdown - Mar 3".to_string(),
        "CPH Electrical Shutdown - Mar 10".to_string(),
        "E7 electrical shutdown".to_string(),
    ];

    let first = filter_new_matches(batch.clone(), &rule(), &mut seen);
    assert_eq!(first.len(), 2);

    let second = filter_new_matches(batch, &rule(), &mut seen);
    assert!(second.is_empty());
    assert_eq!(seen.len(), 2);
}

#[test]
fn only_the_unseen_one_comes_out() {
    let s = "CPH electrical shutdown notice for March".to_string();
    let t = "CPH ELECTRICAL SHUTDOWN notice for April".to_string();

    let mut seen = SeenSet::new();
    seen.insert(&s);

    let out = filter_new_matches(vec![s.clone(), t.clone()], &rule(), &mut seen);
    assert_eq!(out, vec![t.clone()]);

    assert_eq!(seen.len(), 2);
    assert!(seen.contains(&s));
    assert!(seen.contains(&t));
}

#[test]
fn keyword_predicate_table() {
    let r = rule();
    let cases = [
        ("CPH Electrical Shutdown", true),
        ("CPH electrical shutdown", true),
        ("Planned CPH eLeCtRiCaL sHuTdOwN tonight", true),
        ("cph electrical shutdown", false),
        ("CPH electrical outage", false),
        ("electrical shutdown in DWE", false),
        ("", false),
    ];
    for (text, want) in cases {
        assert_eq!(r.matches(text), want, "{text:?}");
    }
}

#[test]
fn order_of_new_matches_follows_input() {
    let mut seen = SeenSet::new();
    let batch: Vec<String> = (1..=4)
        .map(|i| format!("CPH electrical shutdown #{i}"))
        .collect();
    let out = filter_new_matches(batch.clone(), &rule(), &mut seen);
    assert_eq!(out, batch);
}

#[test]
fn several_buildings_any_of_them_counts() {
    let r = MatchRule::for_locations(["CPH", "E2"], "electrical shutdown")
        .with_alias("Carl A Pollock Hall", "CPH");
    let mut seen = SeenSet::new();
    let batch = vec![
        "E2 electrical shutdown - Apr 2".to_string(),
        "Carl A Pollock Hall Electrical Shutdown - Apr 3".to_string(),
        "DWE electrical shutdown - Apr 4".to_string(),
        "cph electrical shutdown - Apr 5".to_string(),
    ];
    let out = filter_new_matches(batch.clone(), &r, &mut seen);
    assert_eq!(out, batch[..2].to_vec());
    assert_eq!(seen.len(), 2);
}
