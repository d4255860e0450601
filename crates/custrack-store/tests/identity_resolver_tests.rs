// Integration tests for identity resolution

mod common;

use common::*;
use custrack_core::ExErrorKind;
use custrack_store::customers::CustomerRepo;
use custrack_store::identity::{resolve_customer, ResolutionOutcome};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_first_resolution_creates_customer() {
    let mut conn = setup_db();

    let resolution = resolve_customer(&mut conn, "https://a.example", "Acme").unwrap();

    assert_eq!(resolution.outcome, ResolutionOutcome::Created);
    let customer = CustomerRepo::get(&conn, &resolution.customer_id).unwrap().unwrap();
    assert_eq!(customer.name, "Acme");
    assert_eq!(customer.licensed_to, "Acme");
    assert_eq!(customer.site_url, "https://a.example");
    assert!(customer.last_updated > 0);
}

#[test]
fn test_resolution_is_idempotent() {
    let mut conn = setup_db();

    let first = resolve_customer(&mut conn, "https://a.example", "Acme").unwrap();
    let second = resolve_customer(&mut conn, "https://a.example", "Acme").unwrap();

    assert_eq!(first.customer_id, second.customer_id);
    assert_eq!(second.outcome, ResolutionOutcome::Matched);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM customers"), 1);
}

#[test]
fn test_keys_are_trimmed() {
    let mut conn = setup_db();

    let first = resolve_customer(&mut conn, "https://a.example", "Acme").unwrap();
    let second = resolve_customer(&mut conn, "  https://a.example ", " Acme").unwrap();

    assert_eq!(first.customer_id, second.customer_id);
}

#[test]
fn test_single_key_match_is_reused() {
    let mut conn = setup_db();
    let id = create_customer(&mut conn, "https://a.example", "Acme");

    let moved = resolve_customer(&mut conn, "https://new.example", "Acme").unwrap();

    assert_eq!(moved.customer_id, id);
}

#[test]
fn test_blank_keys_are_invalid() {
    let mut conn = setup_db();

    let err = resolve_customer(&mut conn, "  ", "Acme").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidArgument);

    let err = resolve_customer(&mut conn, "https://a.example", "").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidArgument);

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM customers"), 0);
}

#[test]
fn test_ambiguous_match_creates_fresh_customer() {
    // Given: two customers sharing the licensed-to value on different sites
    let mut conn = setup_db();
    let a = create_customer(&mut conn, "https://a.example", "Acme");
    let b = create_customer(&mut conn, "https://b.example", "Other");
    CustomerRepo::set_licensed_to(&conn, &b, "Acme").unwrap();

    // When: a third site reports the same license
    let resolution = resolve_customer(&mut conn, "https://c.example", "Acme").unwrap();

    // Then: neither is guessed; a new customer is created
    assert_ne!(resolution.customer_id, a);
    assert_ne!(resolution.customer_id, b);
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(
        resolution.outcome,
        ResolutionOutcome::AmbiguousMatch { candidates: expected }
    );
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM customers"), 3);
}

#[test]
fn test_full_match_preferred_over_license_only() {
    let mut conn = setup_db();
    let full = create_customer(&mut conn, "https://a.example", "Acme");
    let other = create_customer(&mut conn, "https://b.example", "Other");
    CustomerRepo::set_licensed_to(&conn, &other, "Acme").unwrap();

    let resolution = resolve_customer(&mut conn, "https://a.example", "Acme").unwrap();

    assert_eq!(resolution.customer_id, full);
    assert_eq!(resolution.outcome, ResolutionOutcome::Matched);
}

#[test]
fn test_concurrent_resolution_creates_one_customer() {
    let (_dir, path) = setup_file_db();
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let mut conn = custrack_store::db::open(&path).unwrap();
                barrier.wait();
                resolve_customer(&mut conn, "https://race.example", "Racer")
                    .unwrap()
                    .customer_id
            })
        })
        .collect();

    let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    let conn = custrack_store::db::open(&path).unwrap();
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM customers"), 1);
}
