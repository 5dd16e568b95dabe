//! Property tests for the client-side reservation and search rules

mod common;

use common::{client_with, FakeCatalogApi, FakeCoverLookup};
use libris_core::cover::placeholder_letter;
use libris_core::reservation::LENDING_PERIOD_DAYS;
use libris_core::{
    CoverArt, CoverEntry, LibrisClient, ReservationQuota, Role, SearchFilters, ValidationError,
};
use proptest::prelude::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Signed-in member with `active` existing reservations, fully loaded
fn loaded_member(rt: &tokio::runtime::Runtime, active: usize) -> LibrisClient {
    rt.block_on(async {
        let api = FakeCatalogApi::with_catalog();
        api.seed_reservations(active);
        let client = client_with(api, FakeCoverLookup::with_covers(&[]), Some(Role::Member)).await;
        client.reservations().load().await.unwrap();
        client
    })
}

fn arb_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[ \t]{1,3}".prop_map(Some),
        "[A-Za-z][A-Za-z ]{0,12}".prop_map(Some),
    ]
}

fn arb_filters() -> impl Strategy<Value = SearchFilters> {
    (arb_text(), arb_text(), arb_text(), proptest::option::of(any::<bool>())).prop_map(
        |(category, author, location, available)| SearchFilters {
            category,
            author,
            location,
            available,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_quota_blocks_before_anything_else(
        active in 3usize..6,
        period in 0u32..60,
        library in proptest::option::of(-2i64..5),
    ) {
        let rt = runtime();
        let client = loaded_member(&rt, active);

        let result = client.reservations().validate(period, library);
        prop_assert_eq!(result, Err(ValidationError::QuotaExceeded { max: 3 }));
    }

    #[test]
    fn prop_period_outside_range_rejected(
        active in 0usize..3,
        period in 0u32..100,
    ) {
        let rt = runtime();
        let client = loaded_member(&rt, active);

        let result = client.reservations().validate(period, Some(1));
        if LENDING_PERIOD_DAYS.contains(&period) {
            prop_assert_eq!(result, Ok(1));
        } else {
            prop_assert_eq!(result, Err(ValidationError::InvalidPeriod { days: period }));
        }
    }

    #[test]
    fn prop_only_known_libraries_accepted(library in proptest::option::of(-5i64..10)) {
        let rt = runtime();
        let client = loaded_member(&rt, 0);

        let result = client.reservations().validate(7, library);
        match library {
            Some(id @ (1 | 2)) => prop_assert_eq!(result, Ok(id)),
            _ => prop_assert_eq!(result, Err(ValidationError::MissingReturnLibrary)),
        }
    }
}

proptest! {
    #[test]
    fn prop_query_pairs_hold_only_present_fields(filters in arb_filters()) {
        let pairs = filters.query_pairs();

        for (key, value) in &pairs {
            prop_assert!(!value.trim().is_empty(), "blank value sent for {}", key);
        }

        let present = |field: &Option<String>| {
            field.as_deref().map_or(false, |v| !v.trim().is_empty())
        };
        let expected = [
            present(&filters.category),
            present(&filters.author),
            present(&filters.location),
            filters.available.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();
        prop_assert_eq!(pairs.len(), expected);
        prop_assert_eq!(filters.is_empty(), expected == 0);
    }

    #[test]
    fn prop_quota_remaining_never_negative(active in 0usize..20, max in 0usize..10) {
        let quota = ReservationQuota { active, max };
        prop_assert_eq!(quota.is_exhausted(), quota.remaining() == 0);
    }

    #[test]
    fn prop_placeholder_is_first_letter(title in "[a-z][a-zA-Z ]{0,20}") {
        let letter = placeholder_letter(&title);
        prop_assert_eq!(letter.clone(), title[..1].to_uppercase());
        prop_assert_eq!(
            CoverArt::for_entry(&title, &CoverEntry::NotFound),
            CoverArt::Placeholder(letter)
        );
    }
}
