//! 토큰과 권한 판정의 속성 기반 테스트.

use access_api::auth::{authorize, Claims, Role, TokenRejection, TokenService};
use access_core::AuthConfig;
use chrono::Duration;
use proptest::prelude::*;

fn service() -> TokenService {
    TokenService::new(&AuthConfig::new(
        "property-test-secret-key-at-least-32-chars",
    ))
    .unwrap()
}

fn role_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("guest".to_string()),
        Just("user".to_string()),
        Just("manager".to_string()),
        Just("admin".to_string()),
        "[a-z]{0,10}",
    ]
}

fn claims_strategy() -> impl Strategy<Value = Claims> {
    (
        "[0-9]{1,10}",
        proptest::option::of("[A-Za-z가-힣 ]{1,20}"),
        proptest::option::of(role_label()),
        proptest::collection::btree_map("x_[a-z]{1,8}", any::<i32>(), 0..4),
    )
        .prop_map(|(sub, name, role, extra)| {
            let mut claims = Claims::new(sub);
            claims.name = name;
            claims.role = role;
            for (key, value) in extra {
                claims = claims.with_claim(key, value);
            }
            claims
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_issue_validate_round_trip(claims in claims_strategy(), minutes in 1i64..=1440) {
        let tokens = service();
        let token = tokens.issue_with_ttl(&claims, Duration::minutes(minutes)).unwrap();
        prop_assert_eq!(tokens.validate(&token).unwrap(), claims.clone());
        prop_assert_eq!(tokens.subject_of(&token), Some(claims.sub));
    }

    #[test]
    fn test_single_character_flip_is_rejected(
        claims in claims_strategy(),
        index in any::<proptest::sample::Index>(),
        replacement in prop::sample::select(vec!['A', 'b', '0', '_', '-', '.', '=']),
    ) {
        let tokens = service();
        let token = tokens.issue(&claims).unwrap();

        let position = index.index(token.len());
        let current = token.as_bytes()[position] as char;
        prop_assume!(current != replacement);

        let mut flipped = token.clone();
        flipped.replace_range(position..position + 1, &replacement.to_string());

        let result = tokens.validate(&flipped);
        prop_assert!(
            matches!(result, Err(TokenRejection::Tampered | TokenRejection::Malformed)),
            "unexpected result: {:?}",
            result
        );
    }

    #[test]
    fn test_validate_never_panics(input in ".{0,200}") {
        let _ = service().validate(&input);
    }

    #[test]
    fn test_authorize_matches_rank_order(actual in role_label(), required in role_label()) {
        let expected = Role::from_label(&actual).rank() >= Role::from_label(&required).rank();
        prop_assert_eq!(authorize(&actual, &required), expected);
        prop_assert!(authorize(&actual, &actual));
    }
}

#[test]
fn test_manager_token_scenario() {
    let tokens = service();
    let claims = Claims::new("42").with_role("manager");

    let token = tokens.issue_with_ttl(&claims, Duration::minutes(30)).unwrap();
    let decoded = tokens.validate(&token).unwrap();

    assert_eq!(decoded.sub, "42");
    assert_eq!(decoded.role.as_deref(), Some("manager"));
    assert!(authorize("manager", "user"));
    assert!(!authorize("manager", "admin"));
}

#[test]
fn test_expired_by_one_second() {
    let tokens = service();
    let token = tokens
        .issue_with_ttl(&Claims::new("42"), Duration::seconds(-1))
        .unwrap();
    assert_eq!(tokens.validate(&token), Err(TokenRejection::Expired));
}
