use jin::{
    roster::{DistributionTable, RoleDistribution, RosterErrorKind},
    types::RoleName,
};

#[test]
fn given_standard_table_when_expanding_each_row_then_role_count_matches_player_count() {
    let table = DistributionTable::standard();

    for count in 4..=10 {
        let row = table.get(count).expect("standard table covers 4 to 10");
        assert_eq!(row.total(), count);
        assert_eq!(row.expand().len(), count);
        assert!(row.quantity(RoleName::Ai) >= 1, "{count} players need an ai");
        assert_eq!(row.quantity(RoleName::Engineer), 1);
    }
}

#[test]
fn given_standard_table_when_eight_players_then_trickster_joins_the_cast() {
    let table = DistributionTable::standard();
    let row = table.get(8).expect("row for 8");

    assert_eq!(row.quantity(RoleName::Ai), 2);
    assert_eq!(row.quantity(RoleName::CyberGuard), 1);
    assert_eq!(row.quantity(RoleName::Citizen), 3);
    assert_eq!(row.quantity(RoleName::Trickster), 1);
    assert_eq!(row.quantity(RoleName::FakeAi), 0);
}

#[test]
fn given_count_outside_table_when_get_then_no_distribution_for_count() {
    let table = DistributionTable::standard();

    let err = table.get(3).expect_err("3 players has no row");
    assert_eq!(err.kind, RosterErrorKind::NoDistributionForCount);
    let err = table.get(11).expect_err("11 players has no row");
    assert_eq!(err.kind, RosterErrorKind::NoDistributionForCount);
}

#[test]
fn given_override_row_with_wrong_total_when_applied_then_invalid_distribution() {
    let err = DistributionTable::standard()
        .with_overrides([(
            5,
            RoleDistribution::new([(RoleName::Ai, 1), (RoleName::Citizen, 2)]),
        )])
        .expect_err("3 roles for 5 seats must fail");

    assert_eq!(err.kind, RosterErrorKind::InvalidDistribution);
}

#[test]
fn given_override_row_with_fake_ai_when_applied_then_row_is_replaced() {
    let table = DistributionTable::standard()
        .with_overrides([(
            5,
            RoleDistribution::new([
                (RoleName::Ai, 1),
                (RoleName::FakeAi, 1),
                (RoleName::Engineer, 1),
                (RoleName::Citizen, 2),
            ]),
        )])
        .expect("valid override");

    let row = table.get(5).expect("row for 5");
    assert_eq!(row.quantity(RoleName::FakeAi), 1);
    assert_eq!(row.quantity(RoleName::CyberGuard), 0);
    assert_eq!(table.get(6).expect("row for 6").total(), 6);
}

#[test]
fn given_narrow_table_when_checking_coverage_then_missing_count_is_reported() {
    let table = DistributionTable::from_rows(
        [(
            4,
            RoleDistribution::new([(RoleName::Ai, 1), (RoleName::Citizen, 3)]),
        )]
        .into_iter()
        .collect(),
    )
    .expect("single valid row");

    table.ensure_covers(4, 4).expect("4 is covered");
    let err = table.ensure_covers(4, 5).expect_err("5 is not covered");
    assert_eq!(err.kind, RosterErrorKind::NoDistributionForCount);
}
