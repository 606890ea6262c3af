use rand::{SeedableRng, rngs::StdRng};

use jin::{
    roster::{DistributionTable, RosterErrorKind, assign_deal, assign_roles},
    types::{Faction, Player, RoleName},
};

fn players(count: usize) -> Vec<Player> {
    (0..count)
        .map(|index| Player::new(format!("p{index}"), format!("Player {index}"), false))
        .collect()
}

fn sorted_roles(players: &[Player]) -> Vec<RoleName> {
    let mut roles: Vec<RoleName> = players
        .iter()
        .map(|player| player.role_name().expect("every player has a role"))
        .collect();
    roles.sort();
    roles
}

#[test]
fn given_supported_count_when_assigning_then_every_player_receives_a_role_from_the_row() {
    let table = DistributionTable::standard();
    let mut rng = StdRng::seed_from_u64(7);

    for count in 4..=10 {
        let mut seats = players(count);
        assign_roles(&mut seats, &table, &mut rng).expect("supported count");

        let mut expected = table.get(count).expect("row").expand();
        expected.sort();
        assert_eq!(sorted_roles(&seats), expected);
    }
}

#[test]
fn given_unsupported_count_when_assigning_then_players_are_left_untouched() {
    let table = DistributionTable::standard();
    let mut rng = StdRng::seed_from_u64(7);
    let mut seats = players(3);

    let err = assign_roles(&mut seats, &table, &mut rng).expect_err("3 is unsupported");

    assert_eq!(err.kind, RosterErrorKind::NoDistributionForCount);
    assert!(seats.iter().all(|player| player.role.is_none()));
}

#[test]
fn given_many_seeds_when_assigning_then_ai_seat_varies() {
    let table = DistributionTable::standard();
    let mut ai_seats = std::collections::BTreeSet::new();

    for seed in 0..64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut seats = players(4);
        assign_roles(&mut seats, &table, &mut rng).expect("4 is supported");
        let seat = seats
            .iter()
            .position(|player| player.role_name() == Some(RoleName::Ai))
            .expect("one ai per 4 players");
        ai_seats.insert(seat);
    }

    assert_eq!(ai_seats.len(), 4, "every seat should draw the ai at least once");
}

#[test]
fn given_explicit_deal_when_assigning_then_roles_land_positionally_with_factions() {
    use RoleName::{Ai, Citizen, CyberGuard, Engineer};
    let table = DistributionTable::standard();
    let mut seats = players(5);

    assign_deal(
        &mut seats,
        &table,
        vec![Citizen, Ai, Engineer, CyberGuard, Citizen],
    )
    .expect("deal matches the 5 player row");

    assert_eq!(seats[1].role_name(), Some(Ai));
    assert_eq!(seats[1].faction(), Some(Faction::Ai));
    assert_eq!(seats[2].faction(), Some(Faction::Human));
    assert_eq!(seats[0].role_name(), Some(Citizen));
}

#[test]
fn given_deal_that_differs_from_row_when_assigning_then_invalid_distribution() {
    use RoleName::{Ai, Citizen, Engineer};
    let table = DistributionTable::standard();
    let mut seats = players(4);

    let err = assign_deal(&mut seats, &table, vec![Ai, Ai, Engineer, Citizen])
        .expect_err("two ai is not the 4 player row");

    assert_eq!(err.kind, RosterErrorKind::InvalidDistribution);
    assert!(seats.iter().all(|player| player.role.is_none()));
}
