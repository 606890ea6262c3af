use jin::{resolution::resolve_votes, types::VoteRecord};

fn vote(voter: &str, target: &str, turn: u32) -> VoteRecord {
    VoteRecord {
        voter_id: voter.to_string(),
        target_id: target.to_string(),
        turn,
    }
}

#[test]
fn given_unique_maximum_when_resolving_votes_then_target_is_eliminated() {
    let votes = vec![
        vote("a", "x", 1),
        vote("b", "x", 1),
        vote("c", "y", 1),
    ];

    let resolved = resolve_votes(&votes, 1);

    assert_eq!(resolved.eliminated.as_deref(), Some("x"));
    assert_eq!(resolved.tally[0].target_id, "x");
    assert_eq!(resolved.tally[0].votes, 2);
    assert_eq!(resolved.tally[1].votes, 1);
}

#[test]
fn given_tie_at_maximum_when_resolving_votes_then_nobody_is_eliminated() {
    let votes = vec![
        vote("a", "x", 1),
        vote("b", "x", 1),
        vote("c", "y", 1),
        vote("d", "y", 1),
        vote("e", "z", 1),
    ];

    let resolved = resolve_votes(&votes, 1);

    assert_eq!(resolved.eliminated, None);
    assert_eq!(resolved.tally.len(), 3);
    assert_eq!(resolved.tally[0].target_id, "x");
    assert_eq!(resolved.tally[1].target_id, "y");
}

#[test]
fn given_no_votes_this_turn_when_resolving_then_empty_tally() {
    let votes = vec![vote("a", "x", 1)];

    let resolved = resolve_votes(&votes, 2);

    assert!(resolved.tally.is_empty());
    assert_eq!(resolved.eliminated, None);
}

#[test]
fn given_single_vote_when_resolving_then_that_target_is_eliminated() {
    let resolved = resolve_votes(&[vote("a", "x", 3)], 3);

    assert_eq!(resolved.eliminated.as_deref(), Some("x"));
}
