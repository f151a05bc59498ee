//! Integration tests for winner declaration and bye resolution.

use tournament_bracket_web::{
    advance_byes, declare_winner, next_slot_index, AdvanceError, Bracket, GameMatch, MatchStatus,
    Round, Team,
};

fn team(id: u64) -> Team {
    Team::new(id, format!("T{id}"))
}

/// First round fully seeded with `2 * first_round_matches` teams (ids 1..), later rounds empty.
fn seeded_bracket(first_round_matches: u32) -> Bracket {
    let mut rounds = Vec::new();
    let first = (0..first_round_matches)
        .map(|i| {
            let id = u64::from(i) * 2 + 1;
            GameMatch::new(i, Some(team(id)), Some(team(id + 1)))
        })
        .collect();
    rounds.push(Round::new("round_1", first));
    let mut size = first_round_matches;
    let mut number = 2;
    while size > 1 {
        size = size.div_ceil(2);
        rounds.push(Round::new(
            format!("round_{number}"),
            (0..size).map(GameMatch::empty).collect(),
        ));
        number += 1;
    }
    Bracket::new(rounds).unwrap()
}

fn slot_teams(m: &GameMatch) -> (Option<u64>, Option<u64>) {
    (
        m.team_1.as_ref().map(|t| t.id),
        m.team_2.as_ref().map(|t| t.id),
    )
}

#[test]
fn winners_meet_in_next_round() {
    // round_1: [0: T1 v T2, 1: T3 v T4], round_2: [0: empty]
    let b = seeded_bracket(2);
    let b = declare_winner(&b, "round_1", 0, &team(1)).unwrap();
    let b = declare_winner(&b, "round_1", 1, &team(4)).unwrap();

    let final_match = &b.round("round_2").unwrap().matches[0];
    assert_eq!(slot_teams(final_match), (Some(1), Some(4)));
    assert_eq!(final_match.status(), MatchStatus::Playable);
}

#[test]
fn last_round_winner_places_nothing() {
    let b = seeded_bracket(2);
    let b = declare_winner(&b, "round_1", 0, &team(1)).unwrap();
    let b = declare_winner(&b, "round_1", 1, &team(4)).unwrap();
    let before_final = b.clone();

    let after = declare_winner(&b, "round_2", 0, &team(4)).unwrap();

    assert_eq!(after.round("round_1"), before_final.round("round_1"));
    let final_match = &after.round("round_2").unwrap().matches[0];
    assert_eq!(slot_teams(final_match), (Some(1), Some(4)));
    assert_eq!(final_match.winner, Some(team(4)));
    assert_eq!(after.rounds().len(), 2);
    assert_eq!(after.champion(), Some(&team(4)));
}

#[test]
fn first_reported_feeder_fills_team_1() {
    let b = seeded_bracket(2);
    // Match 1 reports before match 0.
    let b = declare_winner(&b, "round_1", 1, &team(3)).unwrap();
    assert_eq!(
        slot_teams(&b.round("round_2").unwrap().matches[0]),
        (Some(3), None)
    );
    let b = declare_winner(&b, "round_1", 0, &team(2)).unwrap();
    assert_eq!(
        slot_teams(&b.round("round_2").unwrap().matches[0]),
        (Some(3), Some(2))
    );
}

#[test]
fn unrelated_matches_are_untouched() {
    // 8 teams: 4 + 2 + 1 matches.
    let original = seeded_bracket(4);
    let after = declare_winner(&original, "round_1", 2, &team(6)).unwrap();

    // Input value unchanged.
    assert_eq!(original, seeded_bracket(4));

    let (r1_before, r1_after) = (&original.rounds()[0], &after.rounds()[0]);
    for (i, (b, a)) in r1_before.matches.iter().zip(&r1_after.matches).enumerate() {
        if i == 2 {
            assert_eq!(a.winner, Some(team(6)));
            assert_eq!(slot_teams(a), slot_teams(b));
        } else {
            assert_eq!(a, b);
        }
    }

    let r2 = &after.rounds()[1];
    assert_eq!(r2.matches[0], original.rounds()[1].matches[0]);
    assert_eq!(slot_teams(&r2.matches[1]), (Some(6), None));
    assert_eq!(r2.matches[1].winner, None);

    assert_eq!(after.rounds()[2], original.rounds()[2]);
}

#[test]
fn destination_is_half_the_match_id() {
    for id in 0..8 {
        assert_eq!(next_slot_index(id), (id / 2) as usize);
    }

    // 16 teams: a first round of 8 matches, ids 0..=7, each one checked.
    let mut b = seeded_bracket(8);
    for id in 0..8u32 {
        let winner = team(u64::from(id) * 2 + 1);
        b = declare_winner(&b, "round_1", id, &winner).unwrap();
        let target = &b.round("round_2").unwrap().matches[(id / 2) as usize];
        let placed = if id % 2 == 0 { &target.team_1 } else { &target.team_2 };
        assert_eq!(placed.as_ref(), Some(&winner), "match {id}");
    }
    let r2 = b.round("round_2").unwrap();
    assert!(r2.matches.iter().all(|m| m.status() == MatchStatus::Playable));
}

#[test]
fn declared_match_is_decided_with_an_original_occupant() {
    let b = seeded_bracket(2);
    let original = b.round("round_1").unwrap().matches[1].clone();
    let after = declare_winner(&b, "round_1", 1, &team(3)).unwrap();

    let m = after.round("round_1").unwrap().get(1).unwrap();
    assert_eq!(m.status(), MatchStatus::Decided);
    let winner = m.winner.as_ref().unwrap();
    assert_eq!(winner, &team(3));
    assert!(original.team_1.as_ref() == Some(winner) || original.team_2.as_ref() == Some(winner));
}

#[test]
fn unknown_round_and_match_are_refused() {
    let b = seeded_bracket(2);
    assert_eq!(
        declare_winner(&b, "round_9", 0, &team(1)),
        Err(AdvanceError::UnknownRound("round_9".to_string()))
    );
    assert_eq!(
        declare_winner(&b, "round_1", 5, &team(1)),
        Err(AdvanceError::UnknownMatch {
            round: "round_1".to_string(),
            match_id: 5
        })
    );
}

#[test]
fn second_declaration_for_a_match_is_a_conflict() {
    let b = seeded_bracket(2);
    let b = declare_winner(&b, "round_1", 0, &team(1)).unwrap();
    let err = declare_winner(&b, "round_1", 0, &team(2)).unwrap_err();
    assert_eq!(
        err,
        AdvanceError::AlreadyDecided {
            round: "round_1".to_string(),
            match_id: 0
        }
    );
    // Destination still holds only the first winner.
    assert_eq!(
        slot_teams(&b.round("round_2").unwrap().matches[0]),
        (Some(1), None)
    );
}

#[test]
fn winner_must_play_in_the_match() {
    let b = seeded_bracket(2);
    assert!(matches!(
        declare_winner(&b, "round_1", 0, &team(3)),
        Err(AdvanceError::WinnerNotInMatch {
            match_id: 0,
            team_id: 3
        })
    ));
}

#[test]
fn match_waiting_for_a_feeder_is_not_playable() {
    let b = seeded_bracket(2);
    let b = declare_winner(&b, "round_1", 0, &team(1)).unwrap();
    // round_2 match 0 has T1 but still waits for the winner of match 1.
    assert!(!b.is_playable(1, 0));
    assert!(matches!(
        declare_winner(&b, "round_2", 0, &team(1)),
        Err(AdvanceError::NotPlayable { .. })
    ));
}

#[test]
fn full_destination_is_refused() {
    let b = Bracket::new(vec![
        Round::new(
            "round_1",
            vec![
                GameMatch::new(0, Some(team(1)), Some(team(2))),
                GameMatch::new(1, Some(team(3)), Some(team(4))),
            ],
        ),
        Round::new("round_2", vec![GameMatch::new(0, Some(team(7)), Some(team(8)))]),
    ])
    .unwrap();
    let before = b.clone();
    assert_eq!(
        declare_winner(&b, "round_1", 0, &team(1)),
        Err(AdvanceError::SlotOccupied {
            round: "round_2".to_string(),
            match_id: 0
        })
    );
    assert_eq!(b, before);
}

fn three_team_bracket() -> Bracket {
    Bracket::new(vec![
        Round::new(
            "round_1",
            vec![
                GameMatch::new(0, Some(team(1)), Some(team(2))),
                GameMatch::new(1, Some(team(3)), None),
            ],
        ),
        Round::new("round_2", vec![GameMatch::empty(0)]),
    ])
    .unwrap()
}

#[test]
fn bye_can_be_declared_by_hand() {
    let b = three_team_bracket();
    assert!(b.is_playable(0, 1));
    assert_eq!(b.round("round_1").unwrap().matches[1].status(), MatchStatus::EmptySlots);

    let b = declare_winner(&b, "round_1", 1, &team(3)).unwrap();
    let b = declare_winner(&b, "round_1", 0, &team(2)).unwrap();
    assert_eq!(
        slot_teams(&b.round("round_2").unwrap().matches[0]),
        (Some(3), Some(2))
    );
}

#[test]
fn advance_byes_resolves_first_round_byes_only() {
    let b = advance_byes(&three_team_bracket());
    let r1 = b.round("round_1").unwrap();
    assert_eq!(r1.matches[0].winner, None);
    assert_eq!(r1.matches[1].winner, Some(team(3)));
    assert_eq!(
        slot_teams(&b.round("round_2").unwrap().matches[0]),
        (Some(3), None)
    );
}

#[test]
fn advance_byes_follows_single_feeder_matches() {
    // 5 teams: round_1 has 3 matches (last one a bye), round_2 has 2, round_3 has 1.
    let b = Bracket::new(vec![
        Round::new(
            "round_1",
            vec![
                GameMatch::new(0, Some(team(1)), Some(team(2))),
                GameMatch::new(1, Some(team(3)), Some(team(4))),
                GameMatch::new(2, Some(team(5)), None),
            ],
        ),
        Round::new("round_2", vec![GameMatch::empty(0), GameMatch::empty(1)]),
        Round::new("round_3", vec![GameMatch::empty(0)]),
    ])
    .unwrap();
    assert_eq!(b.feeder_count(1, 1), 1);
    assert_eq!(b.feeder_count(1, 0), 2);

    let b = advance_byes(&b);
    assert_eq!(b.rounds()[0].matches[2].winner, Some(team(5)));
    assert_eq!(b.rounds()[1].matches[1].winner, Some(team(5)));
    assert_eq!(slot_teams(&b.rounds()[2].matches[0]), (Some(5), None));
    assert_eq!(b.rounds()[0].matches[0].winner, None);
    assert_eq!(b.rounds()[1].matches[0].status(), MatchStatus::EmptySlots);
}

#[test]
fn advance_byes_leaves_full_bracket_alone() {
    let b = seeded_bracket(4);
    assert_eq!(advance_byes(&b), b);
}
