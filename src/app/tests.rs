use super::chain::*;
use super::episode::*;
use super::library::*;
use crate::db::PlanEntry;

fn ep(rank: u32, title: &str, season: u32, episode: u32) -> Episode {
    Episode {
        rank,
        title: title.to_string(),
        season,
        episode,
    }
}

#[test]
fn may_follow_requires_later_slot_and_better_rank() {
    let early_worse = ep(5, "Early", 1, 1);
    let late_better = ep(3, "Late", 1, 2);
    let late_worse = ep(7, "Later Still", 2, 1);

    assert!(may_follow(&early_worse, &late_better));
    assert!(!may_follow(&late_better, &early_worse));
    assert!(!may_follow(&early_worse, &late_worse));
}

#[test]
fn single_episode_plan_returns_that_episode() {
    let only = ep(1, "Only One", 1, 1);
    let plan = longest_watch_chain(std::slice::from_ref(&only)).expect("plan should succeed");
    assert_eq!(plan, vec![only]);
}

#[test]
fn aligned_ranking_is_planned_in_full() {
    let episodes = vec![
        ep(5, "Opener", 1, 1),
        ep(3, "Middle", 1, 2),
        ep(1, "Closer", 1, 3),
    ];
    let plan = longest_watch_chain(&episodes).expect("plan should succeed");
    assert_eq!(plan, episodes);
}

#[test]
fn reversed_ranking_yields_single_episode() {
    let episodes = vec![
        ep(1, "Peak First", 1, 1),
        ep(2, "Decline", 1, 2),
        ep(3, "Worst Last", 1, 3),
    ];
    let plan = longest_watch_chain(&episodes).expect("plan should succeed");
    assert_eq!(plan, vec![episodes[0].clone()]);
}

#[test]
fn mixed_ranking_picks_the_unique_longest_chain() {
    let episodes = vec![
        ep(5, "One", 1, 1),
        ep(1, "Two", 1, 2),
        ep(4, "Three", 1, 3),
        ep(3, "Four", 1, 4),
        ep(2, "Five", 1, 5),
    ];
    let plan = longest_watch_chain(&episodes).expect("plan should succeed");
    assert_eq!(
        plan,
        vec![
            episodes[0].clone(),
            episodes[2].clone(),
            episodes[3].clone(),
            episodes[4].clone(),
        ]
    );
    for pair in plan.windows(2) {
        assert!(
            pair[0].airs_before(&pair[1]),
            "plan must move forward in broadcast order"
        );
        assert!(
            pair[1].rank < pair[0].rank,
            "plan must move upward in quality"
        );
    }
}

#[test]
fn plan_is_independent_of_input_order() {
    let one = ep(5, "One", 1, 1);
    let two = ep(1, "Two", 1, 2);
    let three = ep(4, "Three", 1, 3);
    let four = ep(3, "Four", 1, 4);
    let five = ep(2, "Five", 1, 5);

    let shuffled = vec![
        four.clone(),
        one.clone(),
        five.clone(),
        three.clone(),
        two.clone(),
    ];
    let plan = longest_watch_chain(&shuffled).expect("plan should succeed");
    assert_eq!(plan, vec![one, three, four, five]);
}

#[test]
fn equal_length_chains_resolve_to_first_seen_endpoint() {
    let episodes = vec![
        ep(2, "A", 1, 1),
        ep(1, "B", 1, 2),
        ep(4, "C", 1, 3),
        ep(3, "D", 1, 4),
    ];
    let plan = longest_watch_chain(&episodes).expect("plan should succeed");
    assert_eq!(plan, vec![episodes[0].clone(), episodes[1].clone()]);
}

#[test]
fn repeated_runs_return_identical_plans() {
    let episodes = vec![
        ep(2, "A", 1, 1),
        ep(1, "B", 1, 2),
        ep(4, "C", 1, 3),
        ep(3, "D", 1, 4),
    ];
    let first = longest_watch_chain(&episodes).expect("first run should succeed");
    let second = longest_watch_chain(&episodes).expect("second run should succeed");
    assert_eq!(first, second);
}

#[test]
fn seasons_order_lexicographically() {
    let episodes = vec![
        ep(3, "Season One Finale", 1, 9),
        ep(2, "Season Two Opener", 2, 1),
        ep(1, "Season Two Second", 2, 2),
    ];
    let plan = longest_watch_chain(&episodes).expect("plan should succeed");
    assert_eq!(plan, episodes);
}

#[test]
fn duplicate_rank_is_rejected() {
    let episodes = vec![ep(3, "First", 1, 1), ep(3, "Second", 1, 2)];
    let err = longest_watch_chain(&episodes).expect_err("duplicate rank should be rejected");
    assert_eq!(
        err,
        LibraryError::DuplicateRank {
            rank: 3,
            first: "First".to_string(),
            second: "Second".to_string(),
        }
    );
}

#[test]
fn duplicate_slot_is_rejected() {
    let episodes = vec![ep(1, "First", 2, 4), ep(2, "Second", 2, 4)];
    let err = longest_watch_chain(&episodes).expect_err("duplicate slot should be rejected");
    assert_eq!(
        err,
        LibraryError::DuplicateSlot {
            season: 2,
            episode: 4,
            first: "First".to_string(),
            second: "Second".to_string(),
        }
    );
}

#[test]
fn empty_library_is_rejected() {
    let err = longest_watch_chain(&[]).expect_err("empty ranking should be rejected");
    assert_eq!(err, LibraryError::EmptyLibrary);
}

#[test]
fn parse_ranking_reads_rows_in_file_order() {
    let raw = "rank,title,season,episode\n3,Pilot,1,1\n1,Finale,1,3\n2,Middle,1,2\n";
    let (episodes, skipped) = parse_ranking(raw).expect("ranking should parse");
    assert_eq!(skipped, 0);
    assert_eq!(
        episodes,
        vec![
            ep(3, "Pilot", 1, 1),
            ep(1, "Finale", 1, 3),
            ep(2, "Middle", 1, 2),
        ]
    );
}

#[test]
fn parse_ranking_accepts_any_header_column_order() {
    let raw = "title,episode,season,rank\nPilot,1,1,3\n";
    let (episodes, skipped) = parse_ranking(raw).expect("ranking should parse");
    assert_eq!(skipped, 0);
    assert_eq!(episodes, vec![ep(3, "Pilot", 1, 1)]);
}

#[test]
fn parse_ranking_handles_quoted_titles() {
    let raw = concat!(
        "rank,title,season,episode\n",
        "4,\"The Veiled Lady, Revisited\",2,2\n",
        "5,\"The \"\"Big\"\" Four\",3,1\n",
    );
    let (episodes, skipped) = parse_ranking(raw).expect("ranking should parse");
    assert_eq!(skipped, 0);
    assert_eq!(episodes[0].title, "The Veiled Lady, Revisited");
    assert_eq!(episodes[1].title, "The \"Big\" Four");
}

#[test]
fn parse_ranking_skips_malformed_rows() {
    let raw = concat!(
        "rank,title,season,episode\n",
        "1,Good Row,1,1\n",
        "not-a-number,Bad Rank,1,2\n",
        "2,Missing Episode,1,\n",
        "0,Zero Rank,1,3\n",
        "3,Another Good Row,1,4\n",
    );
    let (episodes, skipped) = parse_ranking(raw).expect("ranking should parse");
    assert_eq!(skipped, 3);
    assert_eq!(
        episodes,
        vec![ep(1, "Good Row", 1, 1), ep(3, "Another Good Row", 1, 4)]
    );
}

#[test]
fn parse_ranking_requires_header() {
    let err = parse_ranking("").expect_err("empty input should fail");
    assert!(
        err.to_string().contains("header"),
        "unexpected error: {err}"
    );
}

#[test]
fn parse_ranking_requires_every_column() {
    let err = parse_ranking("rank,title,season\n1,Pilot,1\n")
        .expect_err("missing column should fail");
    assert!(
        err.to_string().contains("episode"),
        "unexpected error: {err}"
    );
}

#[test]
fn episode_code_pads_to_two_digits() {
    assert_eq!(episode_code(2, 3), "S02E03");
    assert_eq!(episode_code(12, 25), "S12E25");
}

#[test]
fn plan_line_matches_display_shape() {
    let entry = PlanEntry {
        position: 1,
        rank: 4,
        title: "The Third Floor Flat".to_string(),
        season: 1,
        episode: 5,
        watched_at: None,
    };
    assert_eq!(
        format_plan_line(&entry),
        "  1  04. The Third Floor Flat (S01E05)"
    );
}

#[test]
fn watched_display_falls_back_to_raw_value() {
    assert_eq!(format_watched_display("not-a-date"), "not-a-date");
}
