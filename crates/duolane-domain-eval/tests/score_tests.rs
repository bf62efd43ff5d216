use duolane_domain_eval::{Judgement, JudgementTally, ScoreState};
use pretty_assertions::assert_eq;

#[test]
fn first_great_includes_combo_bonus() {
    let mut score = ScoreState::new();

    let gained = score.register(Judgement::Great);

    assert_eq!(gained, 301);
    assert_eq!(score.score(), 301);
    assert_eq!(score.combo(), 1);
    assert_eq!(score.max_combo(), 1);
}

#[test]
fn first_good_scores_151() {
    let mut score = ScoreState::new();
    score.register(Judgement::Good);
    assert_eq!(score.score(), 151);
    assert_eq!(score.combo(), 1);
}

#[test]
fn bonus_uses_post_increment_combo() {
    let mut score = ScoreState::new();
    let mut expected = 0;

    for c in 1..=9u64 {
        let judgement = if c % 3 == 0 {
            Judgement::Good
        } else {
            Judgement::Great
        };
        let gained = score.register(judgement);
        let bonus = (c as f64 * 1.5).floor() as u64;
        assert_eq!(gained, judgement.base_points() + bonus);
        expected += gained;
    }

    assert_eq!(score.score(), expected);
    assert_eq!(score.combo(), 9);
}

#[test]
fn miss_resets_combo_but_keeps_score_and_max() {
    let mut score = ScoreState::new();
    score.register(Judgement::Great);
    score.register(Judgement::Great);
    score.register(Judgement::Great);
    let before = score.score();

    assert_eq!(score.register(Judgement::Miss), 0);

    assert_eq!(score.combo(), 0);
    assert_eq!(score.max_combo(), 3);
    assert_eq!(score.score(), before);
}

#[test]
fn max_combo_never_decreases() {
    let mut score = ScoreState::new();
    let sequence = [
        Judgement::Great,
        Judgement::Good,
        Judgement::Miss,
        Judgement::Great,
        Judgement::Miss,
        Judgement::Miss,
        Judgement::Good,
        Judgement::Good,
        Judgement::Good,
    ];

    let mut last_max = 0;
    for judgement in sequence {
        score.register(judgement);
        assert!(score.max_combo() >= last_max);
        if judgement.is_miss() {
            assert_eq!(score.combo(), 0);
        }
        last_max = score.max_combo();
    }

    assert_eq!(score.max_combo(), 3);
    assert_eq!(
        score.tally(),
        JudgementTally {
            great: 2,
            good: 4,
            miss: 3,
        }
    );
}

#[test]
fn accuracy_counts_non_miss_share() {
    let mut score = ScoreState::new();
    assert_eq!(score.accuracy(), 0.0);

    score.register(Judgement::Great);
    score.register(Judgement::Good);
    score.register(Judgement::Good);
    score.register(Judgement::Miss);

    assert_eq!(score.accuracy(), 0.75);
}
