use pagesim::core::policy::{LruPolicy, ReplacementPolicy, RoundRobinPolicy};

#[test]
fn test_round_robin_cycles_through_slots() {
    let mut rr = RoundRobinPolicy::new(4);
    let victims: Vec<_> = (0..6).map(|_| rr.victim(&|_| true).unwrap()).collect();
    assert_eq!(victims, vec![0, 1, 2, 3, 0, 1]);
}

#[test]
fn test_round_robin_advances_past_examined_slots() {
    let mut rr = RoundRobinPolicy::new(8);

    assert_eq!(rr.victim(&|s| s == 5), Some(5));
    assert_eq!(rr.position(), 6);

    // Wraps around to reach slot 2.
    assert_eq!(rr.victim(&|s| s == 2), Some(2));
    assert_eq!(rr.position(), 3);
}

#[test]
fn test_round_robin_gives_up_after_full_cycle() {
    let mut rr = RoundRobinPolicy::new(8);
    rr.victim(&|s| s == 2);

    assert_eq!(rr.victim(&|_| false), None);
    assert_eq!(rr.position(), 3);
}

#[test]
fn test_round_robin_ignores_touch() {
    let mut rr = RoundRobinPolicy::new(4);
    rr.touch(0, 100);
    assert_eq!(rr.victim(&|_| true), Some(0));
}

#[test]
fn test_lru_picks_oldest_stamp() {
    let mut lru = LruPolicy::new(4);
    lru.touch(0, 5);
    lru.touch(1, 2);
    lru.touch(2, 7);
    lru.touch(3, 4);

    assert_eq!(lru.victim(&|_| true), Some(1));
    assert_eq!(lru.stamp(1), 2);
}

#[test]
fn test_lru_ties_go_to_lowest_slot() {
    let mut lru = LruPolicy::new(4);
    lru.touch(0, 9);
    lru.touch(1, 3);
    lru.touch(2, 3);
    lru.touch(3, 3);

    assert_eq!(lru.victim(&|_| true), Some(1));
    assert_eq!(lru.victim(&|s| s != 1), Some(2));
}

#[test]
fn test_lru_respects_eligibility() {
    let mut lru = LruPolicy::new(4);
    lru.touch(2, 10);
    lru.touch(3, 20);

    assert_eq!(lru.victim(&|s| s >= 2), Some(2));
    assert_eq!(lru.victim(&|_| false), None);
}
