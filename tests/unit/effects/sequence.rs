use super::*;

fn feed_all(m: &mut SequenceMatcher, keys: &[&str]) -> usize {
    let mut fired = 0;
    for key in keys {
        if m.feed(*key) {
            fired += 1;
        }
    }
    fired
}

#[test]
fn empty_target_is_rejected() {
    assert!(SequenceMatcher::<String>::new(Vec::new()).is_err());
}

#[test]
fn exact_sequence_fires_once() {
    let mut m = SequenceMatcher::konami();
    assert_eq!(feed_all(&mut m, &KONAMI), 1);
    assert_eq!(m.progress(), 0);
    assert_eq!(m.fired_count(), 1);
}

#[test]
fn a_substitution_anywhere_prevents_firing() {
    for i in 0..KONAMI.len() {
        let mut m = SequenceMatcher::konami();
        let mut keys = KONAMI.to_vec();
        keys[i] = "x";
        let fired = feed_all(&mut m, &keys[..=i]);
        assert_eq!(fired, 0);
        assert_eq!(m.progress(), 0, "substitution at {i}");
        assert_eq!(feed_all(&mut m, &keys[i + 1..]), 0);
        assert_eq!(m.fired_count(), 0);
    }
}

#[test]
fn back_to_back_sequences_fire_twice() {
    let mut m = SequenceMatcher::konami();
    let twice: Vec<&str> = KONAMI.iter().chain(KONAMI.iter()).copied().collect();
    assert_eq!(feed_all(&mut m, &twice), 2);
}

#[test]
fn mismatch_does_not_rescan_the_offending_input() {
    // "ArrowUp ArrowUp ArrowUp ..." : the third ArrowUp mismatches ArrowDown and resets to 0
    // without counting itself as a fresh start.
    let mut m = SequenceMatcher::konami();
    feed_all(&mut m, &["ArrowUp", "ArrowUp", "ArrowUp"]);
    assert_eq!(m.progress(), 0);
    assert_eq!(feed_all(&mut m, &KONAMI[1..]), 0);

    let mut m = SequenceMatcher::new(vec![1, 1, 2]).unwrap();
    assert!(!m.feed(&1));
    assert!(!m.feed(&1));
    assert!(!m.feed(&1));
    assert!(!m.feed(&2));
    assert_eq!(m.progress(), 0);
}

#[test]
fn reset_drops_partial_progress() {
    let mut m = SequenceMatcher::new(vec!['a', 'b']).unwrap();
    m.feed(&'a');
    assert_eq!(m.progress(), 1);
    m.reset();
    assert_eq!(m.progress(), 0);
    assert!(!m.feed(&'b'));
    assert!(!m.feed(&'a'));
    assert!(m.feed(&'b'));
}
