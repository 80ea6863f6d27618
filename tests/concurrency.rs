//! Concurrency and thread safety tests for signmatch.

use std::sync::Arc;
use std::thread;

use signmatch::{Map, MapSet, MatchAgainst, Rect, Region, SignValue, Tag};

fn patterned_map(tag: &str, size: u32, seed: u8) -> Arc<Map> {
    let cells: Vec<SignValue> = (0..size as usize * size as usize)
        .map(|i| SignValue::new((i as u8).wrapping_mul(37).wrapping_add(seed)))
        .collect();
    Arc::new(Map::from_cells(Tag::new(tag).expect("tag"), size, size, cells).expect("map"))
}

#[test]
fn concurrent_matching_passes_are_deterministic() {
    let subject = patterned_map("subject", 12, 3);
    let set = Arc::new(
        MapSet::from_maps(vec![
            patterned_map("a", 3, 0),
            patterned_map("b", 3, 11),
            patterned_map("c", 3, 29),
        ])
        .expect("set"),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let subject = Arc::clone(&subject);
            let set = Arc::clone(&set);
            thread::spawn(move || subject.match_against(&set).expect("pass"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let first = &results[0];
    for (i, result) in results.iter().enumerate().skip(1) {
        assert_eq!(
            (first.width(), first.height()),
            (result.width(), result.height()),
            "thread {i} produced a different grid shape",
        );
        for y in 0..first.height() {
            for x in 0..first.width() {
                let a = first.get(x, y).expect("cell");
                let b = result.get(x, y).expect("cell");
                assert_eq!(
                    a.percent, b.percent,
                    "thread {i} diverged at ({x}, {y})",
                );
                assert_eq!(a.candidates.len(), b.candidates.len());
            }
        }
    }
}

#[test]
fn parallel_relation_search_matches_serial_expectations() {
    // One-letter tags planted at distinct placements; every word is
    // independent, so the rayon path must agree with what a serial reading
    // of the grid predicts.
    let mut cells = vec![SignValue::new(120); 36];
    let plant = |cells: &mut Vec<SignValue>, x: usize, y: usize, v: u8| {
        for dy in 0..2 {
            for dx in 0..2 {
                cells[(y + dy) * 6 + x + dx] = SignValue::new(v);
            }
        }
    };
    plant(&mut cells, 0, 0, 0);
    plant(&mut cells, 4, 0, 255);
    plant(&mut cells, 0, 4, 0);
    let subject =
        Map::from_cells(Tag::new("subject").expect("tag"), 6, 6, cells).expect("subject");

    let zero = Arc::new(
        Map::from_cells(
            Tag::new("z").expect("tag"),
            2,
            2,
            vec![SignValue::new(0); 4],
        )
        .expect("map"),
    );
    let full = Arc::new(
        Map::from_cells(
            Tag::new("f").expect("tag"),
            2,
            2,
            vec![SignValue::new(255); 4],
        )
        .expect("map"),
    );
    let set = MapSet::from_maps(vec![zero, full]).expect("set");
    let results = subject.match_against(&set).expect("pass");

    let words: Vec<String> = vec![
        "z".into(),
        "zz".into(),
        "zzz".into(),
        "zf".into(),
        "ff".into(),
        "q".into(),
    ];
    let matched = results.find_relation(&words, 0, 1).expect("relation");

    assert!(matched.contains("z"));
    assert!(matched.contains("zz"));
    assert!(matched.contains("zf"));
    assert!(!matched.contains("q"), "tag 'q' exists nowhere on the grid");
    // "f" wins only around its one planted block plus uniform background
    // windows, all of which carry "f": two disjoint "f" cells do exist.
    assert!(matched.contains("ff"));
}

#[test]
fn relation_errors_fail_the_whole_call() {
    let subject = patterned_map("subject", 6, 5);
    let set = MapSet::new(patterned_map("ab", 2, 5));
    let results = subject.match_against(&set).expect("pass");

    // One malformed word poisons the batch even though others are fine.
    let words: Vec<String> = vec!["ab".into(), "abc".into()];
    assert!(results.find_relation(&words, 0, 2).is_err());
}

#[test]
fn shared_region_reads_are_safe_across_threads() {
    let mut region = Region::new(8, 8).expect("region");
    region.add(Rect::new(0, 0, 4, 4).expect("rect")).expect("add");
    region.add(Rect::new(4, 4, 4, 4).expect("rect")).expect("add");
    let region = Arc::new(region);

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let region = Arc::clone(&region);
            thread::spawn(move || {
                let x = (i % 8) as u32;
                region.lookup(x, x).map(|r| (r.rect().x(), r.rect().y()))
            })
        })
        .collect();

    for handle in handles {
        let origin = handle.join().unwrap();
        assert!(matches!(origin, None | Some((0, 0)) | Some((4, 4))));
    }
}
