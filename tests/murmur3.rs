extern crate hashgauge;

use hashgauge::func::{Murmur3, Unseeded};
use hashgauge::metric::Grade;
use hashgauge::suite::{self, Test};
use hashgauge::{Hash, HashFn, Key, Seed, Settings, Thresholds};

fn hex(s: &str, seed: u32) -> String {
    Murmur3.hash(&Key::from(s), Seed::S32(seed)).to_hex()
}

#[test]
fn vectors() {
    assert_eq!(hex("", 0), "00000000");
    assert_eq!(hex("a", 0), "b269253c");
    assert_eq!(hex("hello", 0), "47fa8b24");
    assert_eq!(hex("hello", 42), "e1d2dbe2");
}

#[test]
fn verification() {
    let settings = Settings::single_threaded();
    assert_eq!(suite::Verification.run(&Murmur3, &settings).unwrap(), 0xB0F57EE3);
}

#[test]
fn small_suite() {
    let settings = Settings::default();
    let thresholds = Thresholds::default();

    let sanity = suite::Sanity { max: 8, reps: 2, ..suite::Sanity::default() };
    assert_eq!(sanity.run(&Murmur3, &settings).unwrap(), 0.0);

    let avalanche = suite::Avalanche { reps: 4000, ..suite::Avalanche::default() };
    // Sampling noise at this size is a few percent; a broken hash scores 1.
    assert!(avalanche.run(&Murmur3, &settings).unwrap().worst() < 0.12);

    let sparse = suite::Sparse::default();
    let collisions = sparse.run(&Murmur3, &settings).unwrap();
    assert_eq!(collisions.count, 5489);
    assert!(thresholds.collision_passes(collisions.ratio(), true));

    let cyclic = suite::Cyclic { count: 2000, ..suite::Cyclic::default() };
    assert!(thresholds.collision_passes(cyclic.run(&Murmur3, &settings).unwrap().ratio(), true));

    let text = suite::Text::default();
    assert!(thresholds.collision_passes(text.run(&Murmur3, &settings).unwrap(), true));

    let permutation = suite::Permutation::default();
    assert!(thresholds.collision_passes(permutation.run(&Murmur3, &settings).unwrap(), true));

    let moments = suite::MomentChi2Test { count: 50_000, ..suite::MomentChi2Test::default() };
    assert!(moments.run(&Murmur3, &settings).unwrap().grade() <= Grade::Pass);
}

#[test]
fn windowed_stays_under_cap() {
    // A 256-bit hash never expects half a collision, so the window grows to the 25-bit cap.
    assert_eq!(suite::window_width(12, 256, 32), 25);
    assert_eq!(suite::window_width(12, 32, 32), 17);
}

#[test]
fn unseeded_functions() {
    let length = Unseeded(|key: &Key| Hash::H32(key.size() as u32));
    let zeroes = suite::Zeroes { max: 100, ..suite::Zeroes::default() };
    assert_eq!(zeroes.run(&length, &Settings::single_threaded()).unwrap().collisions, 0);

    let twobytes = suite::TwoBytes { size: 2, ..suite::TwoBytes::default() };
    // Every two-byte key has the same length.
    assert_eq!(twobytes.run(&length, &Settings::single_threaded()).unwrap().collisions, 65535);
}

#[test]
fn cancelled_suite() {
    let settings = Settings::single_threaded();
    settings.cancel.cancel();
    let test = suite::Collision { count: 10, ..suite::Collision::default() };
    assert_eq!(test.run(&Murmur3, &settings).err(), Some(hashgauge::Error::Cancelled));
}
