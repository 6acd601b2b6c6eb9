use super::*;

#[test]
fn seeded_rng_is_reproducible() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..64 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn unit_floats_stay_in_range() {
    let mut rng = Rng64::new(7);
    for _ in 0..10_000 {
        let v = rng.next_f64_01();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn next_index_covers_every_bucket() {
    let mut rng = Rng64::new(3);
    let mut seen = [0usize; 3];
    for _ in 0..3_000 {
        seen[rng.next_index(3)] += 1;
    }
    for count in seen {
        assert!(count > 800, "bucket underfilled: {seen:?}");
    }
}

#[test]
fn chance_respects_extremes() {
    let mut rng = Rng64::new(11);
    for _ in 0..100 {
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
    }
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}
