use showroom::lod::{DEGRADE_FAR, DEGRADE_MID, QualityLevel, select};

#[test]
fn should_keep_the_highest_detail_slot_up_to_the_first_threshold() {
    assert_eq!(select(0.0, QualityLevel::Auto), 2);
    assert_eq!(select(10.0, QualityLevel::Auto), 2);
    // Thresholds are strict: exactly 15.0 does not yet degrade.
    assert_eq!(select(DEGRADE_MID, QualityLevel::Auto), 2);
}

#[test]
fn should_degrade_strictly_beyond_each_threshold() {
    assert_eq!(select(15.0001, QualityLevel::Auto), 1);
    assert_eq!(select(29.9, QualityLevel::Auto), 1);
    assert_eq!(select(DEGRADE_FAR, QualityLevel::Auto), 1);
    assert_eq!(select(30.0001, QualityLevel::Auto), 0);
    assert_eq!(select(1000.0, QualityLevel::Auto), 0);
}

#[test]
fn should_never_gain_detail_as_distance_grows() {
    let mut previous = 2;
    for step in 0..4000 {
        let distance = step as f32 * 0.1;
        let slot = select(distance, QualityLevel::Auto);
        assert!(
            slot <= previous,
            "detail increased from {} to {} at distance {}",
            previous,
            slot,
            distance
        );
        previous = slot;
    }
}

#[test]
fn should_pin_the_slot_for_fixed_quality_levels() {
    for distance in [0.0, 14.9, 15.0, 16.0, 30.0, 31.0, 500.0] {
        assert_eq!(select(distance, QualityLevel::Low), 0);
        assert_eq!(select(distance, QualityLevel::Mid), 1);
        assert_eq!(select(distance, QualityLevel::High), 2);
    }
}

#[test]
fn should_cycle_through_all_quality_levels() {
    let mut quality = QualityLevel::Low;
    let expected = [
        QualityLevel::Mid,
        QualityLevel::High,
        QualityLevel::Auto,
        QualityLevel::Low,
    ];
    for next in expected {
        quality = quality.cycle();
        assert_eq!(quality, next);
    }
}
