use gaitgraph_core::classify::{channel_statistic, classify, classify_channels, rating_score, NEUTRAL_SCORE};
use gaitgraph_core::config::{ChannelStatistic, GaitConfig, Thresholds};
use gaitgraph_core::types::{Channel, ChannelRating, ConditionedFrame};

const T: Thresholds = Thresholds::new(20.0, 50.0);

#[test]
fn test_classify_boundaries_are_inclusive_normal() {
    assert_eq!(classify(19.99, T), ChannelRating::Low);
    assert_eq!(classify(20.0, T), ChannelRating::Normal);
    assert_eq!(classify(50.0, T), ChannelRating::Normal);
    assert_eq!(classify(50.01, T), ChannelRating::High);
}

#[test]
fn test_score_bands_follow_rating() {
    assert_eq!(rating_score(0.0, T), 1);
    assert_eq!(rating_score(10.0, T), 17);
    assert!(rating_score(19.99, T) <= 33);
    assert_eq!(rating_score(20.0, T), 34);
    assert_eq!(rating_score(50.0, T), 66);
    assert!(rating_score(50.01, T) >= 67);
    assert_eq!(rating_score(100.0, T), 100);
    assert_eq!(rating_score(1e6, T), 100);
    assert_eq!(rating_score(f64::NAN, T), 1);

    for v in [0.0, 5.0, 19.0, 20.0, 35.0, 50.0, 51.0, 80.0, 200.0] {
        let s = rating_score(v, T);
        let band = match classify(v, T) {
            ChannelRating::Low => 1..=33,
            ChannelRating::Normal => 34..=66,
            ChannelRating::High => 67..=100,
        };
        assert!(band.contains(&s), "score {s} utenfor båndet for {v}");
    }
}

#[test]
fn test_channel_statistics() {
    let xs = [1.0, 2.0, 3.0, 4.0, 10.0];
    assert_eq!(channel_statistic(&xs, ChannelStatistic::Mean), Some(4.0));
    assert_eq!(channel_statistic(&xs, ChannelStatistic::Median), Some(3.0));
    assert_eq!(channel_statistic(&xs, ChannelStatistic::Percentile(100.0)), Some(10.0));
    assert_eq!(channel_statistic(&xs, ChannelStatistic::Percentile(87.5)), Some(7.0));
    assert_eq!(channel_statistic(&[], ChannelStatistic::Mean), None);
}

#[test]
fn test_classify_channels_over_window() {
    let frames: Vec<ConditionedFrame> = (0..10)
        .map(|i| {
            let mut channels = [0.0; 10];
            channels[Channel::RightHeel.index()] = 80.0; // heel high = 55
            channels[Channel::LeftMetaIn.index()] = 30.0; // meta inn 20/50
            ConditionedFrame { index: i, timestamp: i as f64 * 0.04, channels }
        })
        .collect();
    let readings = classify_channels(&frames, &GaitConfig::default());
    assert_eq!(readings.len(), 10);
    assert_eq!(readings[&Channel::RightHeel].rating, ChannelRating::High);
    assert_eq!(readings[&Channel::LeftMetaIn].rating, ChannelRating::Normal);
    assert_eq!(readings[&Channel::LeftPinkyToe].rating, ChannelRating::Low);
    assert_eq!(readings[&Channel::LeftPinkyToe].score, 1);
}

#[test]
fn test_empty_window_is_neutral() {
    let readings = classify_channels(&[], &GaitConfig::default());
    for r in readings.values() {
        assert_eq!(r.rating, ChannelRating::Normal);
        assert_eq!(r.score, NEUTRAL_SCORE);
    }
}
