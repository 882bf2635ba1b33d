use chrono::{Duration, TimeZone, Utc};
use msdtrack_analysis::{
    buffer::{RenderAction, RenderCache},
    chart::{ChartConfig, SkillChart},
    viewport::{ViewState, ViewportConfig, viewport_x_to_index},
};
use msdtrack_model::{PlayHistory, PlayRecord, Skillset};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

const LABELS: [&str; 5] = ["stream", "jumpstream", "jackspeed", "chordjack", "technical"];

/// 500 plays over 10 sessions of 50 plays, one play every 2 minutes and a
/// day between sessions.
fn ten_sessions() -> PlayHistory {
    let mut rng = Pcg32::seed_from_u64(0x6d73_6474);
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap();
    let records = (0..500_i64)
        .map(|i| {
            let session = i / 50;
            PlayRecord {
                timestamp: start + Duration::days(session) + Duration::minutes((i % 50) * 2),
                skill_value: rng.random_range(15.0..30.0),
                skillset_label: LABELS[rng.random_range(0..LABELS.len())].to_owned(),
                accuracy: rng.random_range(90.0..100.0),
                session_id: format!("session-{session}"),
            }
        })
        .collect();
    PlayHistory::new(records).unwrap()
}

#[test]
fn test_history_has_ten_sessions() {
    let history = ten_sessions();
    let sessions = history.sessions();
    assert_eq!(sessions.len(), 10);
    assert!(sessions.iter().all(|s| s.plays.len() == 50));
    assert_eq!(sessions[0].duration_minutes(), Some(98.0));
}

#[test]
fn test_rematerializes_once_per_drift_threshold() {
    let history = ten_sessions();
    let config = ChartConfig::default();
    let mut cache = RenderCache::new();
    let mut view = ViewState::new(10.0, 0.0, &config.viewport);
    assert!(cache.update(view, history.len(), &config.buffer).is_rematerialize());

    // 0.03 view widths per step; the rebuild threshold is 0.8 widths
    let mut rebuilds = vec![];
    for step in 1..=320 {
        view = view.pan_by(0.03);
        match cache.update(view, history.len(), &config.buffer) {
            RenderAction::Rematerialize(window) => {
                assert!(window.contains(viewport_x_to_index(0.5, history.len(), view)));
                rebuilds.push(step);
            }
            RenderAction::Reuse { translation } => {
                assert!(translation.abs() <= config.buffer.rematerialize_fraction);
            }
            RenderAction::Empty => panic!("history is not empty"),
        }
    }

    assert_eq!(view.offset(), view.max_offset());
    assert_eq!(rebuilds.len(), 11);
    assert_eq!(rebuilds[0], 27);
    assert!(rebuilds.windows(2).all(|pair| pair[1] - pair[0] == 27));
    assert_eq!(cache.generation(), 12);
}

#[test]
fn test_far_right_chart_geometry() {
    let history = ten_sessions();
    let config = ChartConfig::default();
    let view = ViewState::new(10.0, 1.0, &config.viewport);
    assert_eq!(view.offset(), 0.9);

    let chart = SkillChart::materialize(&history, view, view.center(), &config);
    let window = chart.window.unwrap();
    assert_eq!(window.end, 499);
    assert_eq!(window.stride, 1);
    assert_eq!(chart.points.len(), window.point_count());

    // The last play sits on the right edge, earlier buffered plays off-screen left
    let last = chart.points.last().unwrap();
    assert_eq!(last.index, 499);
    assert!((last.x - 1.0).abs() < 1e-9);
    assert!(chart.points[0].x < 0.0);
    assert!(chart.points.iter().all(|p| (0.0..=1.0).contains(&p.y)));

    let overall = chart.overall.as_ref().unwrap();
    assert_eq!(overall.skillset, Skillset::Overall);
    let regression = overall.regression.as_ref().unwrap();
    assert!((regression.segment.end.x - 1.0).abs() < 1e-9);
    assert!(!regression.dashes.is_empty());
    assert!(chart.skillsets.iter().all(|t| !t.skillset.is_unknown()));
}

#[test]
fn test_render_reuse_is_consistent_with_rebuild() {
    let history = ten_sessions();
    let config = ChartConfig {
        viewport: ViewportConfig {
            max_zoom: 20.0,
            ..ViewportConfig::default()
        },
        ..ChartConfig::default()
    };
    let mut chart = SkillChart::new(config);
    let mut view = ViewState::new(8.0, 0.2, &config.viewport);
    let base = chart.render(&history, view);
    let rendered_center = view.center();

    for _ in 0..5 {
        view = view.pan_by(0.1);
        let reused = chart.render(&history, view);
        assert_eq!(chart.generation(), 1);
        let fresh = SkillChart::materialize(&history, view, rendered_center, &config);
        assert_eq!(reused.points.len(), base.points.len());
        for (a, b) in reused.points.iter().zip(&fresh.points) {
            assert_eq!(a.index, b.index);
            assert!((a.x - b.x).abs() < 1e-9);
            assert_eq!(a.y, b.y);
        }
    }
}
