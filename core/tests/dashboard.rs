//! Admin analytics and the public transparency views.

mod common;

use civic_core::{
    complaint::NewComplaint,
    error::ErrorKind,
    types::{Category, Status},
};
use common::Harness;

#[test]
fn admin_analytics_figures() {
    let h = Harness::new();
    let (_, citizen) = h.citizen("Asha Rao");
    let (_, admin) = h.admin("Clerk One");

    let a = h.file(&citizen, "Bins", "Bins overflowing", "garbage");
    let b = h.file(&citizen, "Pipe", "Leaking pipe", "water");
    h.file(&citizen, "Hole", "Pothole", "pothole");

    h.clock.advance_hours(10);
    h.engine.status.set_status(&a.id, "resolved", &admin).unwrap();
    h.engine.status.set_status(&b.id, "in_progress", &admin).unwrap();
    h.clock.advance_hours(20);
    h.engine.run_scan().unwrap();

    assert_eq!(
        h.engine.analytics.analytics(&citizen).unwrap_err().kind(),
        ErrorKind::Unauthorized
    );

    let stats = h.engine.analytics.analytics(&admin).unwrap();
    assert_eq!(stats.total_complaints, 3);
    assert_eq!(stats.resolved_count, 1);
    assert_eq!(stats.pending_count, 1);
    assert_eq!(stats.in_progress_count, 1);
    assert_eq!(stats.escalated_count, 0, "nothing past its allowance at 30h");
    assert_eq!(stats.resolution_rate, 33.33);
    assert_eq!(stats.avg_resolution_hours, 10.0);
    assert_eq!(stats.category_stats.len(), 3);
    assert_eq!(stats.resolution_by_category.len(), 1);
    assert_eq!(stats.resolution_by_category[0].category, Category::Garbage);
}

#[test]
fn analytics_on_empty_store_are_zero() {
    let h = Harness::new();
    let (_, admin) = h.admin("Clerk One");

    let stats = h.engine.analytics.analytics(&admin).unwrap();
    assert_eq!(stats.total_complaints, 0);
    assert_eq!(stats.resolution_rate, 0.0);
    assert_eq!(stats.avg_resolution_hours, 0.0);
    assert!(stats.category_stats.is_empty());
}

/// Public stats show the five newest complaints, without owners.
#[test]
fn public_stats_show_recent_five() {
    let h = Harness::new();
    let (_, citizen) = h.citizen("Ben Ode");
    let (_, admin) = h.admin("Clerk One");

    let mut ids = Vec::new();
    for i in 0..7 {
        let c = h.file(&citizen, &format!("Report {i}"), "Bins overflowing", "garbage");
        ids.push(c.id);
        h.clock.advance_hours(1);
    }
    h.engine.status.set_status(&ids[0], "resolved", &admin).unwrap();

    let stats = h.engine.analytics.public_stats().unwrap();
    assert_eq!(stats.total, 7);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.pending, 6);
    assert_eq!(stats.recent.len(), 5);
    assert_eq!(stats.recent[0].title, "Report 6");
    assert_eq!(stats.recent[4].title, "Report 2");
    assert!(stats.recent.iter().all(|r| r.status == Status::Pending));
    assert_eq!(stats.categories.len(), 1);
    assert_eq!(stats.categories[0].count, 7);
}

#[test]
fn map_points_need_both_coordinates() {
    let h = Harness::new();
    let (_, citizen) = h.citizen("Chen Wu");

    let pinned = h
        .engine
        .complaints
        .create(
            &citizen,
            NewComplaint {
                title: "Hole".into(),
                description: "Pothole".into(),
                category: Some("pothole".into()),
                latitude: Some(40.71),
                longitude: Some(-74.0),
                ..NewComplaint::default()
            },
        )
        .unwrap();
    h.engine
        .complaints
        .create(
            &citizen,
            NewComplaint {
                title: "Lamp".into(),
                description: "Lamp out".into(),
                latitude: Some(40.72),
                ..NewComplaint::default()
            },
        )
        .unwrap();

    let points = h.engine.analytics.map_points().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].id, pinned.id);
    assert_eq!(points[0].coordinates.lat, 40.71);
    assert_eq!(points[0].coordinates.lng, -74.0);
}
