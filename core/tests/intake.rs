//! Complaint intake: sentiment, priority, SLA allowance and form handling.

mod common;

use common::Harness;
use civic_core::{
    classifier::Classification,
    complaint::{Location, NewComplaint},
    error::ErrorKind,
    types::{Actor, Category, Priority, Status},
};

/// Distressed garbage report: score -4 → urgent, 24h allowance, not escalated.
#[test]
fn distressed_garbage_complaint_is_urgent_with_day_sla() {
    let h = Harness::new();
    let (user, actor) = h.citizen("Asha Rao");

    let c = h.file(&actor, "Bins on Elm Street", "Terrible smell, bins broken", "garbage");

    assert_eq!(c.sentiment_score, -4.0);
    assert_eq!(c.priority, Priority::Urgent);
    assert_eq!(c.expected_resolution_hours, 24);
    assert_eq!(c.status, Status::Pending);
    assert!(!c.is_escalated);
    assert!(c.resolved_at.is_none());
    assert_eq!(c.owner, user.id);
    assert_eq!(c.created_at, common::t0());

    let stored = h.engine.complaints.get(&c.id).unwrap();
    assert_eq!(stored, c);
}

/// Positive water report: medium priority, 48h allowance.
#[test]
fn positive_water_complaint_is_medium_with_two_day_sla() {
    let h = Harness::new();
    let (_, actor) = h.citizen("Ben Ode");

    let c = h.file(&actor, "Water pressure", "Pressure is low, thanks for checking", "water");

    assert!(c.sentiment_score >= 0.0);
    assert_eq!(c.priority, Priority::Medium);
    assert_eq!(c.expected_resolution_hours, 48);
}

/// Score between -3 and 0 lands on high; exactly -3 is not urgent.
#[test]
fn mildly_negative_text_is_high_priority() {
    let h = Harness::new();
    let (_, actor) = h.citizen("Chen Wu");

    let c = h.file(&actor, "Street light", "The lamp is awful", "electricity");

    assert_eq!(c.sentiment_score, -3.0);
    assert_eq!(c.priority, Priority::High);
    assert_eq!(c.expected_resolution_hours, 48);
}

/// Missing category defaults to other with the 72h fallback allowance.
#[test]
fn missing_category_defaults_to_other() {
    let h = Harness::new();
    let (_, actor) = h.citizen("Dee Park");

    let c = h
        .engine
        .complaints
        .create(
            &actor,
            NewComplaint {
                title: "Bench".into(),
                description: "Bench near the library".into(),
                ..NewComplaint::default()
            },
        )
        .unwrap();

    assert_eq!(c.category, Category::Other);
    assert_eq!(c.expected_resolution_hours, 72);
}

#[test]
fn unknown_category_and_blank_fields_are_rejected() {
    let h = Harness::new();
    let (_, actor) = h.citizen("Eli Stone");

    let bad_category = h.engine.complaints.create(
        &actor,
        NewComplaint {
            title: "Sign".into(),
            description: "Sign is bent".into(),
            category: Some("graffiti".into()),
            ..NewComplaint::default()
        },
    );
    assert_eq!(bad_category.unwrap_err().kind(), ErrorKind::Validation);

    let blank_title = h.engine.complaints.create(
        &actor,
        NewComplaint {
            title: "   ".into(),
            description: "Something".into(),
            ..NewComplaint::default()
        },
    );
    assert_eq!(blank_title.unwrap_err().kind(), ErrorKind::Validation);

    assert!(h.engine.complaints.list_mine(&actor).unwrap().is_empty());
}

/// Image paths are normalized and classified when the client sent no label.
#[test]
fn image_is_classified_when_client_sent_no_label() {
    let h = Harness::new();
    let (_, actor) = h.citizen("Fay Lund");

    let c = h
        .engine
        .complaints
        .create(
            &actor,
            NewComplaint {
                title: "Hole".into(),
                description: "Deep pothole by the school gate".into(),
                category: Some("pothole".into()),
                image: Some(r"uploads\2026\hole.jpg".into()),
                ..NewComplaint::default()
            },
        )
        .unwrap();

    assert_eq!(c.image.as_deref(), Some("uploads/2026/hole.jpg"));
    let ai = c.ai.unwrap();
    assert_eq!(ai.label, "pothole");
    assert_eq!(ai.confidence, 0.95);
}

#[test]
fn client_label_is_kept_and_partial_coordinates_dropped() {
    let h = Harness::new();
    let (_, actor) = h.citizen("Gus Hale");
    let client = Classification { label: "road".into(), confidence: 0.7 };

    let c = h
        .engine
        .complaints
        .create(
            &actor,
            NewComplaint {
                title: "Crack".into(),
                description: "Long crack in the lane".into(),
                category: Some("road".into()),
                location: Some(Location {
                    address: Some("4 Mill Lane".into()),
                    city: Some("Easton".into()),
                    state: None,
                }),
                latitude: Some(12.5),
                longitude: None,
                image: Some("uploads/crack.jpg".into()),
                ai: Some(client.clone()),
            },
        )
        .unwrap();

    assert_eq!(c.ai, Some(client));
    assert!(c.coordinates.is_none());
    assert_eq!(c.location.unwrap().city.as_deref(), Some("Easton"));
}

/// A citizen only sees their own complaints; listing everything is admin-only.
#[test]
fn listing_is_scoped_by_role() {
    let h = Harness::new();
    let (_, alice) = h.citizen("Alice Moss");
    let (_, bob) = h.citizen("Bob Reyes");
    let (_, admin) = h.admin("Clerk One");

    h.file(&alice, "Pipe", "Leaking pipe", "water");
    h.clock.advance_hours(1);
    h.file(&bob, "Lamp", "Lamp out", "electricity");
    h.clock.advance_hours(1);
    h.file(&alice, "Road", "Crack in road", "road");

    let mine = h.engine.complaints.list_mine(&alice).unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].title, "Road", "newest first");

    assert_eq!(
        h.engine.complaints.list_all(&alice, None, None).unwrap_err().kind(),
        ErrorKind::Unauthorized
    );

    let all = h.engine.complaints.list_all(&admin, None, None).unwrap();
    assert_eq!(all.len(), 3);
    let water = h
        .engine
        .complaints
        .list_all(&admin, Some(Status::Pending), Some(Category::Water))
        .unwrap();
    assert_eq!(water.len(), 1);
    assert_eq!(water[0].title, "Pipe");
}

/// Filing as an id that was never registered is rejected and stores nothing.
#[test]
fn unknown_reporter_is_not_found() {
    let h = Harness::new();
    let (_, admin) = h.admin("Clerk One");

    let err = h
        .engine
        .complaints
        .create(
            &Actor::citizen("ghost"),
            NewComplaint {
                title: "Pothole".into(),
                description: "Deep hole".into(),
                category: Some("pothole".into()),
                ..NewComplaint::default()
            },
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("ghost"), "{err}");
    assert!(h.engine.complaints.list_all(&admin, None, None).unwrap().is_empty());
}
