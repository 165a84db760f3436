//! Citizen engagement: upvotes, feedback, comments, inbox, settings.

mod common;

use civic_core::{
    error::{CivicResult, ErrorKind},
    repository::UserDirectory,
    store::CivicStore,
    types::{Actor, Role},
    user::{NewUser, User, UserService},
};
use common::Harness;
use serde_json::json;
use std::sync::Arc;

/// Never finds a user by email, so the pre-insert duplicate check passes
/// and the second registration reaches the database.
struct BlindEmailLookup {
    inner: Arc<CivicStore>,
}

impl UserDirectory for BlindEmailLookup {
    fn insert_user(&self, user: &User) -> CivicResult<()> {
        self.inner.insert_user(user)
    }
    fn find_user(&self, id: &str) -> CivicResult<Option<User>> {
        self.inner.find_user(id)
    }
    fn find_user_by_email(&self, _email: &str) -> CivicResult<Option<User>> {
        Ok(None)
    }
    fn find_users_by_role(&self, role: Role) -> CivicResult<Vec<User>> {
        self.inner.find_users_by_role(role)
    }
    fn find_all_users(&self) -> CivicResult<Vec<User>> {
        self.inner.find_all_users()
    }
}

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser { name: name.into(), email: email.into(), phone: None, role: Role::User }
}

#[test]
fn upvote_toggles_per_user() {
    let h = Harness::new();
    let (_, owner) = h.citizen("Asha Rao");
    let (_, neighbour) = h.citizen("Ben Ode");
    let c = h.file(&owner, "Pothole", "Deep hole", "pothole");

    let r = h.engine.complaints.toggle_upvote(&c.id, &neighbour).unwrap();
    assert_eq!((r.count, r.is_upvoted), (1, true));
    let r = h.engine.complaints.toggle_upvote(&c.id, &owner).unwrap();
    assert_eq!((r.count, r.is_upvoted), (2, true));
    let r = h.engine.complaints.toggle_upvote(&c.id, &neighbour).unwrap();
    assert_eq!((r.count, r.is_upvoted), (1, false));

    let stored = h.engine.complaints.get(&c.id).unwrap();
    assert_eq!(stored.upvotes, vec![owner.user_id.clone()]);

    let err = h.engine.complaints.toggle_upvote("missing", &owner).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

/// Feedback is owner-only and only once the complaint is resolved.
#[test]
fn feedback_rules() {
    let h = Harness::new();
    let (_, owner) = h.citizen("Chen Wu");
    let (_, other) = h.citizen("Dee Park");
    let (_, admin) = h.admin("Clerk One");
    let c = h.file(&owner, "Pipe", "Leaking pipe", "water");

    let err = h.engine.complaints.submit_feedback(&c.id, &owner, 5, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "not resolved yet");

    h.engine.status.set_status(&c.id, "resolved", &admin).unwrap();

    let err = h.engine.complaints.submit_feedback(&c.id, &other, 4, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    let err = h.engine.complaints.submit_feedback(&c.id, &owner, 6, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let rated = h
        .engine
        .complaints
        .submit_feedback(&c.id, &owner, 5, Some("Fixed within a day".into()))
        .unwrap();
    let feedback = rated.feedback.unwrap();
    assert_eq!(feedback.rating, 5);
    assert_eq!(feedback.comment.as_deref(), Some("Fixed within a day"));
    assert_eq!(h.engine.complaints.get(&c.id).unwrap().feedback.unwrap().rating, 5);
}

#[test]
fn comments_thread_oldest_first_with_author() {
    let h = Harness::new();
    let (_, owner) = h.citizen("Eli Stone");
    let (_, admin) = h.admin("Clerk One");
    let c = h.file(&owner, "Lamp", "Lamp out", "electricity");

    h.engine.comments.add(&c.id, &owner, "Still dark tonight").unwrap();
    h.clock.advance_hours(1);
    let reply = h.engine.comments.add(&c.id, &admin, "  Crew booked for Friday ").unwrap();
    assert_eq!(reply.text, "Crew booked for Friday");
    assert_eq!(reply.author_name, "Clerk One");
    assert_eq!(reply.author_role, Role::Admin);

    let thread = h.engine.comments.list(&c.id).unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].author_name, "Eli Stone");
    assert_eq!(thread[1].id, reply.id);

    assert_eq!(
        h.engine.comments.add(&c.id, &owner, "   ").unwrap_err().kind(),
        ErrorKind::Validation
    );
    assert_eq!(
        h.engine.comments.add("missing", &owner, "hello").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

/// A comment from an id that was never registered is rejected as not found.
#[test]
fn unknown_commenter_is_not_found() {
    let h = Harness::new();
    let (_, owner) = h.citizen("Fay Lund");
    let c = h.file(&owner, "Lamp", "Lamp out", "electricity");

    let err = h.engine.comments.add(&c.id, &Actor::citizen("ghost"), "hello").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(h.engine.comments.list(&c.id).unwrap().is_empty());
}

#[test]
fn inbox_is_private_to_its_recipient() {
    let h = Harness::new();
    let (_, owner) = h.citizen("Fay Lund");
    let (_, snoop) = h.citizen("Gus Hale");
    let (_, admin) = h.admin("Clerk One");
    let c = h.file(&owner, "Bins", "Bins", "garbage");
    let d = h.file(&owner, "Road", "Road", "road");

    h.engine.status.set_status(&c.id, "in_progress", &admin).unwrap();
    h.clock.advance_hours(1);
    h.engine.status.set_status(&d.id, "in_progress", &admin).unwrap();

    let inbox = h.engine.inbox.list(&owner).unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].related_complaint_id.as_deref(), Some(d.id.as_str()), "newest first");
    assert_eq!(h.engine.inbox.unread_count(&owner).unwrap(), 2);
    assert!(h.engine.inbox.list(&snoop).unwrap().is_empty());

    let err = h.engine.inbox.mark_read(&inbox[0].id, &snoop).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(
        h.engine.inbox.mark_read("missing", &owner).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    h.engine.inbox.mark_read(&inbox[0].id, &owner).unwrap();
    assert_eq!(h.engine.inbox.unread_count(&owner).unwrap(), 1);
    assert_eq!(h.engine.inbox.mark_all_read(&owner).unwrap(), 1);
    assert_eq!(h.engine.inbox.unread_count(&owner).unwrap(), 0);
}

#[test]
fn settings_are_admin_writable_and_public_readable() {
    let h = Harness::new();
    let (_, citizen) = h.citizen("Hana Ito");
    let (_, admin) = h.admin("Clerk One");

    let err = h
        .engine
        .settings
        .upsert(&citizen, "city_name", json!("Easton"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(
        h.engine.settings.upsert(&admin, " ", json!(1)).unwrap_err().kind(),
        ErrorKind::Validation
    );

    h.engine.settings.upsert(&admin, "city_name", json!("Easton")).unwrap();
    h.engine.settings.upsert(&admin, "sla_overrides", json!({ "garbage": 12 })).unwrap();
    h.engine.settings.upsert(&admin, "city_name", json!("East Easton")).unwrap();

    let all = h.engine.settings.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["city_name"], json!("East Easton"));
    assert_eq!(all["sla_overrides"]["garbage"], json!(12));
}

#[test]
fn duplicate_email_registration_is_rejected() {
    let h = Harness::new();
    h.citizen("Ivan Kerr");

    let err = h
        .engine
        .users
        .register(new_user("Someone Else", "IVAN.KERR@example.org"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(h.engine.users.get("missing").unwrap_err().kind(), ErrorKind::NotFound);
}

/// Two registrations racing on one address: the loser gets the same
/// validation error as a sequential duplicate, not a database error.
#[test]
fn racing_duplicate_registration_is_a_validation_error() {
    let h = Harness::new();
    let users = UserService::new(
        Arc::new(BlindEmailLookup { inner: h.engine.store.clone() }),
        h.clock.clone(),
    );

    users.register(new_user("Jo March", "jo@example.org")).unwrap();
    let err = users.register(new_user("Jo Again", "Jo@Example.org")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("already registered"), "{err}");
    assert_eq!(h.engine.store.find_all_users().unwrap().len(), 1);
}

/// The user directory listing is admin-only and oldest first.
#[test]
fn user_listing_is_admin_only() {
    let h = Harness::new();
    let (_, citizen) = h.citizen("Kit Moss");
    h.clock.advance_hours(1);
    let (_, admin) = h.admin("Clerk One");

    assert_eq!(h.engine.users.list(&citizen).unwrap_err().kind(), ErrorKind::Unauthorized);

    let all = h.engine.users.list(&admin).unwrap();
    let names: Vec<&str> = all.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Kit Moss", "Clerk One"]);
    assert_eq!(all[1].role, Role::Admin);
}
