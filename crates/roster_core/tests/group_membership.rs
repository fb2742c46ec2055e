use roster_core::db::open_db_in_memory;
use roster_core::{
    ConflictReason, EntityRef, GroupUpdate, RosterError, RosterErrorKind, RosterService,
    SqliteRosterRepository, ValidationError,
};
use rusqlite::Connection;

fn membership_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM group_memberships;", [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn enroll_twice_lists_member_once_and_delete_group_clears_memberships() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());

    let alice = service.create_member("alice").unwrap();
    let math = service.create_group("Math", alice.id).unwrap();
    assert_eq!(math.owner_id, alice.id);
    assert!(service.list_members_for_group(math.id).unwrap().is_empty());

    service.enroll(alice.id, math.id).unwrap();
    assert_eq!(
        service.list_members_for_group(math.id).unwrap(),
        vec![alice.clone()]
    );

    service.enroll(alice.id, math.id).unwrap();
    assert_eq!(
        service.list_members_for_group(math.id).unwrap(),
        vec![alice.clone()]
    );

    service.delete_group(math.id).unwrap();
    assert!(service.list_groups_for_member(alice.id).unwrap().is_empty());
    assert!(matches!(
        service.get_group(math.id).unwrap_err(),
        RosterError::NotFound(EntityRef::Group(id)) if id == math.id
    ));
}

#[test]
fn delete_group_removes_it_from_every_member() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
        let alice = service.create_member("alice").unwrap();
        let bob = service.create_member("bob").unwrap();
        let math = service.create_group("Math", alice.id).unwrap();
        let art = service.create_group("Art", bob.id).unwrap();
        for member in [alice.id, bob.id] {
            service.enroll(member, math.id).unwrap();
            service.enroll(member, art.id).unwrap();
        }

        service.delete_group(math.id).unwrap();

        for member in [alice.id, bob.id] {
            let groups = service.list_groups_for_member(member).unwrap();
            assert_eq!(groups, vec![art.clone()]);
        }
    }
    assert_eq!(membership_rows(&conn), 2);
}

#[test]
fn create_group_requires_existing_owner() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());

    let err = service.create_group("Math", 99).unwrap_err();
    assert!(matches!(err, RosterError::NotFound(EntityRef::Member(99))));
    assert!(service.list_groups().unwrap().is_empty());
}

#[test]
fn create_group_validates_title() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
    let alice = service.create_member("alice").unwrap();

    let err = service.create_group("  ", alice.id).unwrap_err();
    assert!(matches!(
        err,
        RosterError::Validation(ValidationError::EmptyTitle)
    ));

    let group = service.create_group("  Math  ", alice.id).unwrap();
    assert_eq!(group.title, "Math");
}

#[test]
fn owner_is_not_implicitly_a_participant() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
    let alice = service.create_member("alice").unwrap();
    let math = service.create_group("Math", alice.id).unwrap();

    assert!(service.list_groups_for_member(alice.id).unwrap().is_empty());
    assert_eq!(service.list_groups_owned_by(alice.id).unwrap(), vec![math]);
}

#[test]
fn enroll_with_missing_ids_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
    let alice = service.create_member("alice").unwrap();
    let math = service.create_group("Math", alice.id).unwrap();

    assert!(matches!(
        service.enroll(404, math.id).unwrap_err(),
        RosterError::NotFound(EntityRef::Member(404))
    ));
    assert!(matches!(
        service.enroll(alice.id, 404).unwrap_err(),
        RosterError::NotFound(EntityRef::Group(404))
    ));
}

#[test]
fn unenroll_never_enrolled_pair_is_noop() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
    let alice = service.create_member("alice").unwrap();
    let bob = service.create_member("bob").unwrap();
    let math = service.create_group("Math", alice.id).unwrap();
    service.enroll(alice.id, math.id).unwrap();

    service.unenroll(bob.id, math.id).unwrap();
    service.unenroll(404, math.id).unwrap();

    assert_eq!(
        service.list_members_for_group(math.id).unwrap(),
        vec![alice]
    );
}

#[test]
fn unenroll_removes_membership_and_requires_group() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
    let alice = service.create_member("alice").unwrap();
    let math = service.create_group("Math", alice.id).unwrap();
    service.enroll(alice.id, math.id).unwrap();

    service.unenroll(alice.id, math.id).unwrap();
    assert!(service.list_members_for_group(math.id).unwrap().is_empty());

    assert!(matches!(
        service.unenroll(alice.id, 404).unwrap_err(),
        RosterError::NotFound(EntityRef::Group(404))
    ));
}

#[test]
fn membership_listings_require_existing_entities() {
    let mut conn = open_db_in_memory().unwrap();
    let service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());

    assert_eq!(
        service.list_groups_for_member(1).unwrap_err().kind(),
        RosterErrorKind::NotFound
    );
    assert_eq!(
        service.list_members_for_group(1).unwrap_err().kind(),
        RosterErrorKind::NotFound
    );
    assert_eq!(
        service.list_groups_owned_by(1).unwrap_err().kind(),
        RosterErrorKind::NotFound
    );
}

#[test]
fn participants_are_listed_in_id_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
    let alice = service.create_member("alice").unwrap();
    let bob = service.create_member("bob").unwrap();
    let carol = service.create_member("carol").unwrap();
    let math = service.create_group("Math", alice.id).unwrap();

    service.enroll(carol.id, math.id).unwrap();
    service.enroll(alice.id, math.id).unwrap();
    service.enroll(bob.id, math.id).unwrap();

    let names: Vec<_> = service
        .list_members_for_group(math.id)
        .unwrap()
        .into_iter()
        .map(|member| member.username)
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
}

#[test]
fn delete_member_owning_groups_is_conflict() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
    let alice = service.create_member("alice").unwrap();
    let math = service.create_group("Math", alice.id).unwrap();

    let err = service.delete_member(alice.id).unwrap_err();
    assert!(matches!(
        err,
        RosterError::Conflict(ConflictReason::MemberOwnsGroups {
            member_id,
            owned_groups: 1,
        }) if member_id == alice.id
    ));
    assert_eq!(service.get_member(alice.id).unwrap(), alice);

    service.delete_group(math.id).unwrap();
    service.delete_member(alice.id).unwrap();
}

#[test]
fn delete_member_cascades_memberships() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
        let alice = service.create_member("alice").unwrap();
        let bob = service.create_member("bob").unwrap();
        let math = service.create_group("Math", alice.id).unwrap();
        service.enroll(alice.id, math.id).unwrap();
        service.enroll(bob.id, math.id).unwrap();

        service.delete_member(bob.id).unwrap();

        assert_eq!(
            service.list_members_for_group(math.id).unwrap(),
            vec![alice]
        );
    }
    assert_eq!(membership_rows(&conn), 1);
}

#[test]
fn update_group_replaces_title() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());
    let alice = service.create_member("alice").unwrap();
    let math = service.create_group("Math", alice.id).unwrap();

    let renamed = service
        .update_group(math.id, GroupUpdate::new("Algebra"))
        .unwrap();
    assert_eq!(renamed.title, "Algebra");
    assert_eq!(renamed.owner_id, alice.id);
    assert_eq!(service.get_group(math.id).unwrap(), renamed);

    assert!(matches!(
        service
            .update_group(404, GroupUpdate::new("Nope"))
            .unwrap_err(),
        RosterError::NotFound(EntityRef::Group(404))
    ));
}

#[test]
fn delete_missing_group_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = RosterService::new(SqliteRosterRepository::try_new(&mut conn).unwrap());

    assert!(matches!(
        service.delete_group(3).unwrap_err(),
        RosterError::NotFound(EntityRef::Group(3))
    ));
}
