use active_record::association::AssociationError;
use active_record::attribute::{IntAttr, StringAttr};
use active_record::mock::MemoryStore;
use active_record::tracing::setup_tracing;
use active_record::{Context, Error, Record, RecordKind, Reflection, Value};

/// Store with three small schemas:
///
/// - `owner` belongs_to `target` through `target_id`
/// - `Holder` has_many `target` through the default `holder_id`
/// - `account` has_one `profile` through `account_id`
fn store() -> MemoryStore {
    setup_tracing();

    let store = MemoryStore::new();
    store
        .define(
            RecordKind::build("target", |r| {
                r.attribute(StringAttr::new("name"));
                r.attribute(IntAttr::new("holder_id"));
            })
            .expect("target kind"),
        )
        .expect("define target");
    store
        .define(
            RecordKind::build("owner", |r| {
                r.attribute(IntAttr::new("target_id"));
                r.belongs_to("target");
            })
            .expect("owner kind"),
        )
        .expect("define owner");
    store
        .define(
            RecordKind::build("Holder", |r| {
                r.has_many("target");
            })
            .expect("holder kind"),
        )
        .expect("define holder");
    store
        .define(
            RecordKind::build("profile", |r| {
                r.attribute(IntAttr::new("account_id"));
                r.attribute(StringAttr::new("bio"));
            })
            .expect("profile kind"),
        )
        .expect("define profile");
    store
        .define(
            RecordKind::build("account", |r| {
                r.has_one("profile").foreign_key("account_id");
            })
            .expect("account kind"),
        )
        .expect("define account");
    store
}

fn record(store: &MemoryStore, kind: &str, values: &[(&str, Value)]) -> Record {
    store
        .reflection(kind)
        .expect("known kind")
        .new_record(values.iter().cloned())
        .expect("valid record")
}

// --- belongs_to ---

#[test]
fn test_belongs_to_finds_target_by_foreign_key() {
    let store = store();
    store
        .insert("target", [("id", Value::from(5)), ("name", Value::from("widget"))])
        .unwrap();

    let mut owner = record(&store, "owner", &[("id", 1.into()), ("target_id", 5.into())]);
    let outcome = owner.association("target");
    assert!(outcome.is_ok());

    let target = outcome.into_result().unwrap().expect("target present");
    assert_eq!(target.name(), "target");
    assert_eq!(target.attribute("name"), Some(&Value::from("widget")));

    let query = store.queries().pop().expect("one query");
    assert_eq!(query.record, "target");
    assert_eq!(query.limit, Some(1));
    assert_eq!(query.predicates[0].column, "id");
    assert_eq!(query.predicates[0].value, Value::Int(5));
}

#[test]
fn test_belongs_to_missing_target_is_record_not_found() {
    let store = store();
    let mut owner = record(&store, "owner", &[("id", 1.into()), ("target_id", 9.into())]);

    let outcome = owner.association("target");
    assert!(outcome.is_err());
    assert_eq!(
        outcome.error(),
        Some(&Error::RecordNotFound {
            record: "target".into(),
            column: "id".into(),
            id: Value::Int(9),
        })
    );
    assert!(!owner.associations().is_loaded("target"));
}

#[test]
fn test_belongs_to_unset_foreign_key_finds_nothing() {
    let store = store();
    store
        .insert("target", [("id", Value::from(5)), ("name", Value::from("widget"))])
        .unwrap();
    assert_eq!(
        store.insert("target", [("name", Value::from("orphan"))]),
        Err(Error::MissingPrimaryKey {
            record: "target".into(),
            column: "id".into(),
        })
    );
    let mut owner = record(&store, "owner", &[("id", 1.into())]);

    let err = owner.access_association("target").unwrap_err();
    assert!(matches!(err, Error::RecordNotFound { id: Value::Nil, .. }));
}

// --- has_many ---

#[test]
fn test_has_many_is_narrowed_by_owner_id() {
    let store = store();
    for (id, holder) in [(1, 7), (2, 8), (3, 7)] {
        store
            .insert("target", [("id", Value::from(id)), ("holder_id", Value::from(holder))])
            .unwrap();
    }
    let holder = record(&store, "Holder", &[("id", 7.into())]);

    let relation = holder.access_collection("target").unwrap();
    // Building the relation does not touch storage
    assert!(store.queries().is_empty());
    assert_eq!(relation.predicates()[0].column, "holder_id");

    let ids: Vec<_> = relation
        .to_a()
        .unwrap()
        .iter()
        .map(|r| r.id().cloned())
        .collect();
    assert_eq!(ids, vec![Some(Value::Int(1)), Some(Value::Int(3))]);

    let narrowed = relation.where_eq("id", 3).to_a().unwrap();
    assert_eq!(narrowed.len(), 1);
}

#[test]
fn test_unsaved_owner_has_no_collection_members() {
    let store = store();
    store
        .insert("target", [("id", Value::from(1)), ("name", Value::from("loose"))])
        .unwrap();
    store
        .insert("target", [("id", Value::from(2)), ("holder_id", Value::from(7))])
        .unwrap();
    let holder = record(&store, "Holder", &[]);

    let targets = holder.access_collection("target").unwrap().to_a().unwrap();
    assert!(targets.is_empty());
    assert_eq!(store.queries()[0].predicates[0].value, Value::Nil);
}

#[test]
fn test_has_many_is_not_cached() {
    let store = store();
    let holder = record(&store, "Holder", &[("id", 7.into())]);

    holder.access_collection("target").unwrap().to_a().unwrap();
    holder.access_collection("target").unwrap().to_a().unwrap();
    assert_eq!(store.queries().len(), 2);
    assert!(!holder.associations().is_loaded("target"));
}

// --- has_one ---

#[test]
fn test_has_one_without_rows_is_none() {
    let store = store();
    let mut account = record(&store, "account", &[("id", 1.into())]);

    assert_eq!(account.access_association("profile"), Ok(None));
    assert_eq!(store.queries()[0].limit, Some(2));
}

#[test]
fn test_has_one_with_one_row() {
    let store = store();
    store
        .insert(
            "profile",
            [
                ("id", Value::from(10)),
                ("account_id", Value::from(1)),
                ("bio", Value::from("a")),
            ],
        )
        .unwrap();
    let mut account = record(&store, "account", &[("id", 1.into())]);

    let profile = account.access_association("profile").unwrap().expect("profile");
    assert_eq!(profile.id(), Some(&Value::Int(10)));
}

#[test]
fn test_has_one_with_many_rows_is_a_violation() {
    let store = store();
    for (id, bio) in [(10, "a"), (11, "b"), (12, "c")] {
        store
            .insert(
                "profile",
                [
                    ("id", Value::from(id)),
                    ("account_id", Value::from(1)),
                    ("bio", Value::from(bio)),
                ],
            )
            .unwrap();
    }
    let mut account = record(&store, "account", &[("id", 1.into())]);

    let err = account.access_association("profile").unwrap_err();
    assert_eq!(
        err,
        Error::Association(AssociationError::HasOneViolation {
            assoc: "profile".into(),
            records: concat!(
                r#"#<profile account_id: 1, bio: "a", id: 10>, "#,
                r#"#<profile account_id: 1, bio: "b", id: 11>"#,
            )
            .into(),
        })
    );
    assert!(err
        .to_string()
        .starts_with("declared 'has_one' association 'profile', but has many: ["));
}

#[test]
fn test_has_one_defaults_to_id_foreign_key() {
    let store = store();
    store
        .define(
            RecordKind::build("user", |r| {
                r.has_one("profile");
            })
            .unwrap(),
        )
        .unwrap();
    store
        .insert("profile", [("id", Value::from(3)), ("bio", Value::from("shared id"))])
        .unwrap();
    let mut user = record(&store, "user", &[("id", 3.into())]);

    let profile = user.access_association("profile").unwrap().expect("profile");
    assert_eq!(profile.attribute("bio"), Some(&Value::from("shared id")));
    assert_eq!(store.queries()[0].predicates[0].column, "id");
}

// --- registry ---

#[test]
fn test_cached_association_is_not_queried_again() {
    let store = store();
    store
        .insert("target", [("id", Value::from(5)), ("name", Value::from("widget"))])
        .unwrap();
    let mut owner = record(&store, "owner", &[("id", 1.into()), ("target_id", 5.into())]);

    let first = owner.access_association("target").unwrap();
    assert!(owner.associations().is_loaded("target"));
    let second = owner.access_association("target").unwrap();

    assert_eq!(first, second);
    assert_eq!(store.queries().len(), 1);
}

#[test]
fn test_cached_none_is_not_queried_again() {
    let store = store();
    let mut account = record(&store, "account", &[("id", 1.into())]);

    assert_eq!(account.access_association("profile"), Ok(None));
    assert_eq!(account.access_association("profile"), Ok(None));
    assert_eq!(store.queries().len(), 1);
}

#[test]
fn test_assign_association_fills_the_cache() {
    let store = store();
    let mut owner = record(&store, "owner", &[("id", 1.into())]);
    let target = record(&store, "target", &[("id", 42.into()), ("name", "assigned".into())]);

    owner.assign_association("target", Some(target.clone())).unwrap();
    assert_eq!(owner.access_association("target"), Ok(Some(target)));
    assert!(store.queries().is_empty());

    let mut holder = record(&store, "Holder", &[("id", 7.into())]);
    assert_eq!(
        holder.assign_association("target", None),
        Err(Error::Association(AssociationError::NotSingular("target".into())))
    );
}

#[test]
fn test_wrong_capability_is_rejected() {
    let store = store();
    let owner = record(&store, "owner", &[("id", 1.into())]);
    let mut holder = record(&store, "Holder", &[("id", 7.into())]);

    assert_eq!(
        owner.access_collection("target").unwrap_err(),
        Error::Association(AssociationError::NotCollection("target".into()))
    );
    assert_eq!(
        holder.access_association("target").unwrap_err(),
        Error::Association(AssociationError::NotSingular("target".into()))
    );
    assert!(store.queries().is_empty());
}

#[test]
fn test_unknown_association() {
    let store = store();
    let mut owner = record(&store, "owner", &[("id", 1.into())]);
    let expected = Error::UnknownAssociation {
        record: "owner".into(),
        assoc: "ghost".into(),
    };

    assert_eq!(owner.access_association("ghost").unwrap_err(), expected);
    assert_eq!(owner.access_collection("ghost").unwrap_err(), expected);
    assert_eq!(owner.assign_association("ghost", None), Err(expected));
}

#[test]
fn test_unknown_target_record_propagates() {
    let store = MemoryStore::new();
    for kind in [
        RecordKind::build("a", |r| {
            r.attribute(IntAttr::new("ghost_id"));
            r.belongs_to("ghost");
        }),
        RecordKind::build("b", |r| {
            r.has_many("ghost");
        }),
        RecordKind::build("c", |r| {
            r.has_one("ghost");
        }),
    ] {
        store.define(kind.unwrap()).unwrap();
    }
    let unknown = Error::UnknownRecord("ghost".into());

    let mut a = record(&store, "a", &[("id", 1.into())]);
    let b = record(&store, "b", &[("id", 1.into())]);
    let mut c = record(&store, "c", &[("id", 1.into())]);

    assert_eq!(a.access_association("ghost").unwrap_err(), unknown);
    assert_eq!(b.access_collection("ghost").unwrap_err(), unknown);
    assert_eq!(c.access_association("ghost").unwrap_err(), unknown);
}

#[test]
fn test_engine_failure_propagates_and_is_not_cached() {
    let store = store();
    store
        .insert("target", [("id", Value::from(5)), ("name", Value::from("widget"))])
        .unwrap();
    let mut owner = record(&store, "owner", &[("id", 1.into()), ("target_id", 5.into())]);

    store.fail_next(Error::Storage("connection reset".into()));
    assert_eq!(
        owner.access_association("target"),
        Err(Error::Storage("connection reset".into()))
    );
    assert!(owner.access_association("target").unwrap().is_some());
}

#[test]
fn test_context_reaches_every_query() {
    let store = store();
    store
        .insert("target", [("id", Value::from(5)), ("holder_id", Value::from(7))])
        .unwrap();
    let context = Context::background().with_value("request_id", "r-1");

    let mut owner = store
        .reflection("owner")
        .unwrap()
        .with_context(context.clone())
        .new_record([("id", Value::from(1)), ("target_id", Value::from(5))])
        .unwrap();
    let target = owner.access_association("target").unwrap().expect("target");
    assert_eq!(target.context(), &context);

    let holder = store
        .reflection("Holder")
        .unwrap()
        .with_context(context.clone())
        .new_record([("id", Value::from(7))])
        .unwrap();
    holder.access_collection("target").unwrap().to_a().unwrap();

    let queries = store.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().all(|q| q.context.value("request_id") == Some("r-1")));
}

#[test]
fn test_reflect_on_associations_skips_unknown_targets() {
    let store = store();
    store
        .define(
            RecordKind::build("mixed", |r| {
                r.attribute(IntAttr::new("target_id"));
                r.belongs_to("target");
                r.has_many("ghost");
            })
            .unwrap(),
        )
        .unwrap();
    let mixed = record(&store, "mixed", &[("id", 1.into())]);

    assert_eq!(mixed.association_names(), vec!["ghost", "target"]);
    assert!(mixed.has_associations(["ghost", "target"]));
    assert!(!mixed.has_associations(["ghost", "nope"]));

    let reflection = mixed.reflect_on_association("target").expect("reflectable");
    assert_eq!(reflection.relation.name(), "target");
    assert_eq!(reflection.association.association_foreign_key(), "target_id");

    assert!(mixed.reflect_on_association("ghost").is_none());
    assert!(mixed.reflect_on_association("nope").is_none());

    let all = mixed.reflect_on_all_associations();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].association.target_name(), "target");
}

#[test]
fn test_cloned_record_keeps_its_own_cache() {
    let store = store();
    store
        .insert("target", [("id", Value::from(5)), ("name", Value::from("widget"))])
        .unwrap();
    let mut owner = record(&store, "owner", &[("id", 1.into()), ("target_id", 5.into())]);
    owner.access_association("target").unwrap();

    let mut copy = owner.clone();
    assert!(copy.associations().is_loaded("target"));

    copy.assign_association("target", None).unwrap();
    copy.assign_attribute("target_id", 6).unwrap();

    assert_eq!(owner.attribute("target_id"), Some(&Value::Int(5)));
    assert!(owner.access_association("target").unwrap().is_some());
    assert_eq!(copy.access_association("target"), Ok(None));
    assert_eq!(store.queries().len(), 1);
}

#[test]
fn test_has_one_is_reflected_by_target_name() {
    let store = store();
    let account = record(&store, "account", &[("id", 1.into())]);

    let reflection = account.reflect_on_association("profile").expect("reflectable");
    assert_eq!(reflection.relation.name(), "profile");
    assert_eq!(reflection.association.target_name(), "profile");
    // The declared name of a has_one is its foreign key, never its lookup key
    assert_eq!(reflection.association.association_name(), "account_id");
    assert!(account.reflect_on_association("account_id").is_none());

    let all = account.reflect_on_all_associations();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].relation.name(), "profile");
}
