use projtrack_core::{
    decode_projects, KvRepository, LoadOutcome, MemoryKvRepository, Project, ProjectStore,
    RepoError, RepoResult, StoreConfig, StoreError, DEFAULT_STORAGE_KEY,
};
use std::cell::Cell;
use uuid::Uuid;

fn store_with(titles: &[&str]) -> ProjectStore<MemoryKvRepository> {
    let mut store = ProjectStore::new(MemoryKvRepository::new());
    for title in titles {
        store.create(Project::new(*title)).unwrap();
    }
    store
}

fn titles<R: KvRepository>(store: &ProjectStore<R>) -> Vec<String> {
    store.projects().map(|project| project.title.clone()).collect()
}

fn persisted<R: KvRepository>(store: &ProjectStore<R>) -> Vec<Project> {
    let blob = store
        .repository()
        .get_item(DEFAULT_STORAGE_KEY)
        .unwrap()
        .expect("blob should be persisted");
    decode_projects(&blob).unwrap()
}

/// Memory repository whose writes can be switched off.
#[derive(Default)]
struct FlakyKv {
    inner: MemoryKvRepository,
    fail_writes: Cell<bool>,
}

impl KvRepository for FlakyKv {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Poisoned);
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> RepoResult<()> {
        self.inner.remove_item(key)
    }
}

#[test]
fn create_appends_and_keeps_prefix() {
    for prefix in [&[][..], &["A"][..], &["A", "B", "C"][..]] {
        let mut store = store_with(prefix);
        let before = store.snapshot();

        let record = Project::new("New").with_status("Paused");
        let id = store.create(record.clone()).unwrap();

        assert_eq!(store.len(), before.len() + 1);
        assert_eq!(&store.snapshot()[..before.len()], &before[..]);
        let last = store.get(store.len() - 1).unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last, &record);
    }
}

#[test]
fn delete_shifts_later_elements_left() {
    for index in 0..4 {
        let mut store = store_with(&["A", "B", "C", "D"]);
        let before = store.snapshot();

        let removed = store.delete(index).unwrap();
        let after = store.snapshot();

        assert_eq!(removed, before[index]);
        assert_eq!(after.len(), before.len() - 1);
        assert_eq!(&after[..index], &before[..index]);
        assert_eq!(&after[index..], &before[index + 1..]);
    }
}

#[test]
fn edit_replaces_only_the_target_position() {
    for index in 0..3 {
        let mut store = store_with(&["A", "B", "C"]);
        let before = store.snapshot();

        store
            .edit(index, Project::new("Edited").with_status("Blocked"))
            .unwrap();
        let after = store.snapshot();

        assert_eq!(after.len(), before.len());
        for (position, (old, new)) in before.iter().zip(&after).enumerate() {
            if position == index {
                assert_eq!(new.title, "Edited");
                assert_eq!(new.status.as_deref(), Some("Blocked"));
                assert_eq!(new.id, old.id);
            } else {
                assert_eq!(new, old);
            }
        }
    }
}

#[test]
fn out_of_range_index_is_reported() {
    let mut store = store_with(&["A", "B"]);

    let err = store.edit(2, Project::new("X")).unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 2, len: 2 }));

    let err = store.delete(7).unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 7, len: 2 }));

    assert_eq!(titles(&store), vec!["A", "B"]);
}

#[test]
fn empty_store_create_persists_single_record() {
    let mut store = ProjectStore::new(MemoryKvRepository::new());
    store
        .create(Project::new("Acme").with_status("In Progress"))
        .unwrap();

    let decoded = persisted(&store);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].title, "Acme");
    assert_eq!(decoded[0].status.as_deref(), Some("In Progress"));
    assert_eq!(decoded[0], store.snapshot()[0]);
}

#[test]
fn delete_then_edit_scenario() {
    let mut store = store_with(&["A", "B", "C"]);

    store.delete(1).unwrap();
    assert_eq!(titles(&store), vec!["A", "C"]);

    store.edit(1, Project::new("C'")).unwrap();
    assert_eq!(titles(&store), vec!["A", "C'"]);
    assert_eq!(
        persisted(&store)
            .iter()
            .map(|project| project.title.as_str())
            .collect::<Vec<_>>(),
        vec!["A", "C'"]
    );
}

#[test]
fn stable_ids_survive_intervening_deletes() {
    let mut store = store_with(&["A", "B", "C"]);
    let target = store.get(2).unwrap().id;

    store.delete(0).unwrap();
    store.edit_by_id(target, Project::new("C2")).unwrap();
    assert_eq!(titles(&store), vec!["B", "C2"]);
    assert_eq!(store.index_of(target), Some(1));

    let removed = store.delete_by_id(target).unwrap();
    assert_eq!(removed.title, "C2");
    assert_eq!(titles(&store), vec!["B"]);

    let missing = Uuid::new_v4();
    assert!(matches!(
        store.delete_by_id(missing),
        Err(StoreError::NotFound(id)) if id == missing
    ));
}

#[test]
fn load_reads_back_what_persist_wrote() {
    let mut writer = store_with(&["A", "B"]);
    writer
        .edit(0, Project::new("A").with_status("Completed"))
        .unwrap();
    let blob = writer
        .repository()
        .get_item(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();

    let repo = MemoryKvRepository::with_entry(DEFAULT_STORAGE_KEY, blob);
    let (reader, outcome) = ProjectStore::open(repo, StoreConfig::default()).unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded { count: 2 });
    assert_eq!(reader.snapshot(), writer.snapshot());
}

#[test]
fn legacy_links_survive_load_and_later_mutations() {
    let blob = r#"[{"title":"A","repo":"gitlab.com/a","github":"github.com/a","url":"shop-a","extra":"notes.a"}]"#;
    let repo = MemoryKvRepository::with_entry(DEFAULT_STORAGE_KEY, blob);
    let (mut store, _) = ProjectStore::open(repo, StoreConfig::default()).unwrap();

    store.create(Project::new("B")).unwrap();

    let raw = store
        .repository()
        .get_item(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["repository"], "gitlab.com/a");
    assert_eq!(value[0]["github"], "github.com/a");
    assert_eq!(value[0]["backend"], "shop-a");
    assert_eq!(value[0]["extra"], "notes.a");

    let reloaded = persisted(&store);
    assert_eq!(reloaded[0], store.snapshot()[0]);
}

#[test]
fn load_without_entry_starts_empty() {
    let (store, outcome) =
        ProjectStore::open(MemoryKvRepository::new(), StoreConfig::default()).unwrap();
    assert_eq!(outcome, LoadOutcome::Empty);
    assert!(store.is_empty());
}

#[test]
fn corrupt_blob_is_recovered_and_backed_up() {
    let repo = MemoryKvRepository::with_entry(DEFAULT_STORAGE_KEY, "{not json");
    let (mut store, outcome) = ProjectStore::open(repo, StoreConfig::default()).unwrap();

    match outcome {
        LoadOutcome::Recovered { error, backup_key } => {
            assert!(!error.is_empty());
            assert_eq!(backup_key, "projects.corrupt");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(store.is_empty());
    assert_eq!(
        store
            .repository()
            .get_item("projects.corrupt")
            .unwrap()
            .as_deref(),
        Some("{not json")
    );

    store.create(Project::new("Fresh")).unwrap();
    assert_eq!(persisted(&store).len(), 1);
}

#[test]
fn repeated_corruption_keeps_every_backup() {
    let repo = MemoryKvRepository::with_entry(DEFAULT_STORAGE_KEY, "{first");
    let mut store = ProjectStore::new(&repo);

    let first = store.load().unwrap();
    assert!(matches!(
        &first,
        LoadOutcome::Recovered { backup_key, .. } if backup_key == "projects.corrupt"
    ));

    repo.set_item(DEFAULT_STORAGE_KEY, "{second").unwrap();
    let second = store.load().unwrap();
    assert!(matches!(
        &second,
        LoadOutcome::Recovered { backup_key, .. } if backup_key == "projects.corrupt.2"
    ));

    repo.set_item(DEFAULT_STORAGE_KEY, "{second").unwrap();
    let repeat = store.load().unwrap();
    assert_eq!(repeat, second);

    assert_eq!(
        repo.get_item("projects.corrupt").unwrap().as_deref(),
        Some("{first")
    );
    assert_eq!(
        repo.get_item("projects.corrupt.2").unwrap().as_deref(),
        Some("{second")
    );
    assert_eq!(repo.keys().unwrap().len(), 3);
}

#[test]
fn try_load_reports_corruption_without_touching_memory() {
    let repo = MemoryKvRepository::new();
    let mut store = ProjectStore::new(&repo);
    store.create(Project::new("Kept")).unwrap();

    repo.set_item(DEFAULT_STORAGE_KEY, "[{\"status\":1}]").unwrap();
    let err = store.try_load().unwrap_err();

    assert!(matches!(err, StoreError::CorruptState(_)));
    assert_eq!(titles(&store), vec!["Kept"]);
}

#[test]
fn duplicate_ids_in_blob_are_reissued() {
    let id = "11111111-2222-4333-8444-555555555555";
    let blob = format!(r#"[{{"id":"{id}","title":"A"}},{{"id":"{id}","title":"B"}}]"#);
    let repo = MemoryKvRepository::with_entry(DEFAULT_STORAGE_KEY, blob);
    let (store, _) = ProjectStore::open(repo, StoreConfig::default()).unwrap();

    let ids = store.projects().map(|project| project.id).collect::<Vec<_>>();
    assert_eq!(ids[0].to_string(), id);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn failed_persist_rolls_back_every_mutation() {
    let repo = FlakyKv::default();
    let mut store = ProjectStore::new(&repo);
    store.create(Project::new("A")).unwrap();
    store.create(Project::new("B")).unwrap();
    let before = store.snapshot();

    repo.fail_writes.set(true);
    assert!(matches!(
        store.create(Project::new("C")),
        Err(StoreError::Storage(_))
    ));
    assert!(matches!(
        store.edit(0, Project::new("A2")),
        Err(StoreError::Storage(_))
    ));
    assert!(matches!(store.delete(1), Err(StoreError::Storage(_))));

    assert_eq!(store.snapshot(), before);
    repo.fail_writes.set(false);
    assert_eq!(persisted(&store), before);
}

#[test]
fn custom_storage_key_is_respected() {
    let config = StoreConfig {
        storage_key: "shopify-projects".to_string(),
        ..StoreConfig::default()
    };
    let mut store = ProjectStore::with_config(MemoryKvRepository::new(), config);
    store.create(Project::new("A")).unwrap();

    assert_eq!(
        store.repository().keys().unwrap(),
        vec!["shopify-projects".to_string()]
    );
}
