use chrono::Duration;
use course_core::model::{CourseProgress, ModuleProgress};
use course_core::time::fixed_now;
use storage::repository::{PROGRESS_KEY, ProgressStore, Storage};
use storage::sqlite::SqliteRepository;
use storage::{decode_progress, encode_progress};

async fn migrated(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_persists_progress_blob() {
    let repo = migrated("memdb_progress_roundtrip").await;

    let mut progress = CourseProgress::new(fixed_now());
    progress.xp = 65;
    let mut module = ModuleProgress::new(5, 3);
    module.started = true;
    module.started_at = Some(fixed_now());
    module.sections_read.insert("section-1-1".into());
    progress.modules.insert("module-1".into(), module);
    progress.last_active_at = fixed_now() + Duration::minutes(4);

    let raw = encode_progress(&progress).expect("encode");
    repo.save_blob(PROGRESS_KEY, &raw).await.expect("save");

    let stored = repo
        .load_blob(PROGRESS_KEY)
        .await
        .expect("load")
        .expect("blob present");
    let restored = decode_progress(&stored).expect("decode");
    assert_eq!(restored, progress);
}

#[tokio::test]
async fn sqlite_save_overwrites_only_its_key() {
    let repo = migrated("memdb_progress_overwrite").await;

    assert_eq!(repo.load_blob(PROGRESS_KEY).await.unwrap(), None);

    repo.save_blob(PROGRESS_KEY, "first").await.unwrap();
    repo.save_blob(PROGRESS_KEY, "second").await.unwrap();
    repo.save_blob("other-key", "untouched").await.unwrap();
    assert_eq!(
        repo.load_blob(PROGRESS_KEY).await.unwrap().as_deref(),
        Some("second")
    );
    assert_eq!(
        repo.load_blob("other-key").await.unwrap().as_deref(),
        Some("untouched")
    );
}

#[tokio::test]
async fn migrations_are_rerunnable_and_keep_data() {
    let repo = migrated("memdb_progress_migrate").await;
    repo.save_blob(PROGRESS_KEY, "kept").await.unwrap();

    repo.migrate().await.expect("second migrate");
    assert_eq!(
        repo.load_blob(PROGRESS_KEY).await.unwrap().as_deref(),
        Some("kept")
    );
}

#[tokio::test]
async fn storage_facade_wires_sqlite_store() {
    let storage = Storage::sqlite("sqlite:file:memdb_progress_facade?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.progress.save_blob(PROGRESS_KEY, "{}").await.unwrap();
    assert_eq!(
        storage.progress.load_blob(PROGRESS_KEY).await.unwrap().as_deref(),
        Some("{}")
    );
}
