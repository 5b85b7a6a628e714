use shellbbs::storage::Store;
use tokio::runtime::Runtime;

#[test]
fn forums_are_listed_by_name() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Store::new(tmpdir.path().join("data")).await.unwrap();
        store.create_forum("Zeta", "last").await.unwrap();
        store.create_forum("Alpha", "first").await.unwrap();
        store.create_forum("Mid", "middle").await.unwrap();

        let names: Vec<String> = store
            .list_forums()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    });
}

#[test]
fn duplicate_forum_name_is_rejected() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Store::new(tmpdir.path().join("data")).await.unwrap();
        store.create_forum("General", "talk").await.unwrap();
        assert!(store.create_forum("General", "again").await.is_err());
    });
}

#[test]
fn topics_are_newest_first_and_posts_oldest_first() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Store::new(tmpdir.path().join("data")).await.unwrap();
        let forum = store.create_forum("General", "talk").await.unwrap();

        let t1 = store.create_topic(forum.id, "alice", "first").await.unwrap();
        let t2 = store
            .create_topic(forum.id, "bob", "second")
            .await
            .unwrap();

        let titles: Vec<String> = store
            .list_topics(forum.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        // Same-second timestamps fall back to id order, still newest first.
        assert_eq!(titles, vec!["second", "first"]);
        assert!(t2.id > t1.id);

        store.create_post(t1.id, "alice", "one").await.unwrap();
        store.create_post(t1.id, "bob", "two").await.unwrap();
        let contents: Vec<String> = store
            .list_posts(t1.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.content)
            .collect();
        assert_eq!(contents, vec!["one", "two"]);
    });
}

#[test]
fn topic_under_missing_forum_is_rejected() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Store::new(tmpdir.path().join("data")).await.unwrap();
        assert!(store.create_topic(999, "alice", "orphan").await.is_err());
    });
}

#[test]
fn deleting_a_forum_cascades_to_topics_and_posts() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Store::new(tmpdir.path().join("data")).await.unwrap();
        let doomed = store.create_forum("Doomed", "going away").await.unwrap();
        let kept = store.create_forum("Kept", "staying").await.unwrap();

        let doomed_topic = store
            .create_topic(doomed.id, "alice", "bye")
            .await
            .unwrap();
        store
            .create_post(doomed_topic.id, "alice", "gone soon")
            .await
            .unwrap();
        let kept_topic = store.create_topic(kept.id, "bob", "hello").await.unwrap();
        store
            .create_post(kept_topic.id, "bob", "still here")
            .await
            .unwrap();

        store.delete_forum(doomed.id).await.unwrap();

        assert!(store.list_topics(doomed.id).await.unwrap().is_empty());
        assert!(store.list_posts(doomed_topic.id).await.unwrap().is_empty());
        assert_eq!(store.list_forums().await.unwrap().len(), 1);
        assert_eq!(store.list_posts(kept_topic.id).await.unwrap().len(), 1);
    });
}

#[test]
fn deleting_a_topic_cascades_to_its_posts_only() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Store::new(tmpdir.path().join("data")).await.unwrap();
        let forum = store.create_forum("General", "talk").await.unwrap();
        let doomed = store.create_topic(forum.id, "alice", "bye").await.unwrap();
        let kept = store.create_topic(forum.id, "bob", "hi").await.unwrap();
        store.create_post(doomed.id, "alice", "x").await.unwrap();
        store.create_post(kept.id, "bob", "y").await.unwrap();

        store.delete_topic(doomed.id).await.unwrap();

        assert!(store.list_posts(doomed.id).await.unwrap().is_empty());
        assert_eq!(store.list_posts(kept.id).await.unwrap().len(), 1);
        assert_eq!(store.list_topics(forum.id).await.unwrap().len(), 1);
    });
}

#[test]
fn board_survives_a_store_reopen() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let data_dir = tmpdir.path().join("data");
        {
            let store = Store::new(&data_dir).await.unwrap();
            let forum = store.create_forum("General", "talk").await.unwrap();
            store
                .create_topic(forum.id, "alice", "persisted")
                .await
                .unwrap();
        }
        let store = Store::new(&data_dir).await.unwrap();
        let forums = store.list_forums().await.unwrap();
        assert_eq!(forums.len(), 1);
        let topics = store.list_topics(forums[0].id).await.unwrap();
        assert_eq!(topics[0].title, "persisted");
    });
}

#[test]
fn update_forum_changes_name_and_description() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Store::new(tmpdir.path().join("data")).await.unwrap();
        let forum = store.create_forum("Old", "old desc").await.unwrap();
        let updated = store
            .update_forum(forum.id, "New", "new desc")
            .await
            .unwrap();
        assert_eq!(updated.name, "New");
        let listed = store.list_forums().await.unwrap();
        assert_eq!(listed[0].description, "new desc");
    });
}
