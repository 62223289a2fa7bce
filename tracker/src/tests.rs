#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use async_trait::async_trait;
    use rocket::http::{ContentType, Header, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::{json, Value};
    use stance_shared::{
        dominant, ErrorCode, FeedEntry, FeedReport, PostId, PostTally, RenderedPost, StanceKind, TallyView,
        VoteOutcome,
    };
    use tokio::sync::Notify;
    use crate::{
        build_rocket,
        command::tag_active_post,
        config::TrackerConfig,
        feed::ReportedFeed,
        store::TALLY_TABLE_KEY,
        AppState, FeedAdapter, FileBackend, Label, MemoryBackend, PostTracker, StanceStore, StorageBackend,
        StorageError, TrackerError, VoteLedger,
    };
    use StanceKind::*;

    #[derive(Default)]
    struct FakeBackend {
        inner: MemoryBackend,
        reads: Mutex<HashMap<String, usize>>,
        fail_reads: AtomicBool,
        failing_write_prefixes: Mutex<Vec<String>>,
        gate: Mutex<Option<(String, Arc<Notify>)>>,
    }

    impl FakeBackend {
        fn reads_of(&self, key: &str) -> usize {
            self.reads.lock().unwrap().get(key).copied().unwrap_or(0)
        }

        fn fail_writes_to(&self, prefix: &str) {
            self.failing_write_prefixes.lock().unwrap().push(prefix.to_string());
        }

        /// The next read of `key` waits until the returned handle is notified.
        fn hold_next_read(&self, key: &str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            *self.gate.lock().unwrap() = Some((key.to_string(), notify.clone()));
            notify
        }
    }

    #[async_trait]
    impl StorageBackend for FakeBackend {
        async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
            *self.reads.lock().unwrap().entry(key.to_string()).or_default() += 1;
            let held = {
                let mut gate = self.gate.lock().unwrap();
                match gate.as_ref() {
                    Some((gated, _)) if gated == key => gate.take().map(|(_, notify)| notify),
                    _ => None,
                }
            };
            if let Some(notify) = held {
                notify.notified().await;
            }
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("read refused".into()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
            let refused = self
                .failing_write_prefixes
                .lock()
                .unwrap()
                .iter()
                .any(|prefix| key.starts_with(prefix.as_str()));
            if refused {
                return Err(StorageError::Unavailable(format!("write to {key} refused")));
            }
            self.inner.set(key, value).await
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Affordance(u32, PostId),
        Label(u32, Label),
        Failure(u32, ErrorCode),
        Open(u32, PostId),
        Close(u32, PostId),
    }

    #[derive(Default)]
    struct RecordingFeed {
        calls: Mutex<Vec<Call>>,
        live: Mutex<HashSet<u32>>,
        active: Mutex<Option<(u32, String)>>,
    }

    impl RecordingFeed {
        fn show(&self, element: u32) {
            self.live.lock().unwrap().insert(element);
        }

        fn remove(&self, element: u32) {
            self.live.lock().unwrap().remove(&element);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn labels(&self) -> Vec<(u32, Label)> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Call::Label(element, label) => Some((element, label)),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl FeedAdapter for RecordingFeed {
        type Element = u32;

        fn identify(&self, raw: &str) -> Option<PostId> {
            PostId::parse(raw)
        }

        fn is_live(&self, element: &u32, _id: &PostId) -> bool {
            self.live.lock().unwrap().contains(element)
        }

        fn render_affordance(&self, element: &u32, id: &PostId) {
            self.record(Call::Affordance(*element, id.clone()));
        }

        fn render_label(&self, element: &u32, _id: &PostId, label: &Label) {
            self.record(Call::Label(*element, *label));
        }

        fn render_failure(&self, element: &u32, _id: &PostId, error: &TrackerError) {
            self.record(Call::Failure(*element, error.code()));
        }

        fn open_surface(&self, element: &u32, id: &PostId, _tally: &PostTally) {
            self.record(Call::Open(*element, id.clone()));
        }

        fn close_surface(&self, element: &u32, id: &PostId) {
            self.record(Call::Close(*element, id.clone()));
        }

        fn active_post(&self) -> Option<(u32, String)> {
            self.active.lock().unwrap().clone()
        }
    }

    type TestTracker = PostTracker<Arc<FakeBackend>, RecordingFeed>;

    fn id(raw: &str) -> PostId {
        PostId::parse(raw).unwrap()
    }

    fn tally(left: u32, right: u32, neutral: u32, antiwar: u32) -> PostTally {
        PostTally::from_counts(left, right, neutral, antiwar)
    }

    fn ledger(backend: &Arc<FakeBackend>) -> VoteLedger<Arc<FakeBackend>> {
        VoteLedger::new(StanceStore::new(backend.clone()))
    }

    fn tracker(backend: &Arc<FakeBackend>) -> TestTracker {
        PostTracker::new(ledger(backend), RecordingFeed::default())
    }

    fn feed_report(posts: &[(u64, &str)]) -> FeedReport {
        FeedReport {
            posts: posts
                .iter()
                .map(|&(element, source)| FeedEntry { element, source: source.to_string() })
                .collect(),
            ..FeedReport::default()
        }
    }

    // ---- store & ledger ----

    #[tokio::test]
    async fn test_first_vote_creates_vote_and_tally() {
        let backend = Arc::new(FakeBackend::default());
        let ledger = ledger(&backend);
        let post = id("post-1");

        let result = ledger.record_vote(&post, Neutral).await.unwrap();
        assert_eq!(result, tally(0, 0, 1, 0));
        assert_eq!(result.total(), 1);

        let vote = ledger.vote(&post).await.unwrap();
        assert_eq!(vote.stance, Neutral);
        assert!(vote.timestamp > 0);
        assert_eq!(ledger.tally(&post).await, tally(0, 0, 1, 0));
    }

    #[tokio::test]
    async fn test_revote_decrements_previous_stance() {
        let backend = Arc::new(FakeBackend::default());
        let ledger = ledger(&backend);
        let post = id("post-1");

        for stance in [Left, Right, Right] {
            let t = ledger.record_vote(&post, stance).await.unwrap();
            assert!(t.is_consistent());
        }
        assert_eq!(ledger.tally(&post).await, tally(0, 1, 0, 0));
        assert_eq!(ledger.vote(&post).await.map(|v| v.stance), Some(Right));
    }

    #[tokio::test]
    async fn test_tallies_are_independent_per_post() {
        let backend = Arc::new(FakeBackend::default());
        let ledger = ledger(&backend);

        ledger.record_vote(&id("a"), Left).await.unwrap();
        ledger.record_vote(&id("b"), Antiwar).await.unwrap();
        ledger.record_vote(&id("a"), Neutral).await.unwrap();

        assert_eq!(ledger.tally(&id("a")).await, tally(0, 0, 1, 0));
        assert_eq!(ledger.tally(&id("b")).await, tally(0, 0, 0, 1));
        assert_eq!(ledger.tally(&id("never")).await, PostTally::zero());
    }

    #[tokio::test]
    async fn test_pending_read_for_one_post_does_not_leak_into_another() {
        let backend = Arc::new(FakeBackend::default());
        let ledger = ledger(&backend);
        let (a, b) = (id("a"), id("b"));
        let release_b = backend.hold_next_read(&b.storage_key());

        let vote_a = async {
            let t = ledger.record_vote(&a, Left).await;
            release_b.notify_one();
            t
        };
        let (b_result, a_result) = tokio::join!(ledger.record_vote(&b, Right), vote_a);

        assert_eq!(a_result.unwrap(), tally(1, 0, 0, 0));
        assert_eq!(b_result.unwrap(), tally(0, 1, 0, 0));
        assert_eq!(ledger.tally(&a).await, tally(1, 0, 0, 0));
        assert_eq!(ledger.tally(&b).await, tally(0, 1, 0, 0));
    }

    #[tokio::test]
    async fn test_same_post_votes_are_serialized() {
        let backend = Arc::new(FakeBackend::default());
        let ledger = ledger(&backend);
        let post = id("double-click");
        let release = backend.hold_next_read(&post.storage_key());

        let releaser = async {
            tokio::task::yield_now().await;
            release.notify_one();
        };
        let (first, second, _) = tokio::join!(
            ledger.record_vote(&post, Left),
            ledger.record_vote(&post, Right),
            releaser
        );

        assert_eq!(first.unwrap(), tally(1, 0, 0, 0));
        assert_eq!(second.unwrap(), tally(0, 1, 0, 0));
        assert_eq!(ledger.tally(&post).await, tally(0, 1, 0, 0));
        assert_eq!(ledger.busy_posts(), 0);
    }

    #[tokio::test]
    async fn test_failed_reads_fall_back_to_empty() {
        let backend = Arc::new(FakeBackend::default());
        let store = StanceStore::new(backend.clone());
        let post = id("p");
        store.set_tally(&post, tally(3, 0, 0, 0)).await.unwrap();

        backend.fail_reads.store(true, Ordering::SeqCst);
        assert_eq!(store.get_tally(&post).await, PostTally::zero());
        assert_eq!(store.get_vote(&post).await, None);
        // the table cannot be rewritten safely without reading it
        assert!(store.set_tally(&post, tally(1, 0, 0, 0)).await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_entries_read_as_absent() {
        let backend = Arc::new(FakeBackend::default());
        let post = id("p");
        backend.inner.set(&post.storage_key(), json!({"stance": "centrist"})).await.unwrap();
        backend.inner.set(TALLY_TABLE_KEY, json!({"p": "lots"})).await.unwrap();

        let store = StanceStore::new(backend.clone());
        assert_eq!(store.get_vote(&post).await, None);
        assert_eq!(store.get_tally(&post).await, PostTally::zero());
    }

    #[tokio::test]
    async fn test_failed_vote_write_restores_tally() {
        let backend = Arc::new(FakeBackend::default());
        let ledger = ledger(&backend);
        let post = id("p");
        ledger.record_vote(&post, Left).await.unwrap();

        backend.fail_writes_to("post:");
        let err = ledger.record_vote(&post, Right).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
        assert_eq!(ledger.tally(&post).await, tally(1, 0, 0, 0));
        assert_eq!(ledger.vote(&post).await.map(|v| v.stance), Some(Left));
    }

    #[tokio::test]
    async fn test_failed_tally_write_is_surfaced() {
        let backend = Arc::new(FakeBackend::default());
        let ledger = ledger(&backend);
        backend.fail_writes_to(TALLY_TABLE_KEY);

        let err = ledger.record_vote(&id("p"), Left).await.unwrap_err();
        assert!(matches!(err, TrackerError::StoreUnavailable(_)));
        assert_eq!(ledger.vote(&id("p")).await, None);
    }

    #[tokio::test]
    async fn test_file_backend_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let post = id("Post by Someone");

        {
            let ledger = VoteLedger::new(StanceStore::new(FileBackend::new(&path)));
            ledger.record_vote(&post, Antiwar).await.unwrap();
            ledger.record_vote(&post, Left).await.unwrap();
        }

        let reloaded = StanceStore::new(FileBackend::new(&path));
        assert_eq!(reloaded.get_tally(&post).await, tally(1, 0, 0, 0));
        assert_eq!(reloaded.get_vote(&post).await.map(|v| v.stance), Some(Left));

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw[TALLY_TABLE_KEY]["Post by Someone"]["total"], json!(1));
        assert_eq!(raw["post:Post by Someone"]["stance"], json!("left"));
    }

    #[tokio::test]
    async fn test_file_backend_refuses_to_overwrite_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = StanceStore::new(FileBackend::new(&path));
        assert_eq!(store.get_tally(&id("p")).await, PostTally::zero());
        assert!(store.set_tally(&id("p"), tally(1, 0, 0, 0)).await.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"{ not json");
    }

    // ---- tracker ----

    #[tokio::test]
    async fn test_discovering_twice_registers_once() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);
        tracker.adapter().show(1);

        assert!(tracker.on_post_discovered(1, id("p")).await);
        assert!(!tracker.on_post_discovered(1, id("p")).await);

        let affordances = tracker
            .adapter()
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Affordance(..)))
            .count();
        assert_eq!(affordances, 1);
        assert_eq!(backend.reads_of(TALLY_TABLE_KEY), 1);
        assert_eq!(tracker.tracked_count(), 1);
    }

    #[tokio::test]
    async fn test_discovery_pass_is_idempotent_across_bursts() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);
        for element in 1..=3 {
            tracker.adapter().show(element);
        }
        let batch = || vec![(1, "a".to_string()), (2, "b".to_string()), (3, "  ".to_string()), (1, "a".to_string())];

        assert_eq!(tracker.discover(batch()).await, 2);
        for _ in 0..10 {
            assert_eq!(tracker.discover(batch()).await, 0);
        }
        assert_eq!(backend.reads_of(TALLY_TABLE_KEY), 2);
    }

    #[tokio::test]
    async fn test_discovery_renders_existing_dominant_stance() {
        let backend = Arc::new(FakeBackend::default());
        StanceStore::new(backend.clone()).set_tally(&id("p"), tally(2, 2, 0, 0)).await.unwrap();
        let tracker = tracker(&backend);
        tracker.adapter().show(7);

        tracker.on_post_discovered(7, id("p")).await;
        assert_eq!(
            tracker.adapter().labels(),
            vec![(7, Label { dominant: Some(Left), own_vote: None, tally: tally(2, 2, 0, 0) })]
        );
        assert_eq!(tracker.tracked(&id("p")).unwrap().last_rendered, Some(Left));
    }

    #[tokio::test]
    async fn test_unvoted_post_gets_no_label() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);
        tracker.adapter().show(1);

        tracker.on_post_discovered(1, id("fresh")).await;
        assert!(tracker.adapter().labels().is_empty());
    }

    #[tokio::test]
    async fn test_initial_load_for_removed_element_is_discarded() {
        let backend = Arc::new(FakeBackend::default());
        StanceStore::new(backend.clone()).set_tally(&id("p"), tally(0, 1, 0, 0)).await.unwrap();
        let tracker = tracker(&backend);
        tracker.adapter().show(1);
        let release = backend.hold_next_read(TALLY_TABLE_KEY);

        let remove_then_release = async {
            tokio::task::yield_now().await;
            tracker.adapter().remove(1);
            release.notify_one();
        };
        let (registered, _) = tokio::join!(tracker.on_post_discovered(1, id("p")), remove_then_release);

        assert!(registered);
        assert!(tracker.adapter().labels().is_empty());
    }

    #[tokio::test]
    async fn test_selection_keeps_own_vote_apart_from_dominant() {
        let backend = Arc::new(FakeBackend::default());
        StanceStore::new(backend.clone()).set_tally(&id("p"), tally(2, 0, 0, 0)).await.unwrap();
        let tracker = tracker(&backend);
        tracker.adapter().show(1);
        tracker.on_post_discovered(1, id("p")).await;

        let result = tracker.on_user_select(&id("p"), Right).await.unwrap();
        assert_eq!(result, tally(2, 1, 0, 0));

        let (_, last) = tracker.adapter().labels().pop().unwrap();
        assert_eq!(last, Label { dominant: Some(Left), own_vote: Some(Right), tally: tally(2, 1, 0, 0) });

        let tracked = tracker.tracked(&id("p")).unwrap();
        assert_eq!(tracked.own_vote, Some(Right));
        assert_eq!(tracked.last_rendered, Some(Left));

        // re-vote moves this user's vote without touching the others
        tracker.on_user_select(&id("p"), Antiwar).await.unwrap();
        assert_eq!(tracker.tally(&id("p")).await, tally(2, 0, 0, 1));
        assert_eq!(dominant(&tracker.tally(&id("p")).await), Some(Left));
    }

    #[tokio::test]
    async fn test_selection_for_gone_element_records_without_rendering() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);
        tracker.adapter().show(1);
        tracker.on_post_discovered(1, id("p")).await;
        tracker.adapter().remove(1);

        tracker.on_user_select(&id("p"), Left).await.unwrap();
        assert!(tracker.adapter().labels().is_empty());
        assert_eq!(tracker.tally(&id("p")).await, tally(1, 0, 0, 0));
    }

    #[tokio::test]
    async fn test_failed_write_shows_failure_affordance() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);
        tracker.adapter().show(1);
        tracker.on_post_discovered(1, id("p")).await;
        backend.fail_writes_to(TALLY_TABLE_KEY);

        let err = tracker.on_user_select(&id("p"), Left).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
        assert!(tracker.adapter().calls().contains(&Call::Failure(1, ErrorCode::StoreUnavailable)));
        assert_eq!(tracker.tracked(&id("p")).unwrap().own_vote, None);
    }

    #[tokio::test]
    async fn test_removed_element_can_be_rebound() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);
        tracker.adapter().show(1);
        tracker.on_post_discovered(1, id("p")).await;
        tracker.on_user_select(&id("p"), Neutral).await.unwrap();

        tracker.adapter().show(2);
        assert!(!tracker.on_post_discovered(2, id("p")).await, "live element keeps the post");

        tracker.adapter().remove(1);
        assert!(tracker.on_post_discovered(2, id("p")).await);
        let tracked = tracker.tracked(&id("p")).unwrap();
        assert_eq!(tracked.element, 2);
        assert_eq!(tracked.own_vote, Some(Neutral));
        assert_eq!(
            tracker.adapter().labels().last(),
            Some(&(2, Label { dominant: Some(Neutral), own_vote: Some(Neutral), tally: tally(0, 0, 1, 0) }))
        );
    }

    #[tokio::test]
    async fn test_only_one_selection_surface_is_open() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);
        tracker.adapter().show(1);
        tracker.adapter().show(2);
        tracker.discover(vec![(1, "a".to_string()), (2, "b".to_string())]).await;

        tracker.open_selection(&id("a")).await.unwrap();
        tracker.open_selection(&id("b")).await.unwrap();
        assert_eq!(tracker.open_surface(), Some(id("b")));

        let surface_calls: Vec<_> = tracker
            .adapter()
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Open(..) | Call::Close(..)))
            .collect();
        assert_eq!(surface_calls, vec![Call::Open(1, id("a")), Call::Close(1, id("a")), Call::Open(2, id("b"))]);

        assert!(!tracker.close_selection(&id("a")));
        tracker.on_user_select(&id("b"), Left).await.unwrap();
        assert_eq!(tracker.open_surface(), None);
    }

    #[tokio::test]
    async fn test_selection_surface_needs_a_live_post() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);
        assert!(matches!(tracker.open_selection(&id("ghost")).await, Err(TrackerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_initial_load_never_lands_after_a_newer_vote() {
        let backend = Arc::new(FakeBackend::default());
        StanceStore::new(backend.clone()).set_tally(&id("p"), tally(1, 0, 0, 0)).await.unwrap();
        let tracker = tracker(&backend);
        tracker.adapter().show(1);
        let release = backend.hold_next_read(TALLY_TABLE_KEY);

        let releaser = async {
            tokio::task::yield_now().await;
            release.notify_one();
        };
        let post = id("p");
        let (registered, voted, _) = tokio::join!(
            tracker.on_post_discovered(1, id("p")),
            tracker.on_user_select(&post, Right),
            releaser
        );

        assert!(registered);
        assert_eq!(voted.unwrap(), tally(1, 1, 0, 0));
        assert_eq!(
            tracker.adapter().labels(),
            vec![
                (1, Label { dominant: Some(Left), own_vote: None, tally: tally(1, 0, 0, 0) }),
                (1, Label { dominant: Some(Left), own_vote: Some(Right), tally: tally(1, 1, 0, 0) }),
            ]
        );
    }

    #[tokio::test]
    async fn test_opening_restores_the_stored_own_vote() {
        let backend = Arc::new(FakeBackend::default());
        let post = id("p");
        ledger(&backend).record_vote(&post, Left).await.unwrap();

        // a fresh tracker, as after a restart
        let tracker = tracker(&backend);
        tracker.adapter().show(1);
        tracker.on_post_discovered(1, post.clone()).await;
        assert_eq!(tracker.tracked(&post).unwrap().own_vote, None);
        let vote_reads = backend.reads_of(&post.storage_key());

        tracker.open_selection(&post).await.unwrap();
        assert_eq!(tracker.tracked(&post).unwrap().own_vote, Some(Left));
        assert_eq!(
            tracker.adapter().labels().last(),
            Some(&(1, Label { dominant: Some(Left), own_vote: Some(Left), tally: tally(1, 0, 0, 0) }))
        );

        tracker.open_selection(&post).await.unwrap();
        assert_eq!(backend.reads_of(&post.storage_key()), vote_reads + 1);
    }

    #[tokio::test]
    async fn test_recycled_element_does_not_keep_its_old_post() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = PostTracker::new(ledger(&backend), ReportedFeed::new());

        let first = tracker.adapter().apply_report(feed_report(&[(1, "A")]));
        assert_eq!(tracker.discover(first).await, 1);

        // the page reused element 1 for B and moved A to element 2
        let second = tracker.adapter().apply_report(feed_report(&[(1, "B"), (2, "A")]));
        assert_eq!(tracker.discover(second).await, 2);
        assert_eq!(tracker.tracked(&id("A")).unwrap().element, 2);
        assert_eq!(tracker.tracked(&id("B")).unwrap().element, 1);

        tracker.on_user_select(&id("A"), Left).await.unwrap();
        let shown: Vec<_> = tracker
            .adapter()
            .rendered()
            .into_iter()
            .map(|post| (post.element, post.id.as_str().to_string(), post.label))
            .collect();
        assert_eq!(shown, vec![(1, "B".to_string(), None), (2, "A".to_string(), Some(Left))]);

        assert!(tracker.open_selection(&id("B")).await.is_ok());
        assert!(tracker.open_selection(&id("A")).await.is_ok());
    }

    #[tokio::test]
    async fn test_command_interface() {
        let backend = Arc::new(FakeBackend::default());
        let tracker = tracker(&backend);

        let err = tag_active_post(&tracker, "left").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = tag_active_post(&tracker, "sideways").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStance);

        tracker.adapter().show(4);
        *tracker.adapter().active.lock().unwrap() = Some((4, "story-9".to_string()));
        let outcome = tag_active_post(&tracker, "Antiwar").await.unwrap();
        assert_eq!(outcome.id, id("story-9"));
        assert_eq!(outcome.stance, Antiwar);
        assert_eq!(outcome.dominant, Some(Antiwar));
        assert_eq!(outcome.tally, tally(0, 0, 0, 1));
        assert_eq!(tracker.tracked(&id("story-9")).unwrap().own_vote, Some(Antiwar));
    }

    // ---- http host ----

    async fn client() -> Client {
        let config = TrackerConfig {
            in_memory: true,
            ..TrackerConfig::default()
        };
        let state = AppState::new(Arc::new(MemoryBackend::new()), config);
        Client::tracked(build_rocket(state)).await.expect("valid rocket instance")
    }

    async fn report(client: &Client, body: Value) -> Vec<RenderedPost> {
        let response = client
            .post("/api/feed")
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        response.into_json().await.unwrap()
    }

    #[rocket::async_test]
    async fn test_http_feed_and_vote_flow() {
        let client = client().await;

        let rendered = report(&client, json!({"posts": [{"element": 1, "source": "post-a"}, {"element": 2, "source": ""}]})).await;
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].id, id("post-a"));
        assert_eq!(rendered[0].label, None);

        let response = client
            .post("/api/posts/post-a/stance")
            .header(ContentType::JSON)
            .body(json!({"stance": "right"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let outcome: VoteOutcome = response.into_json().await.unwrap();
        assert_eq!(outcome.tally, tally(0, 1, 0, 0));
        assert_eq!(outcome.dominant, Some(Right));

        let view: TallyView = client.get("/api/posts/post-a/tally").dispatch().await.into_json().await.unwrap();
        assert_eq!(view.tally.total(), 1);

        let feed: Vec<RenderedPost> = client.get("/api/feed").dispatch().await.into_json().await.unwrap();
        assert_eq!(feed[0].label, Some(Right));
        assert_eq!(feed[0].user_stance, Some(Right));

        let rendered = report(&client, json!({"removed": [1]})).await;
        assert!(rendered.is_empty());
    }

    #[rocket::async_test]
    async fn test_http_errors() {
        let client = client().await;

        let response = client
            .post("/api/posts/post-a/stance")
            .header(ContentType::JSON)
            .body(json!({"stance": "upward"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["code"], json!("invalidStance"));

        let response = client
            .post("/api/command/stance")
            .header(ContentType::JSON)
            .body(json!({"stance": "left"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.post("/api/posts/nobody/surface").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_http_command_and_surface() {
        let client = client().await;
        report(
            &client,
            json!({"posts": [{"element": 1, "source": "a"}, {"element": 2, "source": "b"}], "active": 2}),
        )
        .await;

        let response = client.post("/api/posts/a/surface").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let response = client.post("/api/posts/b/surface").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let feed: Vec<RenderedPost> = client.get("/api/feed").dispatch().await.into_json().await.unwrap();
        let open: Vec<_> = feed.iter().filter(|post| post.surface_open).map(|post| post.element).collect();
        assert_eq!(open, vec![2]);

        let response = client
            .post("/api/command/stance")
            .header(ContentType::JSON)
            .body(json!({"stance": "neutral"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let outcome: VoteOutcome = response.into_json().await.unwrap();
        assert_eq!(outcome.id, id("b"));

        let response = client.delete("/api/posts/b/surface").dispatch().await;
        assert_eq!(response.status(), Status::NotFound, "voting already closed it");
    }

    #[rocket::async_test]
    async fn test_cors_for_extension_origin() {
        let client = client().await;
        let response = client
            .get("/api/feed")
            .header(Header::new("Origin", "chrome-extension://abcdef"))
            .dispatch()
            .await;
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("chrome-extension://abcdef")
        );

        let response = client
            .get("/api/feed")
            .header(Header::new("Origin", "https://evil.example"))
            .dispatch()
            .await;
        assert_eq!(response.headers().get_one("Access-Control-Allow-Origin"), None);
    }
}
