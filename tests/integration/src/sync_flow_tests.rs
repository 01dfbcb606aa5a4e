//! End-to-end synchronization scenarios
//!
//! Run the whole orchestrator in copy mode, which exercises every engine
//! component without needing an external encoder.

use std::fs;

use tunesync_actions::TagHacks;
use tunesync_core::{
    AutoConfirm, FingerprintStore, STORE_FILE_NAME, SyncConfig, SyncError, SyncMode,
    SyncOrchestrator,
};
use tunesync_fs::RelPath;
use tunesync_test_utils::TestLibrary;

fn copy_config(library: &TestLibrary, playlists: bool) -> SyncConfig {
    SyncConfig {
        audio_src: library.source_root().to_path_buf(),
        audio_dest: library.dest_root().to_path_buf(),
        playlist_src: playlists.then(|| library.playlist_root().to_path_buf()),
        jobs: 1,
        force: false,
        batch: true,
        mode: SyncMode::Copy,
        hacks: TagHacks::default(),
    }
}

#[test]
fn first_run_mirrors_the_library() {
    let library = TestLibrary::new();
    library.add_source("Artist/Album/01 Song.mp3", b"one");
    library.add_source("Artist/Album/02 Song.mp3", b"two");
    library.add_source("Artist/Album/folder.jpg", b"cover");
    library.add_source("Artist/Album/liner-notes.pdf", b"skip me");

    let report = SyncOrchestrator::new(copy_config(&library, false))
        .run(&AutoConfirm)
        .unwrap();

    assert_eq!(report.files, 4);
    assert_eq!(report.processed, 3);
    assert_eq!(library.read_dest("Artist/Album/01 Song.mp3"), b"one");
    assert_eq!(library.read_dest("Artist/Album/folder.jpg"), b"cover");
    assert!(!library.dest_root().join("Artist/Album/liner-notes.pdf").exists());

    let store = FingerprintStore::open(library.dest_root());
    assert_eq!(store.len(), 3);
    assert!(store.get(&RelPath::new("Artist/Album/01 Song.mp3")).is_some());
}

#[test]
fn unchanged_library_syncs_idempotently() {
    let library = TestLibrary::new();
    library.add_source("Artist/Song.mp3", b"audio");

    let orchestrator = SyncOrchestrator::new(copy_config(&library, false));
    let first = orchestrator.run(&AutoConfirm).unwrap();
    let second = orchestrator.run(&AutoConfirm).unwrap();

    assert_eq!(first.processed, 1);
    assert_eq!(second.processed, 0);
    assert_eq!(library.read_dest("Artist/Song.mp3"), b"audio");
}

#[test]
fn changed_source_is_reprocessed() {
    let library = TestLibrary::new();
    library.add_source("Artist/Song.mp3", b"old bytes");

    let orchestrator = SyncOrchestrator::new(copy_config(&library, false));
    orchestrator.run(&AutoConfirm).unwrap();

    library.add_source("Artist/Song.mp3", b"new bytes");
    let report = orchestrator.run(&AutoConfirm).unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(library.read_dest("Artist/Song.mp3"), b"new bytes");
}

#[test]
fn force_reprocesses_everything() {
    let library = TestLibrary::new();
    library.add_source("Artist/Song.mp3", b"audio");

    SyncOrchestrator::new(copy_config(&library, false))
        .run(&AutoConfirm)
        .unwrap();

    let mut config = copy_config(&library, false);
    config.force = true;
    let report = SyncOrchestrator::new(config).run(&AutoConfirm).unwrap();

    assert_eq!(report.processed, 1);
}

/// The full lifecycle: an unchanged file is skipped, a new file is
/// processed, a removed file's artifact and record disappear, and the
/// emptied directory is pruned.
#[test]
fn mixed_changes_resolve_in_one_run() {
    let library = TestLibrary::new();
    library.add_source("Keep/a.mp3", b"a");
    library.add_source("Gone/c.mp3", b"c");

    let orchestrator = SyncOrchestrator::new(copy_config(&library, false));
    orchestrator.run(&AutoConfirm).unwrap();
    assert!(library.dest_root().join("Gone/c.mp3").exists());

    fs::remove_file(library.source_root().join("Gone/c.mp3")).unwrap();
    fs::remove_dir(library.source_root().join("Gone")).unwrap();
    library.add_source("Keep/b.mp3", b"b");

    let report = orchestrator.run(&AutoConfirm).unwrap();

    // a.mp3 was up to date; only b.mp3 produced work.
    assert_eq!(report.processed, 1);
    assert!(library.dest_root().join("Keep/a.mp3").exists());
    assert!(library.dest_root().join("Keep/b.mp3").exists());
    assert!(!library.dest_root().join("Gone/c.mp3").exists());
    assert!(!library.dest_root().join("Gone").exists());

    let store = FingerprintStore::open(library.dest_root());
    assert_eq!(store.len(), 2);
    assert!(store.get(&RelPath::new("Gone/c.mp3")).is_none());
}

#[test]
fn orphan_record_without_artifact_is_dropped() {
    let library = TestLibrary::new();
    library.add_source("Artist/a.mp3", b"a");
    library.add_source("Artist/b.mp3", b"b");

    let orchestrator = SyncOrchestrator::new(copy_config(&library, false));
    orchestrator.run(&AutoConfirm).unwrap();

    // Remove the source and its artifact out-of-band.
    fs::remove_file(library.source_root().join("Artist/b.mp3")).unwrap();
    fs::remove_file(library.dest_root().join("Artist/b.mp3")).unwrap();
    orchestrator.run(&AutoConfirm).unwrap();

    let store = FingerprintStore::open(library.dest_root());
    assert_eq!(store.len(), 1);
    assert!(store.get(&RelPath::new("Artist/b.mp3")).is_none());
}

#[test]
fn empty_source_aborts_before_any_destination_mutation() {
    let library = TestLibrary::new();

    let err = SyncOrchestrator::new(copy_config(&library, false))
        .run(&AutoConfirm)
        .unwrap_err();

    assert!(matches!(err, SyncError::NoInputFiles { .. }));
    assert!(!library.dest_root().join(STORE_FILE_NAME).exists());
    assert_eq!(fs::read_dir(library.dest_root()).unwrap().count(), 0);
}

#[test]
fn hidden_files_never_reach_the_destination() {
    let library = TestLibrary::new();
    library.add_source("Artist/Song.mp3", b"audio");
    library.add_source(".cache/tmp.mp3", b"hidden");
    library.add_source("Artist/.partial.mp3", b"hidden");

    let report = SyncOrchestrator::new(copy_config(&library, false))
        .run(&AutoConfirm)
        .unwrap();

    assert_eq!(report.files, 1);
    assert!(!library.dest_root().join(".cache").exists());
    assert!(!library.dest_root().join("Artist/.partial.mp3").exists());
}

#[test]
fn sanitized_names_flow_through_store_and_playlists() {
    let library = TestLibrary::new();
    library.add_source("AC: DC/T.N.T.mp3", b"audio");
    library.add_playlist("mix.m3u", b"#EXTM3U\r\nC:\\Music\\AC: DC\\T.N.T.mp3\r\n");

    SyncOrchestrator::new(copy_config(&library, true))
        .run(&AutoConfirm)
        .unwrap();

    // The artifact lands under the sanitized name.
    assert!(library.dest_root().join("AC_ DC/T.N.T.mp3").exists());

    // The record maps the original source path to the sanitized name.
    let store = FingerprintStore::open(library.dest_root());
    let record = store.get(&RelPath::new("AC: DC/T.N.T.mp3")).unwrap();
    assert_eq!(record.dest, "AC_ DC/T.N.T.mp3");

    // The playlist entry resolves after mount-prefix stripping and points
    // at the sanitized destination, in device conventions.
    assert_eq!(
        library.read_dest("mix.m3u"),
        b"#EXTM3U\r\nAC_ DC\\T.N.T.mp3\r\n".to_vec()
    );
}

#[test]
fn playlists_follow_the_current_run_results() {
    let library = TestLibrary::new();
    library.add_source("Artist/Song.mp3", b"audio");
    library.add_playlist("mix.m3u", b"Artist/Song.mp3\r\nArtist/Missing.mp3\r\n");

    SyncOrchestrator::new(copy_config(&library, true))
        .run(&AutoConfirm)
        .unwrap();

    // The known entry is rewritten; the unknown one is dropped.
    assert_eq!(library.read_dest("mix.m3u"), b"Artist\\Song.mp3\r\n".to_vec());
}

#[test]
fn parallel_jobs_produce_the_same_tree() {
    let library = TestLibrary::new();
    for i in 0..30 {
        library.add_source(
            &format!("Album {}/{i:02}.mp3", i % 3),
            format!("audio {i}").as_bytes(),
        );
    }

    let mut config = copy_config(&library, false);
    config.jobs = 4;
    let report = SyncOrchestrator::new(config).run(&AutoConfirm).unwrap();

    assert_eq!(report.processed, 30);
    let store = FingerprintStore::open(library.dest_root());
    assert_eq!(store.len(), 30);
    for i in 0..30 {
        assert!(
            library
                .dest_root()
                .join(format!("Album {}/{i:02}.mp3", i % 3))
                .exists()
        );
    }
}
