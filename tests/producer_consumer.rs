use std::{
    thread,
    time::{Duration, Instant, SystemTime},
};

use clap::Parser;
use gym_coach::{
    capture::{Producer, spawn_producer},
    coach_config::CoachConfig,
    exercises::{Exercise, Phase},
    launch::CoachRuntime,
    replay::{RecordedFrame, replay, save_recording},
    session::{AppState, Goals, Session},
    settings::Cli,
    snapshot::SharedCoach,
    workout_log::CsvWorkoutLog,
};

const LEFT_SHOULDER: usize = 11;
const LEFT_WRIST: usize = 15;
const RIGHT_WRIST: usize = 16;

fn clap_pose(gap: f32) -> RecordedFrame {
    let mut landmarks = vec![(0., 0.); 33];
    landmarks[LEFT_SHOULDER] = (360., 300.);
    landmarks[LEFT_WRIST] = (300. + gap / 2., 100.);
    landmarks[RIGHT_WRIST] = (300. - gap / 2., 100.);
    RecordedFrame {
        width: 640,
        height: 480,
        landmarks,
    }
}

/// `claps` full claps, with a no-body frame between each
fn clap_recording(claps: usize) -> Vec<RecordedFrame> {
    let mut frames = Vec::new();
    for _ in 0..claps {
        frames.push(clap_pose(200.));
        frames.push(clap_pose(20.));
        frames.push(RecordedFrame {
            width: 640,
            height: 480,
            landmarks: Vec::new(),
        });
    }
    frames
}

#[test]
fn replayed_workout_is_saved_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
    let config_path = path("coach.json");
    let recording_path = path("claps.msgpack");
    let log_path = path("history.csv");

    CoachConfig {
        exercise: Exercise::BicepCurl,
        rep_goal: 3,
        set_goal: 1,
        workout_log_path: log_path.clone(),
        replay_fps: 0.,
        ..Default::default()
    }
    .write_config_to_file(&config_path)
    .unwrap();
    // Extra claps after the goal must not produce a second row
    save_recording(&recording_path, &clap_recording(5)).unwrap();

    let cli = Cli::parse_from([
        "gym-coach",
        "--coachConfigPath",
        &config_path,
        "--recordingPath",
        &recording_path,
        "--username",
        "Sam",
        "--exercise",
        "overhead-clap",
    ]);
    let mut runtime = CoachRuntime::start(&cli).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !runtime.producer_finished() {
        assert!(Instant::now() < deadline, "producer did not finish");
        thread::sleep(Duration::from_millis(5));
    }
    runtime.shutdown();

    let snapshot = runtime.coach.snapshot();
    assert_eq!(snapshot.exercise, Exercise::OverheadClap);
    assert_eq!(snapshot.app_state, AppState::Saved);
    assert_eq!(snapshot.set_count, 1);
    assert_eq!(snapshot.sequence, 15);

    let text = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Timestamp,Username,Exercise,Total_Sets,Reps_Per_Set");
    assert!(lines[1].ends_with(",Sam,Overhead Clap,1,3"));
}

#[test]
fn missing_recording_path_is_a_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("absent.json").to_string_lossy().into_owned();
    let cli = Cli::parse_from(["gym-coach", "--coachConfigPath", &config_path]);
    assert!(CoachRuntime::start(&cli).is_err());
}

#[test]
fn consumer_always_sees_consistent_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let goals = Goals::new(4, 3).unwrap();
    let coach = SharedCoach::new(Session::new(
        "tester",
        Exercise::OverheadClap,
        goals,
        Duration::from_millis(20),
    ));

    let (source, detector) = replay(clap_recording(7), None, true);
    let producer = Producer::new(
        source,
        detector,
        CsvWorkoutLog::new(dir.path().join("history.csv")),
        coach.clone(),
    );
    let handle = spawn_producer(producer).unwrap();

    let mut last_sequence = 0;
    let mut saw_rest = false;
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        coach.tick(SystemTime::now());
        let s = coach.snapshot();

        assert!(s.sequence >= last_sequence);
        last_sequence = s.sequence;
        assert!(s.set_count <= goals.set_goal);
        match s.app_state {
            AppState::Counting => {
                assert!(s.rep_count < goals.rep_goal);
                assert!(s.rest_deadline.is_none());
                assert!(matches!(s.phase, Phase::Down | Phase::Apart | Phase::Clap));
            }
            AppState::Resting => {
                saw_rest = true;
                assert_eq!(s.rep_count, 0);
                assert!(s.rest_deadline.is_some());
                assert!(s.set_count >= 1 && s.set_count < goals.set_goal);
            }
            AppState::Finished | AppState::Saved => {
                assert_eq!(s.set_count, goals.set_goal);
                assert_eq!(s.rep_count, 0);
                break;
            }
        }
        assert!(Instant::now() < deadline, "workout never finished");
        thread::yield_now();
    }

    coach.stop();
    handle.join().unwrap();
    assert!(saw_rest);

    let text = std::fs::read_to_string(dir.path().join("history.csv")).unwrap();
    assert_eq!(text.lines().count(), 2);
}
