mod support;

use duolane_core::{NoteLifecycle, NoteScheduler, SchedulerConfig, SchedulerEvent};
use duolane_domain_chart::Note;
use duolane_ports::types::Lane;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use support::chart;

fn scheduler(rows: &[(f64, i64)]) -> NoteScheduler {
    NoteScheduler::new(Arc::new(chart(rows)), SchedulerConfig::default())
}

fn spawned(events: &[SchedulerEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            SchedulerEvent::Spawned(note) => Some(note.index),
            _ => None,
        })
        .collect()
}

#[test]
fn spawns_notes_inside_approach_plus_lookahead() {
    let mut scheduler = scheduler(&[(1.0, 0), (2.0, 1), (5.0, 0)]);

    let events = scheduler.tick(0.0);
    assert_eq!(spawned(&events), vec![0]);
    assert_eq!(scheduler.spawned_index(), 1);

    let events = scheduler.tick(0.7);
    assert_eq!(spawned(&events), vec![1]);
    assert_eq!(scheduler.spawned_index(), 2);
    assert_eq!(scheduler.active_len(), 2);
}

#[test]
fn simultaneous_notes_spawn_in_the_same_tick() {
    let mut scheduler = scheduler(&[(1.0, 0), (1.0, 1)]);

    assert!(spawned(&scheduler.tick(-0.41)).is_empty());
    assert_eq!(spawned(&scheduler.tick(-0.4)), vec![0, 1]);
}

#[test]
fn spawn_cursor_never_moves_backwards() {
    let mut scheduler = scheduler(&[(1.0, 0), (1.5, 1), (3.0, 0)]);

    scheduler.tick(1.0);
    let after_forward = scheduler.spawned_index();
    let events = scheduler.tick(-5.0);

    assert!(spawned(&events).is_empty());
    assert_eq!(scheduler.spawned_index(), after_forward);
}

#[test]
fn reports_progress_for_every_active_note() {
    let mut scheduler = scheduler(&[(1.2, 0), (1.5, 1)]);

    let events = scheduler.tick(0.6);
    let progress: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SchedulerEvent::Updated { note, progress } => Some((note.index, *progress)),
            _ => None,
        })
        .collect();

    assert_eq!(progress.len(), 2);
    assert!((progress[0].1 - 0.5).abs() < 1e-9);
    assert!((progress[1].1 - 0.25).abs() < 1e-9);
}

#[test]
fn progress_is_not_clamped() {
    let scheduler = scheduler(&[(1.0, 0)]);
    let note = Note {
        index: 0,
        time_sec: 1.0,
        lane: Lane::Left,
    };

    assert!(scheduler.progress(&note, -1.0) < 0.0);
    assert!((scheduler.progress(&note, 1.0) - 1.0).abs() < 1e-9);
    assert!(scheduler.progress(&note, 1.2) > 1.0);
}

#[test]
fn expires_notes_past_the_miss_window() {
    let mut scheduler = scheduler(&[(1.0, 0), (2.0, 1)]);
    scheduler.tick(0.5);

    let events = scheduler.tick(1.25);
    assert!(!events.iter().any(|e| matches!(e, SchedulerEvent::Expired(_))));

    let events = scheduler.tick(1.26);
    let expired: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SchedulerEvent::Expired(note) => Some(note.index),
            _ => None,
        })
        .collect();

    assert_eq!(expired, vec![0]);
    assert_eq!(scheduler.lifecycle(0), Some(NoteLifecycle::Missed));
    assert_eq!(scheduler.lifecycle(1), Some(NoteLifecycle::Active));
}

#[test]
fn update_is_reported_before_expiry_in_the_same_tick() {
    let mut scheduler = scheduler(&[(1.0, 0)]);
    scheduler.tick(0.0);

    let events = scheduler.tick(2.0);

    assert!(matches!(events[0], SchedulerEvent::Updated { .. }));
    assert!(matches!(events[1], SchedulerEvent::Expired(_)));
}

#[test]
fn retired_hits_leave_the_active_set_once() {
    let mut scheduler = scheduler(&[(1.0, 0), (1.0, 1)]);
    scheduler.tick(1.0);

    assert!(scheduler.retire_hit(1));
    assert!(!scheduler.retire_hit(1));
    assert_eq!(scheduler.lifecycle(1), Some(NoteLifecycle::Hit));
    assert_eq!(
        scheduler.active_notes().map(|n| n.index).collect::<Vec<_>>(),
        vec![0]
    );

    // A hit note never comes back as an expiry.
    let events = scheduler.tick(3.0);
    assert!(!events
        .iter()
        .any(|e| matches!(e, SchedulerEvent::Expired(note) if note.index == 1)));
}

#[test]
fn exhausted_once_everything_is_spawned_and_resolved() {
    let mut scheduler = scheduler(&[(1.0, 0)]);
    assert!(!scheduler.is_exhausted());

    scheduler.tick(0.0);
    assert!(!scheduler.is_exhausted());

    scheduler.tick(1.5);
    assert!(scheduler.is_exhausted());
}

#[test]
fn empty_chart_is_exhausted_immediately() {
    let scheduler = scheduler(&[]);
    assert!(scheduler.is_exhausted());
    assert_eq!(scheduler.lifecycle(0), None);
}
