use std::time::Duration;

use tokio::sync::mpsc;

use jin::phase::PhaseTimer;

#[tokio::test(start_paused = true)]
async fn given_armed_timer_when_duration_elapses_then_epoch_is_delivered() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut timer = PhaseTimer::new();

    timer.arm(3, Duration::from_secs(60), move |epoch| {
        let _ = tx.send(epoch);
    });
    assert_eq!(timer.armed_epoch(), Some(3));

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(rx.recv().await, Some(3));
}

#[tokio::test(start_paused = true)]
async fn given_cancelled_timer_when_duration_elapses_then_nothing_fires() {
    let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
    let mut timer = PhaseTimer::new();

    timer.arm(1, Duration::from_secs(10), move |epoch| {
        let _ = tx.send(epoch);
    });
    assert!(timer.cancel());
    assert!(!timer.cancel());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(rx.recv().await.is_none(), "sender dropped without firing");
}

#[tokio::test(start_paused = true)]
async fn given_rearmed_timer_when_both_durations_elapse_then_only_latest_epoch_fires() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut timer = PhaseTimer::new();

    let first = tx.clone();
    timer.arm(1, Duration::from_secs(5), move |epoch| {
        let _ = first.send(epoch);
    });
    timer.arm(2, Duration::from_secs(20), move |epoch| {
        let _ = tx.send(epoch);
    });

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(rx.recv().await, Some(2));
    assert!(rx.recv().await.is_none());
}
