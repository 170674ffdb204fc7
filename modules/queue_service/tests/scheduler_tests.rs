//! Auto-call evaluation and scheduler loop tests

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tokio_util::sync::CancellationToken;

use queue_service::contract::*;
use queue_service::domain::{AutoCallScheduler, Evaluation, QueueEvent};

mod common;
use common::QueueFixture;

// ===== Per-counter evaluation =====

#[tokio::test]
async fn no_officer_holds_the_queue() {
    let fx = QueueFixture::new();
    fx.client_present(false);
    fx.seed_waiting(1, 1, Utc::now());

    let eval = fx.service.evaluate_counter(fx.tenant_id, 1).await.unwrap();
    assert_eq!(eval, Evaluation::default());
    assert_eq!(
        fx.tickets.all()[0].status,
        TicketStatus::Waiting,
        "queue must not advance without an officer"
    );
}

#[tokio::test]
async fn occupied_client_seat_blocks_advancing() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    fx.client_present(true);
    fx.seed_waiting(1, 1, Utc::now());

    let eval = fx.service.evaluate_counter(fx.tenant_id, 1).await.unwrap();
    assert_eq!(eval, Evaluation::default());
}

#[tokio::test]
async fn eligible_counter_finalizes_then_advances() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    let outstanding = fx.seed_called(1, 1, Utc::now() - ChronoDuration::minutes(2));
    let next = fx.seed_waiting(1, 2, Utc::now() - ChronoDuration::minutes(1));

    let eval = fx.service.evaluate_counter(fx.tenant_id, 1).await.unwrap();

    let finished = eval.finished.unwrap();
    assert_eq!(finished.id, outstanding.id);
    assert_eq!(finished.status, TicketStatus::Done);
    assert!(finished.finished_at.is_some());
    assert!(finished.finished_at >= finished.called_at);

    let called = eval.called.unwrap();
    assert_eq!(called.id, next.id);
    assert_eq!(called.status, TicketStatus::Called);
    assert!(called.called_at.is_some());

    match fx.publisher.last() {
        Some(QueueEvent::TicketCalled(event)) => {
            assert_eq!(event.ticket_number, Some(2));
        }
        other => panic!("expected ticket_called event, got {other:?}"),
    }
}

#[tokio::test]
async fn finalization_happens_even_with_empty_queue() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    let outstanding = fx.seed_called(1, 1, Utc::now());

    let eval = fx.service.evaluate_counter(fx.tenant_id, 1).await.unwrap();
    assert_eq!(eval.finished.unwrap().id, outstanding.id);
    assert!(eval.called.is_none());
    // Nothing was called, so nothing is announced.
    assert!(fx.publisher.events().is_empty());
}

#[tokio::test]
async fn paused_counter_is_skipped() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    fx.seed_waiting(1, 1, Utc::now());
    fx.service
        .pause_counter(fx.tenant_id, 1, "system check")
        .await
        .unwrap();

    let eval = fx.service.evaluate_counter(fx.tenant_id, 1).await.unwrap();
    assert_eq!(eval, Evaluation::default());
    assert_eq!(fx.tickets.all()[0].status, TicketStatus::Waiting);
}

#[tokio::test]
async fn counter_without_client_seat_is_skipped() {
    let fx = QueueFixture::new();
    fx.counters.add(Counter {
        id: 3,
        tenant_id: fx.tenant_id,
        name: "Counter 3".to_string(),
        status: CounterStatus::Active,
    });
    fx.seats.add(Seat {
        id: 31,
        tenant_id: fx.tenant_id,
        counter_id: 3,
        name: "Officer seat 3".to_string(),
        kind: SeatKind::Officer,
        occupied: true,
        last_empty_time: None,
    });
    fx.seed_waiting(3, 1, Utc::now());

    let eval = fx.service.evaluate_counter(fx.tenant_id, 3).await.unwrap();
    assert_eq!(eval, Evaluation::default());
}

#[tokio::test]
async fn evaluating_unknown_counter_fails() {
    let fx = QueueFixture::new();
    let result = fx.service.evaluate_counter(fx.tenant_id, 42).await;
    assert!(matches!(result, Err(QueueError::NotFound { .. })));
}

// ===== Whole-pass evaluation =====

#[tokio::test]
async fn one_failing_counter_does_not_starve_the_pass() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    fx.add_counter(2);
    fx.seed_waiting(1, 1, Utc::now());
    let healthy = fx.seed_waiting(2, 1, Utc::now());
    fx.tickets.fail_counter(1);

    fx.service.evaluate_all().await;

    assert_eq!(
        fx.tickets.get(healthy.id).unwrap().status,
        TicketStatus::Called,
        "the healthy counter still advances"
    );
}

#[tokio::test]
async fn pass_skips_paused_counters_entirely() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    fx.seed_waiting(1, 1, Utc::now());
    fx.service
        .pause_counter(fx.tenant_id, 1, "end of day")
        .await
        .unwrap();

    fx.service.evaluate_all().await;
    assert_eq!(fx.tickets.all()[0].status, TicketStatus::Waiting);
}

// ===== Scheduler loop =====

#[tokio::test(start_paused = true)]
async fn scheduler_evaluates_after_the_interval() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    let ticket = fx.seed_waiting(1, 1, Utc::now());

    let scheduler = AutoCallScheduler::new(
        fx.service.clone(),
        fx.resets.clone(),
        Duration::from_secs(60),
    );
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(scheduler.run(cancel.clone()));

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert_eq!(fx.tickets.get(ticket.id).unwrap().status, TicketStatus::Waiting);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(fx.tickets.get(ticket.id).unwrap().status, TicketStatus::Called);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reset_signal_rearms_the_timer_without_evaluating() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    let ticket = fx.seed_waiting(1, 1, Utc::now());

    let scheduler = AutoCallScheduler::new(
        fx.service.clone(),
        fx.resets.clone(),
        Duration::from_secs(60),
    );
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(scheduler.run(cancel.clone()));

    // Halfway through the interval a manual action raises the reset.
    tokio::time::sleep(Duration::from_secs(30)).await;
    fx.resets.set(fx.tenant_id, 1);

    // The original deadline (t=60) passes without a tick.
    tokio::time::sleep(Duration::from_secs(45)).await;
    assert_eq!(
        fx.tickets.get(ticket.id).unwrap().status,
        TicketStatus::Waiting,
        "reset must restart the interval, not trigger evaluation"
    );

    // The rearmed deadline (t=90) does tick.
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(fx.tickets.get(ticket.id).unwrap().status, TicketStatus::Called);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_loop() {
    let fx = QueueFixture::new();
    fx.officer_present(true);
    let ticket = fx.seed_waiting(1, 1, Utc::now());

    let scheduler = AutoCallScheduler::new(
        fx.service.clone(),
        fx.resets.clone(),
        Duration::from_secs(60),
    );
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(scheduler.run(cancel.clone()));

    tokio::task::yield_now().await;
    cancel.cancel();
    handle.await.unwrap();

    // Long after the would-be tick, nothing has moved.
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(fx.tickets.get(ticket.id).unwrap().status, TicketStatus::Waiting);
}
