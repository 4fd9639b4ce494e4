//! # Reminder Queue
//!
//! One-shot delayed messages (reminders, Pomodoro phases). A single background
//! task owns a deadline heap and sleeps until the earliest entry is due.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::domain::traits::ChatProvider;

/// Min-heap of payloads keyed by deadline. Entries with equal deadlines pop
/// in insertion order.
pub struct DeadlineHeap<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    seq: u64,
}

struct Entry<T> {
    due: Instant,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl<T> Default for DeadlineHeap<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl<T> DeadlineHeap<T> {
    pub fn push(&mut self, due: Instant, payload: T) {
        self.seq += 1;
        self.heap.push(Reverse(Entry {
            due,
            seq: self.seq,
            payload,
        }));
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(entry)| entry.due)
    }

    /// Removes and returns every payload due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.due > now {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push(entry.payload);
            }
        }
        due
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

struct Reminder {
    due: Instant,
    message: String,
    chat: Arc<dyn ChatProvider>,
}

/// Handle to the background reminder task. Cloning shares the same queue.
#[derive(Clone)]
pub struct ReminderQueue {
    tx: mpsc::UnboundedSender<Reminder>,
}

impl ReminderQueue {
    /// Spawns the delivery task on the current runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx));
        Self { tx }
    }

    /// Posts `message` to `chat` once `delay` has elapsed.
    pub fn schedule_in(&self, delay: Duration, message: String, chat: Arc<dyn ChatProvider>) -> bool {
        let reminder = Reminder {
            due: Instant::now() + delay,
            message,
            chat,
        };
        self.tx.send(reminder).is_ok()
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<Reminder>) {
    let mut pending: DeadlineHeap<(String, Arc<dyn ChatProvider>)> = DeadlineHeap::default();
    let mut open = true;

    while open || !pending.is_empty() {
        let next = pending.next_deadline();
        tokio::select! {
            incoming = rx.recv(), if open => match incoming {
                Some(reminder) => pending.push(reminder.due, (reminder.message, reminder.chat)),
                None => open = false,
            },
            _ = sleep_until(next) => {
                for (message, chat) in pending.pop_due(Instant::now()) {
                    if let Err(e) = chat.send_message(&message).await {
                        tracing::error!("Failed to deliver reminder to {}: {}", chat.room_id(), e);
                    }
                }
            }
        }
    }
    tracing::debug!("Reminder queue stopped");
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Next wall-clock moment (UTC) with time-of-day `at`: today, or tomorrow if
/// that moment has already passed.
pub fn next_occurrence(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today < now {
        today + chrono::Duration::days(1)
    } else {
        today
    }
}

/// Delay from `now` until `due`, clamped at zero.
pub fn delay_until(now: DateTime<Utc>, due: DateTime<Utc>) -> Duration {
    (due - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingChat;
    use chrono::TimeZone;

    #[test]
    fn test_heap_pops_in_deadline_order() {
        let base = Instant::now();
        let mut heap = DeadlineHeap::default();
        heap.push(base + Duration::from_secs(30), "c");
        heap.push(base + Duration::from_secs(10), "a");
        heap.push(base + Duration::from_secs(10), "b");
        heap.push(base + Duration::from_secs(60), "d");

        assert_eq!(heap.next_deadline(), Some(base + Duration::from_secs(10)));
        assert!(heap.pop_due(base).is_empty());
        assert_eq!(heap.pop_due(base + Duration::from_secs(30)), vec!["a", "b", "c"]);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.pop_due(base + Duration::from_secs(3600)), vec!["d"]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_next_occurrence_later_today() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let due = next_occurrence(now, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(due, Utc.with_ymd_and_hms(2026, 10, 19, 17, 30, 0).unwrap());
        assert_eq!(delay_until(now, due), Duration::from_secs(8 * 3600 + 1800));
    }

    #[test]
    fn test_next_occurrence_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let due = next_occurrence(now, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(due, Utc.with_ymd_and_hms(2026, 10, 20, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_delay_never_negative() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        assert_eq!(delay_until(now, now - chrono::Duration::minutes(5)), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_delivers_after_delay() {
        let chat = RecordingChat::new("!room:hs");
        let queue = ReminderQueue::spawn();

        assert!(queue.schedule_in(Duration::from_secs(300), "second".into(), Arc::new(chat.clone())));
        assert!(queue.schedule_in(Duration::from_secs(60), "first".into(), Arc::new(chat.clone())));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(chat.messages().is_empty());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(chat.messages(), vec!["first".to_string()]);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(chat.messages(), vec!["first".to_string(), "second".to_string()]);
    }
}
