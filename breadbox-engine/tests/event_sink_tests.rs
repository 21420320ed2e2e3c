use breadbox_engine::{EventSink, LogSink, MemorySink};
use breadbox_types::{ChangeAction, Event, RecordId};
use pretty_assertions::assert_eq;

fn added(id: i64) -> Event {
    Event::record_changed("posts", RecordId::new(id), "{}", ChangeAction::Added)
}

#[test]
fn memory_sink_keeps_emission_order() {
    let sink = MemorySink::new();
    sink.emit(added(1));
    sink.emit(Event::file_deleted("public", "a.png"));
    sink.emit(added(2));

    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].action(), Some(ChangeAction::Added));
    assert_eq!(events[1].action(), None);
}

#[test]
fn channel_sink_forwards_events() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let event = added(7);
    tx.emit(event.clone());
    assert_eq!(rx.try_recv().unwrap(), event);
}

#[test]
fn closed_channel_is_ignored() {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Event>();
    drop(rx);
    tx.emit(added(1));
}

#[test]
fn log_sink_accepts_every_payload() {
    LogSink.emit(added(1));
    LogSink.emit(Event::file_deleted("public", "a.png"));
}
