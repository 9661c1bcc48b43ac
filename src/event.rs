use crate::query::QueryEvent;
use crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The debounce timer for typed search input with this sequence number fired.
    SearchDebounced(u64),
    Query(QueryEvent),
}
