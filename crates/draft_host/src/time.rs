//! Clock and identifier helpers.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_ITEM_ID_MS: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns a fresh list-item id: a millisecond timestamp rendered as a decimal string.
///
/// Ids increase strictly within the current thread even when the clock stalls, and any value for
/// which `is_taken` returns `true` (for example ids restored from storage) is skipped.
pub fn next_item_id(is_taken: impl Fn(&str) -> bool) -> String {
    let now = unix_time_ms_now();
    LAST_ITEM_ID_MS.with(|last| {
        let mut candidate = now.max(last.get().saturating_add(1));
        let mut id = candidate.to_string();
        while is_taken(&id) {
            candidate = candidate.saturating_add(1);
            id = candidate.to_string();
        }
        last.set(candidate);
        id
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids_strictly_increase() {
        let first: u64 = next_item_id(|_| false).parse().expect("numeric id");
        let second: u64 = next_item_id(|_| false).parse().expect("numeric id");
        assert!(second > first);
    }

    #[test]
    fn item_ids_skip_taken_values() {
        let probe: u64 = next_item_id(|_| false).parse().expect("numeric id");
        let blocked = [(probe + 1).to_string(), (probe + 2).to_string()];
        let id = next_item_id(|candidate| blocked.iter().any(|taken| taken == candidate));
        assert!(!blocked.contains(&id));
        assert!(id.parse::<u64>().expect("numeric id") > probe);
    }
}
