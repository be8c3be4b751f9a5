//! Tab addresses derived from display names.
//!
//! `safe_id` is the raw character substitution; it is deterministic but not
//! injective (`a.b`, `a_b` and `a b` all map to `a-b`). `SafeIdAllocator`
//! resolves collisions against the set of ids currently in use.

const REPLACED: [char; 3] = ['.', ' ', '_'];

pub fn safe_id(display_name: &str) -> String {
    display_name
        .chars()
        .map(|ch| if REPLACED.contains(&ch) { '-' } else { ch })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SafeIdAllocator;

impl SafeIdAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Returns the bare candidate when free, otherwise the first free
    /// `<candidate>-<n>` with `n >= 2`.
    pub fn allocate<F>(&self, display_name: &str, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let candidate = safe_id(display_name);
        if !is_taken(&candidate) {
            return candidate;
        }

        let mut n = 2usize;
        loop {
            let suffixed = format!("{candidate}-{n}");
            if !is_taken(&suffixed) {
                return suffixed;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/safe_id.rs"]
mod tests;
