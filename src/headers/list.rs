//! Segmented, append-only list of response headers.
//!
//! # Responsibilities
//! - Store header entries in insertion order across fixed-size segments
//! - Keep soft-deleted (inactive) entries in place
//! - Report resource exhaustion when a new slot cannot be obtained
//!
//! # Design Decisions
//! - Segments are never reallocated once opened, so growth never moves entries
//! - Slot allocation uses `try_reserve` so allocator refusal is an error, not an abort

/// Number of entries per segment when none is configured.
pub const DEFAULT_PART_SIZE: usize = 20;

/// Resource exhaustion while growing a [`HeaderList`].
///
/// This is the only failure the header subsystem produces. It is never
/// retried by callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// The configured entry limit has been reached.
    #[error("header list is full ({limit} entries)")]
    LimitReached { limit: usize },

    /// The allocator refused to provide space for a new slot.
    #[error("failed to allocate header slot: {0}")]
    Alloc(String),
}

/// A single response header.
///
/// `active == false` marks a soft-deleted entry: it is skipped when the list
/// is serialized but stays in its slot. Values are kept as raw bytes so
/// upstream headers that are not UTF-8 pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    name: String,
    lowcase_name: String,
    value: Vec<u8>,
    active: bool,
}

impl HeaderEntry {
    /// Create an active entry.
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::with_state(name, value, true)
    }

    /// Create an entry with an explicit presence flag.
    pub fn with_state(name: impl Into<String>, value: impl Into<Vec<u8>>, active: bool) -> Self {
        let name = name.into();
        let lowcase_name = name.to_ascii_lowercase();
        Self {
            name,
            lowcase_name,
            value: value.into(),
            active,
        }
    }

    /// Header name as it was written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lookup key.
    pub fn lowcase_name(&self) -> &str {
        &self.lowcase_name
    }

    /// Raw value bytes.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Value as text, or `None` if it is not UTF-8.
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rewrite name and value in place. An empty value deactivates the entry.
    pub(crate) fn overwrite(&mut self, name: &str, value: &str) {
        if self.name != name {
            self.name.clear();
            self.name.push_str(name);
            self.lowcase_name = name.to_ascii_lowercase();
        }
        self.value.clear();
        self.value.extend_from_slice(value.as_bytes());
        self.active = !value.is_empty();
    }

    /// Soft-delete: clear the value and mark inactive.
    pub(crate) fn deactivate(&mut self) {
        self.value.clear();
        self.active = false;
    }
}

/// Sizing limits applied to a [`HeaderList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderListLimits {
    /// Entries per segment.
    pub part_size: usize,
    /// Hard cap on total entries (active or not). `None` means unbounded.
    pub max_entries: Option<usize>,
}

impl Default for HeaderListLimits {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            max_entries: None,
        }
    }
}

/// Ordered header collection split into fixed-capacity segments.
#[derive(Debug, Clone)]
pub struct HeaderList {
    parts: Vec<Vec<HeaderEntry>>,
    limits: HeaderListLimits,
    len: usize,
}

impl HeaderList {
    /// Create an empty list with default limits.
    pub fn new() -> Self {
        Self::with_limits(HeaderListLimits::default())
    }

    /// Create an empty list. No segment is allocated until the first push.
    pub fn with_limits(limits: HeaderListLimits) -> Self {
        Self {
            parts: Vec::new(),
            limits: HeaderListLimits {
                part_size: limits.part_size.max(1),
                ..limits
            },
            len: 0,
        }
    }

    /// Append an entry at the end of the list.
    pub fn push(&mut self, entry: HeaderEntry) -> Result<&mut HeaderEntry, HeaderError> {
        if let Some(limit) = self.limits.max_entries {
            if self.len >= limit {
                return Err(HeaderError::LimitReached { limit });
            }
        }

        let needs_part = self
            .parts
            .last()
            .map_or(true, |part| part.len() >= self.limits.part_size);

        if needs_part {
            let mut part = Vec::new();
            part.try_reserve_exact(self.limits.part_size)
                .map_err(|e| HeaderError::Alloc(e.to_string()))?;
            self.parts
                .try_reserve(1)
                .map_err(|e| HeaderError::Alloc(e.to_string()))?;
            self.parts.push(part);
            tracing::trace!(parts = self.parts.len(), "Opened header list segment");
        }

        let part = self
            .parts
            .last_mut()
            .ok_or_else(|| HeaderError::Alloc("no header segment available".to_string()))?;
        part.push(entry);
        self.len += 1;
        let last = part.len() - 1;
        Ok(&mut part[last])
    }

    /// Total entries, including inactive ones.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments currently allocated.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn limits(&self) -> HeaderListLimits {
        self.limits
    }

    /// All entries in order, active or not.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.parts.iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut HeaderEntry> {
        self.parts.iter_mut().flatten()
    }

    /// Active entries in order.
    pub fn active(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.iter().filter(|e| e.is_active())
    }

    /// Raw value of the first active entry named `name` (case-insensitive).
    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        let key = name.to_ascii_lowercase();
        self.active()
            .find(|e| e.lowcase_name() == key)
            .map(HeaderEntry::value)
    }

    /// Like [`get_bytes`](Self::get_bytes), but `None` for values that are not UTF-8.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_bytes(name)
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    /// True if any entry, active or not, carries `name`.
    pub fn contains_any(&self, name: &str) -> bool {
        let key = name.to_ascii_lowercase();
        self.iter().any(|e| e.lowcase_name() == key)
    }

    /// Number of active entries named `name`.
    pub fn active_count(&self, name: &str) -> usize {
        let key = name.to_ascii_lowercase();
        self.active().filter(|e| e.lowcase_name() == key).count()
    }
}

impl Default for HeaderList {
    fn default() -> Self {
        Self::new()
    }
}
