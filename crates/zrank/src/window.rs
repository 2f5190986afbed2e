use crate::{Error, MAX_SIGNIFICANT_DIGITS, Result, codec};

/// A scoring window `[start, end)` in Unix seconds, with the tie-break width
/// derived from its length.
///
/// The width is the number of decimal digits in `end - start`. It is fixed
/// for the window's lifetime, which keeps every composite score written into
/// the same leaderboard comparable.
///
/// # Example
///
/// ```
/// use zrank::Window;
///
/// // 2022-11-01 00:00:00 .. 2022-11-30 23:59:59
/// let window = Window::new(1_667_232_000, 1_669_823_999).unwrap();
/// assert_eq!(window.width(), 7);
/// assert_eq!(window.max_value(), 99_999_999);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    start: i64,
    end: i64,
    width: u32,
}

impl Window {
    /// Validates the bounds and derives the tie-break width.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWindow`] when `end <= start`, or when the span is so
    /// long that its tie-break digits alone use up the precision budget.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        let invalid = Error::InvalidWindow { start, end };

        let span = end
            .checked_sub(start)
            .filter(|&span| span > 0)
            .ok_or(invalid.clone())?;
        let width = codec::digit_width(span as u64);
        if width >= MAX_SIGNIFICANT_DIGITS {
            return Err(invalid);
        }

        Ok(Self { start, end, width })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Length of the window in seconds.
    pub fn span(&self) -> u64 {
        (self.end - self.start) as u64
    }

    /// Digits reserved for the tie-break fraction.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Largest accumulated value a member of this window can reach.
    pub fn max_value(&self) -> u64 {
        codec::max_value(self.width)
    }

    /// Whether `ts` falls inside `[start, end)`.
    pub fn contains(&self, ts: i64) -> bool {
        (self.start..self.end).contains(&ts)
    }

    /// Encodes `value` as updated at `now`.
    ///
    /// `now` is clamped into `[start, end]` first, so an update before the
    /// window opens ranks as the oldest possible and one after it closes as
    /// the newest possible. The fraction therefore always fits the width.
    pub fn encode(&self, value: u64, now: i64) -> Result<f64> {
        codec::encode(value, now.clamp(self.start, self.end), self.end, self.width)
    }

    /// Decodes a composite score written into this window.
    pub fn decode(&self, score: f64) -> Result<u64> {
        codec::decode(score, self.width)
    }
}
