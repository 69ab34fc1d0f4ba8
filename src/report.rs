//! Status block layout and the touch report decoded from it.

/// Number of bytes fetched from the data register on every poll.
pub const STATUS_BLOCK_LEN: usize = 16;

/// Bytes that actually carry touch data; the tail of the block is ignored.
pub const STATUS_BLOCK_MIN_LEN: usize = 13;

const TD_STATUS: usize = 2;
const P1_XH: usize = 3;
const P1_XL: usize = 4;
const P1_YH: usize = 5;
const P1_YL: usize = 6;
const P2_XH: usize = 9;
const P2_XL: usize = 10;
const P2_YH: usize = 11;
const P2_YL: usize = 12;

/// A single touch coordinate. Both axes are 12-bit values (0..=4095).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

/// Raw status block read from the chip's base data register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBlock([u8; STATUS_BLOCK_LEN]);

impl StatusBlock {
    pub const fn new(raw: [u8; STATUS_BLOCK_LEN]) -> Self {
        Self(raw)
    }

    /// Builds a block from a slice holding at least the touch-data bytes.
    ///
    /// Bytes past the end of `data` read as zero; bytes past
    /// [`STATUS_BLOCK_LEN`] are ignored.
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        if data.len() < STATUS_BLOCK_MIN_LEN {
            return None;
        }
        let mut raw = [0u8; STATUS_BLOCK_LEN];
        let len = data.len().min(STATUS_BLOCK_LEN);
        raw[..len].copy_from_slice(&data[..len]);
        Some(Self(raw))
    }

    pub fn raw(&self) -> &[u8; STATUS_BLOCK_LEN] {
        &self.0
    }

    /// Touch count from the low nibble of TD_STATUS. Not range checked.
    pub fn point_count(&self) -> u8 {
        self.0[TD_STATUS] & 0x0F
    }

    pub fn point1(&self) -> TouchPoint {
        TouchPoint {
            x: coordinate(self.0[P1_XH], self.0[P1_XL]),
            y: coordinate(self.0[P1_YH], self.0[P1_YL]),
        }
    }

    pub fn point2(&self) -> TouchPoint {
        TouchPoint {
            x: coordinate(self.0[P2_XH], self.0[P2_XL]),
            y: coordinate(self.0[P2_YH], self.0[P2_YL]),
        }
    }
}

/// Combine the low nibble of `high` with `low` into a 12-bit value.
fn coordinate(high: u8, low: u8) -> u16 {
    (u16::from(high & 0x0F) << 8) | u16::from(low)
}

/// Latest touch state reported by the controller.
///
/// The report is overwritten in place by every decoded frame. Points that the
/// current frame does not cover keep their previous values, so only trust
/// them through [`TouchReport::points`] or after checking `point_count`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TouchReport {
    /// Active contacts in the last frame. Anything other than 0, 1 or 2 comes
    /// from a corrupted frame and means no valid touch.
    pub point_count: u8,
    /// Valid when `point_count` is 1 or 2.
    pub point1: TouchPoint,
    /// Valid when `point_count` is 2.
    pub point2: TouchPoint,
    /// Key status byte. Never written by the decoder.
    pub key_state: u8,
    /// Set when a new frame should be fetched, cleared once one is decoded.
    pub interrupt_pending: bool,
    /// Always zero: gestures need a special firmware on the FT6236.
    pub gesture: u8,
}

impl TouchReport {
    pub const fn new() -> Self {
        Self {
            point_count: 0,
            point1: TouchPoint { x: 0, y: 0 },
            point2: TouchPoint { x: 0, y: 0 },
            key_state: 0,
            interrupt_pending: false,
            gesture: 0,
        }
    }

    /// Apply one status block to the report.
    ///
    /// Point 1 is decoded for a count of 1 or 2, point 2 only for a count of
    /// 2. Any other count leaves both points untouched. The pending flag is
    /// always cleared.
    pub fn decode(&mut self, block: &StatusBlock) {
        self.point_count = block.point_count();

        if matches!(self.point_count, 1 | 2) {
            self.point1 = block.point1();
            log::debug!("Touch 1 at x: {} y: {}", self.point1.x, self.point1.y);
        }
        if self.point_count == 2 {
            self.point2 = block.point2();
            log::debug!("Touch 2 at x: {} y: {}", self.point2.x, self.point2.y);
        }

        self.interrupt_pending = false;
    }

    /// Whether the last frame reported a valid touch.
    pub fn is_touched(&self) -> bool {
        matches!(self.point_count, 1 | 2)
    }

    /// Valid touch points of the last frame, in chip order.
    pub fn points(&self) -> impl Iterator<Item = TouchPoint> + '_ {
        let valid = match self.point_count {
            1 => 1,
            2 => 2,
            _ => 0,
        };
        [self.point1, self.point2].into_iter().take(valid)
    }
}
