//! Dash pattern decorator for the polyline stream.

use crate::flatten::Flattener;

/// Splits incoming polylines into the "on" intervals of a dash pattern and
/// forwards each interval as its own open subpath.
///
/// The pattern restarts at the dash offset on every `move_to`.
pub struct DashConverter<'a> {
    next: &'a mut dyn Flattener,
    dash: Vec<f64>,
    start_index: usize,
    start_remaining: f64,
    start_on: bool,
    index: usize,
    remaining: f64,
    on: bool,
    emitting: bool,
    x: f64,
    y: f64,
}

impl<'a> DashConverter<'a> {
    /// Returns `None` when the pattern cannot produce dashes: an empty array,
    /// a non-finite or negative entry, or an all-zero pattern.
    ///
    /// Odd-length arrays are repeated once so on and off intervals alternate.
    pub fn new(dash: &[f64], offset: f64, next: &'a mut dyn Flattener) -> Option<Self> {
        if dash.is_empty() || dash.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return None;
        }
        let mut dash = dash.to_vec();
        if dash.len() % 2 == 1 {
            dash.extend_from_within(..);
        }
        let total: f64 = dash.iter().sum();
        if !(total > 0.0) {
            return None;
        }

        let mut phase = if offset.is_finite() {
            offset.rem_euclid(total)
        } else {
            0.0
        };
        let mut index = 0;
        let mut on = true;
        while phase >= dash[index] && phase > 0.0 {
            phase -= dash[index];
            index = (index + 1) % dash.len();
            on = !on;
        }
        let remaining = dash[index] - phase;

        Some(Self {
            next,
            dash,
            start_index: index,
            start_remaining: remaining,
            start_on: on,
            index,
            remaining,
            on,
            emitting: false,
            x: 0.0,
            y: 0.0,
        })
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.dash.len();
        self.remaining = self.dash[self.index];
        self.on = !self.on;
    }

    fn stop(&mut self) {
        if self.emitting {
            self.next.end();
            self.emitting = false;
        }
    }
}

impl Flattener for DashConverter<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.stop();
        self.index = self.start_index;
        self.remaining = self.start_remaining;
        self.on = self.start_on;
        self.x = x;
        self.y = y;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x0, y0) = (self.x, self.y);
        let (dx, dy) = (x - x0, y - y0);
        let length = dx.hypot(dy);
        self.x = x;
        self.y = y;
        if !(length > 0.0) {
            return;
        }

        // Positions come from the distance along the segment so long runs of
        // short dashes do not accumulate error.
        let mut travelled = 0.0;
        loop {
            if self.on && !self.emitting {
                self.next
                    .move_to(x0 + dx * travelled / length, y0 + dy * travelled / length);
                self.emitting = true;
            }
            let left = length - travelled;
            if self.remaining > left {
                self.remaining -= left;
                if self.on {
                    self.next.line_to(x, y);
                }
                return;
            }

            travelled += self.remaining;
            if self.on {
                if travelled >= length {
                    self.next.line_to(x, y);
                } else {
                    self.next
                        .line_to(x0 + dx * travelled / length, y0 + dy * travelled / length);
                }
                self.stop();
            }
            self.advance();
            if travelled >= length {
                return;
            }
        }
    }

    fn close(&mut self) {}

    fn end(&mut self) {
        self.stop();
    }
}
