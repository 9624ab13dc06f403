//! Viewport auto-scroll during a drag.
//!
//! While a drag session is active, an animation-frame loop scrolls the
//! viewport whenever the pointer sits inside a fixed band near the top or
//! bottom edge, so far-away drop targets stay reachable without releasing
//! the card. Scroll velocity scales linearly from a base speed to a maximum
//! as the pointer approaches the exact edge.
//!
//! The loop reschedules itself only while armed and is torn down the
//! instant the drag ends — no scheduled frame may outlive the session.
//! Best-effort throughout: never fails, never blocks placement resolution.

// ─── Config ──────────────────────────────────────────────────────────────────

/// Tuning for the auto-scroll bands. Units are whatever the viewport uses
/// (pixels in a graphical client, rows in the terminal); speeds are units
/// per frame.
#[derive(Debug, Clone, Copy)]
pub struct AutoScrollConfig {
  /// Distance from the viewport edge within which scrolling engages.
  pub edge_margin: f32,
  /// Velocity at the inner boundary of the band.
  pub base_speed:  f32,
  /// Velocity at the exact edge.
  pub max_speed:   f32,
}

impl Default for AutoScrollConfig {
  fn default() -> Self {
    Self {
      edge_margin: 100.0,
      base_speed:  5.0,
      max_speed:   20.0,
    }
  }
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// Drives the per-frame scroll decision. The caller (the session
/// controller) arms it on drag start, feeds it one [`on_frame`](Self::on_frame)
/// call per animation tick, and cancels it on drag end.
#[derive(Debug, Default)]
pub struct AutoScrollController {
  config:          AutoScrollConfig,
  frame_scheduled: bool,
}

impl AutoScrollController {
  pub fn new(config: AutoScrollConfig) -> Self {
    Self {
      config,
      frame_scheduled: false,
    }
  }

  /// Arm the loop: schedules the first frame. Idempotent.
  pub fn start(&mut self) { self.frame_scheduled = true; }

  /// Tear the loop down. After this, no frame is pending and
  /// [`on_frame`](Self::on_frame) is inert until the next
  /// [`start`](Self::start).
  pub fn stop(&mut self) { self.frame_scheduled = false; }

  /// Whether a frame callback is currently scheduled.
  pub fn has_pending_frame(&self) -> bool { self.frame_scheduled }

  /// Consume the pending frame and return the scroll delta for this tick
  /// (negative scrolls up). Returns `0.0` and schedules nothing when the
  /// loop is not armed. While armed, the next frame is rescheduled
  /// unconditionally, scroll or no scroll.
  pub fn on_frame(&mut self, pointer_y: f32, viewport_height: f32) -> f32 {
    if !self.frame_scheduled {
      return 0.0;
    }
    // Reschedule: the loop runs for as long as the drag is active.
    self.frame_scheduled = true;
    self.velocity(pointer_y, viewport_height)
  }

  /// The signed scroll velocity for a pointer at `pointer_y` in a viewport
  /// of `viewport_height`. Zero outside both edge bands.
  fn velocity(&self, pointer_y: f32, viewport_height: f32) -> f32 {
    let AutoScrollConfig {
      edge_margin,
      base_speed,
      max_speed,
    } = self.config;

    if pointer_y < edge_margin {
      let intensity = ((edge_margin - pointer_y) / edge_margin).clamp(0.0, 1.0);
      -(base_speed + intensity * (max_speed - base_speed))
    } else if pointer_y > viewport_height - edge_margin {
      let intensity =
        ((pointer_y - (viewport_height - edge_margin)) / edge_margin).clamp(0.0, 1.0);
      base_speed + intensity * (max_speed - base_speed)
    } else {
      0.0
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn controller() -> AutoScrollController {
    let mut c = AutoScrollController::new(AutoScrollConfig::default());
    c.start();
    c
  }

  #[test]
  fn pointer_near_top_scrolls_up_faster_than_base() {
    // y = 20 with margin 100 on an 800-tall viewport.
    let mut c = controller();
    let delta = c.on_frame(20.0, 800.0);
    assert!(delta < 0.0, "must scroll up");
    let speed = delta.abs();
    // Closer to max (20) than to base (5).
    assert!(speed > 12.5, "speed {speed} should be nearer max");
    assert!(speed <= 20.0);
  }

  #[test]
  fn pointer_mid_viewport_produces_zero_scroll() {
    let mut c = controller();
    assert_eq!(c.on_frame(400.0, 800.0), 0.0);
    // The loop stays armed even on a zero-scroll frame.
    assert!(c.has_pending_frame());
  }

  #[test]
  fn bottom_band_is_symmetric_to_top() {
    let mut c = controller();
    let up = c.on_frame(20.0, 800.0);
    let down = c.on_frame(780.0, 800.0);
    assert_eq!(up, -down);
  }

  #[test]
  fn velocity_saturates_at_the_exact_edge() {
    let mut c = controller();
    assert_eq!(c.on_frame(0.0, 800.0), -20.0);
    assert_eq!(c.on_frame(800.0, 800.0), 20.0);
    // Pointer tracked past the viewport edge clamps rather than overshoots.
    assert_eq!(c.on_frame(-50.0, 800.0), -20.0);
  }

  #[test]
  fn stop_leaves_no_pending_frame() {
    // Starting and immediately ending a drag leaves zero pending
    // callbacks, and a late tick is inert.
    let mut c = controller();
    assert!(c.has_pending_frame());
    c.stop();
    assert!(!c.has_pending_frame());
    assert_eq!(c.on_frame(0.0, 800.0), 0.0);
    assert!(!c.has_pending_frame());
  }

  #[test]
  fn restart_after_stop_rearms() {
    let mut c = controller();
    c.stop();
    c.start();
    assert!(c.has_pending_frame());
    assert!(c.on_frame(10.0, 800.0) < 0.0);
  }
}
