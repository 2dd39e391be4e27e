//! Interstitial ad cadence
//!
//! Counts finished runs and, every `frequency`-th one, arms a show that
//! becomes due `delay_ms` later on the wall clock. Polling never blocks.

/// Host that actually displays an interstitial
pub trait AdHost {
    fn show_interstitial(&mut self);
}

/// Logs instead of showing anything
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAdHost;

impl AdHost for LogAdHost {
    fn show_interstitial(&mut self) {
        log::info!("Interstitial shown");
    }
}

#[derive(Debug, Clone)]
pub struct InterstitialSchedule {
    frequency: u32,
    delay_ms: f64,
    games_played: u32,
    due_at: Option<f64>,
}

impl Default for InterstitialSchedule {
    fn default() -> Self {
        Self::new(3, 800.0)
    }
}

impl InterstitialSchedule {
    /// A `frequency` of 0 never shows
    pub fn new(frequency: u32, delay_ms: f64) -> Self {
        Self {
            frequency,
            delay_ms: delay_ms.max(0.0),
            games_played: 0,
            due_at: None,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    /// Record a finished run; returns whether a show was armed
    pub fn on_game_over(&mut self, now_ms: f64) -> bool {
        self.games_played = self.games_played.saturating_add(1);
        if self.frequency == 0 || self.games_played % self.frequency != 0 {
            return false;
        }
        self.due_at = Some(now_ms + self.delay_ms);
        log::debug!("Interstitial armed after run {}", self.games_played);
        true
    }

    /// `true` exactly once when an armed show falls due
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due_at {
            Some(due) if now_ms >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_third_run() {
        let mut schedule = InterstitialSchedule::default();
        let armed: Vec<bool> = (0..9).map(|i| schedule.on_game_over(i as f64)).collect();
        assert_eq!(
            armed,
            vec![false, false, true, false, false, true, false, false, true]
        );
        assert_eq!(schedule.games_played(), 9);
    }

    #[test]
    fn test_fires_once_after_delay() {
        let mut schedule = InterstitialSchedule::default();
        schedule.on_game_over(0.0);
        schedule.on_game_over(0.0);
        assert!(schedule.on_game_over(1000.0));

        assert!(!schedule.poll(1799.0));
        assert!(schedule.poll(1800.0));
        assert!(!schedule.poll(1801.0));
        assert!(!schedule.is_pending());
    }

    #[test]
    fn test_zero_frequency_never_shows() {
        let mut schedule = InterstitialSchedule::new(0, 800.0);
        for i in 0..10 {
            assert!(!schedule.on_game_over(i as f64));
        }
        assert!(!schedule.poll(f64::MAX));
    }
}
