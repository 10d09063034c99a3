use std::collections::VecDeque;

/// Result of a game from the learning agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentResult {
    Win,
    Loss,
    Draw,
}

/// Result of a single episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeResult {
    pub result: AgentResult,
    pub game_length: usize,
}

/// Training metrics tracker with rolling window computations.
pub struct TrainingMetrics {
    episode_results: VecDeque<EpisodeResult>,
    capacity: usize,
    total_episodes: usize, // lifetime count, never capped
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episode_results: VecDeque::with_capacity(capacity),
            capacity,
            total_episodes: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn record_episode(&mut self, result: EpisodeResult) {
        self.total_episodes += 1;
        self.episode_results.push_back(result);
        if self.episode_results.len() > self.capacity {
            self.episode_results.pop_front();
        }
    }

    fn rate(&self, last_n: usize, wanted: AgentResult) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self
            .episode_results
            .iter()
            .rev()
            .take(n)
            .filter(|r| r.result == wanted)
            .count();
        hits as f32 / n as f32
    }

    /// Agent win rate in the last N episodes.
    pub fn win_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, AgentResult::Win)
    }

    pub fn loss_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, AgentResult::Loss)
    }

    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, AgentResult::Draw)
    }

    /// Average game length over the last N episodes.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self
            .episode_results
            .iter()
            .rev()
            .take(n)
            .map(|r| r.game_length)
            .sum();
        total as f32 / n as f32
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(result: AgentResult, game_length: usize) -> EpisodeResult {
        EpisodeResult {
            result,
            game_length,
        }
    }

    #[test]
    fn test_win_rate() {
        let mut m = TrainingMetrics::new();
        for _ in 0..7 {
            m.record_episode(episode(AgentResult::Win, 5));
        }
        for _ in 0..3 {
            m.record_episode(episode(AgentResult::Loss, 6));
        }
        assert!((m.win_rate(10) - 0.7).abs() < 1e-6);
        assert!((m.loss_rate(10) - 0.3).abs() < 1e-6);
        // Only the three most recent episodes
        assert!((m.loss_rate(3) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_draw_rate() {
        let mut m = TrainingMetrics::new();
        m.record_episode(episode(AgentResult::Draw, 9));
        m.record_episode(episode(AgentResult::Win, 5));
        assert!((m.draw_rate(10) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_average_game_length() {
        let mut m = TrainingMetrics::new();
        m.record_episode(episode(AgentResult::Draw, 9));
        m.record_episode(episode(AgentResult::Win, 5));
        assert!((m.average_game_length(10) - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_metrics_are_zero() {
        let m = TrainingMetrics::new();
        assert_eq!(m.win_rate(10), 0.0);
        assert_eq!(m.average_game_length(10), 0.0);
    }

    #[test]
    fn test_capacity_caps_window_not_total() {
        let mut m = TrainingMetrics::with_capacity(2);
        m.record_episode(episode(AgentResult::Loss, 5));
        m.record_episode(episode(AgentResult::Win, 5));
        m.record_episode(episode(AgentResult::Win, 5));
        assert_eq!(m.total_episodes(), 3);
        assert!((m.win_rate(10) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_window_beyond_default_capacity() {
        let mut m = TrainingMetrics::with_capacity(1500);
        for _ in 0..1000 {
            m.record_episode(episode(AgentResult::Loss, 5));
        }
        for _ in 0..500 {
            m.record_episode(episode(AgentResult::Win, 5));
        }
        assert!((m.win_rate(1500) - 1.0 / 3.0).abs() < 1e-6);
    }
}
