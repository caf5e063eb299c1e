//! Self-play training loop for the two tabular agents.
//!
//! The loop owns the exploration schedule: a single epsilon shared by both
//! agents, decayed multiplicatively once per episode. Agents only ever see
//! the current value.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    featurize::StateKey,
    game::{EphemeralGame, Player},
    pipeline::observers::{EpisodeOutcome, EpisodeSummary, Observer},
    q_learning::QLearner,
    types::Lifespans,
};

/// Hyperparameters and environment settings for one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub episodes: usize,
    pub grid_size: usize,
    pub lifespans: Lifespans,
    /// α parameter for both agents
    pub learning_rate: f64,
    /// γ parameter for both agents
    pub discount_factor: f64,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Per-episode multiplicative decay
    pub epsilon_decay: f64,
    /// Exploration floor
    pub min_epsilon: f64,
    /// Step ceiling per episode; a cutoff episode is neither win nor draw
    pub max_steps: usize,
    /// Base seed; the game and each agent derive distinct streams from it
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 100_000,
            grid_size: 3,
            lifespans: Lifespans::default(),
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 1.0,
            epsilon_decay: 0.99995,
            min_epsilon: 0.0,
            max_steps: 20,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for out-of-range
    /// hyperparameters.
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "episodes must be positive".to_string(),
            });
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max steps must be positive".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate must be in [0, 1] (got {})", self.learning_rate),
            });
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "discount factor must be in [0, 1] (got {})",
                    self.discount_factor
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon) || !(0.0..=1.0).contains(&self.min_epsilon) {
            return Err(Error::InvalidConfiguration {
                message: "epsilon and its floor must be in [0, 1]".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon_decay) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon decay must be in [0, 1] (got {})", self.epsilon_decay),
            });
        }
        Ok(())
    }

    /// Build the game for this configuration, seeded when a seed is set.
    pub fn build_game(&self) -> Result<EphemeralGame> {
        let game = EphemeralGame::new(self.grid_size, self.lifespans)?;
        Ok(match self.seed {
            Some(seed) => game.with_seed(seed),
            None => game,
        })
    }

    /// Build the (X, O) agent pair. Seeded agents use offsets of the base
    /// seed so their exploration streams differ from each other and from
    /// the game's starting-player draws.
    pub fn build_agents(&self) -> (QLearner, QLearner) {
        let n_actions = self.grid_size * self.grid_size;
        let agent_x = QLearner::new(n_actions, self.learning_rate, self.discount_factor);
        let agent_o = QLearner::new(n_actions, self.learning_rate, self.discount_factor);
        match self.seed {
            Some(seed) => (agent_x.with_seed(seed + 1), agent_o.with_seed(seed + 2)),
            None => (agent_x, agent_o),
        }
    }
}

/// Aggregate results of a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    pub episodes: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub step_limit_hits: usize,
    pub total_reward_x: f64,
    pub total_reward_o: f64,
    pub final_epsilon: f64,
    pub x_table_size: usize,
    pub o_table_size: usize,
}

impl TrainingResult {
    pub fn avg_reward_x(&self) -> f64 {
        self.total_reward_x / self.episodes as f64
    }

    pub fn avg_reward_o(&self) -> f64 {
        self.total_reward_o / self.episodes as f64
    }
}

/// Runs self-play episodes and drives the observers.
pub struct SelfPlayTrainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl SelfPlayTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train both agents through self-play.
    ///
    /// Every episode starts from a fresh board with a randomly drawn
    /// starting player. Each agent is updated only on its own transitions,
    /// including penalized probes of occupied cells.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or when an observer's output fails.
    pub fn run(
        &mut self,
        game: &mut EphemeralGame,
        agent_x: &mut QLearner,
        agent_o: &mut QLearner,
    ) -> Result<TrainingResult> {
        self.config.validate()?;

        let mut result = TrainingResult {
            episodes: self.config.episodes,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            step_limit_hits: 0,
            total_reward_x: 0.0,
            total_reward_o: 0.0,
            final_epsilon: self.config.epsilon,
            x_table_size: 0,
            o_table_size: 0,
        };

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut epsilon = self.config.epsilon;
        for episode in 0..self.config.episodes {
            let summary = self.run_episode(game, agent_x, agent_o, episode, epsilon)?;

            match summary.outcome {
                EpisodeOutcome::Win(Player::X) => result.x_wins += 1,
                EpisodeOutcome::Win(Player::O) => result.o_wins += 1,
                EpisodeOutcome::Draw => result.draws += 1,
                EpisodeOutcome::StepLimit => result.step_limit_hits += 1,
            }
            result.total_reward_x += summary.reward_x;
            result.total_reward_o += summary.reward_o;

            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }

            epsilon = (epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
        }

        result.final_epsilon = epsilon;
        result.x_table_size = agent_x.table_size();
        result.o_table_size = agent_o.table_size();

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(result)
    }

    fn run_episode(
        &self,
        game: &mut EphemeralGame,
        agent_x: &mut QLearner,
        agent_o: &mut QLearner,
        episode: usize,
        epsilon: f64,
    ) -> Result<EpisodeSummary> {
        let mut snapshot = game.reset(None);
        let starting_player = snapshot.to_move;

        let mut reward_x = 0.0;
        let mut reward_o = 0.0;
        let mut steps = 0;
        let mut outcome = EpisodeOutcome::StepLimit;

        while steps < self.config.max_steps {
            let legal = game.legal_action_indices();
            if legal.is_empty() {
                outcome = EpisodeOutcome::Draw;
                break;
            }

            let mover = game.current_player();
            let state = StateKey::from_snapshot(&snapshot);
            let action = match mover {
                Player::X => agent_x.select_action(&state, &legal, epsilon)?,
                Player::O => agent_o.select_action(&state, &legal, epsilon)?,
            };

            let (next_snapshot, reward, done) = game.step(game.coord_of(action))?;
            let next_state = StateKey::from_snapshot(&next_snapshot);

            match mover {
                Player::X => {
                    agent_x.update(state, action, reward, &next_state);
                    reward_x += reward;
                }
                Player::O => {
                    agent_o.update(state, action, reward, &next_state);
                    reward_o += reward;
                }
            }

            steps += 1;
            snapshot = next_snapshot;

            if done {
                outcome = if game.check_win(mover) {
                    EpisodeOutcome::Win(mover)
                } else {
                    EpisodeOutcome::Draw
                };
                break;
            }
        }

        Ok(EpisodeSummary {
            episode,
            outcome,
            starting_player,
            steps,
            reward_x,
            reward_o,
            epsilon,
        })
    }
}
