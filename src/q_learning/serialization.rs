//! Serialization support for trained agent pairs.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    game::Player,
    q_learning::agent::{AgentState, QLearner},
    types::Lifespans,
};

/// Metadata recorded alongside saved tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub episodes_trained: Option<usize>,
    pub grid_size: usize,
    pub lifespan_x: u32,
    pub lifespan_o: u32,
    pub seed: Option<u64>,
}

/// Versioned save file bundling both players' tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgents {
    pub version: u32,
    agent_x: AgentState,
    agent_o: AgentState,
    pub metadata: TrainingMetadata,
}

impl SavedAgents {
    pub const VERSION: u32 = 1;

    pub fn from_agents(
        agent_x: &QLearner,
        agent_o: &QLearner,
        metadata: TrainingMetadata,
    ) -> Self {
        Self {
            version: Self::VERSION,
            agent_x: agent_x.export_state(),
            agent_o: agent_o.export_state(),
            metadata,
        }
    }

    /// Rebuild the agent pair (X first).
    ///
    /// # Errors
    ///
    /// Fails on an unsupported save-format version.
    pub fn to_agents(&self) -> Result<(QLearner, QLearner)> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        Ok((
            QLearner::from_state(self.agent_x.clone()),
            QLearner::from_state(self.agent_o.clone()),
        ))
    }

    /// Lifespans recorded at save time.
    pub fn lifespans(&self) -> Result<Lifespans> {
        Lifespans::new(self.metadata.lifespan_x, self.metadata.lifespan_o)
            .map_err(|e| anyhow!("invalid lifespans in save file: {e}"))
    }

    pub fn table_size(&self, player: Player) -> usize {
        match player {
            Player::X => self.agent_x.q_table.size(),
            Player::O => self.agent_o.q_table.size(),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agents")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agents")
    }
}
