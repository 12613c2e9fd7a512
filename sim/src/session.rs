//! Game session: which screen the host shows around the simulation.
//!
//! The simulation never changes mode by itself. `GameSession` watches the
//! results of `update` and `load_level_requested` and switches between the
//! menu overlay, live play, and a message screen.

use crate::api::SimWorld;
use crate::epoch::MatchState;
use crate::intent::PlayerIntent;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, warn};

pub const MSG_LOAD_FAILED: &str = "Level loading failed";
pub const MSG_WON: &str = "You won!";
pub const MSG_LOST: &str = "Game over";
pub const MSG_STEP_FAILED: &str = "Error during the game update...";

/// Current screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Menu shown over the (paused) level.
    #[default]
    Overlay,
    Play,
    /// A message the player must acknowledge.
    Message(String),
}

/// A simulation plus the mode machine that decides when it runs.
pub struct GameSession {
    sim: SimWorld,
    mode: Mode,
}

impl GameSession {
    /// Start in the menu with `sim` as the current level.
    pub fn new(sim: SimWorld) -> Self {
        Self {
            sim,
            mode: Mode::Overlay,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn sim(&self) -> &SimWorld {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut SimWorld {
        &mut self.sim
    }

    /// Load a level file and start playing it.
    pub fn load_level_requested(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.sim.load_level_file(path) {
            Ok(()) => self.mode = Mode::Play,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "level load failed");
                self.show_message(MSG_LOAD_FAILED);
            }
        }
    }

    pub fn show_menu(&mut self) {
        self.mode = Mode::Overlay;
    }

    /// Return to play from the menu.
    pub fn resume(&mut self) {
        if self.mode == Mode::Overlay {
            self.mode = Mode::Play;
        }
    }

    pub fn show_message(&mut self, text: impl Into<String>) {
        self.mode = Mode::Message(text.into());
    }

    /// Dismiss the current message and go back to the menu.
    pub fn acknowledge_message(&mut self) {
        if matches!(self.mode, Mode::Message(_)) {
            self.mode = Mode::Overlay;
        }
    }

    /// Step the simulation if playing. Returns whether a step ran.
    pub fn update(&mut self, intent: &PlayerIntent) -> bool {
        if self.mode != Mode::Play {
            return false;
        }
        match self.sim.step(intent) {
            Ok(MatchState::Running) => {}
            Ok(MatchState::Won) => self.show_message(MSG_WON),
            Ok(MatchState::Lost) => self.show_message(MSG_LOST),
            Err(err) => {
                error!(error = %err, epoch = self.sim.epoch(), "step failed");
                self.show_message(MSG_STEP_FAILED);
            }
        }
        true
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SimWorld::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::descriptor_from_ascii;
    use crate::components::Status;
    use crate::level::UnitRoster;

    fn playing(ascii: &str) -> GameSession {
        let mut session = GameSession::default();
        session
            .sim_mut()
            .load_level(&descriptor_from_ascii(ascii))
            .unwrap();
        session.resume();
        session
    }

    #[test]
    fn test_menu_transitions() {
        let mut session = GameSession::default();
        assert_eq!(session.mode(), &Mode::Overlay);
        assert!(!session.update(&PlayerIntent::new()));
        assert_eq!(session.sim().epoch(), 0);

        session.resume();
        assert_eq!(session.mode(), &Mode::Play);
        session.show_menu();
        assert_eq!(session.mode(), &Mode::Overlay);

        session.show_message("hello");
        session.resume();
        assert_eq!(session.mode(), &Mode::Message("hello".to_string()));
        session.acknowledge_message();
        assert_eq!(session.mode(), &Mode::Overlay);
    }

    #[test]
    fn test_failed_load_shows_message() {
        let mut session = GameSession::default();
        session.load_level_requested("no/such/level.json");
        assert_eq!(session.mode(), &Mode::Message(MSG_LOAD_FAILED.to_string()));
    }

    #[test]
    fn test_play_until_win() {
        let mut session = playing("P.E");
        assert!(session.update(&PlayerIntent::new()));
        assert_eq!(session.mode(), &Mode::Play);

        let enemy = session.sim().unit(1).unwrap();
        *session.sim_mut().world_mut().get_mut::<Status>(enemy).unwrap() = Status::Destroyed;
        session.update(&PlayerIntent::new());
        assert_eq!(session.mode(), &Mode::Message(MSG_WON.to_string()));

        // No stepping while the message is up.
        let epoch = session.sim().epoch();
        assert!(!session.update(&PlayerIntent::new()));
        assert_eq!(session.sim().epoch(), epoch);
    }

    #[test]
    fn test_loss_shows_game_over() {
        let mut session = playing("P.E");
        let player = session.sim().player().unwrap();
        *session.sim_mut().world_mut().get_mut::<Status>(player).unwrap() = Status::Destroyed;
        session.update(&PlayerIntent::new());
        assert_eq!(session.mode(), &Mode::Message(MSG_LOST.to_string()));
    }

    #[test]
    fn test_step_error_shows_message() {
        let mut session = playing("P.E");
        session
            .sim_mut()
            .world_mut()
            .insert_resource(UnitRoster::default());
        session.update(&PlayerIntent::new());
        assert_eq!(session.mode(), &Mode::Message(MSG_STEP_FAILED.to_string()));
    }
}
