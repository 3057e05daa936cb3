/// Host lifecycle hooks
///
/// The host tells the audio system about game-flow changes. The policy
/// decides which of them silence the overlay channels.
use serde::{Deserialize, Serialize};

use super::source::AudioCategory;

/// Host scenes relevant to audio teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Title,
    Map,
    Battle,
    Menu,
    GameOver,
    Other,
}

/// Notifications from the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A new game was set up
    NewGame,

    /// A save was loaded successfully; failed loads are not reported
    GameLoaded,

    /// The title scene started
    TitleEntered,

    /// The host is switching scenes
    SceneChanged { from: Scene, to: Scene },
}

impl HostEvent {
    pub fn description(&self) -> String {
        match self {
            HostEvent::NewGame => "New game".to_string(),
            HostEvent::GameLoaded => "Game loaded".to_string(),
            HostEvent::TitleEntered => "Title entered".to_string(),
            HostEvent::SceneChanged { from, to } => {
                format!("Scene changed: {:?} -> {:?}", from, to)
            }
        }
    }
}

/// Which categories a host event stops
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Teardown {
    Nothing,
    All,
    Categories(Vec<AudioCategory>),
}

/// Lifecycle policy, persisted in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecyclePolicy {
    pub stop_on_new_game: bool,
    pub stop_on_load_game: bool,
    pub stop_on_title: bool,

    /// Categories stopped when a map hands over to a battle
    pub battle_start_categories: Vec<AudioCategory>,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            stop_on_new_game: true,
            stop_on_load_game: true,
            stop_on_title: true,
            battle_start_categories: AudioCategory::ALL.to_vec(),
        }
    }
}

impl LifecyclePolicy {
    pub fn teardown_for(&self, event: HostEvent) -> Teardown {
        let all_if = |flag: bool| if flag { Teardown::All } else { Teardown::Nothing };

        match event {
            HostEvent::NewGame => all_if(self.stop_on_new_game),
            HostEvent::GameLoaded => all_if(self.stop_on_load_game),
            HostEvent::TitleEntered => all_if(self.stop_on_title),
            HostEvent::SceneChanged {
                from: Scene::Map,
                to: Scene::Battle,
            } => {
                let categories = &self.battle_start_categories;
                if categories.is_empty() {
                    Teardown::Nothing
                } else if AudioCategory::ALL.iter().all(|c| categories.contains(c)) {
                    Teardown::All
                } else {
                    Teardown::Categories(categories.clone())
                }
            }
            HostEvent::SceneChanged { .. } => Teardown::Nothing,
        }
    }
}
