/// Messaging module for the host command surface
///
/// - **Commands**: text lines from the host (`play-bgm2 Theme 80 3`), parsed
///   into typed requests and dispatched to the audio manager
/// - **Events**: notifications of what the audio system did, broadcast to
///   subscribers
///
/// ## Architecture
///
/// ```text
/// ┌─────────┐   Request    ┌──────────┐  dispatch   ┌─────────────────┐
/// │  Host   │ ───────────> │ Executor │ ──────────> │ MultiTrackAudio │
/// │ (stdin) │              │  (tick)  │             │                 │
/// └─────────┘              └──────────┘             └─────────────────┘
///                                                           │
///                                                           │ AudioEvent
///                                                           ▼
///                                                     ┌───────────┐
///                                                     │ Event Bus │
///                                                     └───────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let bus = EventBus::new();
/// let (rx, _id) = bus.subscribe();
///
/// let mut audio = MultiTrackAudio::new(backend).with_event_bus(bus);
/// dispatch_line(&mut audio, r#"play-bgm2 "Title Music" 90 3"#);
///
/// while let Ok(event) = rx.try_recv() {
///     println!("{}", event.description());
/// }
/// ```

pub mod bus;
pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod executor;
pub mod parser;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use commands::{Action, Command, DEFAULT_CROSSFADE_SECONDS};
pub use dispatcher::{dispatch, dispatch_line, execute, CommandResult};
pub use events::AudioEvent;
pub use executor::{CommandExecutor, Request};
pub use parser::{parse_arguments, parse_channel, parse_channel_token, parse_command};
