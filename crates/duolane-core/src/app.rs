use crate::input::{InputAction, InputDispatcher};
use crate::ipc::{Command, Event, SessionState};
use crate::session::{GameplayConfig, Session, SessionError};
use duolane_ports::audio::AudioPlayerPort;
use duolane_ports::input::RawInput;
use duolane_ports::library::{LibraryError, SongLibraryPort};
use duolane_ports::storage::{SettingsDto, StorageError, StoragePort};
use duolane_ports::types::SongId;
use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};
use std::collections::VecDeque;
use std::sync::Arc;

const INPUT_QUEUE_CAPACITY: usize = 256;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("library error: {0}")]
    Library(#[from] LibraryError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Cloneable handle for pushing raw input from another thread. Inputs are
/// applied on the next `AppCore::tick`, never concurrently with it.
#[derive(Clone)]
pub struct InputSender {
    producer: Arc<Mutex<Producer<RawInput>>>,
}

impl InputSender {
    /// Returns false when the queue is full and the input was dropped.
    pub fn send(&self, input: RawInput) -> bool {
        self.producer.lock().push(input).is_ok()
    }
}

pub struct AppCore {
    library: Box<dyn SongLibraryPort>,
    player: Box<dyn AudioPlayerPort>,
    storage: Option<Box<dyn StoragePort>>,
    settings: SettingsDto,
    config: GameplayConfig,
    dispatcher: InputDispatcher,
    session: Option<Session>,
    loaded_song: Option<SongId>,
    input_tx: InputSender,
    input_rx: Consumer<RawInput>,
    events: VecDeque<Event>,
}

impl AppCore {
    pub fn new(
        library: Box<dyn SongLibraryPort>,
        player: Box<dyn AudioPlayerPort>,
        storage: Option<Box<dyn StoragePort>>,
        config: GameplayConfig,
    ) -> Self {
        let settings = match storage.as_ref().map(|s| s.load_settings()) {
            Some(Ok(settings)) => settings,
            Some(Err(err)) => {
                log::warn!("failed to load settings, using defaults: {}", err);
                SettingsDto::default()
            }
            None => SettingsDto::default(),
        };

        let (producer, consumer) = RingBuffer::new(INPUT_QUEUE_CAPACITY);

        Self {
            library,
            player,
            storage,
            dispatcher: InputDispatcher::from_settings(&settings),
            settings,
            config,
            session: None,
            loaded_song: None,
            input_tx: InputSender {
                producer: Arc::new(Mutex::new(producer)),
            },
            input_rx: consumer,
            events: VecDeque::new(),
        }
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), AppError> {
        match cmd {
            Command::ListSongs => {
                let songs = self.library.list_songs()?;
                self.events.push_back(Event::SongsUpdated { songs });
            }
            Command::LoadSong { song } => {
                self.load_song(song)?;
            }
            Command::StartSession => {
                self.apply_action(InputAction::StartSession)?;
            }
            Command::AttemptHit { lane } => {
                self.apply_action(InputAction::AttemptHit(lane))?;
            }
            Command::Input { input } => {
                self.apply_input(&input)?;
            }
            Command::SetClockOffsetMs { ms } => {
                self.settings.clock_offset_ms = ms;
                self.emit_settings();
                self.save_settings();
            }
            Command::AbandonSession => {
                if let Some(song) = self.loaded_song.take() {
                    log::info!("abandoned session for song {}", song);
                }
                self.session = None;
            }
        }
        self.collect_session_events();
        Ok(())
    }

    /// One frame: applies queued input, then advances the session.
    pub fn tick(&mut self) {
        while let Ok(input) = self.input_rx.pop() {
            if let Err(err) = self.apply_input(&input) {
                log::warn!("input {:?} failed: {}", input, err);
            }
        }
        if let Some(session) = self.session.as_mut() {
            session.tick();
        }
        self.collect_session_events();
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn input_sender(&self) -> InputSender {
        self.input_tx.clone()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn loaded_song(&self) -> Option<&SongId> {
        self.loaded_song.as_ref()
    }

    pub fn settings(&self) -> &SettingsDto {
        &self.settings
    }

    fn load_song(&mut self, song: SongId) -> Result<(), AppError> {
        let offset = self.settings.clock_offset_sec();
        let session = match Session::load(
            self.library.as_ref(),
            self.player.as_ref(),
            &song,
            offset,
            self.config,
        ) {
            Ok(session) => session,
            Err(err) => {
                log::warn!("failed to load song {}: {}", song, err);
                // A failed load leaves nothing loaded.
                self.session = None;
                self.loaded_song = None;
                self.events.push_back(Event::SessionLoadFailed {
                    song,
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        };

        self.events.push_back(Event::SessionLoaded {
            song: song.clone(),
            note_count: session.chart().len(),
        });
        self.session = Some(session);
        self.loaded_song = Some(song.clone());
        self.settings.last_song = Some(song);
        self.save_settings();
        Ok(())
    }

    fn apply_input(&mut self, input: &RawInput) -> Result<(), AppError> {
        let state = self
            .session
            .as_ref()
            .map(Session::state)
            .unwrap_or(SessionState::NotStarted);
        match self.dispatcher.dispatch(input, state) {
            Some(action) => self.apply_action(action),
            None => Ok(()),
        }
    }

    fn apply_action(&mut self, action: InputAction) -> Result<(), AppError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        match action {
            InputAction::StartSession => session.start()?,
            InputAction::AttemptHit(lane) => {
                session.attempt_hit(lane);
            }
        }
        Ok(())
    }

    fn collect_session_events(&mut self) {
        if let Some(session) = self.session.as_mut() {
            self.events.extend(session.drain_events());
        }
    }

    fn emit_settings(&mut self) {
        self.events.push_back(Event::SettingsUpdated {
            settings: self.settings.clone(),
        });
    }

    fn save_settings(&self) {
        if let Some(storage) = self.storage.as_ref() {
            if let Err(err) = storage.save_settings(&self.settings) {
                log::warn!("failed to save settings: {}", err);
            }
        }
    }
}
