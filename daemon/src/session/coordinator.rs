//! Session coordinator owning the generated song list and selection.
//!
//! Generated songs are prepended as they arrive and never removed or edited.
//! Each generation request receives a ticket; only the most recent ticket
//! may complete, so a superseded request can never overwrite a newer one.

use serde::Serialize;

use crate::catalog::sample_songs;
use crate::error::{DaemonError, Result};
use crate::types::{GenerationState, Language, Song};

/// Ticket issued when a generation begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    /// Identifier of the new request.
    pub id: u64,
    /// Request that was still in flight and is now superseded.
    pub superseded: Option<u64>,
}

/// Immutable view of the session handed to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub language: Language,
    pub generated: Vec<Song>,
    pub now_playing: Option<Song>,
    pub generation: GenerationState,
    pub in_flight: Option<u64>,
}

/// State of one user session.
#[derive(Debug, Default)]
pub struct Session {
    language: Language,
    generated: Vec<Song>,
    current: Option<Song>,
    generation: GenerationState,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl Session {
    /// Creates an empty session in the given language.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switches language. Generated songs and the selection are kept.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Songs produced in this session, newest first.
    pub fn generated(&self) -> &[Song] {
        &self.generated
    }

    /// Generated songs followed by the catalog for the current language.
    pub fn display_songs(&self) -> Vec<Song> {
        let mut songs = self.generated.clone();
        songs.extend(sample_songs(self.language));
        songs
    }

    /// The selected song, if any.
    pub fn now_playing(&self) -> Option<&Song> {
        self.current.as_ref()
    }

    /// Selects a song from the display list by id.
    pub fn select(&mut self, id: &str) -> Result<&Song> {
        let song = self
            .display_songs()
            .into_iter()
            .find(|song| song.id == id)
            .ok_or_else(|| DaemonError::song_not_found(id))?;
        Ok(self.current.insert(song))
    }

    /// Current generation progress.
    pub fn generation(&self) -> &GenerationState {
        &self.generation
    }

    /// Ticket of the request still in flight, if any.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Starts a generation request, superseding any in-flight one.
    pub fn begin_generation(&mut self, prompt: &str) -> GenerationTicket {
        self.next_ticket += 1;
        let id = self.next_ticket;
        let superseded = self.in_flight.replace(id);
        self.generation.begin(prompt);
        GenerationTicket { id, superseded }
    }

    /// Completes a generation request.
    ///
    /// Returns false and drops the song if `ticket` is no longer current.
    /// Otherwise the song is prepended and selected.
    pub fn complete_generation(&mut self, ticket: u64, song: Song) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        self.generated.insert(0, song.clone());
        self.current = Some(song.clone());
        self.generation.complete(song);
        true
    }

    /// Abandons the in-flight request, returning its ticket.
    pub fn cancel_generation(&mut self) -> Option<u64> {
        let cancelled = self.in_flight.take();
        if cancelled.is_some() {
            self.generation.fail("cancelled");
        }
        cancelled
    }

    /// Returns an owned snapshot of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            language: self.language,
            generated: self.generated.clone(),
            now_playing: self.current.clone(),
            generation: self.generation.clone(),
            in_flight: self.in_flight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::fallback_song;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new(Language::En);
        assert_eq!(session.language(), Language::En);
        assert!(session.generated().is_empty());
        assert!(session.now_playing().is_none());
        assert!(session.in_flight().is_none());
        assert_eq!(session.display_songs(), sample_songs(Language::En));
    }

    #[test]
    fn completion_prepends_and_selects() {
        let mut session = Session::new(Language::En);

        let first = session.begin_generation("one");
        assert!(session.generation().is_generating);
        let song_a = fallback_song(Language::En);
        assert!(session.complete_generation(first.id, song_a.clone()));

        let second = session.begin_generation("two");
        assert!(second.superseded.is_none());
        let song_b = fallback_song(Language::En);
        assert!(session.complete_generation(second.id, song_b.clone()));

        assert_eq!(session.generated(), &[song_b.clone(), song_a]);
        assert_eq!(session.now_playing(), Some(&song_b));
        assert_eq!(session.display_songs()[0], song_b);
        assert!(!session.generation().is_generating);
    }

    #[test]
    fn superseded_completion_is_dropped() {
        let mut session = Session::new(Language::Zh);
        let stale = session.begin_generation("first");
        let fresh = session.begin_generation("second");
        assert_eq!(fresh.superseded, Some(stale.id));

        assert!(!session.complete_generation(stale.id, fallback_song(Language::Zh)));
        assert!(session.generated().is_empty());
        assert_eq!(session.in_flight(), Some(fresh.id));

        assert!(session.complete_generation(fresh.id, fallback_song(Language::Zh)));
        assert_eq!(session.generated().len(), 1);
        assert_eq!(session.generation().prompt, "second");
    }

    #[test]
    fn cancel_clears_in_flight() {
        let mut session = Session::new(Language::En);
        assert!(session.cancel_generation().is_none());

        let ticket = session.begin_generation("x");
        assert_eq!(session.cancel_generation(), Some(ticket.id));
        assert!(!session.generation().is_generating);
        assert!(!session.complete_generation(ticket.id, fallback_song(Language::En)));
    }

    #[test]
    fn select_from_display_list() {
        let mut session = Session::new(Language::En);
        let id = sample_songs(Language::En)[2].id.clone();
        assert_eq!(session.select(&id).unwrap().id, id);
        assert_eq!(session.now_playing().unwrap().id, id);

        let err = session.select("missing").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::SongNotFound);
        assert_eq!(session.now_playing().unwrap().id, id);
    }

    #[test]
    fn language_switch_keeps_generated_songs() {
        let mut session = Session::new(Language::Zh);
        let ticket = session.begin_generation("x");
        session.complete_generation(ticket.id, fallback_song(Language::Zh));

        session.set_language(Language::En);
        let songs = session.display_songs();
        assert_eq!(songs[0].title, "生成失败");
        assert_eq!(songs[1].title, sample_songs(Language::En)[0].title);
    }

    #[test]
    fn snapshot_serializes() {
        let mut session = Session::new(Language::En);
        session.begin_generation("x");
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["language"], "en");
        assert_eq!(json["inFlight"], 1);
        assert_eq!(json["generation"]["isGenerating"], true);
        assert!(json["nowPlaying"].is_null());
    }
}
