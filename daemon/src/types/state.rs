//! GenerationState type tracking the creation form's in-flight request.

use serde::{Deserialize, Serialize};

use super::song::Song;

/// Progress of the most recent generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationState {
    /// True while a request is in flight.
    pub is_generating: bool,

    /// Prompt of the current or last request.
    pub prompt: String,

    /// Song produced by the last completed request.
    pub result: Option<Song>,

    /// Error from the last request, if it did not produce a song.
    pub error: Option<String>,
}

impl GenerationState {
    /// Marks a new request as in flight, clearing the previous outcome.
    pub fn begin(&mut self, prompt: impl Into<String>) {
        self.is_generating = true;
        self.prompt = prompt.into();
        self.result = None;
        self.error = None;
    }

    /// Records a completed request.
    pub fn complete(&mut self, song: Song) {
        self.is_generating = false;
        self.result = Some(song);
        self.error = None;
    }

    /// Records a request that ended without a song.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_generating = false;
        self.result = None;
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::song::GENERIC_IMAGE_URL;

    fn song() -> Song {
        Song {
            id: "1".to_string(),
            title: "t".to_string(),
            artist: "a".to_string(),
            image_url: GENERIC_IMAGE_URL.to_string(),
            style: "s".to_string(),
            duration: "2:45".to_string(),
            plays: 0,
            lyrics: None,
            is_generated: Some(true),
        }
    }

    #[test]
    fn lifecycle() {
        let mut state = GenerationState::default();
        assert!(!state.is_generating);

        state.begin("late night jazz");
        assert!(state.is_generating);
        assert_eq!(state.prompt, "late night jazz");

        state.complete(song());
        assert!(!state.is_generating);
        assert!(state.result.is_some());
        assert!(state.error.is_none());

        state.begin("again");
        assert!(state.result.is_none());
        state.fail("cancelled");
        assert!(!state.is_generating);
        assert_eq!(state.error.as_deref(), Some("cancelled"));
    }
}
