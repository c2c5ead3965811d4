//! Buzzer notes, melodies and the non-blocking melody player.
//!
//! A [`Melody`] is a short list of notes separated by a fixed gap. The
//! [`TonePlayer`] never sleeps: it remembers when the melody started and, on
//! each tick, works out which note (or gap) the current time falls in.

use crate::config::ToneConfig;
use crate::error::{report_defect, PanelError};

/// C5, 523 Hz.
pub const NOTE_C5: u32 = 523;
/// E5, 659 Hz.
pub const NOTE_E5: u32 = 659;
/// G5, 784 Hz.
pub const NOTE_G5: u32 = 784;
/// C6, 1047 Hz.
pub const NOTE_C6: u32 = 1047;

/// Maximum notes per melody.
pub const MAX_MELODY_LEN: usize = 8;
const _: () = assert!(MAX_MELODY_LEN >= 3);

/// A single tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    /// Pitch in hertz.
    pub freq_hz: u32,
    /// How long the note sounds.
    pub duration_ms: u32,
}

impl Note {
    /// Note of `freq_hz` lasting `duration_ms`.
    pub const fn new(freq_hz: u32, duration_ms: u32) -> Self {
        Self {
            freq_hz,
            duration_ms,
        }
    }
}

/// A command for the buzzer output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneCommand {
    /// Sound at this frequency.
    On(u32),
    /// Go silent.
    Off,
}

/// Notes played back to back with a silent gap between them.
///
/// ```rust
/// use rs_rgbknob::config::ToneConfig;
/// use rs_rgbknob::tone::{Melody, NOTE_C5, NOTE_E5, NOTE_G5};
///
/// let melody = Melody::power_on(&ToneConfig::default());
/// let freqs: Vec<u32> = melody.notes().iter().map(|n| n.freq_hz).collect();
/// assert_eq!(freqs, [NOTE_C5, NOTE_E5, NOTE_G5]);
///
/// // 50 ms note, 20 ms gap, 50 ms note, 20 ms gap, 50 ms note
/// assert_eq!(melody.total_duration_ms(), 190);
/// assert_eq!(melody.tone_at(60), Some(None)); // in a gap
/// assert_eq!(melody.tone_at(75), Some(Some(NOTE_E5)));
/// assert_eq!(melody.tone_at(190), None); // finished
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Melody {
    notes: heapless::Vec<Note, MAX_MELODY_LEN>,
    gap_ms: u32,
}

impl Melody {
    /// Melody of up to [`MAX_MELODY_LEN`] notes.
    pub fn new(notes: &[Note], gap_ms: u32) -> Result<Self, PanelError> {
        let notes = heapless::Vec::from_slice(notes)
            .map_err(|_| PanelError::Configuration("melody has too many notes"))?;
        Ok(Self { notes, gap_ms })
    }

    /// A single beep.
    pub fn single(freq_hz: u32, duration_ms: u32) -> Self {
        Self::preset(&[Note::new(freq_hz, duration_ms)], 0)
    }

    fn from_freqs(freqs: [u32; 3], tones: &ToneConfig) -> Self {
        Self::preset(&freqs.map(|freq| Note::new(freq, tones.note_ms)), tones.gap_ms)
    }

    fn preset(notes: &[Note], gap_ms: u32) -> Self {
        Self::new(notes, gap_ms).unwrap_or_else(|e| {
            report_defect(e);
            Self {
                notes: heapless::Vec::new(),
                gap_ms,
            }
        })
    }

    /// Ascending C5-E5-G5.
    pub fn power_on(tones: &ToneConfig) -> Self {
        Self::from_freqs([NOTE_C5, NOTE_E5, NOTE_G5], tones)
    }

    /// Descending G5-E5-C5.
    pub fn power_off(tones: &ToneConfig) -> Self {
        Self::from_freqs([NOTE_G5, NOTE_E5, NOTE_C5], tones)
    }

    /// The notes, in order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Silence between notes.
    pub fn gap_ms(&self) -> u32 {
        self.gap_ms
    }

    /// Time from the first note's start to the last note's end.
    pub fn total_duration_ms(&self) -> u64 {
        let sounding: u64 = self.notes.iter().map(|n| n.duration_ms as u64).sum();
        let gaps = self.notes.len().saturating_sub(1) as u64 * self.gap_ms as u64;
        sounding + gaps
    }

    /// What the buzzer should do `elapsed_ms` into the melody.
    ///
    /// `Some(Some(hz))` while a note sounds, `Some(None)` during a gap, and
    /// `None` once the melody is over.
    pub fn tone_at(&self, elapsed_ms: u64) -> Option<Option<u32>> {
        let mut t = elapsed_ms;
        for (i, note) in self.notes.iter().enumerate() {
            let len = note.duration_ms as u64;
            if t < len {
                return Some(Some(note.freq_hz));
            }
            t -= len;
            if i + 1 < self.notes.len() {
                if t < self.gap_ms as u64 {
                    return Some(None);
                }
                t -= self.gap_ms as u64;
            }
        }
        None
    }
}

/// Plays at most one melody at a time; a new melody replaces the old one.
#[derive(Clone, Debug, Default)]
pub struct TonePlayer {
    melody: Option<Melody>,
    started_ms: u64,
    sounding: Option<u32>,
}

impl TonePlayer {
    /// Idle player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `melody` at `now_ms`, replacing anything playing.
    pub fn play(&mut self, melody: Melody, now_ms: u64) {
        self.melody = Some(melody);
        self.started_ms = now_ms;
    }

    /// Abandon the current melody. Returns `Off` if a note was sounding.
    pub fn stop(&mut self) -> Option<ToneCommand> {
        self.melody = None;
        self.sounding.take().map(|_| ToneCommand::Off)
    }

    /// Advance to `now_ms`. Returns a command only when the output changes.
    pub fn update(&mut self, now_ms: u64) -> Option<ToneCommand> {
        let wanted = match &self.melody {
            Some(melody) => match melody.tone_at(now_ms.saturating_sub(self.started_ms)) {
                Some(tone) => tone,
                None => {
                    self.melody = None;
                    None
                }
            },
            None => None,
        };

        if wanted == self.sounding {
            return None;
        }
        self.sounding = wanted;
        Some(match wanted {
            Some(hz) => ToneCommand::On(hz),
            None => ToneCommand::Off,
        })
    }

    /// Whether a melody is in progress.
    pub fn is_playing(&self) -> bool {
        self.melody.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_note_has_no_gap() {
        let beep = Melody::single(440, 50);
        assert_eq!(beep.total_duration_ms(), 50);
        assert_eq!(beep.tone_at(49), Some(Some(440)));
        assert_eq!(beep.tone_at(50), None);
    }

    #[test]
    fn power_off_descends() {
        let melody = Melody::power_off(&ToneConfig::default());
        let freqs: Vec<u32> = melody.notes().iter().map(|n| n.freq_hz).collect();
        assert_eq!(freqs, [NOTE_G5, NOTE_E5, NOTE_C5]);
        assert!(melody.notes().iter().all(|n| n.duration_ms == 50));
        assert_eq!(melody.gap_ms(), 20);
    }

    #[test]
    fn too_many_notes_rejected() {
        let notes = [Note::new(NOTE_C6, 10); MAX_MELODY_LEN + 1];
        assert!(Melody::new(&notes, 20).is_err());
    }

    #[test]
    fn player_emits_only_changes() {
        let mut player = TonePlayer::new();
        player.play(Melody::power_on(&ToneConfig::default()), 1000);

        assert_eq!(player.update(1000), Some(ToneCommand::On(NOTE_C5)));
        assert_eq!(player.update(1010), None);
        assert_eq!(player.update(1050), Some(ToneCommand::Off));
        assert_eq!(player.update(1070), Some(ToneCommand::On(NOTE_E5)));
        assert_eq!(player.update(1140), Some(ToneCommand::On(NOTE_G5)));
        assert!(player.is_playing());
        assert_eq!(player.update(1190), Some(ToneCommand::Off));
        assert!(!player.is_playing());
        assert_eq!(player.update(1200), None);
    }

    #[test]
    fn new_melody_replaces_old() {
        let mut player = TonePlayer::new();
        player.play(Melody::power_on(&ToneConfig::default()), 0);
        assert_eq!(player.update(0), Some(ToneCommand::On(NOTE_C5)));

        player.play(Melody::single(NOTE_G5, 100), 10);
        assert_eq!(player.update(10), Some(ToneCommand::On(NOTE_G5)));
        assert_eq!(player.update(110), Some(ToneCommand::Off));
    }

    #[test]
    fn stop_silences() {
        let mut player = TonePlayer::new();
        assert_eq!(player.stop(), None);

        player.play(Melody::single(440, 50), 0);
        player.update(0);
        assert_eq!(player.stop(), Some(ToneCommand::Off));
        assert!(!player.is_playing());
        assert_eq!(player.update(10), None);
    }
}
