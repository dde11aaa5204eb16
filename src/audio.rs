use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type LaserSound = Buffered<Decoder<BufReader<File>>>;

/// Plays laser sound effects; silent when no audio device or sound file is available
pub struct AudioManager {
    output: Option<(OutputStream, OutputStreamHandle)>,
    /// Pre-loaded and buffered laser sound
    laser_sound: Option<LaserSound>,
}

impl AudioManager {
    /// Opens the default output device and pre-loads the laser sound.
    /// Failures are logged and leave the manager silent.
    pub fn new(laser_sound_path: &Path) -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(err) => {
                log::warn!("No audio output, continuing without sound: {err}");
                None
            }
        };

        let laser_sound = output
            .as_ref()
            .and_then(|_| match Self::load(laser_sound_path) {
                Ok(sound) => Some(sound),
                Err(err) => {
                    log::warn!(
                        "Failed to load laser sound {}: {err}",
                        laser_sound_path.display()
                    );
                    None
                }
            });

        Self {
            output,
            laser_sound,
        }
    }

    pub fn silent() -> Self {
        Self {
            output: None,
            laser_sound: None,
        }
    }

    fn load(path: &Path) -> Result<LaserSound, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))?;
        Ok(source.buffered())
    }

    pub fn is_enabled(&self) -> bool {
        self.laser_sound.is_some()
    }

    /// Player laser, default volume
    pub fn play_laser(&self) {
        self.play_laser_volume(0.05);
    }

    /// Enemy lasers are quieter than the player's
    pub fn play_enemy_laser(&self) {
        self.play_laser_volume(0.01);
    }

    pub fn play_laser_volume(&self, volume: f32) {
        let (Some((_, handle)), Some(sound)) = (&self.output, &self.laser_sound) else {
            return;
        };
        // Playback errors are not worth interrupting the game for
        if let Ok(sink) = Sink::try_new(handle) {
            sink.set_volume(volume);
            // Clone the buffered source (fast - just clones references)
            sink.append(sound.clone());
            sink.detach();
        }
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_manager_plays_nothing() {
        let audio = AudioManager::silent();
        assert!(!audio.is_enabled());
        audio.play_laser();
        audio.play_enemy_laser();
    }
}
