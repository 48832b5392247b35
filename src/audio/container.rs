/// Audio containers recognised by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Wav,
    Flac,
    Ogg,
    Mp3,
}
impl Container {
    /// Detects the container from the buffer header.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            Some(Container::Wav)
        } else if bytes.starts_with(b"fLaC") {
            Some(Container::Flac)
        } else if bytes.starts_with(b"OggS") {
            Some(Container::Ogg)
        } else if bytes.starts_with(b"ID3")
            || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0)
        {
            Some(Container::Mp3)
        } else {
            None
        }
    }
    /// Guesses the container from a file name extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = filename.rsplit_once('.')?.1.to_lowercase();
        match extension.as_str() {
            "wav" | "wave" => Some(Container::Wav),
            "flac" => Some(Container::Flac),
            "ogg" | "oga" | "opus" => Some(Container::Ogg),
            "mp3" => Some(Container::Mp3),
            _ => None,
        }
    }
    pub fn is_supported(&self) -> bool {
        matches!(self, Container::Wav)
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Container::Wav => "wav",
            Container::Flac => "flac",
            Container::Ogg => "ogg",
            Container::Mp3 => "mp3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_sniffs_known_headers() {
        assert_eq!(
            Container::sniff(b"RIFF\x24\x00\x00\x00WAVEfmt "),
            Some(Container::Wav)
        );
        assert_eq!(Container::sniff(b"fLaC\x00\x00"), Some(Container::Flac));
        assert_eq!(Container::sniff(b"OggS\x00\x02"), Some(Container::Ogg));
        assert_eq!(Container::sniff(b"ID3\x04\x00"), Some(Container::Mp3));
        assert_eq!(Container::sniff(&[0xFF, 0xFB, 0x90]), Some(Container::Mp3));
    }

    #[test]
    fn it_ignores_short_or_unknown_headers() {
        assert_eq!(Container::sniff(b""), None);
        assert_eq!(Container::sniff(b"RIFF"), None);
        assert_eq!(Container::sniff(b"RIFF\x24\x00\x00\x00AVI "), None);
        assert_eq!(Container::sniff(b"hello world!"), None);
    }

    #[test]
    fn it_guesses_from_extension() {
        assert_eq!(Container::from_filename("kick.WAV"), Some(Container::Wav));
        assert_eq!(Container::from_filename("song.mp3"), Some(Container::Mp3));
        assert_eq!(Container::from_filename("noextension"), None);
    }
}
