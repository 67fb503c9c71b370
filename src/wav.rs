//! 16-bit PCM WAV reading and writing.
//!
//! Container parsing is delegated to `hound`, which skips chunks it does not
//! know (such as `JUNK` padding before `fmt `). Samples are normalized to
//! `[-1, 1]` by dividing by 32767; encoding rounds, then clamps to the
//! `i16` range.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, Write};
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::constants::{PCM16_BITS, PCM16_FULL_SCALE};
use crate::error::{FilterError, Result};
use crate::paths::ensure_extension;

/// Decoded WAV contents, one sample vector per channel
#[derive(Debug, Clone, PartialEq)]
pub struct WavData {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: Vec<Vec<f64>>,
}

impl WavData {
    /// Samples per channel
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
}

/// Map a 16-bit sample to `[-1, 1]`
pub fn pcm16_to_unit(sample: i16) -> f64 {
    sample as f64 / PCM16_FULL_SCALE
}

/// Map a unit-range sample to 16-bit PCM.
///
/// Returns the sample and whether it had to be clipped.
pub fn unit_to_pcm16(sample: f64) -> (i16, bool) {
    let scaled = (sample * PCM16_FULL_SCALE).round();
    if scaled > i16::MAX as f64 {
        (i16::MAX, true)
    } else if scaled < i16::MIN as f64 {
        (i16::MIN, true)
    } else {
        (scaled as i16, false)
    }
}

/// Read a WAV file, appending `.wav` to the path if it is missing
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<WavData> {
    let path = ensure_extension(path.as_ref(), "wav");
    let file = File::open(&path).map_err(|source| FilterError::FileUnreadable {
        path: path.clone(),
        source,
    })?;
    log::info!("Reading WAV file {}", path.display());
    decode(BufReader::new(file), Some(&path))
}

/// Decode a WAV stream
pub fn decode_wav<R: Read>(reader: R) -> Result<WavData> {
    decode(reader, None)
}

fn decode<R: Read>(reader: R, path: Option<&Path>) -> Result<WavData> {
    let reader = WavReader::new(reader).map_err(|e| read_error(e, path))?;
    let spec = reader.spec();

    log::debug!("WAV num_channels: {}", spec.channels);
    log::debug!("WAV sample_rate: {}", spec.sample_rate);
    log::debug!("WAV bits_per_sample: {}", spec.bits_per_sample);
    log::debug!("WAV sample_format: {:?}", spec.sample_format);
    log::debug!("WAV frames: {}", reader.duration());

    if spec.channels == 0 {
        return Err(FilterError::MalformedContainer(
            "fmt chunk declares zero channels".to_string(),
        ));
    }

    let interleaved = read_samples(reader, &spec).map_err(|e| read_error(e, path))?;
    let channels = deinterleave(&interleaved, spec.channels as usize);

    Ok(WavData {
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        channels,
    })
}

fn read_samples<R: Read>(
    mut reader: WavReader<R>,
    spec: &WavSpec,
) -> std::result::Result<Vec<f64>, hound::Error> {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(pcm16_to_unit))
            .collect(),
        (SampleFormat::Int, bits) => {
            let full_scale = ((1_i64 << (bits - 1)) - 1) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / full_scale))
                .collect()
        }
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect(),
    }
}

/// Split interleaved frames into channels, dropping a trailing partial frame
fn deinterleave(interleaved: &[f64], num_channels: usize) -> Vec<Vec<f64>> {
    let frames = interleaved.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    channels
}

fn read_error(err: hound::Error, path: Option<&Path>) -> FilterError {
    match (err, path) {
        (hound::Error::IoError(e), _) if e.kind() == ErrorKind::UnexpectedEof => {
            FilterError::MalformedContainer("unexpected end of file".to_string())
        }
        (hound::Error::IoError(source), Some(path)) => FilterError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        },
        (err, _) => FilterError::MalformedContainer(err.to_string()),
    }
}

/// Write channels as a 16-bit PCM WAV file, appending `.wav` if missing.
///
/// Returns the path actually written.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    channels: &[Vec<f64>],
    sample_rate: f64,
) -> Result<PathBuf> {
    let path = ensure_extension(path.as_ref(), "wav");
    let file = File::create(&path).map_err(|source| FilterError::FileUnwritable {
        path: path.clone(),
        source,
    })?;
    log::info!("Writing WAV file {}", path.display());
    encode(BufWriter::new(file), channels, sample_rate, Some(&path))?;
    Ok(path)
}

/// Encode channels as 16-bit PCM into any seekable writer.
///
/// Returns `true` if any sample was clipped.
pub fn encode_wav<W: Write + Seek>(
    writer: W,
    channels: &[Vec<f64>],
    sample_rate: f64,
) -> Result<bool> {
    encode(writer, channels, sample_rate, None)
}

fn encode<W: Write + Seek>(
    writer: W,
    channels: &[Vec<f64>],
    sample_rate: f64,
    path: Option<&Path>,
) -> Result<bool> {
    let frames = check_channels(channels)?;
    if !sample_rate.is_finite() || sample_rate < 1.0 || sample_rate > u32::MAX as f64 {
        return Err(FilterError::InvalidSamplingFrequency(sample_rate));
    }

    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate: sample_rate.round() as u32,
        bits_per_sample: PCM16_BITS,
        sample_format: SampleFormat::Int,
    };
    log::debug!("WAV spec: {:?}", spec);

    let write_err = |err: hound::Error| match (err, path) {
        (hound::Error::IoError(source), Some(path)) => FilterError::FileUnwritable {
            path: path.to_path_buf(),
            source,
        },
        (err, _) => FilterError::MalformedContainer(err.to_string()),
    };

    let mut wav_writer = WavWriter::new(writer, spec).map_err(write_err)?;
    let mut clipped = false;
    for i in 0..frames {
        for channel in channels {
            let (sample, was_clipped) = unit_to_pcm16(channel[i]);
            clipped |= was_clipped;
            wav_writer.write_sample(sample).map_err(write_err)?;
        }
    }
    wav_writer.finalize().map_err(write_err)?;

    if clipped {
        log::warn!("Some data was clipped while writing the WAV file");
    }
    Ok(clipped)
}

/// All channels must be present and equally long; returns the frame count
fn check_channels(channels: &[Vec<f64>]) -> Result<usize> {
    let Some(first) = channels.first() else {
        return Err(FilterError::Config("no channels to write".to_string()));
    };
    if channels.len() > u16::MAX as usize {
        return Err(FilterError::Config(format!(
            "too many channels for WAV: {}",
            channels.len()
        )));
    }
    let frames = first.len();
    if let Some(bad) = channels.iter().find(|c| c.len() != frames) {
        return Err(FilterError::ChannelLengthMismatch {
            expected: frames,
            actual: bad.len(),
        });
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header_bytes(junk: Option<&[u8]>, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut body = Vec::new();
        body.extend_from_slice(b"WAVE");
        if let Some(junk) = junk {
            body.extend_from_slice(b"JUNK");
            body.extend_from_slice(&(junk.len() as u32).to_le_bytes());
            body.extend_from_slice(junk);
        }
        body.extend_from_slice(b"fmt ");
        body.extend_from_slice(&16u32.to_le_bytes());
        body.extend_from_slice(&1u16.to_le_bytes()); // PCM
        body.extend_from_slice(&1u16.to_le_bytes()); // mono
        body.extend_from_slice(&8000u32.to_le_bytes());
        body.extend_from_slice(&16000u32.to_le_bytes());
        body.extend_from_slice(&2u16.to_le_bytes());
        body.extend_from_slice(&16u16.to_le_bytes());
        body.extend_from_slice(b"data");
        body.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            body.extend_from_slice(&s.to_le_bytes());
        }

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&body);
        bytes
    }

    #[test]
    fn test_pcm16_normalization() {
        assert_eq!(pcm16_to_unit(32767), 1.0);
        assert_eq!(pcm16_to_unit(-32767), -1.0);
        assert_eq!(pcm16_to_unit(0), 0.0);
    }

    #[test]
    fn test_unit_to_pcm16_rounds_and_clamps() {
        assert_eq!(unit_to_pcm16(1.0), (32767, false));
        assert_eq!(unit_to_pcm16(-1.0), (-32767, false));
        assert_eq!(unit_to_pcm16(0.5 / 32767.0), (1, false));
        assert_eq!(unit_to_pcm16(1.5), (i16::MAX, true));
        assert_eq!(unit_to_pcm16(-1.5), (i16::MIN, true));
    }

    #[test]
    fn test_decode_plain_header() {
        let bytes = header_bytes(None, &[32767, -32767, 0]);
        let wav = decode_wav(Cursor::new(bytes)).unwrap();
        assert_eq!(wav.sample_rate, 8000);
        assert_eq!(wav.bits_per_sample, 16);
        assert_eq!(wav.channels, vec![vec![1.0, -1.0, 0.0]]);
    }

    #[test]
    fn test_decode_skips_junk_chunk() {
        let bytes = header_bytes(Some(&[0u8; 28]), &[16384, -16384]);
        let wav = decode_wav(Cursor::new(bytes)).unwrap();
        assert_eq!(wav.num_channels(), 1);
        assert_eq!(wav.num_frames(), 2);
        assert_eq!(wav.channels[0][0], 16384.0 / 32767.0);
    }

    #[test]
    fn test_decode_rejects_bad_chunk_id() {
        let mut bytes = header_bytes(None, &[1, 2]);
        bytes[..4].copy_from_slice(b"RIFX");
        assert!(matches!(
            decode_wav(Cursor::new(bytes)),
            Err(FilterError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_file() {
        let bytes = header_bytes(None, &[1, 2]);
        assert!(matches!(
            decode_wav(Cursor::new(bytes[..20].to_vec())),
            Err(FilterError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_round_trip_within_one_step() {
        let left: Vec<f64> = (0..500).map(|i| (i as f64 * 0.05).sin() * 0.9).collect();
        let right: Vec<f64> = left.iter().map(|x| -x * 0.5).collect();
        let channels = vec![left, right];

        let mut cursor = Cursor::new(Vec::new());
        let clipped = encode_wav(&mut cursor, &channels, 44100.0).unwrap();
        assert!(!clipped);

        cursor.set_position(0);
        let wav = decode_wav(cursor).unwrap();
        assert_eq!(wav.sample_rate, 44100);
        assert_eq!(wav.num_channels(), 2);
        for (decoded, original) in wav.channels.iter().zip(&channels) {
            assert_eq!(decoded.len(), original.len());
            for (d, o) in decoded.iter().zip(original) {
                assert!((d - o).abs() <= 1.0 / 32767.0, "{} vs {}", d, o);
            }
        }
    }

    #[test]
    fn test_encode_reports_clipping() {
        let mut cursor = Cursor::new(Vec::new());
        let clipped = encode_wav(&mut cursor, &[vec![0.0, 2.0, -3.0]], 8000.0).unwrap();
        assert!(clipped);

        cursor.set_position(0);
        let wav = decode_wav(cursor).unwrap();
        assert_eq!(wav.channels[0][1], 1.0);
        assert_eq!(wav.channels[0][2], -32768.0 / 32767.0);
    }

    #[test]
    fn test_encode_rejects_ragged_channels() {
        let mut cursor = Cursor::new(Vec::new());
        let result = encode_wav(&mut cursor, &[vec![0.0; 4], vec![0.0; 3]], 8000.0);
        assert!(matches!(
            result,
            Err(FilterError::ChannelLengthMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let path = std::env::temp_dir().join("sigfilt_wav_test_does_not_exist");
        assert!(matches!(
            read_wav(&path),
            Err(FilterError::FileUnreadable { .. })
        ));
    }

    #[test]
    fn test_write_then_read_file() {
        let path = std::env::temp_dir().join("sigfilt_wav_test_round_trip");
        let written = write_wav(&path, &[vec![0.25, -0.25]], 16000.0).unwrap();
        assert_eq!(written.extension().unwrap(), "wav");

        let wav = read_wav(&path).unwrap();
        assert_eq!(wav.sample_rate, 16000);
        assert_eq!(wav.num_frames(), 2);
        let _ = std::fs::remove_file(written);
    }
}
