//! WAV decoding for the audio-feature side of diarization. Best-effort:
//! callers fall back to the text-only score when decoding fails, since
//! diarization itself is a soft pipeline stage.

use std::io::Cursor;

/// Decoded mono PCM samples plus their sample rate.
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Decode a WAV file's bytes into mono `f32` samples in `[-1.0, 1.0]`.
/// Returns `None` on anything that isn't a well-formed WAV (including
/// MP3 uploads, which this does not attempt to decode).
pub fn decode_wav(bytes: &[u8]) -> Option<DecodedAudio> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).ok()?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().filter_map(Result::ok).collect(),
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader.into_samples::<i32>().filter_map(Result::ok).map(|s| s as f32 / max_val).collect()
        }
    };

    let samples = if spec.channels == 2 {
        samples.chunks(2).map(|chunk| (chunk[0] + chunk.get(1).copied().unwrap_or(0.0)) / 2.0).collect()
    } else {
        samples
    };

    Some(DecodedAudio { samples, sample_rate: spec.sample_rate })
}

/// Slice `audio` into one segment per `(t_start, t_end)` window (seconds).
/// A window past the end of the buffer, or with `t_end <= t_start`,
/// yields an empty slice rather than erroring — the caller's feature
/// extraction degrades gracefully on empty input.
pub fn slice_segments<'a>(audio: &'a DecodedAudio, windows: &[(f32, f32)]) -> Vec<&'a [f32]> {
    let len = audio.samples.len();
    windows
        .iter()
        .map(|(t_start, t_end)| {
            let start = ((*t_start).max(0.0) * audio.sample_rate as f32) as usize;
            let end = ((*t_end).max(0.0) * audio.sample_rate as f32) as usize;
            let start = start.min(len);
            let end = end.min(len);
            if end <= start {
                &audio.samples[0..0]
            } else {
                &audio.samples[start..end]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(samples: &[i16], sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec { channels: 1, sample_rate, bits_per_sample: 16, sample_format: hound::SampleFormat::Int };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("writer");
            for s in samples {
                writer.write_sample(*s).expect("write sample");
            }
            writer.finalize().expect("finalize");
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_mono_16_bit_pcm() {
        let samples: Vec<i16> = (0..1600).map(|i| ((i % 200) as i16) * 100).collect();
        let bytes = wav_bytes(&samples, 16_000);
        let decoded = decode_wav(&bytes).expect("decodes");
        assert_eq!(decoded.sample_rate, 16_000);
        assert_eq!(decoded.samples.len(), 1600);
    }

    #[test]
    fn rejects_non_wav_bytes() {
        assert!(decode_wav(b"not a wav file at all").is_none());
    }

    #[test]
    fn slices_segments_by_time_window() {
        let samples: Vec<i16> = (0..16_000).map(|i| (i % 100) as i16).collect();
        let bytes = wav_bytes(&samples, 16_000);
        let decoded = decode_wav(&bytes).expect("decodes");
        let slices = slice_segments(&decoded, &[(0.0, 0.5), (0.5, 1.0), (2.0, 3.0)]);
        assert_eq!(slices[0].len(), 8_000);
        assert_eq!(slices[1].len(), 8_000);
        assert_eq!(slices[2].len(), 0);
    }
}
