use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::drums::SampleSource;

/// Drum samples loaded from WAV files, one file per row.
///
/// Files are decoded when the kit is built and downmixed to mono; the
/// conversion to the engine rate happens in [`SampleSource::resolve`].
#[derive(Debug, Clone, Default)]
pub struct WavKit {
    samples: HashMap<String, LoadedSample>,
}

#[derive(Debug, Clone)]
struct LoadedSample {
    rate: u32,
    data: Vec<f32>,
}

impl WavKit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` as the sample for `voice`, replacing any earlier one.
    pub fn load(
        &mut self,
        voice: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), hound::Error> {
        let reader = hound::WavReader::open(path.as_ref())?;
        let sample = decode(reader)?;
        self.samples.insert(voice.into(), sample);
        Ok(())
    }

    /// Build a kit from `<dir>/<name>.wav` for each name. Missing or broken
    /// files are logged and skipped.
    pub fn from_dir<'a>(dir: impl AsRef<Path>, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kit = Self::new();
        for name in names {
            let path: PathBuf = dir.as_ref().join(format!("{name}.wav"));
            if let Err(err) = kit.load(name, &path) {
                tracing::warn!(path = %path.display(), %err, "skipping drum sample");
            }
        }
        kit
    }

    /// Use an in-memory buffer recorded at `rate`.
    pub fn insert(&mut self, voice: impl Into<String>, rate: u32, data: Vec<f32>) {
        self.samples
            .insert(voice.into(), LoadedSample { rate: rate.max(1), data });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn decode<R: std::io::Read>(mut reader: hound::WavReader<R>) -> Result<LoadedSample, hound::Error> {
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|x| x as f32 / max))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let data = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok(LoadedSample {
        rate: spec.sample_rate.max(1),
        data,
    })
}

/// Linear-interpolation resampler.
pub fn resample_linear(input: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || input.is_empty() {
        return input.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (input.len() as f64 * ratio).ceil() as usize;
    let last = input.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 / ratio;
            let idx = pos.floor() as usize;
            if idx >= last {
                return input[last];
            }
            let frac = (pos - idx as f64) as f32;
            input[idx] * (1.0 - frac) + input[idx + 1] * frac
        })
        .collect()
}

impl SampleSource for WavKit {
    fn resolve(&self, voice: &str, sample_rate: u32) -> Option<Vec<f32>> {
        let sample = self.samples.get(voice)?;
        Some(resample_linear(&sample.data, sample.rate, sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn resample_doubles_length_when_rate_doubles() {
        let input = vec![0.0, 1.0, 0.0, -1.0];
        let out = resample_linear(&input, 24_000, 48_000);
        assert_eq!(out.len(), 8);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn same_rate_is_a_copy() {
        let input = vec![0.25, -0.5, 0.75];
        assert_eq!(resample_linear(&input, 44_100, 44_100), input);
    }

    #[test]
    fn stereo_int_files_downmix_to_mono() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut bytes, spec).unwrap();
            for _ in 0..100 {
                writer.write_sample(16_384i16).unwrap();
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes.set_position(0);
        let sample = decode(hound::WavReader::new(bytes).unwrap()).unwrap();
        assert_eq!(sample.rate, 22_050);
        assert_eq!(sample.data.len(), 100);
        assert!((sample.data[0] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn unknown_rows_resolve_to_none() {
        let mut kit = WavKit::new();
        kit.insert("kick", 48_000, vec![0.5; 10]);
        assert_eq!(kit.resolve("kick", 48_000).map(|s| s.len()), Some(10));
        assert!(kit.resolve("snare", 48_000).is_none());
    }

    #[test]
    fn missing_files_are_skipped() {
        let kit = WavKit::from_dir("/nonexistent-kit-dir", ["kick", "snare"]);
        assert!(kit.is_empty());
    }
}
