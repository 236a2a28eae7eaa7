use std::io::Cursor;

use crate::error::{DecodeError, EncodeError};

/*
16-bit PCM WAV
==============

    offset  size  field
    ------  ----  -----------------------------------------
     0      4     "RIFF"
     4      4     36 + data length (little endian)
     8      4     "WAVE"
    12      4     "fmt "
    16      4     16 (fmt body length)
    20      2     1  (format tag: integer PCM)
    22      2     channels
    24      4     sample rate
    28      4     byte rate   = rate * channels * 2
    32      2     block align = channels * 2
    34      2     16 (bits per sample)
    36      4     "data"
    40      4     data length = frames * channels * 2
    44      ...   interleaved little-endian i16 (L, R, L, R, ...)

Floats map asymmetrically so both rails are reachable: the negative side is
scaled by 32768 and the positive side by 32767, after clamping to [-1, 1].
Format tag 1 has no channel mask, so only mono and stereo are written.
*/

/// Decoded audio: interleaved `f32` frames.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl PcmBuffer {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}

/// One float sample as a signed 16-bit integer.
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    let s = if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    };
    if s < 0.0 {
        (s * 32_768.0) as i16
    } else {
        (s * 32_767.0) as i16
    }
}

/// Serialize `pcm` as a 16-bit integer PCM WAV file.
pub fn encode_wav(pcm: &PcmBuffer) -> Result<Vec<u8>, EncodeError> {
    if pcm.channels == 0 || pcm.channels > 2 {
        return Err(EncodeError::UnsupportedChannels(pcm.channels));
    }
    if pcm.sample_rate == 0 {
        return Err(EncodeError::InvalidSampleRate);
    }

    let spec = hound::WavSpec {
        channels: pcm.channels,
        sample_rate: pcm.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let frames = pcm.frames();
    let mut bytes = Cursor::new(Vec::with_capacity(44 + frames * pcm.channels as usize * 2));
    {
        let mut writer = hound::WavWriter::new(&mut bytes, spec)?;
        for &sample in &pcm.samples[..frames * pcm.channels as usize] {
            writer.write_sample(float_to_i16(sample))?;
        }
        writer.finalize()?;
    }
    Ok(bytes.into_inner())
}

/// Pack raw float chunks into the intermediate 32-bit float container.
pub(crate) fn encode_container(
    sample_rate: u32,
    channels: u16,
    chunks: &[Vec<f32>],
) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let total: usize = chunks.iter().map(Vec::len).sum();
    let mut bytes = Cursor::new(Vec::with_capacity(64 + total * 4));
    {
        let mut writer = hound::WavWriter::new(&mut bytes, spec)?;
        let whole = total - total % channels.max(1) as usize;
        for sample in chunks.iter().flatten().take(whole) {
            writer.write_sample(*sample)?;
        }
        writer.finalize()?;
    }
    Ok(bytes.into_inner())
}

/// Parse a float or integer WAV image back into PCM.
pub fn decode_container(bytes: &[u8]) -> Result<PcmBuffer, DecodeError> {
    let failed = |err: hound::Error| DecodeError {
        reason: err.to_string(),
    };

    let mut reader = hound::WavReader::new(Cursor::new(bytes)).map_err(failed)?;
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(failed)?,
        hound::SampleFormat::Int => {
            let max = (1i64 << spec.bits_per_sample.saturating_sub(1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|x| x as f32 / max))
                .collect::<Result<Vec<_>, _>>()
                .map_err(failed)?
        }
    };

    Ok(PcmBuffer::new(spec.sample_rate, spec.channels, samples))
}
