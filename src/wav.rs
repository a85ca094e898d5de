use std::path::Path;

use hound::{WavSpec, WavWriter};

use crate::error::Result;

/// Write mono 32-bit float WAV samples
///
/// Output samples are written as-is; values outside [-1, 1] are not clipped.
pub fn save_wav<P: AsRef<Path>>(path: P, samples: &[f64], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_wav_mono_float() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");
        save_wav(&path, &[0.0, 0.5, -0.5, 1.25], 44100).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0.0, 0.5, -0.5, 1.25]);
    }
}
