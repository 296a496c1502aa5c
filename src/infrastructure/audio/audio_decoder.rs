//! Decodes compressed audio bytes into the 16kHz mono f32 PCM that the
//! whisper model consumes.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::TranscriptionError;

pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

pub fn decode_to_pcm(data: &[u8]) -> Result<Vec<f32>, TranscriptionError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| TranscriptionError::DecodingFailed(format!("probe: {}", e)))?;

    let mut reader = probed.format;
    let track = reader
        .default_track()
        .ok_or_else(|| TranscriptionError::DecodingFailed("no decodable track".to_string()))?;

    let track_id = track.id;
    let params = track.codec_params.clone();
    let source_rate = params
        .sample_rate
        .ok_or_else(|| TranscriptionError::DecodingFailed("unknown sample rate".to_string()))?;
    let channels = params.channels.map(|c| c.count()).unwrap_or(1);

    let decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| TranscriptionError::DecodingFailed(format!("codec: {}", e)))?;

    let mono = drain_packets(reader.as_mut(), decoder, track_id, channels)?;

    if mono.is_empty() {
        return Err(TranscriptionError::DecodingFailed(
            "no audio samples decoded".to_string(),
        ));
    }

    let pcm = if source_rate == WHISPER_SAMPLE_RATE {
        mono
    } else {
        resample(&mono, source_rate, WHISPER_SAMPLE_RATE)?
    };

    tracing::debug!(
        samples = pcm.len(),
        duration_secs = pcm.len() as f32 / WHISPER_SAMPLE_RATE as f32,
        source_rate,
        "Audio decoded to 16kHz mono PCM"
    );

    Ok(pcm)
}

fn drain_packets(
    reader: &mut dyn FormatReader,
    mut decoder: Box<dyn Decoder>,
    track_id: u32,
    channels: usize,
) -> Result<Vec<f32>, TranscriptionError> {
    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(TranscriptionError::DecodingFailed(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(TranscriptionError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let mut buf = SampleBuffer::<f32>::new(frames as u64, *decoded.spec());
        buf.copy_interleaved_ref(decoded);

        if channels > 1 {
            mono.extend(
                buf.samples()
                    .chunks(channels)
                    .map(|frame| frame.iter().sum::<f32>() / channels as f32),
            );
        } else {
            mono.extend_from_slice(buf.samples());
        }
    }

    Ok(mono)
}

fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, TranscriptionError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| TranscriptionError::DecodingFailed(format!("resampler init: {}", e)))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let input: Vec<f32> = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let frames = resampler
            .process(&[input], None)
            .map_err(|e| TranscriptionError::DecodingFailed(format!("resample: {}", e)))?;

        if let Some(channel) = frames.first() {
            output.extend_from_slice(channel);
        }
    }

    // Padding the final chunk stretched the output past the true length.
    output.truncate((samples.len() as f64 * ratio) as usize);

    Ok(output)
}
