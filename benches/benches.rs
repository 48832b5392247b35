#[macro_use]
extern crate bencher;

use std::{f32::consts::PI, io::Cursor};

use audio_detection::{ClassifierModel, DenseLayer, DetectionConfig, DetectionService};
use bencher::Bencher;
use hound::{SampleFormat, WavSpec, WavWriter};

fn detect_one_second_clip(bench: &mut Bencher) {
    let service = DetectionService::new(&DetectionConfig::default()).unwrap();
    service
        .install_model(ClassifierModel {
            version: "bench".to_string(),
            labels: vec!["background".to_string(), "kiai".to_string()],
            background_label: Some("background".to_string()),
            input_size: 120,
            layers: vec![DenseLayer::zeroed(120, 32), DenseLayer::zeroed(32, 2)],
        })
        .unwrap();
    let clip = tone_wav(440., 16000);
    bench.iter(|| {
        let _result = service.run_detection(&clip, Some("bench.wav")).unwrap();
    });
}
fn tone_wav(frequency: f32, len: usize) -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..len {
            let sample = (2. * PI * frequency * i as f32 / 16000.).sin() * 12000.;
            writer.write_sample(sample as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

benchmark_group!(benches, detect_one_second_clip);
benchmark_main!(benches);
