use criterion::{black_box, criterion_group, criterion_main, Criterion};
use embedkit_embedder::{
    cosine_similarity, l2_normalize, process, quantize, EmbeddingOptions, FeatureVector, QuantizationParams,
};

fn make_vector(dim: usize, seed: usize) -> Vec<f32> {
    (0..dim)
        .map(|i| ((i + seed).wrapping_mul(2654435761) % 10007) as f32 / 10007.0 - 0.5)
        .collect()
}

fn bench_l2_normalize(c: &mut Criterion) {
    let v = make_vector(1024, 1);

    c.bench_function("embedder_l2_normalize_1024d", |b| {
        b.iter(|| {
            let mut x = v.clone();
            l2_normalize(black_box(&mut x));
            x
        });
    });
}

fn bench_quantize(c: &mut Criterion) {
    let v = make_vector(1024, 2);
    let params = QuantizationParams::default();

    c.bench_function("embedder_quantize_1024d", |b| {
        b.iter(|| {
            let _ = black_box(quantize(black_box(&v), params));
        });
    });
}

fn bench_process_normalize(c: &mut Criterion) {
    let v = make_vector(1280, 3);
    let opts = EmbeddingOptions {
        l2_normalize: true,
        quantize: false,
    };

    c.bench_function("embedder_process_l2_1280d", |b| {
        b.iter(|| {
            let _ = black_box(process(black_box(&v), None, &opts));
        });
    });
}

fn bench_cosine_float(c: &mut Criterion) {
    let u = FeatureVector::Float(make_vector(2048, 4));
    let v = FeatureVector::Float(make_vector(2048, 5));

    c.bench_function("embedder_cosine_float_2048d", |b| {
        b.iter(|| {
            let _ = black_box(cosine_similarity(black_box(&u), black_box(&v)));
        });
    });
}

fn bench_cosine_quantized(c: &mut Criterion) {
    let params = QuantizationParams::default();
    let u = FeatureVector::Quantized(quantize(&make_vector(2048, 6), params).unwrap());
    let v = FeatureVector::Quantized(quantize(&make_vector(2048, 7), params).unwrap());

    c.bench_function("embedder_cosine_quantized_2048d", |b| {
        b.iter(|| {
            let _ = black_box(cosine_similarity(black_box(&u), black_box(&v)));
        });
    });
}

criterion_group!(
    benches,
    bench_l2_normalize,
    bench_quantize,
    bench_process_normalize,
    bench_cosine_float,
    bench_cosine_quantized,
);
criterion_main!(benches);
