use criterion::{criterion_group, criterion_main, Criterion};

use stylist_core::context::{HistoricalEvent, SocialAggregate, UserContext};
use stylist_core::models::PredictionRequest;
use stylist_core::StylistConfig;
use stylist_prediction::PredictionService;

fn request(width: f64) -> PredictionRequest {
    PredictionRequest::new(UserContext {
        prefers_color_scheme: Some("dark".into()),
        touch_capable: Some(false),
        pixel_ratio: Some(2.0),
        ..UserContext::with_viewport(width, 1080.0)
    })
    .with_history(vec![
        HistoricalEvent::new(320.0, 24.0, 1.0),
        HistoricalEvent::new(95.0, 7.0, 0.0),
    ])
    .with_social(SocialAggregate::new().with("dark_mode_percentage", 58.0))
}

fn service() -> (tempfile::TempDir, PredictionService) {
    let dir = stylist_fixtures::dual_bundle();
    let mut config = StylistConfig::default();
    config.models.bundle_dir = dir.path().display().to_string();
    let service = PredictionService::new(&config);
    service.warm_up();
    (dir, service)
}

fn bench_uncached_predict(c: &mut Criterion) {
    let (_dir, service) = service();
    let req = request(1440.0);
    c.bench_function("predict_uncached", |b| {
        b.iter(|| {
            service.clear_cache();
            service.predict(&req)
        });
    });
}

fn bench_cached_predict(c: &mut Criterion) {
    let (_dir, service) = service();
    let req = request(1440.0);
    service.predict(&req);
    c.bench_function("predict_cached", |b| {
        b.iter(|| service.predict(&req));
    });
}

fn bench_batch_predict(c: &mut Criterion) {
    let (_dir, service) = service();
    let requests: Vec<_> = (0..256).map(|i| request(320.0 + f64::from(i) * 7.0)).collect();
    c.bench_function("predict_batch_256", |b| {
        b.iter(|| {
            service.clear_cache();
            service.predict_batch(&requests)
        });
    });
}

criterion_group!(
    benches,
    bench_uncached_predict,
    bench_cached_predict,
    bench_batch_predict
);
criterion_main!(benches);
