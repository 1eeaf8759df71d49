use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use layerbox_core::{LayerEntry, LayerKind, ModelSpec, TensorShape};
use layerbox_render::svg::{SvgRenderOptions, render_layered_svg};
use layerbox_render::{LayeredOptions, LayoutOptions, layout_layered};

fn fixtures() -> Vec<(&'static str, Vec<LayerEntry>)> {
    let mnist = ModelSpec::from_yaml_str(
        r#"layers:
  - { type: InputLayer, output_shape: [null, 28, 28, 1] }
  - { type: Conv2D, output_shape: [null, 14, 14, 32] }
  - { type: Dense, output_shape: [null, 10] }"#,
    )
    .unwrap();

    let cifar_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/models/cifar_cnn.yaml");
    let cifar = ModelSpec::from_path(&cifar_path).unwrap();

    let deep: Vec<LayerEntry> = (0..200u64)
        .map(|i| {
            let side = 64 >> (i % 5);
            LayerEntry::layer(
                if i % 2 == 0 {
                    LayerKind::Conv2D
                } else {
                    LayerKind::BatchNormalization
                },
                TensorShape::batched(&[side, side, 16 + i]),
            )
        })
        .collect();

    vec![
        ("mnist_small", mnist.layers),
        ("cifar_cnn", cifar.layers),
        ("deep_200", deep),
    ]
}

fn bench_layout_only(c: &mut Criterion) {
    let layout = LayoutOptions::default();
    let options = LayeredOptions {
        legend: true,
        ..Default::default()
    };

    let mut group = c.benchmark_group("layout_only");
    for (name, entries) in fixtures() {
        group.bench_function(name, |b| {
            b.iter(|| {
                let _ = layout_layered(&entries, &options, layout.text_measurer.as_ref()).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_render_svg(c: &mut Criterion) {
    let layout = LayoutOptions::default();
    let options = LayeredOptions {
        legend: true,
        ..Default::default()
    };
    let svg_opts = SvgRenderOptions::default();

    let mut group = c.benchmark_group("render_svg");
    for (name, entries) in fixtures() {
        group.bench_function(name, |b| {
            b.iter_batched(
                || layout_layered(&entries, &options, layout.text_measurer.as_ref()).unwrap(),
                |diagram| {
                    let _svg = render_layered_svg(&diagram, &svg_opts);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout_only, bench_render_svg);
criterion_main!(benches);
