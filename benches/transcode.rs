use std::hint::black_box;

use bytes::BytesMut;
use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use influx_codecs::{
    Record,
    decoding::{HeuristicJsonDecoderConfig, JsonDecoderConfig},
    encoding::InfluxdbEncoder,
    escape::escape_key,
    transcoder::TranscoderConfig,
};
use indoc::indoc;

const PAYLOAD: &[u8] = br#"{"time":"2020-01-02T03:04:05","host":"web 01","status":200,"latency":0.0125,"path":"/api/v1/ping","cached":false}"#;
const ULOGD_PAYLOAD: &[u8] = br#"{"timestamp":"2020-01-02T03:04:05.123456","src_ip":"10.0.0.1","src_port":"443","dest_port":"51234","ip.protocol":"6","oob.in":"eth0"}"#;

fn benchmark_encode(c: &mut Criterion) {
    let record = Record::new("svc.api.Ping")
        .with_type("Ping")
        .with_timestamp(1_577_934_245_000_000_000)
        .with_field("cached", false)
        .with_field("host", "web 01")
        .with_field("latency", 0.0125)
        .with_field("path", "/api/v1/ping")
        .with_field("status", 200_i64);
    let encoder = InfluxdbEncoder::default();

    let mut group = c.benchmark_group("influxdb/encode");
    group.throughput(Throughput::Elements(1));
    group.bench_function("record", |b| {
        b.iter_batched_ref(
            || BytesMut::with_capacity(256),
            |output| encoder.write_record(black_box(&record), output),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("escape_key", |b| {
        b.iter(|| escape_key(black_box("name with spaces,commas=and equals")))
    });
    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let json = JsonDecoderConfig {
        time_key: "time".into(),
        time_layout: "%Y-%m-%dT%H:%M:%S".into(),
        time_location: "UTC".into(),
        ..Default::default()
    }
    .build()
    .unwrap();
    let heuristic = HeuristicJsonDecoderConfig {
        time_location: "UTC".into(),
        ..Default::default()
    }
    .build()
    .unwrap();

    let mut group = c.benchmark_group("json/decode");
    group.throughput(Throughput::Bytes(PAYLOAD.len() as u64));
    group.bench_function("configured", |b| {
        b.iter(|| json.decode(black_box("svc.api.Ping"), black_box(PAYLOAD)))
    });
    group.throughput(Throughput::Bytes(ULOGD_PAYLOAD.len() as u64));
    group.bench_function("heuristic", |b| {
        b.iter(|| heuristic.decode(black_box("ulogd.Flow"), black_box(ULOGD_PAYLOAD)))
    });
    group.finish();
}

fn benchmark_transcode(c: &mut Criterion) {
    let transcoder = TranscoderConfig::from_toml(indoc! {r#"
        [decoder]
        codec = "json"
        time_key = "time"
        time_layout = "%Y-%m-%dT%H:%M:%S"
        time_location = "UTC"

        [encoder]
        timestamp_precision = "ms"
    "#})
    .unwrap()
    .build()
    .unwrap();

    let mut group = c.benchmark_group("transcode");
    group.throughput(Throughput::Bytes(PAYLOAD.len() as u64));
    group.bench_function("json_to_line_protocol", |b| {
        b.iter_batched_ref(
            || BytesMut::with_capacity(256),
            |output| transcoder.transcode_into("svc.api.Ping", black_box(PAYLOAD), output),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = benchmark_encode, benchmark_decode, benchmark_transcode
);
criterion_main!(benches);
