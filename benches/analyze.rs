use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use capsight::traits::CaptureIterator;
use capsight::{analyze, create_reader, CaptureError};

const NUM_RECORDS: u32 = 1000;

/// Ethernet + IPv4 + TCP frame with a small payload
fn tcp_frame() -> Vec<u8> {
    let mut frame = Vec::with_capacity(64);
    frame.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    frame.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
    frame.extend_from_slice(&0x0800u16.to_be_bytes());
    let payload = b"benchmark payload";
    let total_len = (20 + 20 + payload.len()) as u16;
    frame.push(0x45);
    frame.push(0);
    frame.extend_from_slice(&total_len.to_be_bytes());
    frame.extend_from_slice(&[0, 0, 0, 0, 64, 6, 0, 0]);
    frame.extend_from_slice(&[10, 0, 0, 1]);
    frame.extend_from_slice(&[10, 0, 0, 2]);
    frame.extend_from_slice(&40000u16.to_be_bytes());
    frame.extend_from_slice(&50000u16.to_be_bytes());
    frame.extend_from_slice(&1u32.to_be_bytes());
    frame.extend_from_slice(&0u32.to_be_bytes());
    frame.push(5 << 4);
    frame.push(0x18);
    frame.extend_from_slice(&64240u16.to_be_bytes());
    frame.extend_from_slice(&[0, 0, 0, 0]);
    frame.extend_from_slice(payload);
    frame
}

fn classic_capture() -> Vec<u8> {
    let frame = tcp_frame();
    let mut bytes = Vec::with_capacity(24 + NUM_RECORDS as usize * (16 + frame.len()));
    bytes.extend_from_slice(&[0xd4, 0xc3, 0xb2, 0xa1]);
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 8]);
    bytes.extend_from_slice(&0xffffu32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    for sec in 0..NUM_RECORDS {
        bytes.extend_from_slice(&sec.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&frame);
    }
    bytes
}

fn ng_capture() -> Vec<u8> {
    let frame = tcp_frame();
    let padded = (frame.len() + 3) & !3;
    let epb_len = (32 + padded) as u32;
    let mut bytes = Vec::with_capacity(48 + NUM_RECORDS as usize * epb_len as usize);
    // section header
    bytes.extend_from_slice(&0x0a0d_0d0au32.to_le_bytes());
    bytes.extend_from_slice(&28u32.to_le_bytes());
    bytes.extend_from_slice(&0x1a2b_3c4du32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&(-1i64).to_le_bytes());
    bytes.extend_from_slice(&28u32.to_le_bytes());
    // interface description, ethernet
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&20u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0xffffu32.to_le_bytes());
    bytes.extend_from_slice(&20u32.to_le_bytes());
    for n in 0..NUM_RECORDS as u64 {
        let ts = n * 1_000_000;
        bytes.extend_from_slice(&6u32.to_le_bytes());
        bytes.extend_from_slice(&epb_len.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&((ts >> 32) as u32).to_le_bytes());
        bytes.extend_from_slice(&(ts as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&frame);
        for _ in frame.len()..padded {
            bytes.push(0);
        }
        bytes.extend_from_slice(&epb_len.to_le_bytes());
    }
    bytes
}

fn bench_analyze_classic(c: &mut Criterion) {
    let bytes = classic_capture();
    let mut group = c.benchmark_group("analyze");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("classic_tcp_1000", |b| {
        b.iter(|| analyze(&bytes).expect("analysis"))
    });
    group.finish();
}

fn bench_analyze_pcapng(c: &mut Criterion) {
    let bytes = ng_capture();
    let mut group = c.benchmark_group("analyze");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("pcapng_tcp_1000", |b| {
        b.iter(|| analyze(&bytes).expect("analysis"))
    });
    group.finish();
}

fn do_reader_walk(bytes: &[u8], buffer_size: usize) {
    let mut num_blocks = 0;
    let mut reader = create_reader(buffer_size, bytes).expect("could not create reader");
    loop {
        match reader.next() {
            Ok((offset, _block)) => {
                num_blocks += 1;
                reader.consume(offset);
            }
            Err(CaptureError::Eof) => break,
            Err(CaptureError::Incomplete(_)) => {
                reader.refill().unwrap();
            }
            Err(e) => panic!("unexpected error {:?}", e),
        }
    }
    assert_eq!(num_blocks, NUM_RECORDS as usize + 1);
}

fn bench_reader_buffer_size(c: &mut Criterion) {
    let bytes = classic_capture();
    let mut group = c.benchmark_group("reader buffer_size");
    const KB16: usize = 16384;
    for buffer_size in [KB16, KB16 * 2, KB16 * 4].iter() {
        group.throughput(Throughput::Bytes(*buffer_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(buffer_size),
            buffer_size,
            |b, &size| b.iter(|| do_reader_walk(&bytes, size)),
        );
    }
}

criterion_group!(
    benches,
    bench_analyze_classic,
    bench_analyze_pcapng,
    bench_reader_buffer_size
);
criterion_main!(benches);
