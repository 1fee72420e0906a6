use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fielddef::{decode_field_defs, FieldDefArray, FieldType};

fn push_str(buf: &mut Vec<u8>, s: &str) {
    assert!(s.len() < 32);
    buf.push(0xA0 | s.len() as u8);
    buf.extend_from_slice(s.as_bytes());
}

// [{name: "field_N", type: ..., is_nullable: ..., default: N}, ...]
fn encode_format(count: u16) -> Vec<u8> {
    const TYPES: [&str; 4] = ["unsigned", "string", "scalar", "double"];
    let mut buf = vec![0xDC];
    buf.extend_from_slice(&count.to_be_bytes());
    for i in 0..count {
        buf.push(0x84);
        push_str(&mut buf, "name");
        push_str(&mut buf, &format!("field_{i}"));
        push_str(&mut buf, "type");
        push_str(&mut buf, TYPES[usize::from(i) % TYPES.len()]);
        push_str(&mut buf, "is_nullable");
        buf.push(if i % 2 == 0 { 0xC3 } else { 0xC2 });
        push_str(&mut buf, "default");
        buf.push(0xCD);
        buf.extend_from_slice(&i.to_be_bytes());
    }
    buf
}

fn decode(input: &[u8]) -> usize {
    let bump = Bump::new();
    let (_, fields) = decode_field_defs(input, &bump, false).unwrap();
    fields.len()
}

fn decode_and_duplicate(input: &[u8]) -> usize {
    let bump = Bump::new();
    let (_, fields) = decode_field_defs(input, &bump, false).unwrap();
    let array = FieldDefArray::duplicate(fields).unwrap();
    drop(bump);
    let len = array.len();
    array.destroy();
    len
}

fn contains_all_pairs() -> usize {
    let mut n = 0;
    for t1 in FieldType::ALL {
        for t2 in FieldType::ALL {
            if black_box(t1).contains(black_box(t2)) {
                n += 1;
            }
        }
    }
    n
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let data = encode_format(256);
    c.bench_function("decode_256", |b| b.iter(|| decode(black_box(&data))));
    c.bench_function("decode_and_duplicate_256", |b| {
        b.iter(|| decode_and_duplicate(black_box(&data)))
    });
    c.bench_function("contains_all_pairs", |b| b.iter(contains_all_pairs));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
