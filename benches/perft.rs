use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use marten_chess::board::Board;
use marten_chess::STARTING_FEN;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    expected_nodes: &'static [u64],
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "start_position",
        fen: STARTING_FEN,
        expected_nodes: &[20, 400, 8_902, 197_281],
    },
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected_nodes: &[48, 2_039, 97_862],
    },
    BenchCase {
        name: "rook_endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_nodes: &[14, 191, 2_812, 43_238],
    },
];

fn perft_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    for case in CASES {
        let depth = case.expected_nodes.len() as u8;
        let expected = *case.expected_nodes.last().unwrap();

        group.throughput(Throughput::Elements(expected));
        group.bench_with_input(BenchmarkId::new(case.name, depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut board = Board::from_fen(case.fen).unwrap();
                let nodes = board.start_perft(black_box(depth), false);
                assert_eq!(expected, nodes);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, perft_benchmark);
criterion_main!(benches);
